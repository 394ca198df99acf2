use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Library-wide error type for jobconf operations.
///
/// Every variant aborts the run. Per-job data problems are reported through
/// [`JobError`] instead and never surface here.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Bad CLI filter combination or malformed argument.
    #[error("{0}")]
    Usage(String),

    /// Configuration file is unreadable or invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// Template root directory is missing.
    #[error("Template root not found: {0}")]
    TemplateRootMissing(PathBuf),

    /// A template failed to compile.
    #[error("Failed to compile template '{name}': {details}")]
    TemplateCompile { name: String, details: String },

    /// A template path cannot be mapped onto `<group>/<job>/<filename>`.
    #[error("Template '{0}' must live under <group>/<job>/ to be rendered")]
    TemplateLayout(String),

    /// A path is not valid UTF-8 and cannot be used as a lookup key.
    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),

    /// Report serialization failed.
    #[error("Failed to serialize run report: {0}")]
    Report(#[from] serde_json::Error),
}

impl AppError {
    pub fn usage<S: Into<String>>(message: S) -> Self {
        AppError::Usage(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AppError::Io { path: path.into(), source }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Usage(_) => 2,
            _ => 1,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Failure confined to a single job. The run continues with the next job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    /// A template referenced a variable that neither the override nor the defaults provide.
    #[error("configuration '{name}' is required but no value was provided in {override_path}")]
    MissingValue { name: String, override_path: PathBuf },

    /// The templating engine failed and no variable name could be recovered.
    #[error("failed to render template '{template}': {details}")]
    Render { template: String, details: String },

    /// The override file exists but is not a YAML mapping.
    #[error("invalid override file {path}: {details}")]
    InvalidOverride { path: PathBuf, details: String },

    /// The rendered text is not a YAML mapping.
    #[error("rendered output of '{template}' is not a valid YAML mapping: {details}")]
    MalformedOutput { template: String, details: String },
}

/// Error from a step that can fail either one job or the whole run.
#[derive(Debug)]
pub enum StepError {
    Job(JobError),
    Fatal(AppError),
}

impl From<JobError> for StepError {
    fn from(err: JobError) -> Self {
        StepError::Job(err)
    }
}

impl From<AppError> for StepError {
    fn from(err: AppError) -> Self {
        StepError::Fatal(err)
    }
}
