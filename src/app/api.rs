//! Library entry points used by the CLI.

use std::path::PathBuf;

use crate::adapters::LocalFilesystem;
use crate::app::config::{PathOverrides, load_config};
use crate::domain::config::WRITE_ENV_VAR;
use crate::domain::{AppError, Selection};
use crate::services::{self, RunReport};

/// Exit status when jobs failed and the run is configured to report it.
pub const JOB_FAILURE_EXIT_CODE: i32 = 3;

/// Inputs for a generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Raw `key=value` filter arguments.
    pub filters: Vec<String>,
    pub config_path: Option<PathBuf>,
    pub paths: PathOverrides,
    /// Force a non-zero exit when any job fails.
    pub strict: bool,
}

/// Report plus the exit-status policy that applies to it.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub report: RunReport,
    pub fail_on_job_errors: bool,
}

impl GenerateOutcome {
    pub fn exit_code(&self) -> i32 {
        if self.fail_on_job_errors && self.report.has_failures() {
            JOB_FAILURE_EXIT_CODE
        } else {
            0
        }
    }
}

/// Validate filters, load configuration, and render the selected jobs.
///
/// Filters are validated before any file is read.
pub fn generate(options: GenerateOptions) -> Result<GenerateOutcome, AppError> {
    let selection = Selection::from_args(&options.filters)?;

    let store = LocalFilesystem::new();
    let cwd = std::env::current_dir().map_err(|e| AppError::io(".", e))?;
    let write_env = std::env::var(WRITE_ENV_VAR).ok();
    let config =
        load_config(&store, &cwd, options.config_path.as_deref(), &options.paths, write_env)?;

    let report = services::generate(&store, &config, &selection)?;
    Ok(GenerateOutcome {
        report,
        fail_on_job_errors: options.strict || config.run.fail_on_job_errors,
    })
}
