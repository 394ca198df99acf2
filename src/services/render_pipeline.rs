//! Render, validate and write one job's artifact.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::Mapping;
use tracing::{debug, info, warn};

use crate::domain::{
    AppError, EnvironmentPath, JOB_NAME_KEY, JobError, StepError, TemplatePath, yaml,
};
use crate::ports::FileStore;
use crate::services::context_builder::ContextBuilder;
use crate::services::template_catalog::{RenderFailure, TemplateCatalog};

/// Whether a write changed the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteStatus {
    Written,
    Unchanged,
}

/// Confirmation record for one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    pub environment: String,
    pub group: String,
    pub job: String,
    pub filename: String,
    pub path: PathBuf,
    pub status: WriteStatus,
}

/// Diagnostic for a job that produced no artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobFailure {
    pub environment: String,
    pub group: String,
    pub job: String,
    pub filename: String,
    #[serde(skip)]
    pub error: JobError,
    pub message: String,
}

/// Result of rendering one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Written(WrittenFile),
    Failed(JobFailure),
}

/// Renders templates against contexts and writes artifacts under the output root.
pub struct RenderPipeline<'a, S: FileStore> {
    store: &'a S,
    catalog: &'a TemplateCatalog,
    contexts: ContextBuilder<'a, S>,
    output_root: PathBuf,
}

impl<'a, S: FileStore> RenderPipeline<'a, S> {
    pub fn new(
        store: &'a S,
        catalog: &'a TemplateCatalog,
        contexts: ContextBuilder<'a, S>,
        output_root: &Path,
    ) -> Self {
        Self { store, catalog, contexts, output_root: output_root.to_path_buf() }
    }

    /// `<output_root>/<env_path>/<group>/<job>/<filename>`.
    pub fn output_path(&self, env_path: &EnvironmentPath, template: &TemplatePath) -> PathBuf {
        let mut path = self.output_root.clone();
        path.extend(env_path.segments());
        path.push(template.group());
        path.extend(template.job().split('/'));
        path.join(template.filename())
    }

    /// Render one job. Data problems come back as [`JobOutcome::Failed`];
    /// only infrastructure failures are returned as errors.
    pub fn render_job(
        &self,
        env_path: &EnvironmentPath,
        template: &TemplatePath,
    ) -> Result<JobOutcome, AppError> {
        match self.try_render(env_path, template) {
            Ok(written) => Ok(JobOutcome::Written(written)),
            Err(StepError::Job(error)) => {
                debug!(environment = %env_path, template = template.name(), "{}", error);
                Ok(JobOutcome::Failed(JobFailure {
                    environment: env_path.to_string(),
                    group: template.group().to_string(),
                    job: template.job().to_string(),
                    filename: template.filename().to_string(),
                    message: error.to_string(),
                    error,
                }))
            }
            Err(StepError::Fatal(err)) => Err(err),
        }
    }

    fn try_render(
        &self,
        env_path: &EnvironmentPath,
        template: &TemplatePath,
    ) -> Result<WrittenFile, StepError> {
        let context = self.contexts.build(env_path, template.group(), template.job())?;

        let rendered = self.catalog.render(template, &context).map_err(|failure| match failure {
            RenderFailure::Undefined { name } => JobError::MissingValue {
                name,
                override_path: self.contexts.override_path(
                    env_path,
                    template.group(),
                    template.job(),
                ),
            },
            RenderFailure::Engine(details) => {
                JobError::Render { template: template.name().to_string(), details }
            }
        })?;

        let document = validate_output(template, &rendered)?;
        let content = yaml::to_string(&document).map_err(|details| JobError::MalformedOutput {
            template: template.name().to_string(),
            details,
        })?;

        let path = self.output_path(env_path, template);
        let status = if self.store.read_optional(&path)?.as_deref() == Some(content.as_str()) {
            WriteStatus::Unchanged
        } else {
            self.store.write_file(&path, &content)?;
            WriteStatus::Written
        };
        info!(path = %path.display(), ?status, "wrote artifact");

        Ok(WrittenFile {
            environment: env_path.to_string(),
            group: template.group().to_string(),
            job: template.job().to_string(),
            filename: template.filename().to_string(),
            path,
            status,
        })
    }
}

/// Parse rendered text into a mapping and drop `job_name`.
fn validate_output(template: &TemplatePath, rendered: &str) -> Result<Mapping, JobError> {
    let mut document = yaml::parse_mapping(rendered).map_err(|details| {
        JobError::MalformedOutput { template: template.name().to_string(), details }
    })?;

    if let Some(job_name) = document.shift_remove(JOB_NAME_KEY) {
        if job_name.as_str() != Some(template.job()) {
            warn!(
                template = template.name(),
                job = template.job(),
                job_name = ?job_name,
                "job_name in rendered output does not match the job path"
            );
        }
    }

    Ok(document)
}
