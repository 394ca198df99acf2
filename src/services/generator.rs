//! Run orchestration: discover once, then render the selected subset.

use serde::Serialize;
use tracing::{debug, info_span, warn};

use crate::domain::{AppError, EnvironmentPath, GeneratorConfig, Selection};
use crate::ports::FileStore;
use crate::services::context_builder::ContextBuilder;
use crate::services::override_topology::OverrideTopology;
use crate::services::render_pipeline::{JobFailure, JobOutcome, RenderPipeline, WrittenFile};
use crate::services::template_catalog::TemplateCatalog;

/// Summary of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub written: Vec<WrittenFile>,
    pub failures: Vec<JobFailure>,
    pub warnings: Vec<String>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    fn record(&mut self, outcome: JobOutcome) {
        match outcome {
            JobOutcome::Written(written) => self.written.push(written),
            JobOutcome::Failed(failure) => self.failures.push(failure),
        }
    }
}

/// Render every job selected by `selection`.
///
/// Discovery of templates and overrides completes before any rendering.
/// Per-job failures are collected in the report; infrastructure failures
/// abort the run.
pub fn generate<S: FileStore>(
    store: &S,
    config: &GeneratorConfig,
    selection: &Selection,
) -> Result<RunReport, AppError> {
    let catalog =
        TemplateCatalog::discover(store, &config.paths.templates, &config.render.template_suffix)?;
    let topology = OverrideTopology::scan(store, &config.paths.overrides)?;
    debug!(templates = catalog.len(), "discovery complete");

    let selected: Vec<&EnvironmentPath> =
        topology.environment_paths().filter(|path| selection.matches(path)).collect();

    let mut report = RunReport::default();
    if selected.is_empty() && selection.is_specific() {
        let message = format!(
            "no environments under {} match {}",
            topology.root().display(),
            selection
        );
        warn!("{}", message);
        report.warnings.push(message);
    }

    let contexts =
        ContextBuilder::new(store, topology.root(), config.render.write_env.clone());
    let pipeline = RenderPipeline::new(store, &catalog, contexts, &config.paths.output);

    for env_path in selected {
        let _span = info_span!("environment", path = %env_path).entered();
        for group in topology.active_groups(env_path) {
            let mut templates = catalog.in_group(group).peekable();
            if templates.peek().is_none() {
                debug!(group, "no templates for active group");
            }
            for template in templates {
                report.record(pipeline.render_job(env_path, template)?);
            }
        }
    }

    Ok(report)
}
