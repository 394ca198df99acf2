use std::path::{Path, PathBuf};

use serde_yaml::Mapping;

use crate::domain::{EnvironmentPath, JobError, RenderContext, StepError, yaml};
use crate::ports::FileStore;
use crate::services::override_topology::override_file;

/// Builds render contexts from override files plus injected defaults.
#[derive(Debug, Clone)]
pub struct ContextBuilder<'a, S: FileStore> {
    store: &'a S,
    override_root: PathBuf,
    write_env: Option<String>,
}

impl<'a, S: FileStore> ContextBuilder<'a, S> {
    pub fn new(store: &'a S, override_root: &Path, write_env: Option<String>) -> Self {
        Self { store, override_root: override_root.to_path_buf(), write_env }
    }

    /// Override file consulted for one job.
    pub fn override_path(&self, env_path: &EnvironmentPath, group: &str, job: &str) -> PathBuf {
        override_file(&self.override_root, env_path, group, job)
    }

    /// Load the job's override record (empty when absent) and apply defaults.
    pub fn build(
        &self,
        env_path: &EnvironmentPath,
        group: &str,
        job: &str,
    ) -> Result<RenderContext, StepError> {
        let path = self.override_path(env_path, group, job);
        let record = match self.store.read_optional(&path)? {
            Some(content) => parse_override(&path, &content)?,
            None => Mapping::new(),
        };
        Ok(RenderContext::build(record, env_path, self.write_env.as_deref()))
    }
}

fn parse_override(path: &Path, content: &str) -> Result<Mapping, JobError> {
    yaml::parse_mapping(content)
        .map_err(|details| JobError::InvalidOverride { path: path.to_path_buf(), details })
}
