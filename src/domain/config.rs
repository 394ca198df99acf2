//! Generator configuration loaded from `jobconf.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::AppError;

pub const CONFIG_FILE: &str = "jobconf.toml";
pub const WRITE_ENV_VAR: &str = "JOBCONF_WRITE_ENV";

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub run: RunPolicyConfig,
}

/// Input and output roots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    #[serde(default = "default_templates")]
    pub templates: PathBuf,
    #[serde(default = "default_overrides")]
    pub overrides: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            templates: default_templates(),
            overrides: default_overrides(),
            output: default_output(),
        }
    }
}

impl PathsConfig {
    /// Anchor relative roots at `base`.
    pub fn resolve_against(&mut self, base: &Path) {
        for path in [&mut self.templates, &mut self.overrides, &mut self.output] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Template rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Suffix identifying template files.
    #[serde(default = "default_template_suffix")]
    pub template_suffix: String,
    /// Default `write_env` tag. Falls back to the env kind when unset.
    #[serde(default)]
    pub write_env: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { template_suffix: default_template_suffix(), write_env: None }
    }
}

/// Exit-status policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunPolicyConfig {
    /// Exit non-zero when any job fails to render.
    #[serde(default)]
    pub fail_on_job_errors: bool,
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.render.template_suffix.is_empty() {
            return Err(AppError::InvalidConfig(
                "render.template_suffix must not be empty".to_string(),
            ));
        }
        if self.render.write_env.as_deref() == Some("") {
            return Err(AppError::InvalidConfig("render.write_env must not be empty".to_string()));
        }
        Ok(())
    }

    /// Apply the write-environment variable value, if one was set.
    pub fn apply_write_env(&mut self, value: Option<String>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.render.write_env = Some(value);
        }
    }
}

/// Parse configuration from string content.
pub fn parse_config_content(content: &str) -> Result<GeneratorConfig, AppError> {
    let config: GeneratorConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

fn default_templates() -> PathBuf {
    PathBuf::from("config-templates")
}

fn default_overrides() -> PathBuf {
    PathBuf::from("config-overrides")
}

fn default_output() -> PathBuf {
    PathBuf::from("configs")
}

fn default_template_suffix() -> String {
    ".j2".to_string()
}
