pub mod config;
pub mod environment;
pub mod error;
pub mod render_context;
pub mod selection;
pub mod template_path;
pub mod yaml;

pub use config::{GeneratorConfig, PathsConfig, RenderConfig, RunPolicyConfig};
pub use environment::{EnvKind, EnvironmentPath};
pub use error::{AppError, JobError, StepError};
pub use render_context::RenderContext;
pub use selection::{EnvFilter, ExpFilter, Selection};
pub use template_path::TemplatePath;

/// Conventional override file name within `<env>/<group>/<job>/`.
pub const OVERRIDE_FILE: &str = "config.yml";

/// Key templates may emit for self-documentation; stripped from artifacts.
pub const JOB_NAME_KEY: &str = "job_name";
