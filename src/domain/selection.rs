//! Environment/experiment selection filters.
//!
//! Filters arrive as `env=<kind|all>` and `exp=<name|all>` arguments and are
//! validated here, before any file is touched.

use std::fmt;

use crate::domain::{AppError, EnvKind, EnvironmentPath};

pub const ALL: &str = "all";

pub const USAGE: &str = "usage: jobconf env=<prod|experiment|test|all> [exp=<name|all>]";

/// Which env kinds to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvFilter {
    All,
    Kind(EnvKind),
}

/// Which experiments to render within the selected kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpFilter {
    All,
    Named(String),
}

/// A validated filter pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    env: EnvFilter,
    exp: ExpFilter,
}

impl Selection {
    /// Everything the override tree defines.
    pub fn all() -> Self {
        Self { env: EnvFilter::All, exp: ExpFilter::All }
    }

    /// Parse order-independent `key=value` arguments.
    pub fn from_args<I, S>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut env: Option<String> = None;
        let mut exp: Option<String> = None;

        for arg in args {
            let arg = arg.as_ref();
            let Some((key, value)) = arg.split_once('=') else {
                return Err(usage_error(&format!("malformed argument '{}'", arg)));
            };
            let slot = match key {
                "env" => &mut env,
                "exp" => &mut exp,
                other => return Err(usage_error(&format!("unknown argument '{}'", other))),
            };
            if slot.replace(value.to_string()).is_some() {
                return Err(usage_error(&format!("argument '{}' given more than once", key)));
            }
        }

        let env = env.ok_or_else(|| usage_error("missing required argument 'env'"))?;
        Self::new(&env, exp.as_deref())
    }

    /// Validate a filter pair. `exp` is `None` when it was not supplied.
    pub fn new(env: &str, exp: Option<&str>) -> Result<Self, AppError> {
        if env == ALL {
            return match exp {
                None | Some(ALL) => Ok(Self::all()),
                Some(other) => Err(usage_error(&format!(
                    "exp='{}' cannot be combined with env=all; use exp=all or omit it",
                    other
                ))),
            };
        }

        let kind = EnvKind::from_dir_name(env).ok_or_else(|| {
            usage_error(&format!(
                "unknown env '{}': expected one of {}, all",
                env,
                EnvKind::names()
            ))
        })?;

        if !kind.requires_experiment() {
            return match exp {
                None | Some(ALL) => Ok(Self { env: EnvFilter::Kind(kind), exp: ExpFilter::All }),
                Some(other) => Err(usage_error(&format!(
                    "env={} does not take an experiment (got exp='{}')",
                    kind, other
                ))),
            };
        }

        match exp {
            None | Some("") => {
                Err(usage_error(&format!("env={} requires exp=<name|all>", kind)))
            }
            Some(ALL) => Ok(Self { env: EnvFilter::Kind(kind), exp: ExpFilter::All }),
            Some(name) if name.contains('/') => {
                Err(usage_error(&format!("experiment name '{}' must not contain '/'", name)))
            }
            Some(name) => Ok(Self {
                env: EnvFilter::Kind(kind),
                exp: ExpFilter::Named(name.to_string()),
            }),
        }
    }

    pub fn env(&self) -> EnvFilter {
        self.env
    }

    pub fn exp(&self) -> &ExpFilter {
        &self.exp
    }

    /// Whether the selection names a specific env kind rather than `all`.
    pub fn is_specific(&self) -> bool {
        matches!(self.env, EnvFilter::Kind(_))
    }

    pub fn matches(&self, path: &EnvironmentPath) -> bool {
        let env_ok = match self.env {
            EnvFilter::All => true,
            EnvFilter::Kind(kind) => path.kind() == kind,
        };
        let exp_ok = match &self.exp {
            ExpFilter::All => true,
            ExpFilter::Named(name) => path.experiment() == Some(name.as_str()),
        };
        env_ok && exp_ok
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env = match self.env {
            EnvFilter::All => ALL,
            EnvFilter::Kind(kind) => kind.dir_name(),
        };
        let exp = match &self.exp {
            ExpFilter::All => ALL,
            ExpFilter::Named(name) => name.as_str(),
        };
        write!(f, "env={} exp={}", env, exp)
    }
}

fn usage_error(reason: &str) -> AppError {
    AppError::usage(format!("{}\n{}", reason, USAGE))
}
