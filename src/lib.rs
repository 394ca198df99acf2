//! jobconf: render per-environment job configuration from shared templates
//! and hierarchical override files.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

pub use app::{GenerateOptions, GenerateOutcome, PathOverrides, generate};
pub use domain::{AppError, EnvKind, EnvironmentPath, GeneratorConfig, JobError, Selection};
pub use services::{JobFailure, RunReport, WriteStatus, WrittenFile};
