pub mod api;
pub mod cli;
pub mod config;
mod logging;

pub use api::{GenerateOptions, GenerateOutcome, generate};
pub use config::PathOverrides;
