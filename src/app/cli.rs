//! CLI Adapter.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::app::api::{GenerateOptions, GenerateOutcome};
use crate::app::config::PathOverrides;
use crate::app::logging;
use crate::domain::AppError;
use crate::services::{RunReport, WriteStatus};

#[derive(Parser)]
#[command(name = "jobconf")]
#[command(version)]
#[command(
    about = "Render per-environment job configuration from templates and overrides",
    long_about = None
)]
struct Cli {
    /// Filters: env=<prod|experiment|test|all> [exp=<name|all>]
    #[arg(value_name = "KEY=VALUE")]
    filters: Vec<String>,
    /// Configuration file (defaults to ./jobconf.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Template root directory
    #[arg(long)]
    templates: Option<PathBuf>,
    /// Override root directory
    #[arg(long)]
    overrides: Option<PathBuf>,
    /// Output root directory
    #[arg(long)]
    output: Option<PathBuf>,
    /// Exit non-zero when any job fails to render
    #[arg(long)]
    strict: bool,
    /// Summary format written to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let format = cli.format;
    let options = GenerateOptions {
        filters: cli.filters,
        config_path: cli.config,
        paths: PathOverrides {
            templates: cli.templates,
            overrides: cli.overrides,
            output: cli.output,
        },
        strict: cli.strict,
    };

    let result =
        crate::app::api::generate(options).and_then(|outcome| print_outcome(&outcome, format));

    match result {
        Ok(exit_code) => {
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn print_outcome(outcome: &GenerateOutcome, format: OutputFormat) -> Result<i32, AppError> {
    let report = &outcome.report;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => print_text(report),
    }
    Ok(outcome.exit_code())
}

/// Warnings reach stderr through the log subscriber; only results print here.
fn print_text(report: &RunReport) {
    for file in &report.written {
        match file.status {
            WriteStatus::Written => println!("Wrote {}", file.path.display()),
            WriteStatus::Unchanged => println!("Unchanged {}", file.path.display()),
        }
    }

    for failure in &report.failures {
        eprintln!(
            "❌ {}/{}/{}/{}: {}",
            failure.environment, failure.group, failure.job, failure.filename, failure.message
        );
    }

    let unchanged =
        report.written.iter().filter(|f| f.status == WriteStatus::Unchanged).count();
    println!(
        "✅ Generated {} file(s) ({} unchanged), {} job(s) failed",
        report.written.len(),
        unchanged,
        report.failures.len()
    );
}
