use clap::Subcommand;
use std::path::PathBuf;

use crate::formatters::OutputFormat;
use std::process::ExitCode;
use stepdag_planner::Planner;

pub mod plan;
pub mod validate;

#[derive(Subcommand)]
pub enum Commands {
    /// Order proposed steps and print the execution plan
    #[command(visible_alias = "p")]
    Plan {
        /// JSON file with proposed steps, or '-' for stdin
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Check proposed steps for cycles, missing and duplicate references
    #[command(visible_alias = "v")]
    Validate {
        /// JSON file with proposed steps, or '-' for stdin
        input: PathBuf,
    },
}

impl Commands {
    pub fn execute(self, planner: &Planner) -> eyre::Result<ExitCode> {
        match self {
            Commands::Plan { input, format } => plan::execute(planner, &input, format),
            Commands::Validate { input } => validate::execute(planner, &input),
        }
    }
}

/// Print a planning failure with its diagnostic and pick the exit code
pub(crate) fn report_failure(err: stepdag_core::Error) -> ExitCode {
    tracing::debug!(kind = %err.kind(), "planning failed");
    eprintln!("{:?}", miette::Report::new(err));
    ExitCode::FAILURE
}
