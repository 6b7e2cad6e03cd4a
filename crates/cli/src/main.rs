use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use stepdag::Commands;
use stepdag_config::{ConfigLoader, SortFallbackPolicy};
use stepdag_planner::Planner;

#[derive(Parser)]
#[command(name = "stepdag")]
#[command(about = "Order model-proposed steps into a verified execution plan", long_about = None)]
#[command(version)]
struct Cli {
    /// Planner configuration file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fail instead of falling back to declaration order when sorting fails
    #[arg(long, global = true)]
    strict: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;

    // Parse command-line arguments
    let cli = Cli::parse();

    stepdag_utils::tracing::init(cli.log_level()).map_err(|e| eyre::eyre!(e))?;

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.file(path);
    }
    let mut config = match loader.load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            return Ok(ExitCode::from(2));
        }
    };
    if cli.strict {
        config.sort_fallback = SortFallbackPolicy::Error;
    }

    cli.command.execute(&Planner::new(config))
}
