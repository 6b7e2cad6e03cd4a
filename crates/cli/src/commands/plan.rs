use crate::formatters::{self, OutputFormat};
use crate::input::read_proposed_steps;
use std::path::Path;
use std::process::ExitCode;
use stepdag_planner::Planner;

use super::report_failure;

pub fn execute(planner: &Planner, input: &Path, format: OutputFormat) -> eyre::Result<ExitCode> {
    let proposed = match read_proposed_steps(input) {
        Ok(proposed) => proposed,
        Err(err) => return Ok(report_failure(err)),
    };

    match planner.plan(&proposed) {
        Ok(plan) => {
            print!("{}", formatters::render(&plan, format)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => Ok(report_failure(err)),
    }
}
