use crate::input::read_proposed_steps;
use std::path::Path;
use std::process::ExitCode;
use stepdag_core::Error;
use stepdag_planner::Planner;

use super::report_failure;

pub fn execute(planner: &Planner, input: &Path) -> eyre::Result<ExitCode> {
    let proposed = match read_proposed_steps(input) {
        Ok(proposed) => proposed,
        Err(err) => return Ok(report_failure(err)),
    };
    if proposed.is_empty() {
        return Ok(report_failure(Error::EmptyPlan));
    }

    let identified = planner.identify(&proposed);
    match planner.validate(identified.steps) {
        Ok(graph) => {
            println!("valid: {} steps", graph.len());
            for warning in identified.warnings.iter().chain(graph.warnings().iter()) {
                println!("warning: {warning}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => Ok(report_failure(err)),
    }
}
