//! Plan rendering for terminal and machine consumption

use clap::ValueEnum;
use std::fmt::Write;
use stepdag_core::{ExecutionPlan, Result};

/// How a plan is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Levels, critical path and warnings for humans
    #[default]
    Text,
    /// The full plan as pretty-printed JSON
    Json,
}

pub fn render(plan: &ExecutionPlan, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(plan)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(plan)?),
    }
}

/// Level-by-level listing
pub fn render_text(plan: &ExecutionPlan) -> String {
    let mut out = String::new();

    if plan.is_empty() {
        out.push_str("empty plan\n");
        return out;
    }

    for level in &plan.levels {
        let _ = writeln!(out, "level {} ({} parallel)", level.index, level.len());
        for id in &level.step_ids {
            match plan.step(id) {
                Some(step) => {
                    let _ = writeln!(
                        out,
                        "  [{}] {} ({}) {}",
                        step.sequence_number, step.id, step.action, step.description
                    );
                }
                None => {
                    let _ = writeln!(out, "  {id}");
                }
            }
        }
    }

    if !plan.critical_path.is_empty() {
        let _ = writeln!(out, "critical path: {}", plan.critical_path.join(" -> "));
    }

    for warning in &plan.warnings {
        let _ = writeln!(out, "warning: {warning}");
    }

    out
}
