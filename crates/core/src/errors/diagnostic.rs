//! `miette` diagnostics for planner errors
//!
//! Codes are stable and meant for machine consumption; help text carries the
//! detail a caller needs to correct the plan without rebuilding the graph.

use super::display::cycle_path;
use super::types::Error;
use std::fmt::Display;

impl miette::Diagnostic for Error {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(format!(
            "stepdag::{}",
            self.kind().as_str().to_ascii_lowercase()
        )))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        let help = match self {
            Error::CircularDependency { cycle } => format!(
                "break the cycle {} by removing one of its dependencies",
                cycle_path(cycle)
            ),
            Error::MissingDependency { valid_ids, .. } if valid_ids.is_empty() => {
                "the plan contains no steps that could be referenced".to_string()
            }
            Error::MissingDependency { valid_ids, .. } => {
                format!("valid step ids: {}", valid_ids.join(", "))
            }
            Error::EmptyPlan => "the model response did not contain any parsable steps".to_string(),
            Error::DuplicateStep { .. } => {
                "give each step a distinct id or let the planner generate them".to_string()
            }
            Error::SortFailure { .. } => {
                "set sort_fallback to \"warn\" to fall back to declaration order".to_string()
            }
            Error::InvalidGraph { .. }
            | Error::Configuration { .. }
            | Error::FileSystem { .. }
            | Error::Json { .. } => return None,
        };
        Some(Box::new(help))
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn miette::Diagnostic> + 'a>> {
        match self {
            Error::InvalidGraph { errors } => Some(Box::new(
                errors.iter().map(|e| e as &dyn miette::Diagnostic),
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{Error, MissingReference};
    use miette::Diagnostic;

    #[test]
    fn test_missing_dependency_help_lists_valid_ids() {
        let err = Error::missing_dependency(
            vec![MissingReference {
                step_id: "step_write_b".into(),
                reference: "step_nonexistent".into(),
            }],
            vec!["step_read_a".into(), "step_write_b".into()],
        );
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("stepdag::missing_dependency"));
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert_eq!(help, "valid step ids: step_read_a, step_write_b");
    }

    #[test]
    fn test_composite_exposes_related_diagnostics() {
        let err = Error::InvalidGraph {
            errors: vec![
                Error::circular_dependency(vec!["a".into(), "b".into()]),
                Error::duplicate_step("c", vec![3, 4]),
            ],
        };
        let related: Vec<String> = err
            .related()
            .expect("composite has related errors")
            .map(|d| d.to_string())
            .collect();
        assert_eq!(related.len(), 2);
        assert!(related[0].contains("a -> b -> a"));
    }
}
