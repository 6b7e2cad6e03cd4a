//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CircularDependency { cycle } => {
                write!(f, "circular dependency detected: {}", cycle_path(cycle))
            }
            Error::MissingDependency { missing, .. } => match missing.as_slice() {
                [single] => write!(
                    f,
                    "step '{}' depends on unknown step '{}'",
                    single.step_id, single.reference
                ),
                many => {
                    let pairs: Vec<String> = many
                        .iter()
                        .map(|m| format!("'{}' -> '{}'", m.step_id, m.reference))
                        .collect();
                    write!(
                        f,
                        "{} dependencies reference unknown steps: {}",
                        many.len(),
                        pairs.join(", ")
                    )
                }
            },
            Error::EmptyPlan => write!(f, "no steps were extracted from the plan"),
            Error::DuplicateStep {
                step_id,
                sequence_numbers,
            } => {
                let numbers: Vec<String> =
                    sequence_numbers.iter().map(|n| n.to_string()).collect();
                write!(
                    f,
                    "step id '{step_id}' is claimed by more than one step (steps {})",
                    numbers.join(", ")
                )
            }
            Error::InvalidGraph { errors } => {
                let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                write!(
                    f,
                    "step graph has {} problems: {}",
                    errors.len(),
                    messages.join("; ")
                )
            }
            Error::SortFailure { message } => {
                write!(f, "topological sort failed: {message}")
            }
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Error::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system {} operation failed for '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            Error::Json { message, .. } => {
                write!(f, "JSON error: {message}")
            }
        }
    }
}

/// Render a cycle as `a -> b -> a`
pub(crate) fn cycle_path(cycle: &[String]) -> String {
    match cycle.first() {
        Some(first) => {
            let mut path = cycle.join(" -> ");
            path.push_str(" -> ");
            path.push_str(first);
            path
        }
        None => String::from("<empty>"),
    }
}
