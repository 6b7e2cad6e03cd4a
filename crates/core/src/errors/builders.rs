//! Builder methods for creating errors with context

use super::types::{Error, MissingReference};
use std::path::PathBuf;

// Helper methods for creating errors with context
impl Error {
    /// Create a circular dependency error from the ids along the cycle
    #[must_use]
    pub fn circular_dependency(cycle: Vec<String>) -> Self {
        Error::CircularDependency { cycle }
    }

    /// Create a missing dependency error
    #[must_use]
    pub fn missing_dependency(missing: Vec<MissingReference>, valid_ids: Vec<String>) -> Self {
        Error::MissingDependency { missing, valid_ids }
    }

    /// Create a duplicate step error
    #[must_use]
    pub fn duplicate_step(step_id: impl Into<String>, sequence_numbers: Vec<u32>) -> Self {
        Error::DuplicateStep {
            step_id: step_id.into(),
            sequence_numbers,
        }
    }

    /// Collapse a list of defects into one error
    ///
    /// Returns `None` for an empty list and the defect itself when there is
    /// only one, so callers see the most specific kind available.
    #[must_use]
    pub fn from_defects(mut errors: Vec<Error>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Error::InvalidGraph { errors }),
        }
    }

    /// Create a sort failure error
    #[must_use]
    pub fn sort_failure(message: impl Into<String>) -> Self {
        Error::SortFailure {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Prefix the message of a message-carrying error with `context`
    ///
    /// The kind never changes. Structured errors (cycles, missing references,
    /// file system failures) are returned as they are.
    #[must_use]
    pub fn in_context(self, context: impl Into<String>) -> Self {
        let context = context.into();
        match self {
            Error::Json { message, source } => Error::Json {
                message: format!("{context}: {message}"),
                source,
            },
            Error::Configuration { message } => Error::Configuration {
                message: format!("{context}: {message}"),
            },
            Error::SortFailure { message } => Error::SortFailure {
                message: format!("{context}: {message}"),
            },
            other => other,
        }
    }

    /// Create a file system error
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }
}
