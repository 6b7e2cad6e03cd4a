//! Core error type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result type alias for stepdag operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for stepdag operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The declared dependencies form a cycle
    CircularDependency {
        /// Ids along the cycle, starting at the step the back edge points to
        cycle: Vec<String>,
    },

    /// One or more steps reference ids that do not exist
    MissingDependency {
        missing: Vec<MissingReference>,
        /// Every id present in the graph, in declaration order
        valid_ids: Vec<String>,
    },

    /// No steps were extracted at all
    EmptyPlan,

    /// More than one step claimed the same id
    DuplicateStep {
        step_id: String,
        sequence_numbers: Vec<u32>,
    },

    /// Several independent defects were found in one graph
    InvalidGraph { errors: Vec<Error> },

    /// Topological sort failed and the strict fallback policy is active
    SortFailure { message: String },

    /// Configuration errors
    Configuration { message: String },

    /// File system operations
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A dependency reference that did not resolve to any step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingReference {
    /// Id of the step that declared the reference
    pub step_id: String,
    /// The reference as written
    pub reference: String,
}

/// Stable classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    CircularDependency,
    MissingDependency,
    EmptyPlan,
    DuplicateStep,
    InvalidGraph,
    SortFailure,
    Configuration,
    FileSystem,
    Json,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::CircularDependency => "CIRCULAR_DEPENDENCY",
            ErrorKind::MissingDependency => "MISSING_DEPENDENCY",
            ErrorKind::EmptyPlan => "EMPTY_PLAN",
            ErrorKind::DuplicateStep => "DUPLICATE_STEP",
            ErrorKind::InvalidGraph => "INVALID_GRAPH",
            ErrorKind::SortFailure => "SORT_FAILURE",
            ErrorKind::Configuration => "CONFIGURATION",
            ErrorKind::FileSystem => "FILE_SYSTEM",
            ErrorKind::Json => "JSON",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::CircularDependency { .. } => ErrorKind::CircularDependency,
            Error::MissingDependency { .. } => ErrorKind::MissingDependency,
            Error::EmptyPlan => ErrorKind::EmptyPlan,
            Error::DuplicateStep { .. } => ErrorKind::DuplicateStep,
            Error::InvalidGraph { .. } => ErrorKind::InvalidGraph,
            Error::SortFailure { .. } => ErrorKind::SortFailure,
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::FileSystem { .. } => ErrorKind::FileSystem,
            Error::Json { .. } => ErrorKind::Json,
        }
    }

    /// Flattened view over this error and, for [`Error::InvalidGraph`], its parts
    pub fn defects(&self) -> Vec<&Error> {
        match self {
            Error::InvalidGraph { errors } => errors.iter().flat_map(Error::defects).collect(),
            other => vec![other],
        }
    }

    /// Whether this error, or any part of a composite error, has the given kind
    pub fn contains_kind(&self, kind: ErrorKind) -> bool {
        self.kind() == kind || self.defects().iter().any(|e| e.kind() == kind)
    }
}
