//! Step records before and after identifier assignment

use super::action::Action;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A step as handed over by the upstream step-text parser
///
/// `dependency_text` is the raw trailing text of the step; it has not been
/// resolved to identifiers yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedStep {
    pub sequence_number: u32,
    pub action: Action,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_text: Option<String>,
}

impl ProposedStep {
    pub fn new(sequence_number: u32, action: Action, description: impl Into<String>) -> Self {
        Self {
            sequence_number,
            action,
            description: description.into(),
            path: None,
            command: None,
            dependency_text: None,
        }
    }

    pub fn with_dependency_text(mut self, text: impl Into<String>) -> Self {
        self.dependency_text = Some(text.into());
        self
    }
}

/// A step with its identifier assigned and dependencies resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub sequence_number: u32,
    pub action: Action,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Resolved prerequisite ids, in declaration order
    #[serde(default)]
    pub depends_on: IndexSet<String>,
}

impl Step {
    pub fn new(
        id: impl Into<String>,
        sequence_number: u32,
        action: Action,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            sequence_number,
            action,
            description: description.into(),
            path: None,
            command: None,
            depends_on: IndexSet::new(),
        }
    }

    /// Add prerequisite ids
    pub fn depending_on<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(ids.into_iter().map(Into::into));
        self
    }
}
