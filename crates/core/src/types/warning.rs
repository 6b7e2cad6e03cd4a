//! Non-fatal findings recorded while planning

use serde::{Deserialize, Serialize};
use std::fmt;

/// Something the planner corrected or degraded instead of failing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanWarning {
    /// A step listed itself as a dependency; the reference was removed
    SelfDependencyPruned { step_id: String },
    /// Two steps produced the same identifier; the later one was renamed
    IdentifierDisambiguated { original: String, assigned: String },
    /// The sort did not complete and declaration order was used instead
    SortFallback { reason: String },
}

impl PlanWarning {
    pub fn is_sort_fallback(&self) -> bool {
        matches!(self, PlanWarning::SortFallback { .. })
    }
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::SelfDependencyPruned { step_id } => {
                write!(f, "step '{step_id}' depended on itself; the reference was removed")
            }
            PlanWarning::IdentifierDisambiguated { original, assigned } => {
                write!(f, "identifier '{original}' was already taken; assigned '{assigned}'")
            }
            PlanWarning::SortFallback { reason } => {
                write!(f, "falling back to declaration order: {reason}")
            }
        }
    }
}
