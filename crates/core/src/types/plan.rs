//! The execution plan handed to the executor

use super::step::Step;
use super::warning::PlanWarning;
use serde::{Deserialize, Serialize};

/// A group of mutually independent steps
///
/// Every dependency of a step in level `k` lives in a level `< k`, so the
/// executor may dispatch a whole level concurrently once the previous level
/// has completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionLevel {
    pub index: usize,
    /// Step ids ordered by sequence number
    pub step_ids: Vec<String>,
}

impl ExecutionLevel {
    pub fn len(&self) -> usize {
        self.step_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.step_ids.is_empty()
    }

    pub fn contains(&self, step_id: &str) -> bool {
        self.step_ids.iter().any(|id| id == step_id)
    }
}

/// Ordered, levelled plan produced from a validated step graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    /// Total order consistent with every dependency
    pub order: Vec<Step>,
    /// Concurrency groups; flattening them yields a valid linearization
    pub levels: Vec<ExecutionLevel>,
    /// Longest chain of sequential dependencies
    #[serde(default)]
    pub critical_path: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<PlanWarning>,
}

impl ExecutionPlan {
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Look up a step by id
    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.order.iter().find(|step| step.id == step_id)
    }

    /// Ids in execution order
    pub fn step_ids(&self) -> Vec<&str> {
        self.order.iter().map(|step| step.id.as_str()).collect()
    }

    /// Index of the level that holds `step_id`
    pub fn level_of(&self, step_id: &str) -> Option<usize> {
        self.levels
            .iter()
            .find(|level| level.contains(step_id))
            .map(|level| level.index)
    }

    /// Size of the widest level
    pub fn max_parallelism(&self) -> usize {
        self.levels.iter().map(ExecutionLevel::len).max().unwrap_or(0)
    }

    /// Whether the order came from the sort fallback rather than a clean sort
    pub fn used_sort_fallback(&self) -> bool {
        self.warnings.iter().any(PlanWarning::is_sort_fallback)
    }
}
