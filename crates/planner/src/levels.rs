//! Execution levels
//!
//! A step's level is 0 when it has no prerequisites, otherwise one more than
//! the highest level among its prerequisites. Steps sharing a level never
//! depend on each other and may be dispatched together.

use crate::validate::ValidatedGraph;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;
use stepdag_core::ExecutionLevel;

/// Level of every step, keyed by id
///
/// Returns `None` only when the graph is cyclic, which a validated graph
/// never is.
pub fn step_levels(graph: &ValidatedGraph) -> Option<HashMap<String, usize>> {
    let dag = graph.graph();
    let mut levels = HashMap::with_capacity(dag.node_count());

    for idx in graph.prerequisites_first()? {
        let level = dag
            .edges_directed(idx, Direction::Outgoing)
            .filter_map(|edge| levels.get(&edge.target()).copied())
            .map(|prerequisite: usize| prerequisite + 1)
            .max()
            .unwrap_or(0);
        levels.insert(idx, level);
    }

    Some(
        levels
            .into_iter()
            .map(|(idx, level)| (dag[idx].id.clone(), level))
            .collect(),
    )
}

/// Group the steps of `graph` into execution levels
///
/// Within a level, steps are ordered by sequence number and then by
/// declaration order.
pub fn partition_levels(graph: &ValidatedGraph) -> Option<Vec<ExecutionLevel>> {
    let levels = step_levels(graph)?;
    let depth = levels.values().copied().max().map_or(0, |max| max + 1);

    let mut grouped: Vec<Vec<(u32, usize, String)>> = vec![Vec::new(); depth];
    for (position, step) in graph.steps().enumerate() {
        if let Some(&level) = levels.get(&step.id) {
            grouped[level].push((step.sequence_number, position, step.id.clone()));
        }
    }

    let partitioned: Vec<ExecutionLevel> = grouped
        .into_iter()
        .enumerate()
        .map(|(index, mut members)| {
            members.sort();
            ExecutionLevel {
                index,
                step_ids: members.into_iter().map(|(_, _, id)| id).collect(),
            }
        })
        .collect();

    tracing::debug!(levels = partitioned.len(), "execution levels computed");
    Some(partitioned)
}

/// One step per level, in the given order
///
/// Used when the sort fell back to declaration order: strictly sequential
/// execution is the only grouping that is safe without a verified order.
pub fn sequential_levels(order: &[String]) -> Vec<ExecutionLevel> {
    order
        .iter()
        .enumerate()
        .map(|(index, id)| ExecutionLevel {
            index,
            step_ids: vec![id.clone()],
        })
        .collect()
}
