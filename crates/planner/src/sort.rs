//! Deterministic topological sort
//!
//! Kahn's algorithm with a min-heap on `(sequence_number, declaration index)`:
//! among all steps whose prerequisites are done, the one declared first runs
//! first. Independent steps therefore keep their declaration order.

use crate::validate::ValidatedGraph;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Internal sort failure on a graph that was expected to be acyclic
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("sort stalled after emitting {emitted} of {total} steps")]
pub struct SortFault {
    pub emitted: usize,
    pub total: usize,
}

/// Result of [`topological_order`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOutcome {
    /// Step ids in execution order
    pub order: Vec<String>,
    /// Set when the sort failed and `order` is the declaration order
    pub fallback: Option<SortFault>,
}

impl SortOutcome {
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Order the steps of a validated graph
///
/// Never fails: if the sort cannot complete, the declaration order is
/// returned and `fallback` records why.
pub fn topological_order(graph: &ValidatedGraph) -> SortOutcome {
    match kahn(graph) {
        Ok(order) => {
            tracing::debug!(steps = order.len(), "topological sort completed");
            SortOutcome {
                order,
                fallback: None,
            }
        }
        Err(fault) => {
            tracing::warn!(
                emitted = fault.emitted,
                total = fault.total,
                "topological sort failed on a validated graph; using declaration order"
            );
            SortOutcome {
                order: graph.steps().map(|step| step.id.clone()).collect(),
                fallback: Some(fault),
            }
        }
    }
}

fn kahn(graph: &ValidatedGraph) -> Result<Vec<String>, SortFault> {
    let dag = graph.graph();
    let total = dag.node_count();

    // In-degree here counts unfinished prerequisites, i.e. outgoing edges.
    let mut pending: HashMap<NodeIndex, usize> = dag
        .node_indices()
        .map(|idx| (idx, dag.edges_directed(idx, Direction::Outgoing).count()))
        .collect();

    let mut ready: BinaryHeap<Reverse<(u32, NodeIndex)>> = pending
        .iter()
        .filter(|(_, &count)| count == 0)
        .map(|(&idx, _)| Reverse((dag[idx].sequence_number, idx)))
        .collect();

    let mut order = Vec::with_capacity(total);
    while let Some(Reverse((_, idx))) = ready.pop() {
        order.push(dag[idx].id.clone());

        for edge in dag.edges_directed(idx, Direction::Incoming) {
            let dependent = edge.source();
            if let Some(count) = pending.get_mut(&dependent) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    ready.push(Reverse((dag[dependent].sequence_number, dependent)));
                }
            }
        }
    }

    if order.len() != total {
        return Err(SortFault {
            emitted: order.len(),
            total,
        });
    }
    Ok(order)
}

/// Whether `order` lists every step of `graph` exactly once with each
/// prerequisite ahead of its dependents
pub fn is_valid_linearization(graph: &ValidatedGraph, order: &[String]) -> bool {
    if order.len() != graph.len() {
        return false;
    }

    let position: HashMap<&str, usize> = order
        .iter()
        .enumerate()
        .map(|(pos, id)| (id.as_str(), pos))
        .collect();
    if position.len() != order.len() {
        return false;
    }

    graph.steps().all(|step| {
        let Some(&own) = position.get(step.id.as_str()) else {
            return false;
        };
        graph
            .index_of(&step.id)
            .map(|idx| {
                graph
                    .graph()
                    .edges_directed(idx, Direction::Outgoing)
                    .all(|edge| {
                        let prerequisite = &graph.graph()[edge.target()].id;
                        position
                            .get(prerequisite.as_str())
                            .is_some_and(|&pos| pos < own)
                    })
            })
            .unwrap_or(false)
    })
}
