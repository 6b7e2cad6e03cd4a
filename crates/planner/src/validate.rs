//! Graph validation and the validated DAG
//!
//! Validation runs every check against the same graph and collects the
//! results instead of stopping at the first problem:
//!
//! 1. self-references are pruned (or reported, depending on configuration)
//! 2. duplicate ids
//! 3. references to ids that do not exist
//! 4. cycles, found with a depth-first search that tracks the active stack
//!
//! A graph that passes is converted into a petgraph [`DiGraph`] with edges
//! pointing from each step to its prerequisites.

use crate::graph::{GraphNode, StepGraph};
use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{algo, Direction};
use std::collections::HashMap;
use stepdag_config::PlannerConfig;
use stepdag_core::{Error, MissingReference, PlanWarning, Result, Step};

/// Edge type for dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyType {
    /// Source step needs the target step to finish first
    Prerequisite,
}

/// A graph that passed validation: unique ids, no dangling edges, acyclic
#[derive(Debug, Clone)]
pub struct ValidatedGraph {
    graph: DiGraph<Step, DependencyType>,
    index: HashMap<String, NodeIndex>,
    pruned_self_loops: Vec<String>,
}

impl ValidatedGraph {
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Steps in declaration order
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    pub fn step(&self, id: &str) -> Option<&Step> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    /// Ids of the steps `id` depends on
    pub fn dependencies(&self, id: &str) -> Option<Vec<&str>> {
        let idx = *self.index.get(id)?;
        Some(self.neighbours(idx, Direction::Outgoing))
    }

    /// Ids of the steps that depend on `id`
    pub fn dependents(&self, id: &str) -> Option<Vec<&str>> {
        let idx = *self.index.get(id)?;
        Some(self.neighbours(idx, Direction::Incoming))
    }

    /// Steps without prerequisites
    pub fn roots(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .edges_directed(idx, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .map(|idx| self.graph[idx].id.as_str())
            .collect()
    }

    /// Ids whose self-reference was removed during validation
    pub fn pruned_self_loops(&self) -> &[String] {
        &self.pruned_self_loops
    }

    /// Warnings produced by validation
    pub fn warnings(&self) -> Vec<PlanWarning> {
        self.pruned_self_loops
            .iter()
            .map(|id| PlanWarning::SelfDependencyPruned {
                step_id: id.clone(),
            })
            .collect()
    }

    /// Whether the graph contains a cycle
    ///
    /// Always false for a graph produced by [`GraphValidator`].
    pub fn is_cyclic(&self) -> bool {
        algo::is_cyclic_directed(&self.graph)
    }

    pub(crate) fn graph(&self) -> &DiGraph<Step, DependencyType> {
        &self.graph
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Node indices with every prerequisite ahead of its dependents, or `None`
    /// if the graph has a cycle
    pub(crate) fn prerequisites_first(&self) -> Option<Vec<NodeIndex>> {
        // Edges point at prerequisites, so petgraph's order lists dependents first.
        let mut order = algo::toposort(&self.graph, None).ok()?;
        order.reverse();
        Some(order)
    }

    fn neighbours(&self, idx: NodeIndex, direction: Direction) -> Vec<&str> {
        let mut ids: Vec<(NodeIndex, &str)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (other, self.graph[other].id.as_str())
            })
            .collect();
        // petgraph yields edges newest first; report them in declaration order
        ids.sort_by_key(|(other, _)| *other);
        ids.into_iter().map(|(_, id)| id).collect()
    }

    fn from_nodes(nodes: IndexMap<String, GraphNode>, pruned_self_loops: Vec<String>) -> Self {
        let mut graph = DiGraph::with_capacity(nodes.len(), nodes.len());
        let mut index = HashMap::with_capacity(nodes.len());

        let mut edges = Vec::new();
        for (id, node) in nodes {
            let idx = graph.add_node(node.step);
            index.insert(id, idx);
            edges.push((idx, node.outgoing));
        }

        // Edges go FROM the dependent TO its prerequisite
        for (source, targets) in edges {
            for target in targets {
                if let Some(&target_idx) = index.get(&target) {
                    graph.add_edge(source, target_idx, DependencyType::Prerequisite);
                }
            }
        }

        ValidatedGraph {
            graph,
            index,
            pruned_self_loops,
        }
    }

    /// Build without any checks; only for exercising fault paths in tests
    #[cfg(test)]
    pub(crate) fn from_steps_unchecked(steps: Vec<Step>) -> Self {
        let (nodes, _) = StepGraph::build(steps).into_parts();
        Self::from_nodes(nodes, Vec::new())
    }
}

/// Runs the structural checks on a [`StepGraph`]
#[derive(Debug, Clone, Copy)]
pub struct GraphValidator {
    prune_self_loops: bool,
}

impl Default for GraphValidator {
    fn default() -> Self {
        Self {
            prune_self_loops: true,
        }
    }
}

impl GraphValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            prune_self_loops: config.prune_self_loops,
        }
    }

    /// Report self-references as one-step cycles instead of pruning them
    pub fn reject_self_loops(mut self) -> Self {
        self.prune_self_loops = false;
        self
    }

    /// Validate `graph`, returning every defect found
    ///
    /// A single defect is returned as its own error kind; several are wrapped
    /// in [`Error::InvalidGraph`].
    pub fn validate(&self, mut graph: StepGraph) -> Result<ValidatedGraph> {
        let mut defects = Vec::new();

        let self_loops: Vec<String> = graph.self_loops().into_iter().map(String::from).collect();
        let mut pruned = Vec::new();
        for id in self_loops {
            if self.prune_self_loops {
                tracing::warn!(step_id = %id, "step depends on itself; pruning the reference");
                graph.remove_edge(&id, &id);
                pruned.push(id);
            } else {
                defects.push(Error::circular_dependency(vec![id]));
            }
        }

        defects.extend(duplicate_defects(&graph));

        if let Some(missing) = missing_reference_defect(&graph) {
            defects.push(missing);
        }

        for cycle in find_cycles(&graph) {
            tracing::debug!(cycle = ?cycle, "dependency cycle found");
            defects.push(Error::circular_dependency(cycle));
        }

        if let Some(error) = Error::from_defects(defects) {
            tracing::debug!(kind = %error.kind(), "step graph failed validation");
            return Err(error);
        }

        let (nodes, _) = graph.into_parts();
        let validated = ValidatedGraph::from_nodes(nodes, pruned);
        tracing::debug!(steps = validated.len(), "step graph validated");
        Ok(validated)
    }
}

fn duplicate_defects(graph: &StepGraph) -> Vec<Error> {
    let mut claims: IndexMap<&str, Vec<u32>> = IndexMap::new();
    for duplicate in graph.duplicates() {
        claims
            .entry(duplicate.id.as_str())
            .or_insert_with(|| {
                graph
                    .node(&duplicate.id)
                    .map(|node| vec![node.step.sequence_number])
                    .unwrap_or_default()
            })
            .push(duplicate.sequence_number);
    }

    claims
        .into_iter()
        .map(|(id, sequence_numbers)| Error::duplicate_step(id, sequence_numbers))
        .collect()
}

fn missing_reference_defect(graph: &StepGraph) -> Option<Error> {
    let missing: Vec<MissingReference> = graph
        .dangling_edges()
        .into_iter()
        .map(|(step_id, reference)| MissingReference {
            step_id: step_id.to_string(),
            reference: reference.to_string(),
        })
        .collect();

    if missing.is_empty() {
        return None;
    }

    let valid_ids = graph.ids().map(String::from).collect();
    Some(Error::missing_dependency(missing, valid_ids))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Depth-first search over existing edges; each back edge yields the cycle
/// from its target to the current node. Self-loops and dangling edges are
/// skipped since the other checks handle them.
fn find_cycles(graph: &StepGraph) -> Vec<Vec<String>> {
    let mut marks: HashMap<&str, Mark> = graph.ids().map(|id| (id, Mark::Unvisited)).collect();
    let mut cycles = Vec::new();

    for root in graph.ids() {
        if marks.get(root) != Some(&Mark::Unvisited) {
            continue;
        }

        marks.insert(root, Mark::OnStack);
        let mut stack: Vec<(&str, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let next = graph
                .node(node)
                .and_then(|n| n.outgoing.get_index(frame.1))
                .map(String::as_str);
            frame.1 += 1;

            let Some(target) = next else {
                marks.insert(node, Mark::Done);
                stack.pop();
                continue;
            };
            if target == node {
                continue;
            }

            match marks.get(target).copied() {
                Some(Mark::Unvisited) => {
                    marks.insert(target, Mark::OnStack);
                    stack.push((target, 0));
                }
                Some(Mark::OnStack) => {
                    let start = stack
                        .iter()
                        .position(|(id, _)| *id == target)
                        .unwrap_or(0);
                    cycles.push(stack[start..].iter().map(|(id, _)| id.to_string()).collect());
                }
                Some(Mark::Done) | None => {}
            }
        }
    }

    cycles
}
