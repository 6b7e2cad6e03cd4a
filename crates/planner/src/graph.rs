//! Structural assembly of the step graph
//!
//! `StepGraph` is the unchecked shape: edges may point at ids that do not
//! exist, steps may depend on themselves, and ids may repeat. Nothing here
//! rejects input; [`crate::validate`] inspects the whole shape afterwards so
//! every defect can be reported at once.

use indexmap::{IndexMap, IndexSet};
use stepdag_core::Step;

/// A step together with its edges
///
/// `outgoing` holds the ids this step depends on, `incoming` the ids of steps
/// that depend on it. Only ids present in the graph appear in `incoming`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub step: Step,
    pub incoming: IndexSet<String>,
    pub outgoing: IndexSet<String>,
}

/// Unchecked dependency graph, nodes kept in declaration order
#[derive(Debug, Clone, Default)]
pub struct StepGraph {
    nodes: IndexMap<String, GraphNode>,
    /// Steps whose id was already taken by an earlier step
    duplicates: Vec<Step>,
}

impl StepGraph {
    /// Assemble a graph from steps in declaration order
    pub fn build<I>(steps: I) -> Self
    where
        I: IntoIterator<Item = Step>,
    {
        let mut graph = StepGraph::default();

        for step in steps {
            if graph.nodes.contains_key(&step.id) {
                tracing::debug!(step_id = %step.id, "duplicate step id during graph assembly");
                graph.duplicates.push(step);
                continue;
            }
            let outgoing = step.depends_on.clone();
            graph.nodes.insert(
                step.id.clone(),
                GraphNode {
                    step,
                    incoming: IndexSet::new(),
                    outgoing,
                },
            );
        }

        // Incoming edges need every node in place, since steps may depend on
        // steps declared after them.
        let edges: Vec<(String, String)> = graph
            .nodes
            .values()
            .flat_map(|node| {
                node.outgoing
                    .iter()
                    .map(move |target| (node.step.id.clone(), target.clone()))
            })
            .collect();
        for (source, target) in edges {
            if let Some(node) = graph.nodes.get_mut(&target) {
                node.incoming.insert(source);
            }
        }

        tracing::debug!(
            nodes = graph.nodes.len(),
            duplicates = graph.duplicates.len(),
            "step graph assembled"
        );
        graph
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Nodes in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Ids in declaration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn duplicates(&self) -> &[Step] {
        &self.duplicates
    }

    /// `(source, target)` pairs whose target is not a node
    pub fn dangling_edges(&self) -> Vec<(&str, &str)> {
        self.nodes
            .values()
            .flat_map(|node| {
                node.outgoing
                    .iter()
                    .filter(|target| !self.nodes.contains_key(target.as_str()))
                    .map(move |target| (node.step.id.as_str(), target.as_str()))
            })
            .collect()
    }

    /// Ids of steps that list themselves as a dependency
    pub fn self_loops(&self) -> Vec<&str> {
        self.nodes
            .values()
            .filter(|node| node.outgoing.contains(&node.step.id))
            .map(|node| node.step.id.as_str())
            .collect()
    }

    /// Drop the edge `source -> target` from both endpoints and from the
    /// source step's `depends_on`
    pub(crate) fn remove_edge(&mut self, source: &str, target: &str) -> bool {
        let Some(node) = self.nodes.get_mut(source) else {
            return false;
        };
        let removed = node.outgoing.shift_remove(target);
        node.step.depends_on.shift_remove(target);
        if let Some(target_node) = self.nodes.get_mut(target) {
            target_node.incoming.shift_remove(source);
        }
        removed
    }

    pub(crate) fn into_parts(self) -> (IndexMap<String, GraphNode>, Vec<Step>) {
        (self.nodes, self.duplicates)
    }
}
