//! Longest chain of sequential dependencies

use crate::validate::ValidatedGraph;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// Ids along the longest dependency chain, prerequisites first
///
/// Length is measured in steps. Ties prefer the chain whose steps have the
/// smaller sequence numbers. Empty for an empty or cyclic graph.
pub fn critical_path(graph: &ValidatedGraph) -> Vec<String> {
    let Some(order) = graph.prerequisites_first() else {
        return Vec::new();
    };
    let dag = graph.graph();
    let rank = |idx: NodeIndex| (dag[idx].sequence_number, idx);

    // chain length ending at a node, and the prerequisite it extends
    let mut best: HashMap<NodeIndex, (usize, Option<NodeIndex>)> = HashMap::new();
    for &idx in &order {
        let predecessor = dag
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge| edge.target())
            .filter_map(|prev| best.get(&prev).map(|&(len, _)| (len, prev)))
            .min_by(|(len_a, a), (len_b, b)| {
                len_b.cmp(len_a).then_with(|| rank(*a).cmp(&rank(*b)))
            });

        let entry = match predecessor {
            Some((len, prev)) => (len + 1, Some(prev)),
            None => (1, None),
        };
        best.insert(idx, entry);
    }

    let Some(mut current) = best
        .iter()
        .min_by(|(a, (len_a, _)), (b, (len_b, _))| {
            len_b.cmp(len_a).then_with(|| rank(**a).cmp(&rank(**b)))
        })
        .map(|(&idx, _)| idx)
    else {
        return Vec::new();
    };

    let mut path = vec![dag[current].id.clone()];
    while let Some(&(_, Some(prev))) = best.get(&current) {
        path.push(dag[prev].id.clone());
        current = prev;
    }
    path.reverse();
    path
}
