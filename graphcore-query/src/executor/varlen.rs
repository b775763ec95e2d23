//! Variable-length executor (C6, spec §4.6): breadth-first `min..max`
//! hop expansion with a walk (no-repeated-node) cycle policy, and
//! per-start terminal deduplication.

use std::collections::HashSet;

use super::fixed;
use crate::planner::{EdgeSegment, NodeSegment};
use graphcore_api::{Edge, NodeId};
use graphcore_store::Graph;
use indexmap::IndexMap;

/// All `(terminal_id, edge)` reachable from `start` in `min..=max` hops
/// of `edge_seg`, deduplicated by terminal id (spec §4.6, and the
/// worked example in spec §8 scenario 2: a shortcut edge and a 3-hop
/// walk that land on the same terminal contribute one row, not two).
/// The `edge` captured per terminal is the last hop of whichever walk
/// reaches it first in breadth-first order.
pub fn candidates(
    graph: &Graph,
    start: &NodeId,
    edge_seg: &EdgeSegment,
    node_seg: &NodeSegment,
    min: u32,
    max: u32,
) -> Vec<(NodeId, Edge)> {
    let mut results: IndexMap<NodeId, Edge> = IndexMap::new();
    if max == 0 {
        return Vec::new();
    }

    let mut frontier: Vec<(NodeId, HashSet<NodeId>)> = vec![(start.clone(), {
        let mut visited = HashSet::new();
        visited.insert(start.clone());
        visited
    })];

    for depth in 1..=max {
        let mut next_frontier = Vec::new();
        for (node_id, visited) in &frontier {
            for (terminal, edge) in fixed::step(graph, node_id, edge_seg) {
                // Walk policy: no repeated node within one traversal path.
                if visited.contains(&terminal) {
                    continue;
                }
                if depth >= min
                    && !results.contains_key(&terminal)
                    && fixed::node_matches(graph, &terminal, node_seg)
                {
                    results.insert(terminal.clone(), edge.clone());
                }
                let mut extended = visited.clone();
                extended.insert(terminal.clone());
                next_frontier.push((terminal, extended));
            }
        }
        if next_frontier.is_empty() {
            break;
        }
        frontier = next_frontier;
    }

    results.into_iter().collect()
}
