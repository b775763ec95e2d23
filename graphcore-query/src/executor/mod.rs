//! The backtracking multi-way join that walks a [`Plan`]'s segments,
//! delegating each hop to [`fixed`] or [`varlen`] (spec §4.7 step 1).
//!
//! Distinct node variables are never allowed to bind the same node
//! within one completed binding (see [`Binding::is_fresh_node`]); a
//! candidate that would collide is skipped rather than producing a
//! degenerate row. Re-binding the *same* variable (a repeated-name
//! pattern, e.g. a self-loop written as `a-[:R]->a`) is unaffected.

pub mod driver;
pub mod fixed;
pub mod varlen;

use crate::binding::Binding;
use crate::planner::Segment;
use graphcore_store::Graph;

/// Recursively extends `binding` from segment `idx` (a `NodeSegment`
/// index) to the end of `segments`, pushing one completed `Binding` per
/// successful full traversal into `out`. `max_hops` is the effective
/// default cap used whenever an `EdgeSegment`'s variable-length bounds
/// omit `max` (spec §4.6, §9).
pub(crate) fn extend(
    graph: &Graph,
    segments: &[Segment],
    idx: usize,
    binding: Binding,
    max_hops: u32,
    out: &mut Vec<Binding>,
) {
    if idx == segments.len() - 1 {
        out.push(binding);
        return;
    }

    let Segment::Node(from_seg) = &segments[idx] else {
        unreachable!("segments alternate Node/Edge, starting and ending with Node")
    };
    let Segment::Edge(edge_seg) = &segments[idx + 1] else {
        unreachable!("segments alternate Node/Edge, starting and ending with Node")
    };
    let Segment::Node(node_seg) = &segments[idx + 2] else {
        unreachable!("segments alternate Node/Edge, starting and ending with Node")
    };

    let Some(from_id) = binding.node(&from_seg.var).cloned() else {
        return;
    };

    let hops: Vec<_> = match &edge_seg.var_len {
        None => fixed::candidates(graph, &from_id, edge_seg, node_seg),
        Some(bounds) => {
            let min = bounds.min.unwrap_or(1);
            let max = bounds.max.unwrap_or(max_hops);
            varlen::candidates(graph, &from_id, edge_seg, node_seg, min, max)
        }
    };

    for (terminal, edge) in hops {
        if !binding.is_fresh_node(&node_seg.var, &terminal) {
            continue;
        }
        let mut next = binding.clone();
        if let Some(var) = &edge_seg.edge_var {
            next.bind_edge(var, edge);
        }
        next.bind_node(&node_seg.var, terminal);
        extend(graph, segments, idx + 2, next, max_hops, out);
    }
}

/// Mirror image of [`extend`]: walks `segments` from node index `idx`
/// back down to `0`, used by [`driver`] when an anchor lands on a node
/// segment other than the first (spec §4.7 seeding: "the driver tries
/// subsequent node segments in order"). Each edge segment is traversed
/// with its declared direction flipped, since we now know the *later*
/// node of the hop and want candidates for the earlier one.
pub(crate) fn retract(
    graph: &Graph,
    segments: &[Segment],
    idx: usize,
    binding: Binding,
    max_hops: u32,
    out: &mut Vec<Binding>,
) {
    if idx == 0 {
        out.push(binding);
        return;
    }

    let Segment::Node(to_seg) = &segments[idx] else {
        unreachable!("segments alternate Node/Edge, starting and ending with Node")
    };
    let Segment::Edge(edge_seg) = &segments[idx - 1] else {
        unreachable!("segments alternate Node/Edge, starting and ending with Node")
    };
    let Segment::Node(from_seg) = &segments[idx - 2] else {
        unreachable!("segments alternate Node/Edge, starting and ending with Node")
    };

    let Some(to_id) = binding.node(&to_seg.var).cloned() else {
        return;
    };

    let mut flipped_seg = edge_seg.clone();
    flipped_seg.direction = edge_seg.direction.flipped();

    let hops: Vec<_> = match &edge_seg.var_len {
        None => fixed::candidates(graph, &to_id, &flipped_seg, from_seg),
        Some(bounds) => {
            let min = bounds.min.unwrap_or(1);
            let max = bounds.max.unwrap_or(max_hops);
            varlen::candidates(graph, &to_id, &flipped_seg, from_seg, min, max)
        }
    };

    for (candidate, edge) in hops {
        if !binding.is_fresh_node(&from_seg.var, &candidate) {
            continue;
        }
        let mut next = binding.clone();
        if let Some(var) = &edge_seg.edge_var {
            next.bind_edge(var, edge);
        }
        next.bind_node(&from_seg.var, candidate);
        retract(graph, segments, idx - 2, next, max_hops, out);
    }
}
