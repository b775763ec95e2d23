//! Path recorder (C8, spec §4.8): turns a surviving binding into a
//! `PathMatch` — a node-variable map plus the ordered edge trace that
//! witnessed it.

use crate::executor::fixed;
use crate::planner::{Plan, ProjSource, Segment};
use crate::binding::Binding;
use graphcore_api::{Edge, NodeId, Scalar};
use graphcore_store::Graph;
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// `nodes` respects RETURN's projection (alias-keyed, node-var items
/// only) when a projection is present, even if that drops every node
/// var; `edges` is always computed from the full, unprojected binding
/// (spec §4.8 "Known limitation").
#[derive(Debug, Clone, PartialEq)]
pub struct PathMatch {
    pub nodes: IndexMap<String, NodeId>,
    pub edges: Vec<PathEdge>,
}

/// One edge of a path trace. For a fixed segment this is the edge
/// itself; for a variable-length segment it is only the final hop,
/// reported endpoint-to-endpoint across the whole segment (spec §4.8).
#[derive(Debug, Clone, PartialEq)]
pub struct PathEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub edge_type: String,
    pub from_variable: String,
    pub to_variable: String,
    pub properties: Option<BTreeMap<String, Scalar>>,
}

/// Reconstructs the `PathMatch` for one surviving binding against the
/// plan it came from.
pub fn record(graph: &Graph, plan: &Plan, binding: &Binding) -> PathMatch {
    PathMatch {
        nodes: project_nodes(plan, binding),
        edges: record_edges(graph, plan, binding),
    }
}

fn project_nodes(plan: &Plan, binding: &Binding) -> IndexMap<String, NodeId> {
    match &plan.projection {
        Some(items) => items
            .iter()
            .filter_map(|item| match &item.source {
                ProjSource::NodeVar(var) => binding.node(var).map(|id| (item.alias.clone(), id.clone())),
                _ => None,
            })
            .collect(),
        None => binding.nodes.clone(),
    }
}

fn record_edges(graph: &Graph, plan: &Plan, binding: &Binding) -> Vec<PathEdge> {
    let mut edges = Vec::new();
    let mut idx = 0;
    while idx + 2 < plan.segments.len() {
        let Segment::Node(from_seg) = &plan.segments[idx] else {
            unreachable!("segments alternate Node/Edge, starting and ending with Node")
        };
        let Segment::Edge(edge_seg) = &plan.segments[idx + 1] else {
            unreachable!("segments alternate Node/Edge, starting and ending with Node")
        };
        let Segment::Node(to_seg) = &plan.segments[idx + 2] else {
            unreachable!("segments alternate Node/Edge, starting and ending with Node")
        };

        if let (Some(from_id), Some(to_id)) = (binding.node(&from_seg.var), binding.node(&to_seg.var)) {
            let edge = edge_seg
                .edge_var
                .as_ref()
                .and_then(|var| binding.edge(var).cloned())
                .or_else(|| derive_edge(graph, from_id, to_id, edge_seg));
            if let Some(edge) = edge {
                edges.push(PathEdge {
                    from: from_id.clone(),
                    to: to_id.clone(),
                    edge_type: edge.edge_type.clone(),
                    from_variable: from_seg.var.clone(),
                    to_variable: to_seg.var.clone(),
                    properties: edge.properties.clone(),
                });
            }
        }
        idx += 2;
    }
    edges
}

/// Recovers the graph edge actually traversed between two known
/// endpoints when it wasn't captured in the binding (an anonymous edge
/// variable). For a variable-length segment, this is whatever edge
/// leads into `to` under the flipped direction — the same last-hop tie
/// break used by [`crate::executor::retract`].
fn derive_edge(graph: &Graph, from: &NodeId, to: &NodeId, edge_seg: &crate::planner::EdgeSegment) -> Option<Edge> {
    match &edge_seg.var_len {
        None => fixed::step(graph, from, edge_seg)
            .into_iter()
            .find(|(terminal, _)| terminal == to)
            .map(|(_, edge)| edge),
        Some(_) => {
            let mut flipped = edge_seg.clone();
            flipped.direction = edge_seg.direction.flipped();
            fixed::step(graph, to, &flipped).into_iter().next().map(|(_, edge)| edge)
        }
    }
}
