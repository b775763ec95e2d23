//! Fixed-segment executor (C5, spec §4.5): extends a binding across one
//! directed edge, honoring an optional type set, edge-variable capture,
//! and inline edge/node property constraints.

use crate::ast::Direction;
use crate::evaluator;
use crate::planner::{EdgeSegment, NodeSegment};
use graphcore_api::{Edge, NodeId};
use graphcore_store::Graph;

/// All `(terminal_id, edge)` extensions of `from` across one hop of
/// `edge_seg`, already filtered by the terminal node's constraints
/// (spec §4.5 steps 1-6). Multiple candidate edges between the same
/// pair with different types each contribute a separate extension.
pub fn candidates(
    graph: &Graph,
    from: &NodeId,
    edge_seg: &EdgeSegment,
    node_seg: &NodeSegment,
) -> Vec<(NodeId, Edge)> {
    step(graph, from, edge_seg)
        .into_iter()
        .filter(|(terminal, _)| node_matches(graph, terminal, node_seg))
        .collect()
}

/// One hop of `edge_seg` from `from`, filtered by type set and inline
/// edge-property constraints, but *not* by the terminal node's
/// constraints — used directly by [`crate::executor::candidates`] for
/// fixed hops, and by [`crate::executor::varlen`] for each intermediate
/// hop of a variable-length traversal (spec §4.6: terminal filters only
/// apply "at each depth >= min", not to every intermediate node).
pub fn step(graph: &Graph, from: &NodeId, edge_seg: &EdgeSegment) -> Vec<(NodeId, Edge)> {
    let mut results = Vec::new();
    let types: Vec<String> = match &edge_seg.type_set {
        Some(set) => set.iter().cloned().collect(),
        None => match edge_seg.direction {
            Direction::Forward => graph.out_types(from).cloned().collect(),
            Direction::Backward => graph.in_types(from).cloned().collect(),
        },
    };

    for ty in types {
        let neighbors: Vec<NodeId> = match edge_seg.direction {
            Direction::Forward => graph.out_neighbors(from, &ty).cloned().collect(),
            Direction::Backward => graph.in_neighbors(from, &ty).cloned().collect(),
        };
        for neighbor in neighbors {
            let edge = match edge_seg.direction {
                Direction::Forward => graph.get_edge(from, &ty, &neighbor),
                Direction::Backward => graph.get_edge(&neighbor, &ty, from),
            };
            let Some(edge) = edge.cloned() else { continue };
            if !edge_seg.edge_property_constraints.is_empty()
                && !edge_property_constraints_match(&edge, edge_seg)
            {
                continue;
            }
            results.push((neighbor, edge));
        }
    }
    results
}

pub(crate) fn edge_property_constraints_match(edge: &Edge, edge_seg: &EdgeSegment) -> bool {
    edge_seg
        .edge_property_constraints
        .iter()
        .all(|(key, op, expected)| {
            evaluator::property_constraint_matches(edge.property(key), *op, expected)
        })
}

/// Enforces `typeTag`, `labelFilter`, and `propertyConstraints` on a
/// terminal node (spec §4.5 step 4). A dangling id (shouldn't occur
/// through normal traversal, but the store never guarantees it) fails
/// the match rather than panicking.
pub(crate) fn node_matches(graph: &Graph, id: &NodeId, node_seg: &NodeSegment) -> bool {
    let Some(node) = graph.node(id) else {
        return false;
    };
    if let Some(tag) = &node_seg.type_tag {
        if &node.node_type != tag {
            return false;
        }
    }
    if let Some(label_filter) = &node_seg.label_filter {
        if !evaluator::label_matches(&node.label, label_filter) {
            return false;
        }
    }
    node_seg
        .property_constraints
        .iter()
        .all(|(key, op, expected)| {
            evaluator::property_constraint_matches(node.property(key), *op, expected)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphcore_api::Node;
    use indexmap::IndexSet;

    fn graph_with_chain() -> Graph {
        let mut g = Graph::new();
        for id in ["a", "b", "c"] {
            g.add_node(Node {
                id: id.to_string(),
                node_type: "N".into(),
                label: id.to_string(),
                properties: None,
            });
        }
        g.add_edge("a".into(), "X".into(), "b".into(), None);
        g.add_edge("b".into(), "Y".into(), "c".into(), None);
        g
    }

    fn edge_seg(types: Option<Vec<&str>>, dir: Direction) -> EdgeSegment {
        EdgeSegment {
            edge_var: None,
            type_set: types.map(|t| t.into_iter().map(String::from).collect::<IndexSet<_>>()),
            direction: dir,
            var_len: None,
            edge_property_constraints: Vec::new(),
        }
    }

    fn node_seg(var: &str) -> NodeSegment {
        NodeSegment {
            var: var.to_string(),
            type_tag: None,
            label_filter: None,
            property_constraints: Vec::new(),
        }
    }

    #[test]
    fn forward_hop_finds_neighbor() {
        let g = graph_with_chain();
        let es = edge_seg(Some(vec!["X"]), Direction::Forward);
        let ns = node_seg("b");
        let out = candidates(&g, &"a".to_string(), &es, &ns);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, "b");
    }

    #[test]
    fn backward_hop_finds_source() {
        let g = graph_with_chain();
        let es = edge_seg(Some(vec!["X"]), Direction::Backward);
        let ns = node_seg("a");
        let out = candidates(&g, &"b".to_string(), &es, &ns);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, "a");
    }

    #[test]
    fn any_type_hop_when_type_set_absent() {
        let g = graph_with_chain();
        let es = edge_seg(None, Direction::Forward);
        let ns = node_seg("b");
        let out = candidates(&g, &"a".to_string(), &es, &ns);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn unsatisfiable_type_yields_no_candidates() {
        let g = graph_with_chain();
        let es = edge_seg(Some(vec!["NOPE"]), Direction::Forward);
        let ns = node_seg("b");
        assert!(candidates(&g, &"a".to_string(), &es, &ns).is_empty());
    }
}
