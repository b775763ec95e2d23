//! Match driver (C7, spec §4.7): seeds one or more anchor bindings,
//! extends each through the plan's segments, applies WHERE, projects
//! rows, deduplicates, sorts, and paginates.

use super::{extend, fixed, retract};
use crate::binding::Binding;
use crate::error::{Error, Result};
use crate::evaluator;
use crate::planner::{Plan, ProjSource, Segment};
use graphcore_api::{NodeId, Scalar};
use graphcore_store::Graph;
use indexmap::IndexMap;

/// A projected output row: alias -> value, in RETURN (or default
/// node-declaration) order.
pub type Row = IndexMap<String, Scalar>;

/// Anchor selection for a single `run` call (spec §4.7 "Seeding").
/// `start_id`/`start_ids` are mutually exclusive; an empty `start_ids`
/// slice is treated the same as omitting it entirely.
#[derive(Debug, Clone, Default)]
pub struct Seed<'a> {
    pub start_id: Option<&'a str>,
    pub start_ids: Option<&'a [String]>,
    pub start_type: Option<&'a str>,
    pub max_hops: u32,
}

/// Result of running a plan to completion: rows paired with the full
/// binding each came from, so path recording (C8) can still walk edge
/// variables even when RETURN projected them away (spec §4.8).
pub struct MatchResult {
    pub rows: Vec<Row>,
    pub bindings: Vec<Binding>,
}

/// Runs `plan` against `graph` under `seed`, producing the final,
/// ordered, paginated row set (spec §4.7 steps 1-6).
pub fn run(graph: &Graph, plan: &Plan, seed: &Seed) -> Result<MatchResult> {
    if seed.start_id.is_some() && seed.start_ids.is_some() {
        return Err(Error::InvalidArgument(
            "start_id and start_ids cannot both be supplied",
        ));
    }

    log::debug!(
        "executing plan with {} segment(s), anchored={}",
        plan.segments.len(),
        seed.start_id.is_some() || seed.start_ids.map(|v| !v.is_empty()).unwrap_or(false)
    );

    let full_bindings = seed_and_extend(graph, plan, seed);

    let mut kept: Vec<(Row, Binding)> = full_bindings
        .into_iter()
        .filter(|binding| {
            plan.where_clause
                .as_ref()
                .is_none_or(|expr| evaluator::evaluate(expr, binding, graph))
        })
        .map(|binding| {
            let row = project_row(plan, &binding, graph);
            (row, binding)
        })
        .collect();

    dedupe_rows(&mut kept);

    if let Some(order) = &plan.order {
        kept.sort_by(|(_, a), (_, b)| {
            for key in order {
                let av = resolve_proj_source(&key.source, a, graph);
                let bv = resolve_proj_source(&key.source, b, graph);
                let ord = av.cmp(&bv);
                let ord = match key.direction {
                    crate::ast::OrderDir::Asc => ord,
                    crate::ast::OrderDir::Desc => ord.reverse(),
                };
                if ord != std::cmp::Ordering::Equal {
                    return ord;
                }
            }
            std::cmp::Ordering::Equal
        });
    }

    let skip = plan.skip.unwrap_or(0);
    let paged: Vec<(Row, Binding)> = if skip >= kept.len() {
        Vec::new()
    } else {
        let end = plan
            .limit
            .map(|limit| (skip + limit).min(kept.len()))
            .unwrap_or(kept.len());
        kept[skip..end].to_vec()
    };

    let mut rows = Vec::with_capacity(paged.len());
    let mut bindings = Vec::with_capacity(paged.len());
    for (row, binding) in paged {
        rows.push(row);
        bindings.push(binding);
    }
    Ok(MatchResult { rows, bindings })
}

/// Finds every full binding (spec §4.7 "Execution loop" step 1), across
/// every seed anchor.
fn seed_and_extend(graph: &Graph, plan: &Plan, seed: &Seed) -> Vec<Binding> {
    let mut out = Vec::new();

    let explicit_ids: Option<Vec<NodeId>> = match (seed.start_id, seed.start_ids) {
        (Some(id), None) => Some(vec![id.to_string()]),
        (None, Some(ids)) if !ids.is_empty() => Some(ids.to_vec()),
        _ => None,
    };

    match explicit_ids {
        Some(ids) => {
            for id in &ids {
                if let Some(pos) = choose_anchor_position(graph, &plan.segments, id, seed.start_type) {
                    let Segment::Node(node_seg) = &plan.segments[pos] else {
                        unreachable!("choose_anchor_position only returns Node indices")
                    };
                    let mut binding0 = Binding::new();
                    binding0.bind_node(&node_seg.var, id.clone());
                    collect_full_bindings(graph, &plan.segments, pos, binding0, seed.max_hops, &mut out);
                }
            }
        }
        None => {
            let Segment::Node(node_seg0) = &plan.segments[0] else {
                unreachable!("a plan always starts with a Node segment")
            };
            for node in graph.iter_nodes() {
                if fixed::node_matches(graph, &node.id, node_seg0) {
                    let mut binding0 = Binding::new();
                    binding0.bind_node(&node_seg0.var, node.id.clone());
                    collect_full_bindings(graph, &plan.segments, 0, binding0, seed.max_hops, &mut out);
                }
            }
        }
    }

    out
}

/// Finds the first node segment (optionally restricted to `start_type`)
/// whose filters accept `id` (spec §4.7: "binding the seed to the first
/// position whose filters accept it").
fn choose_anchor_position(
    graph: &Graph,
    segments: &[Segment],
    id: &NodeId,
    start_type: Option<&str>,
) -> Option<usize> {
    for (i, segment) in segments.iter().enumerate() {
        let Segment::Node(node_seg) = segment else {
            continue;
        };
        if let Some(tag) = start_type {
            if node_seg.type_tag.as_deref() != Some(tag) {
                continue;
            }
        }
        if fixed::node_matches(graph, id, node_seg) {
            return Some(i);
        }
    }
    None
}

/// Extends a single anchor binding both forward (toward the end of the
/// pattern) and backward (toward its start), then combines every pair
/// of completions sharing that anchor into a full binding. When the
/// anchor sits at segment `0`, the backward pass is a no-op that simply
/// returns the anchor binding unchanged.
fn collect_full_bindings(
    graph: &Graph,
    segments: &[Segment],
    anchor_pos: usize,
    binding0: Binding,
    max_hops: u32,
    out: &mut Vec<Binding>,
) {
    let mut forward_done = Vec::new();
    extend(graph, segments, anchor_pos, binding0.clone(), max_hops, &mut forward_done);

    let mut backward_done = Vec::new();
    retract(graph, segments, anchor_pos, binding0, max_hops, &mut backward_done);

    for forward in &forward_done {
        for backward in &backward_done {
            let mut merged = forward.clone();
            for (k, v) in &backward.nodes {
                merged.nodes.insert(k.clone(), v.clone());
            }
            for (k, v) in &backward.edges {
                merged.edges.insert(k.clone(), v.clone());
            }
            if merged.nodes_are_distinct() {
                out.push(merged);
            }
        }
    }
}

/// Builds one output row from a completed binding (spec §4.7 step 3,
/// §4.3 default-RETURN rule).
fn project_row(plan: &Plan, binding: &Binding, graph: &Graph) -> Row {
    match &plan.projection {
        Some(items) => items
            .iter()
            .map(|item| (item.alias.clone(), resolve_proj_source(&item.source, binding, graph)))
            .collect(),
        None => binding
            .nodes
            .iter()
            .map(|(var, id)| (var.clone(), Scalar::Text(id.clone())))
            .collect(),
    }
}

/// Resolves one RETURN/ORDER BY source against a binding. A node
/// variable's value is its id; an edge variable's value is its type
/// (spec §4.3); an unbound reference or missing property resolves to
/// `Null` rather than failing the row.
pub(crate) fn resolve_proj_source(source: &ProjSource, binding: &Binding, graph: &Graph) -> Scalar {
    match source {
        ProjSource::NodeVar(var) => binding
            .node(var)
            .map(|id| Scalar::Text(id.clone()))
            .unwrap_or(Scalar::Null),
        ProjSource::EdgeVar(var) => binding
            .edge(var)
            .map(|e| Scalar::Text(e.edge_type.clone()))
            .unwrap_or(Scalar::Null),
        ProjSource::Prop(var, key) => {
            if let Some(id) = binding.node(var) {
                graph
                    .node(id)
                    .and_then(|n| n.property(key))
                    .cloned()
                    .unwrap_or(Scalar::Null)
            } else if let Some(edge) = binding.edge(var) {
                edge.property(key).cloned().unwrap_or(Scalar::Null)
            } else {
                Scalar::Null
            }
        }
    }
}

/// Removes duplicate rows, keeping the first occurrence (spec §4.7 step
/// 4 "Accumulate rows; deduplicate"). `O(n^2)` in row count, which is
/// fine for the in-memory, moderate-result-set scope this engine
/// targets.
fn dedupe_rows(rows: &mut Vec<(Row, Binding)>) {
    let mut seen: Vec<Row> = Vec::new();
    rows.retain(|(row, _)| {
        if seen.contains(row) {
            false
        } else {
            seen.push(row.clone());
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::lower;
    use crate::parser::parse;
    use graphcore_api::Node;

    fn node(id: &str, node_type: &str) -> Node {
        Node {
            id: id.to_string(),
            node_type: node_type.to_string(),
            label: id.to_string(),
            properties: None,
        }
    }

    fn member_graph() -> Graph {
        let mut g = Graph::new();
        g.add_node(node("alice", "User"));
        g.add_node(node("admins", "Group"));
        g.add_edge("alice".into(), "MEMBER_OF".into(), "admins".into(), None);
        g
    }

    #[test]
    fn no_anchor_scans_every_matching_node() {
        let g = member_graph();
        let pattern = parse("user-[:MEMBER_OF]->group").unwrap();
        let plan = lower(&pattern);
        let seed = Seed {
            max_hops: 10,
            ..Default::default()
        };
        let result = run(&g, &plan, &seed).unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0]["user"], Scalar::Text("alice".into()));
        assert_eq!(result.rows[0]["group"], Scalar::Text("admins".into()));
    }

    #[test]
    fn start_id_anchors_at_a_later_position_and_extends_backward() {
        let g = member_graph();
        let pattern = parse("user-[:MEMBER_OF]->group").unwrap();
        let plan = lower(&pattern);
        let ids = vec!["admins".to_string()];
        let seed = Seed {
            start_ids: Some(&ids),
            max_hops: 10,
            ..Default::default()
        };
        let result = run(&g, &plan, &seed).unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0]["user"], Scalar::Text("alice".into()));
        assert_eq!(result.rows[0]["group"], Scalar::Text("admins".into()));
    }

    #[test]
    fn both_start_id_and_start_ids_is_an_error() {
        let g = member_graph();
        let pattern = parse("user-[:MEMBER_OF]->group").unwrap();
        let plan = lower(&pattern);
        let ids = vec!["admins".to_string()];
        let seed = Seed {
            start_id: Some("alice"),
            start_ids: Some(&ids),
            max_hops: 10,
            ..Default::default()
        };
        assert!(run(&g, &plan, &seed).is_err());
    }

    #[test]
    fn skip_and_limit_paginate_sorted_rows() {
        let mut g = Graph::new();
        for (id, n) in [("a", 3), ("b", 1), ("c", 2)] {
            let mut props = std::collections::BTreeMap::new();
            props.insert("n".to_string(), Scalar::Int(n));
            g.add_node(Node {
                id: id.to_string(),
                node_type: "N".into(),
                label: id.to_string(),
                properties: Some(props),
            });
        }
        let pattern = parse("x RETURN x.n ORDER BY x.n ASC SKIP 1 LIMIT 1").unwrap();
        let plan = lower(&pattern);
        let seed = Seed {
            max_hops: 10,
            ..Default::default()
        };
        let result = run(&g, &plan, &seed).unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0]["x.n"], Scalar::Int(2));
    }
}
