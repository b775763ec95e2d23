//! Lowers the raw parse tree ([`crate::ast`]) into an immutable [`Plan`]
//! (spec §3, §4.3). This is a single linear walk with no reordering: the
//! plan's segment order is exactly the pattern's textual order (spec.md's
//! explicit non-goal: "no optimizer that reorders segments").

use std::collections::HashSet;

use crate::ast::{self, CmpOp, Expr, InlineFilter, LabelOp, OrderDir, Pattern, RefSource};
use graphcore_api::Scalar;
use indexmap::IndexSet;

/// Immutable lowered form of a pattern string (spec §3 "Plan").
#[derive(Debug, Clone)]
pub struct Plan {
    /// Alternating `Node`/`Edge`, beginning and ending with `Node`.
    pub segments: Vec<Segment>,
    pub where_clause: Option<Expr>,
    pub projection: Option<Vec<ProjectionItem>>,
    pub order: Option<Vec<OrderKey>>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum Segment {
    Node(NodeSegment),
    Edge(EdgeSegment),
}

#[derive(Debug, Clone)]
pub struct NodeSegment {
    pub var: String,
    pub type_tag: Option<String>,
    pub label_filter: Option<LabelFilter>,
    pub property_constraints: Vec<(String, CmpOp, Scalar)>,
}

#[derive(Debug, Clone)]
pub struct LabelFilter {
    pub mode: LabelMode,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMode {
    Eq,
    Contains,
}

#[derive(Debug, Clone)]
pub struct EdgeSegment {
    pub edge_var: Option<String>,
    /// `None` means "any type" (spec §4.3 "Multi-type").
    pub type_set: Option<IndexSet<String>>,
    pub direction: ast::Direction,
    /// `None` means exactly one hop. `Some` carries the *declared*
    /// bounds verbatim — absence of `min`/`max` inside is resolved to
    /// the engine default only at execution time (spec §4.6, §9), so
    /// the same plan can be reused with a per-call `max_hops` override.
    pub var_len: Option<VarLenBounds>,
    pub edge_property_constraints: Vec<(String, CmpOp, Scalar)>,
}

#[derive(Debug, Clone, Copy)]
pub struct VarLenBounds {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjSource {
    NodeVar(String),
    Prop(String, String),
    EdgeVar(String),
}

#[derive(Debug, Clone)]
pub struct ProjectionItem {
    pub source: ProjSource,
    pub alias: String,
}

#[derive(Debug, Clone)]
pub struct OrderKey {
    pub source: ProjSource,
    pub direction: OrderDir,
}

/// Lowers a parsed [`Pattern`] into a [`Plan`]. Always succeeds: every
/// syntactic construct the parser accepts has a defined lowering: there
/// is no planning-time semantic failure mode (spec §7 — unresolved
/// identifiers are a silent-empty runtime behavior, not a planning
/// error).
pub fn lower(pattern: &Pattern) -> Plan {
    let mut segments = Vec::new();
    let mut node_vars = HashSet::new();
    let mut edge_vars = HashSet::new();

    segments.push(Segment::Node(lower_node(&pattern.path.start)));
    node_vars.insert(pattern.path.start.var.clone());

    for (edge, node) in &pattern.path.hops {
        if let Some(v) = &edge.var {
            edge_vars.insert(v.clone());
        }
        segments.push(Segment::Edge(lower_edge(edge)));
        node_vars.insert(node.var.clone());
        segments.push(Segment::Node(lower_node(node)));
    }

    if let Some(expr) = &pattern.where_clause {
        log_unresolved_identifiers(expr, &node_vars, &edge_vars);
    }

    let projection = pattern.return_items.as_ref().map(|items| {
        items
            .iter()
            .map(|item| {
                let source = resolve_ref(&item.source, &node_vars, &edge_vars);
                let alias = item.alias.clone().unwrap_or_else(|| match &item.source {
                    RefSource::Var(name) => name.clone(),
                    RefSource::Prop(v, k) => format!("{v}.{k}"),
                });
                ProjectionItem { source, alias }
            })
            .collect()
    });

    let order = pattern.order_by.as_ref().map(|items| {
        items
            .iter()
            .map(|item| OrderKey {
                source: resolve_ref(&item.key, &node_vars, &edge_vars),
                direction: item.direction,
            })
            .collect()
    });

    Plan {
        segments,
        where_clause: pattern.where_clause.clone(),
        projection,
        order,
        skip: pattern.skip.map(|n| n.max(0) as usize),
        limit: pattern.limit.map(|n| n.max(0) as usize),
    }
}

fn resolve_ref(source: &RefSource, node_vars: &HashSet<String>, edge_vars: &HashSet<String>) -> ProjSource {
    match source {
        RefSource::Prop(v, k) => ProjSource::Prop(v.clone(), k.clone()),
        RefSource::Var(name) => {
            if node_vars.contains(name) {
                ProjSource::NodeVar(name.clone())
            } else if edge_vars.contains(name) {
                ProjSource::EdgeVar(name.clone())
            } else {
                // Unresolved; kept as a node-var reference so row
                // building resolves it to null rather than panicking
                // (spec §7 silent-empty philosophy).
                ProjSource::NodeVar(name.clone())
            }
        }
    }
}

fn lower_node(node: &ast::NodeExpr) -> NodeSegment {
    let mut label_filter = None;
    let mut property_constraints = Vec::new();
    for filter in &node.filters {
        match filter {
            InlineFilter::Label(op, value) => {
                label_filter = Some(LabelFilter {
                    mode: match op {
                        LabelOp::Eq => LabelMode::Eq,
                        LabelOp::Contains => LabelMode::Contains,
                    },
                    value: value.clone(),
                });
            }
            InlineFilter::Prop(key, op, value) => {
                property_constraints.push((key.clone(), *op, value.clone()));
            }
        }
    }
    NodeSegment {
        var: node.var.clone(),
        type_tag: node.type_tag.clone(),
        label_filter,
        property_constraints,
    }
}

fn lower_edge(edge: &ast::EdgeExpr) -> EdgeSegment {
    let mut edge_property_constraints = Vec::new();
    for filter in &edge.filters {
        match filter {
            // EdgeSegment has no dedicated label field; fold it into a
            // plain property constraint keyed "label" (spec §4.3).
            InlineFilter::Label(op, value) => {
                let cmp = match op {
                    LabelOp::Eq => CmpOp::Eq,
                    LabelOp::Contains => CmpOp::Substring,
                };
                edge_property_constraints.push(("label".to_string(), cmp, Scalar::Text(value.clone())));
            }
            InlineFilter::Prop(key, op, value) => {
                edge_property_constraints.push((key.clone(), *op, value.clone()));
            }
        }
    }

    EdgeSegment {
        edge_var: edge.var.clone(),
        type_set: edge.types.as_ref().map(|types| types.iter().cloned().collect()),
        direction: edge.direction,
        var_len: edge.var_len.map(|spec| VarLenBounds {
            min: spec.min,
            max: spec.max,
        }),
        edge_property_constraints,
    }
}

fn log_unresolved_identifiers(expr: &Expr, node_vars: &HashSet<String>, edge_vars: &HashSet<String>) {
    match expr {
        Expr::And(l, r) | Expr::Or(l, r) => {
            log_unresolved_identifiers(l, node_vars, edge_vars);
            log_unresolved_identifiers(r, node_vars, edge_vars);
        }
        Expr::Not(inner) => log_unresolved_identifiers(inner, node_vars, edge_vars),
        Expr::Compare(lhs, _, rhs) => {
            log_unresolved_atom(lhs, node_vars, edge_vars);
            log_unresolved_atom(rhs, node_vars, edge_vars);
        }
    }
}

fn log_unresolved_atom(atom: &ast::Atom, node_vars: &HashSet<String>, edge_vars: &HashSet<String>) {
    let name = match atom {
        ast::Atom::Prop(v, _) => v,
        ast::Atom::TypeOf(v) => v,
        ast::Atom::Lit(_) => return,
    };
    if !node_vars.contains(name) && !edge_vars.contains(name) {
        log::debug!("WHERE clause references undeclared variable '{name}'; this clause will never match a row");
    }
}
