//! Predicate evaluator (C4, spec §4.4). Evaluates a WHERE AST, and the
//! inline property/label constraints from the planner's `NodeSegment`/
//! `EdgeSegment`, against a (possibly partial) [`Binding`]. Every
//! failure mode here is `false`, never a panic or an error: a missing
//! property, an unbound variable, or a type mismatch all just mean "this
//! row doesn't match".

use crate::ast::{Atom, CmpOp, Expr};
use crate::binding::Binding;
use crate::planner::{LabelFilter, LabelMode};
use graphcore_api::Scalar;
use graphcore_store::Graph;

/// Evaluates a WHERE expression against a binding. `AND`/`OR`
/// short-circuit; `NOT` negates (spec §4.4).
pub fn evaluate(expr: &Expr, binding: &Binding, graph: &Graph) -> bool {
    match expr {
        Expr::And(lhs, rhs) => evaluate(lhs, binding, graph) && evaluate(rhs, binding, graph),
        Expr::Or(lhs, rhs) => evaluate(lhs, binding, graph) || evaluate(rhs, binding, graph),
        Expr::Not(inner) => !evaluate(inner, binding, graph),
        Expr::Compare(lhs, op, rhs) => {
            let l = resolve_atom(lhs, binding, graph);
            let r = resolve_atom(rhs, binding, graph);
            compare(*op, l.as_ref(), r.as_ref())
        }
    }
}

/// Resolves a WHERE atom to a concrete scalar. `None` covers both "the
/// variable isn't bound" and "the property doesn't exist" — both
/// collapse to `false` once they reach [`compare`] (spec §4.4).
fn resolve_atom(atom: &Atom, binding: &Binding, graph: &Graph) -> Option<Scalar> {
    match atom {
        Atom::Lit(scalar) => Some(scalar.clone()),
        Atom::TypeOf(var) => binding.edge(var).map(|e| Scalar::Text(e.edge_type.clone())),
        Atom::Prop(var, key) => {
            if let Some(id) = binding.node(var) {
                graph.node(id).and_then(|n| n.property(key)).cloned()
            } else if let Some(edge) = binding.edge(var) {
                edge.property(key).cloned()
            } else {
                None
            }
        }
    }
}

/// Comparison semantics shared by WHERE and inline property constraints
/// (spec §4.4, §9): numeric compares span `Int`/`Float`; string ops are
/// case-sensitive; equality additionally holds between booleans and
/// between nulls. Any operand that failed to resolve makes the whole
/// comparison `false`.
pub fn compare(op: CmpOp, lhs: Option<&Scalar>, rhs: Option<&Scalar>) -> bool {
    let (Some(l), Some(r)) = (lhs, rhs) else {
        return false;
    };
    match op {
        CmpOp::Eq => scalars_equal(l, r),
        CmpOp::Ne => !scalars_equal(l, r),
        CmpOp::Gt => numeric_compare(l, r).is_some_and(|(a, b)| a > b),
        CmpOp::Ge => numeric_compare(l, r).is_some_and(|(a, b)| a >= b),
        CmpOp::Lt => numeric_compare(l, r).is_some_and(|(a, b)| a < b),
        CmpOp::Le => numeric_compare(l, r).is_some_and(|(a, b)| a <= b),
        CmpOp::StartsWith => l.as_text_form().starts_with(&r.as_text_form()),
        CmpOp::EndsWith => l.as_text_form().ends_with(&r.as_text_form()),
        CmpOp::Contains => l.as_text_form().contains(&r.as_text_form()),
        // '~' is the case-insensitive inline-filter operator; WHERE's
        // grammar never produces it, but evaluating it here rather than
        // panicking keeps this function total.
        CmpOp::Substring => l
            .as_text_form()
            .to_lowercase()
            .contains(&r.as_text_form().to_lowercase()),
    }
}

/// Checks one `(key, op, value)` property constraint from a `NodeSegment`
/// or `EdgeSegment` against an optional stored property value (spec
/// §4.5: "A candidate that matches but fails the node's
/// `propertyConstraints` is dropped silently.").
pub fn property_constraint_matches(value: Option<&Scalar>, op: CmpOp, expected: &Scalar) -> bool {
    if op == CmpOp::Substring {
        return value.is_some_and(|v| {
            v.as_text_form()
                .to_lowercase()
                .contains(&expected.as_text_form().to_lowercase())
        });
    }
    compare(op, value, Some(expected))
}

/// Checks a node's `label` against an inline `labelFilter` (spec §4.3,
/// §9: `~` lowercases both sides before comparing).
pub fn label_matches(label: &str, filter: &LabelFilter) -> bool {
    match filter.mode {
        LabelMode::Eq => label == filter.value,
        LabelMode::Contains => label
            .to_lowercase()
            .contains(&filter.value.to_lowercase()),
    }
}

fn scalars_equal(l: &Scalar, r: &Scalar) -> bool {
    match (l, r) {
        (Scalar::Int(_) | Scalar::Float(_), Scalar::Int(_) | Scalar::Float(_)) => {
            l.as_f64() == r.as_f64()
        }
        (Scalar::Text(a), Scalar::Text(b)) => a == b,
        (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
        (Scalar::Null, Scalar::Null) => true,
        (Scalar::List(a), Scalar::List(b)) => a == b,
        _ => false,
    }
}

fn numeric_compare(l: &Scalar, r: &Scalar) -> Option<(f64, f64)> {
    Some((l.as_f64()?, r.as_f64()?))
}
