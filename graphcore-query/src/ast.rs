//! Raw parse tree for the pattern language (spec §4.2). Leaves are
//! strings; no semantic checks — type/label/property resolution, WHERE
//! identifier resolution, and var-len default bounds all happen later in
//! [`crate::planner`].

use graphcore_api::Scalar;

/// A full pattern: `MATCH ... [WHERE ...] [RETURN ...] [ORDER BY ...]
/// [SKIP ...] [LIMIT ...]`. The leading `MATCH` keyword itself is
/// optional in the grammar (spec §4.2's `[MATCH]`).
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub path: PatternPath,
    pub where_clause: Option<Expr>,
    pub return_items: Option<Vec<RetItem>>,
    pub order_by: Option<Vec<OrderItem>>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// `NodeExpr (EdgeExpr NodeExpr)*`, i.e. at least one node, any number
/// of edge hops.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternPath {
    pub start: NodeExpr,
    pub hops: Vec<(EdgeExpr, NodeExpr)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeExpr {
    pub var: String,
    pub type_tag: Option<String>,
    pub filters: Vec<InlineFilter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeExpr {
    pub var: Option<String>,
    /// `None` means "any type" (no type token at all, e.g. `[r]` or `[]`).
    pub types: Option<Vec<String>>,
    pub direction: Direction,
    pub var_len: Option<VarLenSpec>,
    pub filters: Vec<InlineFilter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Used by the match driver (C7) to walk a segment from its *later*
    /// node back to its earlier one when an anchor lands mid-pattern:
    /// reversing which adjacency index (`outByType`/`inByType`) a hop
    /// consults is equivalent to flipping its declared direction (spec
    /// §4.7 "the driver tries subsequent node segments").
    pub fn flipped(self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// `Int? '..' Int? | Int` inside `*...`. A bare `*` with no spec at all
/// is represented as `Some(VarLenSpec { min: None, max: None })` by the
/// parser; the planner applies the default `1..10` bounds (spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarLenSpec {
    pub min: Option<u32>,
    pub max: Option<u32>,
    /// True for the bare `*k` exact-hop-count form, so the planner can
    /// set `min == max == k` rather than reading it as `min=k` with no
    /// upper bound.
    pub exact: bool,
}

/// One entry of an inline `{...}` constraint block, shared by node and
/// edge bodies (spec §4.2). `label` is only semantically meaningful on a
/// node (it becomes `NodeSegment.labelFilter`); the planner folds a
/// `label` filter found on an edge body into a plain property constraint
/// keyed `"label"` since `EdgeSegment` has no dedicated field for it.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineFilter {
    Label(LabelOp, String),
    Prop(String, CmpOp, Scalar),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelOp {
    Eq,
    Contains,
}

/// Comparison operators. `Substring` is the inline `~` token; `StartsWith`/
/// `EndsWith`/`Contains` are WHERE-clause-only string operators (spec
/// §4.2, §4.4). `:` and `=` both lex to `Eq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Substring,
    StartsWith,
    EndsWith,
    Contains,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetItem {
    pub source: RefSource,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub key: RefSource,
    pub direction: OrderDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDir {
    Asc,
    Desc,
}

/// `Ident` or `Ident '.' Ident`, shared shape for RETURN items and ORDER
/// BY keys (spec §4.2, §4.3: "`key` resolves like projection items").
/// The parser cannot tell a bare identifier apart from an edge variable
/// reference — that resolution happens in the planner once node/edge
/// variable scopes are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefSource {
    Var(String),
    Prop(String, String),
}

/// WHERE boolean expression AST (spec §4.2, §4.4).
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Compare(Atom, CmpOp, Atom),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Prop(String, String),
    TypeOf(String),
    Lit(Scalar),
}
