//! Shared node/edge records and the dynamic property scalar union used
//! across the `graphcore` workspace. This crate carries no logic beyond
//! `Scalar`'s comparison semantics; it exists so `graphcore-store` and
//! `graphcore-query` can agree on a wire-level vocabulary without either
//! depending on the other.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub type NodeId = String;
pub type RelType = String;

/// The dynamic scalar union backing node and edge properties.
/// `#[serde(untagged)]` preserves the int/float distinction a JSON
/// literal carried on the wire: a bare `5` deserializes to `Int`, `5.0`
/// to `Float`, because serde tries variants in declaration order
/// against the literal's lexed shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Scalar>),
}

/// Ranking used to order scalars of *different* kinds: numeric < string
/// < boolean < null, within each by natural order. `List` has no defined
/// place in that ranking; it sorts alongside its nearest analogue (after
/// boolean, before null) since the grammar never compares lists
/// directly — this only matters for ORDER BY keys that happen to
/// resolve to a list-valued property.
fn type_rank(s: &Scalar) -> u8 {
    match s {
        Scalar::Int(_) | Scalar::Float(_) => 0,
        Scalar::Text(_) => 1,
        Scalar::Bool(_) => 2,
        Scalar::List(_) => 3,
        Scalar::Null => 4,
    }
}

impl Scalar {
    /// True numeric comparison spanning `Int`/`Float`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// String form of any scalar, used by the `~` substring operator,
    /// which operates on the string form of any scalar.
    pub fn as_text_form(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Text(s) => s.clone(),
            Scalar::List(items) => {
                let parts: Vec<String> = items.iter().map(Scalar::as_text_form).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }
}

/// Total order over scalars used by ORDER BY and by mixed-type
/// comparisons generally. Within a type, natural order; across types,
/// the ranking in [`type_rank`].
impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Scalar {}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => Ordering::Equal,
            (Scalar::Bool(a), Scalar::Bool(b)) => a.cmp(b),
            (Scalar::Text(a), Scalar::Text(b)) => a.cmp(b),
            (Scalar::List(a), Scalar::List(b)) => a.cmp(b),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                _ => type_rank(self).cmp(&type_rank(other)),
            },
        }
    }
}

/// A node record (spec §3). Identity is `id`; re-inserting an id replaces
/// the whole record while the store preserves incident edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<std::collections::BTreeMap<String, Scalar>>,
}

impl Node {
    pub fn property(&self, key: &str) -> Option<&Scalar> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }
}

/// An edge record (spec §3). The triple `(src, type, dst)` is the key;
/// re-adding overwrites properties wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub src: NodeId,
    #[serde(rename = "type")]
    pub edge_type: RelType,
    pub dst: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<std::collections::BTreeMap<String, Scalar>>,
}

impl Edge {
    pub fn property(&self, key: &str) -> Option<&Scalar> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            src: self.src.clone(),
            edge_type: self.edge_type.clone(),
            dst: self.dst.clone(),
        }
    }
}

/// The `(src, type, dst)` triple that identifies an edge (spec §3).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    pub src: NodeId,
    pub edge_type: RelType,
    pub dst: NodeId,
}
