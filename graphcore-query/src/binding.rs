//! Partial or complete assignment of pattern variables to graph ids
//! (spec Glossary "Binding"). Built up one segment at a time by the
//! executors in [`crate::executor`], consulted by [`crate::evaluator`]
//! and [`crate::path`].

use graphcore_api::{Edge, NodeId};
use indexmap::IndexMap;

/// `nodeVar -> nodeId` and `edgeVar -> Edge` (spec §4.4). Re-binding a
/// node variable overwrites the previous entry with no consistency
/// check — repeated variables in a pattern are legal and "the last
/// position wins" (spec §4.3, §9).
#[derive(Debug, Clone, Default)]
pub struct Binding {
    pub nodes: IndexMap<String, NodeId>,
    pub edges: IndexMap<String, Edge>,
}

impl Binding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_node(&mut self, var: &str, id: NodeId) {
        self.nodes.insert(var.to_string(), id);
    }

    pub fn bind_edge(&mut self, var: &str, edge: Edge) {
        self.edges.insert(var.to_string(), edge);
    }

    pub fn node(&self, var: &str) -> Option<&NodeId> {
        self.nodes.get(var)
    }

    pub fn edge(&self, var: &str) -> Option<&Edge> {
        self.edges.get(var)
    }

    /// Whether `id` may be bound to `var` without colliding with a
    /// *different* node variable already bound to the same id (spec §8
    /// scenario 5: a pattern with six distinct node variables has
    /// exactly one matching subgraph only if the six variables are
    /// pairwise distinct nodes — re-binding the same variable, e.g. a
    /// self-loop pattern `a-[:R]->a`, is unaffected since that case
    /// never consults this check under a different key).
    pub fn is_fresh_node(&self, var: &str, id: &NodeId) -> bool {
        self.nodes.iter().all(|(k, v)| k == var || v != id)
    }

    /// Whether every *distinct* node variable in this binding holds a
    /// distinct id. `O(n^2)` in the number of node variables, which is
    /// fine for the small pattern widths this engine targets (mirrors
    /// the dedup pass's own complexity note).
    pub fn nodes_are_distinct(&self) -> bool {
        for (i, (k1, v1)) in self.nodes.iter().enumerate() {
            for (k2, v2) in self.nodes.iter().skip(i + 1) {
                if k1 != k2 && v1 == v2 {
                    return false;
                }
            }
        }
        true
    }
}
