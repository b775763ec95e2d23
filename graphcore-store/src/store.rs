//! The in-memory graph store: node/edge tables plus forward/reverse
//! type-indexed adjacency. `IndexMap`/`IndexSet` are used rather than
//! `HashMap`/`HashSet` so that iteration over a given node's neighbors
//! follows insertion order, which keeps result ordering deterministic
//! for tests and for hosts that print results without committing to it
//! as part of the public contract.

use graphcore_api::{Edge, EdgeKey, Node, NodeId, RelType, Scalar};
use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeMap;

/// The embedded property graph. All operations are total: unknown ids
/// yield empty sets, never errors, and re-insertion silently replaces.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    nodes: IndexMap<NodeId, Node>,
    edges: IndexMap<EdgeKey, Edge>,
    out_by_type: IndexMap<NodeId, IndexMap<RelType, IndexSet<NodeId>>>,
    in_by_type: IndexMap<NodeId, IndexMap<RelType, IndexSet<NodeId>>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a node. Replacement keeps existing incident
    /// edges intact — the adjacency indexes key on `id`, not on the node
    /// record.
    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Insert or replace an edge. On replacement the new `properties`
    /// map wholly supersedes the old one: passing `None` drops any
    /// properties the edge previously had.
    pub fn add_edge(
        &mut self,
        src: NodeId,
        edge_type: RelType,
        dst: NodeId,
        properties: Option<BTreeMap<String, Scalar>>,
    ) {
        self.out_by_type
            .entry(src.clone())
            .or_default()
            .entry(edge_type.clone())
            .or_default()
            .insert(dst.clone());
        self.in_by_type
            .entry(dst.clone())
            .or_default()
            .entry(edge_type.clone())
            .or_default()
            .insert(src.clone());

        let key = EdgeKey {
            src: src.clone(),
            edge_type: edge_type.clone(),
            dst: dst.clone(),
        };
        self.edges.insert(
            key,
            Edge {
                src,
                edge_type,
                dst,
                properties,
            },
        );
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn has_edge(&self, src: &str, edge_type: &str, dst: &str) -> bool {
        self.edges.contains_key(&lookup_key(src, edge_type, dst))
    }

    pub fn get_edge(&self, src: &str, edge_type: &str, dst: &str) -> Option<&Edge> {
        self.edges.get(&lookup_key(src, edge_type, dst))
    }

    /// Neighbors reachable from `src` over edges of exactly `edge_type`.
    /// Unknown `src` or `edge_type` yields an empty iterator, never an
    /// error.
    pub fn out_neighbors<'a>(
        &'a self,
        src: &str,
        edge_type: &str,
    ) -> impl Iterator<Item = &'a NodeId> + 'a {
        self.out_by_type
            .get(src)
            .and_then(|by_type| by_type.get(edge_type))
            .into_iter()
            .flatten()
    }

    pub fn in_neighbors<'a>(
        &'a self,
        dst: &str,
        edge_type: &str,
    ) -> impl Iterator<Item = &'a NodeId> + 'a {
        self.in_by_type
            .get(dst)
            .and_then(|by_type| by_type.get(edge_type))
            .into_iter()
            .flatten()
    }

    pub fn out_types<'a>(&'a self, src: &str) -> impl Iterator<Item = &'a RelType> + 'a {
        self.out_by_type
            .get(src)
            .into_iter()
            .flat_map(|by_type| by_type.keys())
    }

    pub fn in_types<'a>(&'a self, dst: &str) -> impl Iterator<Item = &'a RelType> + 'a {
        self.in_by_type
            .get(dst)
            .into_iter()
            .flat_map(|by_type| by_type.keys())
    }

    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn iter_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

fn lookup_key(src: &str, edge_type: &str, dst: &str) -> EdgeKey {
    EdgeKey {
        src: src.to_string(),
        edge_type: edge_type.to_string(),
        dst: dst.to_string(),
    }
}
