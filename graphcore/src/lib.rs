//! `graphcore`: an embeddable, schema-optional property-graph store with
//! a small Cypher-subset query language.
//!
//! This crate is a thin facade over three leaf crates:
//! [`graphcore_api`] (shared scalar/node/edge types), [`graphcore_store`]
//! (the in-memory graph and its JSON wire format), and [`graphcore_query`]
//! (the pattern language and executor). It re-exports their public types
//! and wires the query engine's entry points onto [`Graph`] as the
//! [`GraphQueryExt`] trait, so a host application only needs this crate.
//!
//! ```
//! use graphcore::{Graph, GraphQueryExt, Node, QueryOptions};
//!
//! let mut graph = Graph::new();
//! graph.add_node(Node {
//!     id: "alice".into(),
//!     node_type: "User".into(),
//!     label: "alice".into(),
//!     properties: None,
//! });
//! graph.add_node(Node {
//!     id: "admins".into(),
//!     node_type: "Group".into(),
//!     label: "admins".into(),
//!     properties: None,
//! });
//! graph.add_edge("alice".into(), "MEMBER_OF".into(), "admins".into(), None);
//!
//! let rows = graph
//!     .match_rows("user-[:MEMBER_OF]->group", &QueryOptions::default())
//!     .unwrap();
//! assert_eq!(rows.len(), 1);
//! ```

pub use graphcore_api::{Edge, EdgeKey, Node, NodeId, RelType, Scalar};
pub use graphcore_query::{
    ast, ColumnSets, Error as QueryError, PathEdge, PathMatch, QueryOptions, Row, DEFAULT_MAX_HOPS,
};
pub use graphcore_store::{Error as StoreError, Graph};

use graphcore_query::query_api;

/// Query entry points wired onto [`Graph`] (spec §4.7, §6). Implemented
/// as an extension trait rather than an inherent impl since `Graph` is
/// defined in `graphcore-store`, which stays query-agnostic.
pub trait GraphQueryExt {
    /// `match(pattern, …)`: collapses matching rows into per-variable
    /// value sets.
    fn run_match(&self, pattern: &str, opts: &QueryOptions) -> Result<ColumnSets, QueryError>;

    /// `matchRows(pattern, …)`: the ordered, deduplicated, sorted,
    /// paginated row set.
    fn match_rows(&self, pattern: &str, opts: &QueryOptions) -> Result<Vec<Row>, QueryError>;

    /// `matchPaths(pattern, …)`: one `PathMatch` per surviving row.
    fn match_paths(&self, pattern: &str, opts: &QueryOptions) -> Result<Vec<PathMatch>, QueryError>;

    /// `matchMany(patterns, …)`.
    fn run_match_many(&self, patterns: &[&str], opts: &QueryOptions) -> Result<ColumnSets, QueryError>;

    /// `matchRowsMany(patterns, …)`.
    fn match_rows_many(&self, patterns: &[&str], opts: &QueryOptions) -> Result<Vec<Row>, QueryError>;

    /// `matchPathsMany(patterns, …)`.
    fn match_paths_many(&self, patterns: &[&str], opts: &QueryOptions) -> Result<Vec<PathMatch>, QueryError>;
}

impl GraphQueryExt for Graph {
    fn run_match(&self, pattern: &str, opts: &QueryOptions) -> Result<ColumnSets, QueryError> {
        query_api::run_match(self, pattern, opts)
    }

    fn match_rows(&self, pattern: &str, opts: &QueryOptions) -> Result<Vec<Row>, QueryError> {
        query_api::match_rows(self, pattern, opts)
    }

    fn match_paths(&self, pattern: &str, opts: &QueryOptions) -> Result<Vec<PathMatch>, QueryError> {
        query_api::match_paths(self, pattern, opts)
    }

    fn run_match_many(&self, patterns: &[&str], opts: &QueryOptions) -> Result<ColumnSets, QueryError> {
        query_api::run_match_many(self, patterns, opts)
    }

    fn match_rows_many(&self, patterns: &[&str], opts: &QueryOptions) -> Result<Vec<Row>, QueryError> {
        query_api::match_rows_many(self, patterns, opts)
    }

    fn match_paths_many(&self, patterns: &[&str], opts: &QueryOptions) -> Result<Vec<PathMatch>, QueryError> {
        query_api::match_paths_many(self, patterns, opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member_graph() -> Graph {
        let mut g = Graph::new();
        g.add_node(Node {
            id: "alice".into(),
            node_type: "User".into(),
            label: "alice".into(),
            properties: None,
        });
        g.add_node(Node {
            id: "admins".into(),
            node_type: "Group".into(),
            label: "admins".into(),
            properties: None,
        });
        g.add_edge("alice".into(), "MEMBER_OF".into(), "admins".into(), None);
        g
    }

    #[test]
    fn match_rows_works_through_the_facade() {
        let g = member_graph();
        let rows = g
            .match_rows("user-[:MEMBER_OF]->group", &QueryOptions::default())
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn json_round_trips_through_the_store_and_stays_queryable() {
        let g = member_graph();
        let json = g.to_json();
        let restored = Graph::from_json(&json).unwrap();
        let rows = restored
            .match_rows("user-[:MEMBER_OF]->group", &QueryOptions::default())
            .unwrap();
        assert_eq!(rows.len(), 1);
    }
}
