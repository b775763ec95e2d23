//! In-memory, schema-optional property graph store.
//!
//! This crate owns the node/edge tables and the type-indexed adjacency
//! (`outByType`/`inByType`/`edgeByKey`) that the query engine in
//! `graphcore-query` reads through. It has no knowledge of the pattern
//! language; it is a plain data structure with total, panic-free
//! operations.

mod error;
mod json;
mod store;

pub use error::{Error, Result};
pub use store::Graph;

pub use graphcore_api::{Edge, EdgeKey, Node, NodeId, RelType, Scalar};
