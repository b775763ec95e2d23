//! Error type for the graph store. Mutation (`add_node`/`add_edge`) is
//! total and never returns `Result`; only JSON deserialization can fail,
//! and only with a structural violation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported version: {0}")]
    UnsupportedVersion(String),

    #[error("duplicate node id: {0}")]
    DuplicateNodeId(String),

    #[error("dangling edge endpoint: {0}")]
    DanglingEdge(String),

    #[error("empty required field: {0}")]
    EmptyField(&'static str),
}
