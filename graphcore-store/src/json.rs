//! JSON serialization, a fixed wire contract for external collaborators.
//! `metadata` is write-only: produced by [`Graph::to_json`], ignored by
//! [`Graph::from_json`].

use crate::error::{Error, Result};
use crate::store::Graph;
use graphcore_api::{Edge, Node};
use serde::{Deserialize, Serialize};

const SUPPORTED_VERSION: &str = "1.0";

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    version: String,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Metadata {
    #[serde(rename = "nodeCount")]
    node_count: usize,
    #[serde(rename = "edgeCount")]
    edge_count: usize,
    #[serde(rename = "serializedAt")]
    serialized_at: String,
}

impl Graph {
    /// Serialize the graph to the fixed JSON format. `metadata` is
    /// always emitted; it carries no information recovered on a
    /// subsequent `from_json` call.
    pub fn to_json(&self) -> String {
        let doc = Document {
            version: SUPPORTED_VERSION.to_string(),
            nodes: self.iter_nodes().cloned().collect(),
            edges: self.iter_edges().cloned().collect(),
            metadata: Some(Metadata {
                node_count: self.node_count(),
                edge_count: self.edge_count(),
                serialized_at: chrono::Utc::now().to_rfc3339(),
            }),
        };
        serde_json::to_string_pretty(&doc).expect("Document serialization cannot fail")
    }

    /// Deserialize a graph from the fixed JSON format, rejecting unknown
    /// version, duplicate node ids, dangling edge endpoints, missing
    /// required fields, and empty `id`/`src`/`dst`/`type`. Equivalent to
    /// `from_json_opts(text, true)`.
    pub fn from_json(text: &str) -> Result<Graph> {
        Self::from_json_opts(text, true)
    }

    /// As [`Graph::from_json`], but when `validate` is `false` dangling
    /// edge endpoints are accepted and silently inserted. All other
    /// structural checks (version, duplicate ids, missing/empty required
    /// fields) still apply regardless of `validate`.
    pub fn from_json_opts(text: &str, validate: bool) -> Result<Graph> {
        let doc: Document = serde_json::from_str(text)?;

        if doc.version != SUPPORTED_VERSION {
            return Err(Error::UnsupportedVersion(doc.version));
        }

        let mut seen_ids = std::collections::HashSet::new();
        for n in &doc.nodes {
            if n.id.is_empty() {
                return Err(Error::EmptyField("id"));
            }
            if n.node_type.is_empty() {
                return Err(Error::EmptyField("type"));
            }
            if !seen_ids.insert(n.id.clone()) {
                return Err(Error::DuplicateNodeId(n.id.clone()));
            }
        }

        for e in &doc.edges {
            if e.src.is_empty() {
                return Err(Error::EmptyField("src"));
            }
            if e.dst.is_empty() {
                return Err(Error::EmptyField("dst"));
            }
            if e.edge_type.is_empty() {
                return Err(Error::EmptyField("type"));
            }
            if validate {
                if !seen_ids.contains(&e.src) {
                    return Err(Error::DanglingEdge(e.src.clone()));
                }
                if !seen_ids.contains(&e.dst) {
                    return Err(Error::DanglingEdge(e.dst.clone()));
                }
            }
        }

        let mut graph = Graph::new();
        for n in doc.nodes {
            graph.add_node(n);
        }
        for e in doc.edges {
            graph.add_edge(e.src, e.edge_type, e.dst, e.properties);
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "version": "1.0",
        "nodes": [
            {"id": "a", "type": "U", "label": "A"},
            {"id": "b", "type": "U", "label": "B"}
        ],
        "edges": [
            {"src": "a", "type": "R", "dst": "b"}
        ]
    }"#;

    #[test]
    fn deserializes_minimal_document() {
        let g = Graph::from_json(FIXTURE).unwrap();
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(g.has_edge("a", "R", "b"));
    }

    #[test]
    fn rejects_unsupported_version() {
        let text = FIXTURE.replacen("1.0", "9.9", 1);
        assert!(matches!(
            Graph::from_json(&text),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn rejects_duplicate_node_ids() {
        let text = r#"{
            "version": "1.0",
            "nodes": [
                {"id": "a", "type": "U", "label": "A"},
                {"id": "a", "type": "U", "label": "A2"}
            ],
            "edges": []
        }"#;
        assert!(matches!(
            Graph::from_json(text),
            Err(Error::DuplicateNodeId(_))
        ));
    }

    #[test]
    fn rejects_dangling_edges_by_default() {
        let text = r#"{
            "version": "1.0",
            "nodes": [{"id": "a", "type": "U", "label": "A"}],
            "edges": [{"src": "a", "type": "R", "dst": "missing"}]
        }"#;
        assert!(matches!(
            Graph::from_json(text),
            Err(Error::DanglingEdge(_))
        ));
        // with validation disabled, the dangling edge is accepted.
        let g = Graph::from_json_opts(text, false).unwrap();
        assert!(g.has_edge("a", "R", "missing"));
    }

    #[test]
    fn rejects_empty_required_fields() {
        let text = r#"{
            "version": "1.0",
            "nodes": [{"id": "", "type": "U", "label": "A"}],
            "edges": []
        }"#;
        assert!(matches!(Graph::from_json(text), Err(Error::EmptyField(_))));
    }
}
