//! Quantified invariants from spec §8 exercised at the crate level,
//! through `graphcore_store`'s public API rather than `Graph`'s private
//! adjacency fields: the out/in adjacency mirror, idempotent insert,
//! and the JSON round-trip.

use graphcore_api::{Node, Scalar};
use graphcore_store::Graph;

fn node(id: &str, ty: &str) -> Node {
    Node {
        id: id.to_string(),
        node_type: ty.to_string(),
        label: id.to_string(),
        properties: None,
    }
}

#[test]
fn adjacency_mirrors_both_directions() {
    let mut g = Graph::new();
    g.add_node(node("a", "X"));
    g.add_node(node("b", "X"));
    g.add_edge("a".into(), "R".into(), "b".into(), None);

    assert!(g.out_neighbors("a", "R").any(|n| n == "b"));
    assert!(g.in_neighbors("b", "R").any(|n| n == "a"));
    assert!(g.has_edge("a", "R", "b"));
}

#[test]
fn idempotent_add_node_and_add_edge() {
    let mut g1 = Graph::new();
    g1.add_node(node("a", "X"));
    g1.add_node(node("a", "X"));
    g1.add_edge("a".into(), "R".into(), "a".into(), None);
    g1.add_edge("a".into(), "R".into(), "a".into(), None);

    let mut g2 = Graph::new();
    g2.add_node(node("a", "X"));
    g2.add_edge("a".into(), "R".into(), "a".into(), None);

    assert_eq!(g1.node_count(), g2.node_count());
    assert_eq!(g1.edge_count(), g2.edge_count());
}

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
fn round_trip_preserves_graph() {
    let g = Graph::from_json(FIXTURE).unwrap();
    let text = g.to_json();
    let g2 = Graph::from_json(&text).unwrap();
    assert_eq!(g.node_count(), g2.node_count());
    assert_eq!(g.edge_count(), g2.edge_count());
    for n in g.iter_nodes() {
        assert_eq!(g2.node(&n.id), Some(n));
    }
}

#[test]
fn round_trip_preserves_properties() {
    let mut g = Graph::new();
    let mut props = std::collections::BTreeMap::new();
    props.insert("weight".to_string(), Scalar::Int(7));
    props.insert("active".to_string(), Scalar::Bool(true));
    g.add_node(node("a", "X"));
    g.add_node(node("b", "X"));
    g.add_edge("a".into(), "R".into(), "b".into(), Some(props));

    let g2 = Graph::from_json(&g.to_json()).unwrap();
    assert_eq!(
        g2.get_edge("a", "R", "b").unwrap().properties,
        g.get_edge("a", "R", "b").unwrap().properties
    );
}
