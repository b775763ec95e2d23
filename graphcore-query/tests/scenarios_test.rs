//! The six concrete end-to-end scenarios from the pattern-language
//! design notes: single-hop anchored match, variable-length dedup
//! against a shortcut, cross-hop `type(r)` comparison, a property/WHERE
//! filter over an HR-style graph, a six-node bidirectional star, and a
//! minimal JSON round-trip followed by a query.

use graphcore_api::{Node, Scalar};
use graphcore_query::{match_rows, QueryOptions};
use graphcore_store::Graph;
use std::collections::BTreeMap;

fn node(id: &str, node_type: &str) -> Node {
    Node {
        id: id.to_string(),
        node_type: node_type.to_string(),
        label: id.to_string(),
        properties: None,
    }
}

#[test]
fn scenario_1_single_hop_anchored_match() {
    let mut g = Graph::new();
    g.add_node(node("alice", "User"));
    g.add_node(node("admins", "Group"));
    g.add_edge("alice".into(), "MEMBER_OF".into(), "admins".into(), None);

    let opts = QueryOptions {
        start_id: Some("alice".to_string()),
        ..Default::default()
    };
    let rows = match_rows(&g, "user-[:MEMBER_OF]->group", &opts).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["user"], Scalar::Text("alice".into()));
    assert_eq!(rows[0]["group"], Scalar::Text("admins".into()));
}

#[test]
fn scenario_2_varlen_dedups_shortcut_terminal() {
    let mut g = Graph::new();
    for id in ["a", "b", "c", "d"] {
        g.add_node(node(id, "N"));
    }
    g.add_edge("a".into(), "X".into(), "b".into(), None);
    g.add_edge("b".into(), "X".into(), "c".into(), None);
    g.add_edge("c".into(), "X".into(), "d".into(), None);
    g.add_edge("a".into(), "X".into(), "d".into(), None);

    let opts = QueryOptions {
        start_id: Some("a".to_string()),
        ..Default::default()
    };
    let rows = match_rows(&g, "start-[:X*1..3]->end", &opts).unwrap();
    let mut ends: Vec<String> = rows
        .iter()
        .map(|r| match &r["end"] {
            Scalar::Text(s) => s.clone(),
            other => panic!("expected text id, got {other:?}"),
        })
        .collect();
    ends.sort();
    assert_eq!(ends, vec!["b".to_string(), "c".to_string(), "d".to_string()]);
}

#[test]
fn scenario_3_cross_hop_type_comparison() {
    let mut g = Graph::new();
    for id in ["p1", "mid", "dest1", "dest2"] {
        g.add_node(node(id, "N"));
    }
    g.add_edge("p1".into(), "DIRECT_abc".into(), "mid".into(), None);
    g.add_edge("mid".into(), "DIRECT_abc".into(), "dest1".into(), None);
    g.add_edge("mid".into(), "DIRECT_xyz".into(), "dest2".into(), None);

    let opts = QueryOptions {
        start_id: Some("p1".to_string()),
        ..Default::default()
    };
    let rows = match_rows(
        &g,
        "p-[r]->m-[r2]->d WHERE type(r) STARTS WITH \"DIRECT_\" AND type(r2) = type(r)",
        &opts,
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["d"], Scalar::Text("dest1".into()));
}

#[test]
fn scenario_4_hr_age_and_department_filter() {
    let mut g = Graph::new();
    let person = |id: &str, age: i64, department: &str| {
        let mut props = BTreeMap::new();
        props.insert("age".to_string(), Scalar::Int(age));
        props.insert(
            "department".to_string(),
            Scalar::Text(department.to_string()),
        );
        Node {
            id: id.to_string(),
            node_type: "Person".to_string(),
            label: id.to_string(),
            properties: Some(props),
        }
    };
    g.add_node(person("alice", 28, "Engineering"));
    g.add_node(person("bob", 35, "Engineering"));
    g.add_node(person("carol", 22, "Marketing"));

    let opts = QueryOptions::default();
    let rows = match_rows(
        &g,
        "person:Person WHERE person.age > 25 AND person.department = \"Engineering\"",
        &opts,
    )
    .unwrap();
    let mut ids: Vec<String> = rows
        .iter()
        .map(|r| match &r["person"] {
            Scalar::Text(s) => s.clone(),
            other => panic!("expected text id, got {other:?}"),
        })
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["alice".to_string(), "bob".to_string()]);
}

#[test]
fn scenario_5_six_node_bidirectional_star() {
    let mut g = Graph::new();
    for id in ["a", "b", "c", "d", "e", "f"] {
        g.add_node(node(id, "N"));
    }
    g.add_edge("a".into(), "X".into(), "b".into(), None);
    g.add_edge("c".into(), "X".into(), "b".into(), None);
    g.add_edge("c".into(), "X".into(), "d".into(), None);
    g.add_edge("e".into(), "X".into(), "d".into(), None);
    g.add_edge("e".into(), "X".into(), "f".into(), None);

    let opts = QueryOptions::default();
    let rows = match_rows(
        &g,
        "n1-[:X]->n2<-[:X]-n3-[:X]->n4<-[:X]-n5-[:X]->n6",
        &opts,
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["n1"], Scalar::Text("a".into()));
    assert_eq!(rows[0]["n2"], Scalar::Text("b".into()));
    assert_eq!(rows[0]["n3"], Scalar::Text("c".into()));
    assert_eq!(rows[0]["n4"], Scalar::Text("d".into()));
    assert_eq!(rows[0]["n5"], Scalar::Text("e".into()));
    assert_eq!(rows[0]["n6"], Scalar::Text("f".into()));
}

#[test]
fn scenario_6_minimal_json_round_trip_then_query() {
    let text = r#"{"version":"1.0","nodes":[{"id":"a","type":"U","label":"A"},{"id":"b","type":"U","label":"B"}],"edges":[{"src":"a","type":"R","dst":"b"}]}"#;
    let g = Graph::from_json(text).unwrap();

    let opts = QueryOptions {
        start_id: Some("a".to_string()),
        ..Default::default()
    };
    let rows = match_rows(&g, "x-[:R]->y", &opts).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["x"], Scalar::Text("a".into()));
    assert_eq!(rows[0]["y"], Scalar::Text("b".into()));
}

#[test]
fn anonymous_edge_variable_still_reports_its_type_when_returned() {
    let mut g = Graph::new();
    g.add_node(node("a", "N"));
    g.add_node(node("b", "N"));
    g.add_edge("a".into(), "LIKES".into(), "b".into(), None);

    let opts = QueryOptions::default();
    let rows = match_rows(&g, "a-[r:LIKES]->b RETURN r", &opts).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["r"], Scalar::Text("LIKES".into()));
}

#[test]
fn edge_property_constraint_filters_candidates() {
    let mut g = Graph::new();
    g.add_node(node("a", "N"));
    g.add_node(node("b", "N"));
    g.add_node(node("c", "N"));
    let mut heavy = BTreeMap::new();
    heavy.insert("weight".to_string(), Scalar::Int(10));
    g.add_edge("a".into(), "X".into(), "b".into(), Some(heavy));
    g.add_edge("a".into(), "X".into(), "c".into(), None);

    let opts = QueryOptions::default();
    let rows = match_rows(&g, "a-[:X{weight>5}]->b", &opts).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["b"], Scalar::Text("b".into()));
}
