//! Public query surface (spec §4.7, §6): parses a pattern, lowers it,
//! runs the match driver, and shapes the result as rows, paths, or
//! collapsed per-column sets.

use crate::error::Result;
use crate::executor::driver::{self, Row, Seed};
use crate::parser;
use crate::path::{self, PathMatch};
use crate::planner;
use graphcore_store::Graph;

/// Unlimited variable-length traversals fall back to this many hops
/// when a segment declares no upper bound (spec §4.6, §9).
pub const DEFAULT_MAX_HOPS: u32 = 10;

/// Per-call knobs shared by every entry point in this module.
/// `start_id`/`start_ids` are mutually exclusive (spec §4.7, §7).
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub start_id: Option<String>,
    pub start_ids: Option<Vec<String>>,
    pub start_type: Option<String>,
    /// `None` uses [`DEFAULT_MAX_HOPS`].
    pub max_hops: Option<u32>,
}

impl QueryOptions {
    fn seed(&self) -> Seed<'_> {
        Seed {
            start_id: self.start_id.as_deref(),
            start_ids: self.start_ids.as_deref(),
            start_type: self.start_type.as_deref(),
            max_hops: self.max_hops.unwrap_or(DEFAULT_MAX_HOPS),
        }
    }
}

fn compile_and_run(graph: &Graph, pattern: &str, opts: &QueryOptions) -> Result<driver::MatchResult> {
    let parsed = parser::parse(pattern)?;
    let plan = planner::lower(&parsed);
    driver::run(graph, &plan, &opts.seed())
}

/// `matchRows(pattern, …)` (spec §4.7): the ordered, deduplicated,
/// sorted, paginated row set.
pub fn match_rows(graph: &Graph, pattern: &str, opts: &QueryOptions) -> Result<Vec<Row>> {
    Ok(compile_and_run(graph, pattern, opts)?.rows)
}

/// `matchPaths(pattern, …)` (spec §4.7 step 8, §4.8): re-runs path
/// recording against every surviving binding from [`match_rows`].
pub fn match_paths(graph: &Graph, pattern: &str, opts: &QueryOptions) -> Result<Vec<PathMatch>> {
    let parsed = parser::parse(pattern)?;
    let plan = planner::lower(&parsed);
    let result = driver::run(graph, &plan, &opts.seed())?;
    Ok(result
        .bindings
        .iter()
        .map(|binding| path::record(graph, &plan, binding))
        .collect())
}

/// `match(pattern, …)` (spec §4.7 step 7): collapses row columns into
/// per-variable value sets. An empty result yields an empty mapping.
pub fn run_match(graph: &Graph, pattern: &str, opts: &QueryOptions) -> Result<ColumnSets> {
    let rows = match_rows(graph, pattern, opts)?;
    Ok(collapse(&rows))
}

/// `matchRowsMany` (spec §4.7): runs each pattern, concatenates, and
/// deduplicates by full row equality across the combined set.
pub fn match_rows_many(graph: &Graph, patterns: &[&str], opts: &QueryOptions) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    for pattern in patterns {
        rows.extend(match_rows(graph, pattern, opts)?);
    }
    dedupe(&mut rows);
    Ok(rows)
}

/// `matchPathsMany` (spec §4.7).
pub fn match_paths_many(graph: &Graph, patterns: &[&str], opts: &QueryOptions) -> Result<Vec<PathMatch>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        paths.extend(match_paths(graph, pattern, opts)?);
    }
    let mut seen: Vec<PathMatch> = Vec::new();
    paths.retain(|p| {
        if seen.contains(p) {
            false
        } else {
            seen.push(p.clone());
            true
        }
    });
    Ok(paths)
}

/// `matchMany` (spec §4.7): `run_match` over the concatenated,
/// deduplicated rows of every pattern.
pub fn run_match_many(graph: &Graph, patterns: &[&str], opts: &QueryOptions) -> Result<ColumnSets> {
    let rows = match_rows_many(graph, patterns, opts)?;
    Ok(collapse(&rows))
}

/// `var -> set<value>` (spec §4.7 step 7). A plain `Vec` acting as an
/// insertion-ordered set: `graphcore_api::Scalar` carries an `f64`
/// variant and so cannot implement `Hash`.
pub type ColumnSets = indexmap::IndexMap<String, Vec<graphcore_api::Scalar>>;

fn collapse(rows: &[Row]) -> ColumnSets {
    let mut sets: ColumnSets = indexmap::IndexMap::new();
    for row in rows {
        for (key, value) in row {
            let set = sets.entry(key.clone()).or_default();
            if !set.contains(value) {
                set.push(value.clone());
            }
        }
    }
    sets
}

fn dedupe(rows: &mut Vec<Row>) {
    let mut seen: Vec<Row> = Vec::new();
    rows.retain(|row| {
        if seen.contains(row) {
            false
        } else {
            seen.push(row.clone());
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphcore_api::{Node, Scalar};

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
    fn match_rows_returns_default_node_row() {
        let g = member_graph();
        let opts = QueryOptions::default();
        let rows = match_rows(&g, "user-[:MEMBER_OF]->group", &opts).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["user"], Scalar::Text("alice".into()));
    }

    #[test]
    fn run_match_collapses_into_column_sets() {
        let g = member_graph();
        let opts = QueryOptions::default();
        let sets = run_match(&g, "user-[:MEMBER_OF]->group", &opts).unwrap();
        assert_eq!(sets["user"], vec![Scalar::Text("alice".into())]);
        assert_eq!(sets["group"], vec![Scalar::Text("admins".into())]);
    }

    #[test]
    fn run_match_on_empty_result_yields_empty_mapping() {
        let g = member_graph();
        let opts = QueryOptions::default();
        let sets = run_match(&g, "user:Nonexistent-[:MEMBER_OF]->group", &opts).unwrap();
        assert!(sets.is_empty());
    }

    #[test]
    fn match_paths_records_edge_trace() {
        let g = member_graph();
        let opts = QueryOptions::default();
        let paths = match_paths(&g, "user-[r:MEMBER_OF]->group", &opts).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].edges.len(), 1);
        assert_eq!(paths[0].edges[0].edge_type, "MEMBER_OF");
    }

    #[test]
    fn match_rows_many_dedupes_across_patterns() {
        let g = member_graph();
        let opts = QueryOptions::default();
        let rows = match_rows_many(
            &g,
            &["user-[:MEMBER_OF]->group", "user-[:MEMBER_OF]->group"],
            &opts,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn both_start_id_and_start_ids_is_rejected() {
        let g = member_graph();
        let opts = QueryOptions {
            start_id: Some("alice".into()),
            start_ids: Some(vec!["admins".into()]),
            ..Default::default()
        };
        assert!(match_rows(&g, "user-[:MEMBER_OF]->group", &opts).is_err());
    }
}
