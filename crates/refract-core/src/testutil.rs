//! Shared helpers for unit tests

use crate::graph::SymbolGraph;

/// Build a graph from an inline JSON tree, panicking on malformed input.
pub(crate) fn graph_from_json(value: serde_json::Value) -> SymbolGraph {
    SymbolGraph::from_json(value).expect("test graph should parse")
}
