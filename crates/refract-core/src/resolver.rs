//! Link-grammar resolution
//!
//! Resolves declaration references such as `Foo`, `(Foo:class).(bar:instance)`
//! or `module#Symbol` to graph nodes, falling back to external
//! documentation URLs for well-known global types.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::RenderOptions;
use crate::graph::{KindFilter, NodeId, SymbolGraph};
use crate::permalink::encode_anchor;

/// JavaScript global objects documented on MDN
const MDN_GLOBALS: &[&str] = &[
    "Object", "Function", "Boolean", "Symbol", "String", "RegExp", "Number", "BigInt", "Math",
    "Date", "Infinity", "NaN", "globalThis", "Error", "AggregateError", "InternalError",
    "RangeError", "ReferenceError", "SyntaxError", "TypeError", "URIError", "Array", "Int8Array",
    "Uint8Array", "Uint8ClampedArray", "Int16Array", "Uint16Array", "Int32Array", "Uint32Array",
    "Float32Array", "Float64Array", "BigInt64Array", "BigUint64Array", "Map", "Set", "WeakMap",
    "WeakSet", "ArrayBuffer", "SharedArrayBuffer", "Atomics", "DataView", "JSON", "Promise",
    "Generator", "GeneratorFunction", "AsyncFunction", "Iterator", "AsyncIterator", "Reflect",
    "Proxy", "Intl", "WebAssembly",
];

/// TypeScript utility types documented in the handbook
const TS_UTILITY_TYPES: &[&str] = &[
    "Partial", "Readonly", "Record", "Pick", "Omit", "Exclude", "Extract", "NonNullable",
    "Parameters", "ConstructorParameters", "ReturnType", "InstanceType", "Required",
    "ThisParameterType", "OmitThisParameter", "ThisType",
];

/// Split a link segment into its name and optional selector
///
/// `(Foo:class)` yields `("Foo", Some("class"))`; a bare name has no
/// selector.
pub fn parse_segment(segment: &str) -> (&str, Option<&str>) {
    static SEGMENT: OnceLock<Regex> = OnceLock::new();
    let re = SEGMENT.get_or_init(|| Regex::new(r"^\(([^:]+)(?::([^)]+))?\)$").unwrap());
    match re.captures(segment) {
        Some(captures) => {
            let name = captures.get(1).map_or(segment, |m| m.as_str());
            (name, captures.get(2).map(|m| m.as_str()))
        }
        None => (segment, None),
    }
}

/// Documentation URL for a symbol that lives outside the graph
///
/// The user override table wins over the built-in tables.
pub fn external_link(options: &RenderOptions, name: &str) -> Option<String> {
    if let Some(url) = options.external_references.get(name) {
        return Some(url.clone());
    }
    if MDN_GLOBALS.contains(&name) {
        return Some(format!(
            "https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Global_Objects/{name}"
        ));
    }
    if TS_UTILITY_TYPES.contains(&name) {
        return Some(format!(
            "https://www.typescriptlang.org/docs/handbook/utility-types.html#{name}"
        ));
    }
    None
}

impl SymbolGraph {
    /// Resolve a dot-separated declaration reference to a node
    ///
    /// A single unscoped segment is looked up in the scope's children,
    /// then its siblings, then the whole graph. Each leading segment of
    /// a longer path scopes the next; the final segment uses full
    /// single-segment semantics anchored at the resolved scope.
    pub fn find_by_link(&self, link: &str, scope: Option<NodeId>) -> Option<NodeId> {
        let mut segments: Vec<&str> = link.split('.').collect();
        if segments.len() == 1 {
            let (name, selector) = parse_segment(segments[0]);
            let filter = selector.and_then(KindFilter::from_selector);
            return self
                .find_by_name(name, scope, filter.as_ref())
                .or_else(|| {
                    let parent = scope.and_then(|s| self.parent(s))?;
                    self.find_by_name(name, Some(parent), filter.as_ref())
                })
                .or_else(|| self.find_by_name(name, None, filter.as_ref()));
        }

        let last = segments.pop()?;
        let mut node = None;
        for segment in segments {
            let (name, selector) = parse_segment(segment);
            let filter = selector.and_then(KindFilter::from_selector);
            node = Some(self.find_by_name(name, node, filter.as_ref())?);
        }
        self.find_by_link(last, node)
    }
}

/// Resolve a link to an `href` value
///
/// Absolute URLs pass through verbatim. A `doc#Symbol` link keeps the
/// part before `#` as an external document prefix. Unresolvable links
/// fall back to the external tables, then to a synthesized dead anchor.
pub fn resolve_link(
    graph: &SymbolGraph,
    options: &RenderOptions,
    context: NodeId,
    link: &str,
) -> String {
    static URL: OnceLock<Regex> = OnceLock::new();
    let url_re = URL.get_or_init(|| Regex::new(r"^https?://").unwrap());
    if url_re.is_match(link) {
        return link.to_string();
    }

    let (prefix, symbol) = match link.split_once('#') {
        Some((prefix, rest)) if !prefix.is_empty() => (prefix, rest),
        _ => ("", link),
    };

    if let Some(target) = graph.find_by_link(symbol, Some(context)) {
        if let Some(permalink) = graph.permalink_of(target) {
            return format!("{prefix}#{}", encode_anchor(&permalink.anchor));
        }
    }
    if prefix.is_empty() {
        if let Some(url) = external_link(options, symbol) {
            return url;
        }
    }
    log::warn!(
        "unresolved link \"{link}\" in \"{}\"",
        graph.node(context).name
    );
    format!("{prefix}#{symbol}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::graph_from_json;
    use serde_json::json;

    fn sample_graph() -> SymbolGraph {
        graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{
                "id": 1, "name": "\"api\"", "kind": 1,
                "children": [
                    {
                        "id": 2, "name": "Widget", "kind": 128,
                        "children": [
                            { "id": 3, "name": "zoom", "kind": 2048 },
                            { "id": 4, "name": "zoom", "kind": 1024, "flags": { "isStatic": true } },
                        ],
                    },
                    { "id": 5, "name": "connect", "kind": 64 },
                ],
            }],
        }))
    }

    #[test]
    fn segment_grammar() {
        assert_eq!(parse_segment("Foo"), ("Foo", None));
        assert_eq!(parse_segment("(Foo:class)"), ("Foo", Some("class")));
        assert_eq!(parse_segment("(Foo)"), ("Foo", None));
    }

    #[test]
    fn single_segment_resolves_through_scopes() {
        let graph = sample_graph();
        let widget = graph.find_by_id(2).unwrap();
        // "connect" is neither a child nor a sibling member of Widget,
        // but resolves globally.
        let target = graph.find_by_link("connect", Some(widget)).unwrap();
        assert_eq!(graph.node(target).name, "connect");
    }

    #[test]
    fn qualified_path_with_selectors() {
        let graph = sample_graph();
        let target = graph
            .find_by_link("(Widget:class).(zoom:static)", None)
            .unwrap();
        assert_eq!(graph.find_by_id(4), Some(target));
    }

    #[test]
    fn anchors_round_trip() {
        // Resolving a generated anchor from the root finds the node it
        // was generated for.
        let graph = sample_graph();
        for id in [2_u64, 3, 4, 5] {
            let node = graph.find_by_id(id).unwrap();
            let anchor = graph.permalink_of(node).unwrap().anchor;
            assert!(!anchor.is_empty());
            assert_eq!(graph.find_by_link(&anchor, None), Some(node), "anchor {anchor}");
        }
    }

    #[test]
    fn absolute_urls_pass_through() {
        let graph = sample_graph();
        let options = RenderOptions::default();
        let href = resolve_link(&graph, &options, graph.root(), "https://example.com/doc#x");
        assert_eq!(href, "https://example.com/doc#x");
    }

    #[test]
    fn external_tables_and_overrides() {
        let mut options = RenderOptions::default();
        assert_eq!(
            external_link(&options, "Promise").unwrap(),
            "https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Global_Objects/Promise"
        );
        assert!(external_link(&options, "Partial")
            .unwrap()
            .contains("utility-types"));
        options
            .external_references
            .insert("Promise".to_string(), "https://example.com/promise".to_string());
        assert_eq!(external_link(&options, "Promise").unwrap(), "https://example.com/promise");
    }

    #[test]
    fn unresolved_link_synthesizes_dead_anchor() {
        let graph = sample_graph();
        let options = RenderOptions::default();
        let href = resolve_link(&graph, &options, graph.root(), "DoesNotExist");
        assert_eq!(href, "#DoesNotExist");
    }
}
