//! Permalink (anchor/title) generation
//!
//! Every linkable symbol gets a fully qualified anchor built from its
//! ancestor chain, with a selector disambiguating same-named siblings.
//! The selector grammar follows the TSDoc declaration-reference spec.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::graph::{DeclKind, NodeId, SymbolGraph};

/// Matches the escape set of JavaScript's `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode an anchor for use in a URL fragment
pub fn encode_anchor(anchor: &str) -> String {
    utf8_percent_encode(anchor, COMPONENT).to_string()
}

/// A symbol's document location and display text
///
/// An empty `anchor` means "not locally linkable"; a `document` means
/// the symbol lives in an external reference document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permalink {
    pub anchor: String,
    pub title: String,
    pub document: Option<String>,
}

/// Render a permalink as an inline `<a>` element
///
/// Falls back to the bare title when the symbol is not linkable.
pub fn render_permalink(permalink: Option<&Permalink>, title: Option<&str>) -> String {
    let Some(permalink) = permalink else {
        return title.unwrap_or_default().to_string();
    };
    let title = title.unwrap_or(&permalink.title);
    match (&permalink.document, permalink.anchor.is_empty()) {
        (Some(document), false) => {
            format!("<a href=\"{document}#{}\">{title}</a>", encode_anchor(&permalink.anchor))
        }
        (Some(document), true) => format!("<a href=\"{document}\">{title}</a>"),
        (None, false) => {
            format!("<a href=\"#{}\">{title}</a>", encode_anchor(&permalink.anchor))
        }
        (None, true) => title.to_string(),
    }
}

/// Render the hover anchor shown in a card header
pub fn render_permalink_anchor(permalink: &Permalink) -> String {
    format!(
        "<a class=\"permalink\" href=\"#{}\" title=\"Permalink\">\
         <span class=\"sr-only\"> Permalink </span>\
         <svg><use xlink:href=\"#link\"></use></svg></a>",
        encode_anchor(&permalink.anchor)
    )
}

impl SymbolGraph {
    /// Compute the permalink for a node
    ///
    /// Returns `None` for the file-level root. Orphan nodes (inline
    /// declarations never reachable from the root) get an empty anchor,
    /// as do ignorable nodes, which must never be link targets.
    pub fn permalink_of(&self, id: NodeId) -> Option<Permalink> {
        let id = self.deref(id);
        let node = self.node(id);
        if node.kind == DeclKind::Root {
            return None;
        }

        // Symbols pulled in from the DOM library document externally.
        if let Some(source) = node.sources.first() {
            if source.file_name.ends_with("/lib.dom.d.ts") {
                return Some(Permalink {
                    anchor: String::new(),
                    title: node.name.clone(),
                    document: Some(format!(
                        "https://developer.mozilla.org/en-US/docs/Web/API/{}",
                        node.name
                    )),
                });
            }
        }

        let Some(parent) = self.parent(id) else {
            return Some(Permalink {
                anchor: String::new(),
                title: node.name.clone(),
                document: None,
            });
        };

        let mut result = if node.kind == DeclKind::Constructor {
            // The constructor selector applies to the class itself, so
            // qualification is relative to the class's own parent.
            let class = self.node(parent);
            let prefix = self
                .parent(parent)
                .and_then(|grandparent| self.permalink_of(grandparent))
                .map(|p| if p.anchor.is_empty() { String::new() } else { p.anchor + "." })
                .unwrap_or_default();
            Permalink {
                anchor: format!("{prefix}{}:constructor", class.name),
                title: format!("new {}()", class.name),
                document: None,
            }
        } else {
            let qualified = self.qualified_symbol(parent, id);
            let name = self.display_name(id);
            match self.permalink_of(parent) {
                Some(parent_link) => Permalink {
                    anchor: if parent_link.anchor.is_empty() {
                        qualified
                    } else {
                        format!("{}.{qualified}", parent_link.anchor)
                    },
                    title: format!("{}.{name}", parent_link.title),
                    document: None,
                },
                None => Permalink {
                    anchor: qualified,
                    title: name,
                    document: None,
                },
            }
        };
        if self.is_ignorable(id) {
            result.anchor = String::new();
        }
        Some(result)
    }

    /// Fully qualified short identifier for a node, relative to its parent
    ///
    /// Generated anchors always carry the selector; interpreted links
    /// may omit it when unambiguous.
    pub(crate) fn qualified_symbol(&self, parent: NodeId, id: NodeId) -> String {
        let id = self.deref(id);
        let node = self.node(id);
        match node.kind {
            DeclKind::Root => return String::new(),
            DeclKind::Module => {
                // A lone module in a file contributes no segment.
                if self.node(parent).children.len() == 1 {
                    return String::new();
                }
                return format!("(\"{}\":module)", self.module_name(id));
            }
            DeclKind::Namespace => {
                // Exported modules surface as namespaces with a quoted name.
                if node.name.starts_with('"') && node.name.ends_with('"') {
                    return format!("(\"{}\":module)", node.name.trim_matches('"'));
                }
                return format!("({}:namespace)", node.name);
            }
            _ => {}
        }

        let parent_kind = self.node(parent).kind;
        let mut selector = node.kind.selector().to_string();
        if parent_kind == DeclKind::Class {
            if matches!(node.kind, DeclKind::Property | DeclKind::Method) {
                selector = if node.flags.is_static { "static" } else { "instance" }.to_string();
            }
        } else if parent_kind == DeclKind::Interface {
            selector = String::new();
        }
        if let Some(label) = self.tag_text(id, "label") {
            selector = label.trim().to_string();
        }

        if selector.is_empty() {
            node.name.clone()
        } else {
            format!("({}:{selector})", node.name)
        }
    }
}
