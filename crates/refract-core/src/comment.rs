//! Documentation comment processing
//!
//! Parses free-form comment text: embedded link markup, notice
//! callouts, structured tags and modifier badges. Inherited comments
//! are spliced in place, bounded by a fixed depth so mutually
//! inheriting symbols cannot recurse forever.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::graph::{DeclKind, NodeId, SymbolGraph, TypeExpr};
use crate::render::markup::{div, escape_html, span, strong};
use crate::render::{Renderer, Style};
use crate::resolver::resolve_link;

/// Maximum depth of nested `{@inheritDoc}` splices
const MAX_INHERIT_DEPTH: usize = 8;

impl SymbolGraph {
    /// Text of the first matching structured tag, if present
    pub fn tag_text(&self, id: NodeId, tag: &str) -> Option<String> {
        let node = self.node(self.deref(id));
        node.comment
            .as_ref()?
            .tags
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| entry.text.clone())
    }

    /// Whether a tag is present (its content may be empty)
    pub fn has_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag_text(id, tag).is_some()
    }

    /// Whether a node is excluded from the rendered document
    ///
    /// Hidden/ignore/internal markers and the `#` private sigil make a
    /// node ignorable, as does a marker on a directly associated child:
    /// a property's inline type declaration, or a type literal's sole
    /// signature.
    pub fn is_ignorable(&self, id: NodeId) -> bool {
        let id = self.deref(id);
        let node = self.node(id);
        if node.kind == DeclKind::Property {
            if let Some(TypeExpr::Reflection { declaration }) = &node.ty {
                if self.is_ignorable(*declaration) {
                    return true;
                }
            }
        }
        if node.kind == DeclKind::TypeLiteral {
            if let Some(&signature) = node.signatures.first() {
                if self.is_ignorable(signature) {
                    return true;
                }
            }
        }
        self.has_tag(id, "hidden")
            || self.has_tag(id, "ignore")
            || self.has_tag(id, "internal")
            || node.name.starts_with('#')
    }
}

fn wrap_href(url: &str, content: &str) -> String {
    if url.is_empty() {
        content.to_string()
    } else {
        format!("<a href=\"{url}\">{content}</a>")
    }
}

/// Severity bucket for a notice or tag callout
fn notice_severity(label: &str) -> &'static str {
    match label.to_lowercase().as_str() {
        "danger" | "deprecated" | "internal" => "danger",
        "warning" | "caution" | "alpha" | "beta" | "experimental" => "warning",
        _ => "info",
    }
}

/// Boolean-flag tags that render as badges, not callouts
const FLAG_TAGS: &[(&str, &str)] = &[
    ("eventproperty", ""),
    ("override", ""),
    ("readonly", ""),
    ("sealed", ""),
    ("virtual", ""),
    ("deprecated", "red modifier-tag"),
    ("beta", "orange modifier-tag"),
    ("alpha", "orange modifier-tag"),
    ("experimental", "orange modifier-tag"),
];

fn flag_display_name(tag: &str) -> &str {
    match tag {
        "eventproperty" => "event",
        "readonly" => "read only",
        other => other,
    }
}

impl Renderer<'_> {
    /// Render modifier flags and badge tags as a flags strip
    pub(crate) fn render_flags(&self, id: NodeId, style: Style) -> String {
        let node = self.graph.node(id);
        let mut result = String::new();
        let flags = &node.flags;
        for (set, name) in [
            (flags.is_abstract, "abstract"),
            (flags.is_private, "private"),
            (flags.is_protected, "protected"),
            (flags.is_public, "public"),
            (flags.is_external, "external"),
            (flags.is_static, "static"),
        ] {
            if set {
                result.push_str(&span(name, "modifier-tag"));
            }
        }
        for (tag, class) in FLAG_TAGS {
            if self.graph.has_tag(id, tag) {
                let class = if class.is_empty() { "modifier-tag" } else { class };
                result.push_str(&span(flag_display_name(tag), class));
            }
        }
        if result.is_empty() {
            String::new()
        } else if style == Style::Block {
            div(&result, Some("flags"))
        } else {
            span(&result, "flags")
        }
    }

    /// Searchable keywords for a card's `data-keywords` attribute
    pub(crate) fn keywords(&self, id: NodeId) -> Vec<String> {
        let node = self.graph.node(id);
        if node.comment.is_none() {
            if let Some(&signature) = node.signatures.first() {
                return self.keywords(signature);
            }
        }
        let mut words: Vec<String> = self
            .graph
            .tag_text(id, "keywords")
            .unwrap_or_default()
            .split(',')
            .map(str::to_string)
            .collect();
        words.push(node.kind.selector().to_string());
        words.push(self.graph.display_name(id));
        if let Some(category) = self.graph.tag_text(id, "category") {
            words.extend(category.split(' ').map(|word| word.to_lowercase()));
        }
        let mut result = Vec::new();
        for word in words {
            let word = word.trim().to_lowercase();
            if word.is_empty() {
                continue;
            }
            for expanded in self.options.synonyms_of(&word) {
                if !result.contains(&expanded) {
                    result.push(expanded);
                }
            }
        }
        result
    }

    /// Expand embedded link markup to `<a>` elements
    pub(crate) fn render_link_tags(&self, id: NodeId, text: &str) -> String {
        self.render_link_tags_at(id, text, 0)
    }

    fn resolve(&self, id: NodeId, link: &str) -> String {
        resolve_link(self.graph, self.options, id, link)
    }

    fn render_link_tags_at(&self, id: NodeId, text: &str, depth: usize) -> String {
        struct Patterns {
            tutorial_titled: Regex,
            tutorial: Regex,
            linkcode_titled: Regex,
            linkcode: Regex,
            bracket_code_titled: Regex,
            bracket_code: Regex,
            link_titled: Regex,
            link: Regex,
            bracket_titled: Regex,
            bracket: Regex,
            inherit: Regex,
        }
        static PATTERNS: OnceLock<Patterns> = OnceLock::new();
        let p = PATTERNS.get_or_init(|| Patterns {
            tutorial_titled: Regex::new(r"\{@tutorial\s+(\S+?)[ |]+(.+?)\}").unwrap(),
            tutorial: Regex::new(r"\{@tutorial\s+(\S+?)\}").unwrap(),
            linkcode_titled: Regex::new(r"\{@linkcode\s+(\S+?)\s*\|\s*(.+?)\}").unwrap(),
            linkcode: Regex::new(r"\{@linkcode\s+(\S+?)\}").unwrap(),
            bracket_code_titled: Regex::new(r"\[\[`(\S+?)`\s*\|\s*(.+?)\]\]").unwrap(),
            bracket_code: Regex::new(r"\[\[`(\S+?)`\]\]").unwrap(),
            link_titled: Regex::new(r"\{@(?:link|linkplain)\s+(\S+?)\s*\|\s*(.+?)\}").unwrap(),
            link: Regex::new(r"\{@(?:link|linkplain)\s+(\S+?)\}").unwrap(),
            bracket_titled: Regex::new(r"\[\[(\S+?)\s*\|\s*(.+?)\]\]").unwrap(),
            bracket: Regex::new(r"\[\[(\S+?)\]\]").unwrap(),
            inherit: Regex::new(r"(?i)\{@inheritDoc\s+(\S+?)\}").unwrap(),
        });

        let text = p.tutorial_titled.replace_all(text, |c: &Captures<'_>| {
            wrap_href(&self.options.tutorial_url(&c[1]), &c[2])
        });
        let text = p.tutorial.replace_all(&text, |c: &Captures<'_>| {
            wrap_href(&self.options.tutorial_url(&c[1]), &c[1])
        });
        let text = p.linkcode_titled.replace_all(&text, |c: &Captures<'_>| {
            wrap_href(&self.resolve(id, &c[1]), &format!("<code>{}</code>", &c[2]))
        });
        let text = p.linkcode.replace_all(&text, |c: &Captures<'_>| {
            wrap_href(&self.resolve(id, &c[1]), &format!("<code>{}</code>", &c[1]))
        });
        let text = p.bracket_code_titled.replace_all(&text, |c: &Captures<'_>| {
            wrap_href(&self.resolve(id, &c[1]), &format!("<code>{}</code>", &c[2]))
        });
        let text = p.bracket_code.replace_all(&text, |c: &Captures<'_>| {
            wrap_href(&self.resolve(id, &c[1]), &format!("<code>{}</code>", &c[1]))
        });
        let text = p.link_titled.replace_all(&text, |c: &Captures<'_>| {
            wrap_href(&self.resolve(id, &c[1]), &c[2])
        });
        let text = p.link.replace_all(&text, |c: &Captures<'_>| {
            wrap_href(&self.resolve(id, &c[1]), &c[1])
        });
        let text = p.bracket_titled.replace_all(&text, |c: &Captures<'_>| {
            wrap_href(&self.resolve(id, &c[1]), &c[2])
        });
        let text = p.bracket.replace_all(&text, |c: &Captures<'_>| {
            wrap_href(&self.resolve(id, &c[1]), &c[1])
        });
        let text = p.inherit.replace_all(&text, |c: &Captures<'_>| {
            let Some(source) = self.graph.find_by_link(&c[1], Some(id)) else {
                log::warn!(
                    "unresolved @inheritDoc target \"{}\" in \"{}\"",
                    &c[1],
                    self.graph.node(id).name
                );
                return c[0].to_string();
            };
            if depth >= MAX_INHERIT_DEPTH {
                log::warn!(
                    "@inheritDoc nesting exceeds {MAX_INHERIT_DEPTH} levels at \"{}\", \
                     stopping the splice",
                    self.graph.node(id).name
                );
                return String::new();
            }
            self.render_comment_at(source, Style::BlockInherit, depth + 1)
        });
        text.into_owned()
    }

    /// Parse notice callouts out of comment prose
    ///
    /// Everything outside a callout is converted to HTML as-is; callout
    /// bodies get a severity class derived from their label.
    pub(crate) fn render_notices(&self, id: NodeId, text: &str) -> String {
        self.render_notices_at(id, text, 0)
    }

    fn render_notices_at(&self, id: NodeId, text: &str, depth: usize) -> String {
        static SHORT: OnceLock<Regex> = OnceLock::new();
        static LONG: OnceLock<Regex> = OnceLock::new();
        static FENCE: OnceLock<Regex> = OnceLock::new();
        let short = SHORT
            .get_or_init(|| Regex::new(r"^\s*\*\*\(([^)]+)\):?\s*\*\*\s*:?\s*(.+)$").unwrap());
        let long =
            LONG.get_or_init(|| Regex::new(r"^\s*\*\*\(([^)]+)\):?\s*\*\*\s*:?\s*$").unwrap());
        let fence = FENCE.get_or_init(|| Regex::new(r"^ {0,3}(\*\*\*|---)").unwrap());

        enum State {
            Outside,
            Short,
            Long,
        }
        let mut blocks: Vec<(String, String)> = Vec::new();
        let mut state = State::Outside;
        let mut label = String::new();
        let mut current: Vec<String> = Vec::new();
        fn close(label: &mut String, current: &mut Vec<String>, blocks: &mut Vec<(String, String)>) {
            if !current.is_empty() {
                blocks.push((std::mem::take(label), current.join("\n")));
                current.clear();
            }
            label.clear();
        }
        for line in text.lines() {
            match state {
                State::Short => {
                    if line.trim().is_empty() {
                        close(&mut label, &mut current, &mut blocks);
                        state = State::Outside;
                    } else {
                        current.push(line.to_string());
                    }
                }
                State::Long => {
                    if fence.is_match(line) {
                        close(&mut label, &mut current, &mut blocks);
                        state = State::Outside;
                    } else {
                        current.push(line.to_string());
                    }
                }
                State::Outside => {
                    if let Some(captures) = short.captures(line) {
                        close(&mut label, &mut current, &mut blocks);
                        label = captures[1].to_string();
                        current.push(captures[2].to_string());
                        state = State::Short;
                    } else if let Some(captures) = long.captures(line) {
                        close(&mut label, &mut current, &mut blocks);
                        label = captures[1].to_string();
                        state = State::Long;
                    } else {
                        current.push(line.to_string());
                    }
                }
            }
        }
        close(&mut label, &mut current, &mut blocks);

        blocks
            .iter()
            .map(|(label, content)| {
                let html = self
                    .markdown
                    .render(&self.render_link_tags_at(id, content, depth));
                if label.is_empty() {
                    html
                } else {
                    div(
                        &format!("<h4>{}</h4>\n{html}", escape_html(label)),
                        Some(&format!("notice--{}", notice_severity(label))),
                    )
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render one structured tag
    ///
    /// Metadata tags produce no output; everything else becomes a
    /// labeled callout, a bare label, or nothing for known flag tags.
    pub(crate) fn render_tag(&self, id: NodeId, tag: &str, text: &str) -> String {
        if tag.is_empty() {
            return String::new();
        }
        let text = text.trim().trim_end_matches('\n');
        match tag {
            // Metadata tags handled elsewhere or deliberately dropped.
            "typedef" | "type" | "property" | "param" | "returns" | "privateremarks"
            | "packageDocumentation" | "category" | "global" | "keywords" | "command"
            | "label" | "remarks" => String::new(),
            // Known boolean flags render in the flags strip; a body-less
            // unknown tag keeps its label as a bare bold marker.
            _ if text.is_empty() => {
                if matches!(tag, "method" | "module" | "function" | "example")
                    || FLAG_TAGS.iter().any(|(name, _)| name == &tag)
                {
                    String::new()
                } else {
                    strong(tag)
                }
            }
            "method" | "module" | "function" => {
                let label = format!("{}{}", tag[..1].to_uppercase(), &tag[1..]);
                format!(
                    "{}{}",
                    strong(&format!("{label}: ")),
                    self.markdown.render(&self.render_link_tags(id, text))
                )
            }
            "example" => self.markdown.render_code(text),
            _ => {
                let severity = notice_severity(tag);
                crate::render::markup::section_html(
                    &format!(
                        "<h4>{}</h4>\n\n{}",
                        escape_html(flag_display_name(tag)),
                        self.markdown.render(&self.render_link_tags(id, text))
                    ),
                    &crate::render::markup::SectionOptions {
                        class: Some(&format!("notice--{severity}")),
                        ..Default::default()
                    },
                )
            }
        }
    }

    /// Render a node's documentation comment
    pub fn render_comment(&self, id: NodeId, style: Style) -> String {
        self.render_comment_at(id, style, 0)
    }

    fn render_comment_at(&self, id: NodeId, style: Style, depth: usize) -> String {
        let id = self.graph.deref(id);
        let node = self.graph.node(id);
        if node.comment.is_none() && node.kind == DeclKind::TypeLiteral {
            if let Some(&signature) = node.signatures.first() {
                return self.render_comment_at(signature, style, depth);
            }
        }

        let mut parts: Vec<String> = Vec::new();
        let flags = self.render_flags(id, style);
        if !flags.is_empty() {
            parts.push(flags);
        }
        if let Some(comment) = &node.comment {
            if let Some(short_text) = &comment.short_text {
                parts.push(self.render_notices_at(id, short_text, depth));
            }
            if let Some(text) = &comment.text {
                parts.push(self.render_notices_at(id, text, depth));
            }
            if let Some(remarks) = self.graph.tag_text(id, "remarks") {
                parts.push(self.render_notices_at(id, &remarks, depth));
            }
            if style != Style::BlockInherit && !comment.tags.is_empty() {
                let rendered: Vec<String> = comment
                    .tags
                    .iter()
                    .map(|entry| self.render_tag(id, &entry.tag, &entry.text))
                    .filter(|html| !html.is_empty())
                    .collect();
                if !rendered.is_empty() {
                    parts.push(String::new());
                    parts.push(rendered.join("\n\n"));
                }
            }
        }

        let mut result = parts.join("\n");
        if node.comment.is_none() {
            // Inline property comments surface on the type node, method
            // comments on the first signature.
            if node.kind == DeclKind::Property {
                if let Some(TypeExpr::Reflection { declaration }) = &node.ty {
                    result.push_str(&self.render_comment_at(*declaration, style, depth));
                }
            }
            if node.kind == DeclKind::Method {
                if let Some(&signature) = node.signatures.first() {
                    let from_signature = self.render_comment_at(signature, style, depth);
                    if from_signature != result {
                        result.push_str(&from_signature);
                    }
                }
            }
        }
        result
    }
}
