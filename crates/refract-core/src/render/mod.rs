//! Polymorphic markup rendering
//!
//! `Renderer` turns any graph node into an HTML fragment at a requested
//! detail level. Dispatch is two-stage: declaration nodes switch on
//! their kind, type expressions on their tag.

pub mod markup;

mod cards;
mod sections;
mod types;

use crate::config::RenderOptions;
use crate::graph::{DeclKind, NodeId, SymbolGraph, TypeExpr};
use crate::markdown::MarkdownRenderer;
use crate::permalink::render_permalink;
use markup::{div, keyword, punct, section_html, span, strong, var_tag, SectionOptions};

/// Requested detail level for a rendered fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Compact single-line rendering
    Inline,
    /// Multi-line structured breakdown
    Block,
    /// Self-contained anchored unit for one symbol
    Card,
    /// Symbol plus recursive index and nested cards
    Section,
    /// Like `Block`, but without tag callouts; used for inherited
    /// comment splices
    BlockInherit,
}

/// Rendering context for one run
///
/// Holds the graph, the run options and the Markdown collaborator;
/// everything rendering needs is reachable from here, so independent
/// runs never share state.
pub struct Renderer<'a> {
    pub(crate) graph: &'a SymbolGraph,
    pub(crate) options: &'a RenderOptions,
    pub(crate) markdown: &'a dyn MarkdownRenderer,
}

impl<'a> Renderer<'a> {
    pub fn new(
        graph: &'a SymbolGraph,
        options: &'a RenderOptions,
        markdown: &'a dyn MarkdownRenderer,
    ) -> Self {
        Self { graph, options, markdown }
    }

    /// Render a node that may have failed to resolve
    pub fn render_opt(&self, id: Option<NodeId>, style: Style) -> String {
        id.map_or_else(String::new, |id| self.render(id, style))
    }

    /// Render a declaration node at the requested detail level
    pub fn render(&self, id: NodeId, style: Style) -> String {
        let id = self.graph.deref(id);
        let node = self.graph.node(id);

        if style == Style::Section && !node.groups.is_empty() {
            return match node.kind {
                DeclKind::Class | DeclKind::Interface => self.render_class_section(id),
                DeclKind::Enum => self.render_enum_card(id),
                DeclKind::Module => {
                    let body = self.render_groups(id);
                    if body.is_empty() {
                        return String::new();
                    }
                    section_html(
                        &body,
                        &SectionOptions {
                            permalink: self.graph.permalink_of(id).as_ref(),
                            ..Default::default()
                        },
                    )
                }
                _ => self.render_groups(id),
            };
        }

        match node.kind {
            DeclKind::Root | DeclKind::Module | DeclKind::Namespace => {
                log::debug!("container {:?} rendered outside section style", node.kind);
                String::new()
            }
            DeclKind::Enum => {
                if matches!(style, Style::Card | Style::Section) {
                    self.render_enum_card(id)
                } else {
                    String::new()
                }
            }
            DeclKind::EnumMember => self.render_enum_member(id, style),
            DeclKind::Variable => {
                if matches!(style, Style::Card | Style::Section) {
                    self.render_card(
                        id,
                        None,
                        &format!(
                            "{}{}",
                            div(&self.render(id, Style::Block), None),
                            self.render_comment(id, Style::Block)
                        ),
                    )
                } else {
                    self.render_variable_inline(id)
                }
            }
            DeclKind::Function | DeclKind::Constructor | DeclKind::Method
                if matches!(style, Style::Card | Style::Section) =>
            {
                self.render_method_card(id)
            }
            DeclKind::Function => {
                let mut result = self.render_comment(id, Style::Block);
                let bodies: Vec<String> = node
                    .signatures
                    .iter()
                    .map(|&signature| {
                        let mut body =
                            div(&self.render(signature, Style::Inline), Some("code"));
                        body.push_str(&self.render_comment(signature, style));
                        body.push_str(&self.render(signature, Style::Block));
                        div(&body, None)
                    })
                    .collect();
                result.push_str(&bodies.join("\n<hr>\n"));
                result
            }
            DeclKind::Class | DeclKind::Interface => {
                if matches!(style, Style::Card | Style::Section) {
                    self.render_class_card(id)
                } else {
                    node.name.clone()
                }
            }
            DeclKind::Constructor => node
                .signatures
                .first()
                .map(|&signature| format!("constructor{}", self.render(signature, style)))
                .unwrap_or_default(),
            DeclKind::Property => {
                if matches!(style, Style::Card | Style::Section) {
                    self.render_property_card(id)
                } else if node.name.starts_with('#') {
                    String::new()
                } else {
                    let parent = self
                        .graph
                        .parent(id)
                        .map(|p| format!("{}.", self.graph.node(p).name))
                        .unwrap_or_default();
                    format!(
                        "{parent}{}{}{}",
                        node.name,
                        punct(": "),
                        self.render_type_opt(node.ty.as_ref(), style)
                    )
                }
            }
            DeclKind::Method => {
                let mut result = node.name.clone();
                if node.flags.is_optional {
                    result.push_str(&span("?", "modifier"));
                }
                result.push_str(&punct(": "));
                let signatures: Vec<String> = node
                    .signatures
                    .iter()
                    .map(|&signature| self.render(signature, Style::Inline))
                    .collect();
                result.push_str(&signatures.join("; "));
                result
            }
            DeclKind::CallSignature | DeclKind::ConstructorSignature => {
                self.render_signature_shape(id, style)
            }
            DeclKind::IndexSignature => {
                let params: Vec<String> = node
                    .parameters
                    .iter()
                    .map(|&parameter| self.render(parameter, Style::Inline))
                    .collect();
                format!(
                    "{}{}{}{}{}",
                    punct("["),
                    params.join(&punct(", ")),
                    punct("]"),
                    punct(": "),
                    self.render_type_opt(node.ty.as_ref(), Style::Inline)
                )
            }
            DeclKind::Parameter => {
                let mut result = String::new();
                if node.flags.is_rest {
                    result.push_str(&span("...", "modifier"));
                }
                result.push_str(&var_tag(&node.name));
                if node.flags.is_optional {
                    result.push_str(&span("?", "modifier"));
                }
                result.push_str(&punct(": "));
                result.push_str(&self.render_type_opt(node.ty.as_ref(), Style::Inline));
                result
            }
            DeclKind::TypeLiteral => self.render_type_literal(id, style),
            DeclKind::TypeParameter => {
                let mut result = node.name.clone();
                if let Some(ty) = &node.ty {
                    result.push_str(&keyword(" extends "));
                    result.push_str(&self.render_type(ty, Style::Inline));
                }
                result
            }
            DeclKind::GetSignature | DeclKind::SetSignature => {
                // Aggregated in their parent accessor node.
                log::debug!("stray {:?} for \"{}\"", node.kind, node.name);
                String::new()
            }
            DeclKind::Accessor => {
                if matches!(style, Style::Card | Style::Section) {
                    self.render_accessor_card(id)
                } else {
                    log::debug!("accessor \"{}\" rendered outside card style", node.name);
                    String::new()
                }
            }
            DeclKind::TypeAlias => {
                if matches!(style, Style::Card | Style::Section) {
                    self.render_type_alias_card(id)
                } else {
                    let definition = self.render_type_opt(node.ty.as_ref(), style);
                    let mut result = String::new();
                    if !node.type_parameters.is_empty() {
                        result.push_str(&punct("<"));
                        let params: Vec<String> = node
                            .type_parameters
                            .iter()
                            .map(|&parameter| self.render(parameter, Style::Inline))
                            .collect();
                        result.push_str(&params.join(&punct(", ")));
                        result.push_str(&punct(">"));
                        if !definition.is_empty() {
                            result.push_str(&punct(" = "));
                        }
                    }
                    result.push_str(&definition);
                    result
                }
            }
            DeclKind::Reference => String::new(),
            DeclKind::Unknown(mask) => {
                log::warn!("unrecognized node kind {mask} for \"{}\"", node.name);
                String::new()
            }
        }
    }

    fn render_enum_member(&self, id: NodeId, style: Style) -> String {
        let node = self.graph.node(id);
        let anchor = self
            .graph
            .permalink_of(id)
            .map(|p| crate::permalink::encode_anchor(&p.anchor))
            .unwrap_or_default();
        let mut result = format!("<dt id=\"{anchor}\">{}", strong(&node.name));
        if let Some(default_value) = &node.default_value {
            result.push_str(&punct(" = "));
            result.push_str(default_value);
        }
        result.push_str("</dt><dd>");
        result.push_str(&self.render_comment(id, style));
        result.push_str("</dd>");
        result
    }

    fn render_variable_inline(&self, id: NodeId) -> String {
        let node = self.graph.node(id);
        let mut result = strong(&node.name);
        if node.flags.is_optional {
            result.push_str(&span("?", "modifier"));
        }
        match &node.ty {
            Some(TypeExpr::Unknown { name }) => {
                // The engine stores initializer text as an unknown type.
                result.push_str(&punct(" = "));
                result.push_str(name);
            }
            Some(ty) => {
                result.push_str(&punct(": "));
                result.push_str(&self.render_type(ty, Style::Inline));
            }
            None => {}
        }
        result
    }

    /// `(a: T): U` for call and constructor signatures
    fn render_signature_shape(&self, id: NodeId, style: Style) -> String {
        let node = self.graph.node(id);
        match style {
            Style::Inline => {
                let params: Vec<String> = node
                    .parameters
                    .iter()
                    .map(|&parameter| self.render(parameter, Style::Inline))
                    .collect();
                format!(
                    "{}{}{}{}{}",
                    punct("("),
                    params.join(&punct(", ")),
                    punct(")"),
                    punct(": "),
                    self.render_type_opt(node.ty.as_ref(), Style::Inline)
                )
            }
            Style::Block | Style::BlockInherit => {
                if node.parameters.is_empty() && node.ty.is_none() {
                    return String::new();
                }
                let mut result = String::from("\n<dl>\n");
                if !node.parameters.is_empty() {
                    let rows: Vec<String> = node
                        .parameters
                        .iter()
                        .map(|&parameter| {
                            let param = self.graph.node(parameter);
                            let mut term = var_tag(&param.name);
                            if param.flags.is_rest {
                                term = format!("{}{term}", span("...", "modifier"));
                            }
                            if param.flags.is_optional {
                                term.push_str(&span("?", "modifier"));
                            }
                            let type_def =
                                self.render_type_opt(param.ty.as_ref(), Style::Block);
                            if !type_def.is_empty() {
                                term.push_str(&punct(": "));
                                term.push_str(&type_def);
                            }
                            format!(
                                "{term}\n</dt><dd>\n{}",
                                self.render_comment(parameter, style)
                            )
                        })
                        .collect();
                    result.push_str("\n<dt>\n");
                    result.push_str(&rows.join("\n</dd><dt>\n"));
                    result.push_str("\n</dd>\n");
                }
                let returns = node
                    .comment
                    .as_ref()
                    .and_then(|comment| comment.returns.clone());
                if let Some(ty) = &node.ty {
                    if returns.is_some() || !is_void(ty) {
                        result.push_str("\n<dt>\n");
                        result.push_str(&var_tag("\u{2192} "));
                        result.push_str(&self.render_type(ty, Style::Inline));
                        result.push_str("\n</dt><dd>\n");
                        if let Some(returns) = &returns {
                            result.push_str(&self.render_notices(id, returns));
                        }
                        result.push_str("\n</dd>\n");
                    }
                }
                result.push_str("\n</dl>\n");
                result
            }
            _ => {
                log::debug!("signature \"{}\" rendered at unsupported style", node.name);
                String::new()
            }
        }
    }

    fn render_type_literal(&self, id: NodeId, style: Style) -> String {
        let node = self.graph.node(id);
        if !node.signatures.is_empty() {
            let signatures: Vec<String> = node
                .signatures
                .iter()
                .map(|&signature| self.render(signature, Style::Inline))
                .collect();
            return signatures.join(&punct("; "));
        }
        if node.children.is_empty() && node.index_signature.is_none() {
            return String::new();
        }
        match style {
            Style::Block | Style::BlockInherit => {
                let mut result = String::from("<div><dl class=\"typelit\">");
                for &child in &node.children {
                    let mut term =
                        format!("{}{}", self.render(child, Style::Inline), punct(";"));
                    if self.graph.has_tag(child, "deprecated") {
                        term = span(&term, "deprecated");
                    }
                    result.push_str(&format!(
                        "<dt>{term}</dt><dd>{}</dd>",
                        self.render_comment(child, style)
                    ));
                }
                if let Some(index_signature) = node.index_signature {
                    result.push_str(&format!(
                        "<dt>{}</dt><dd></dd>",
                        self.render(index_signature, Style::Inline)
                    ));
                }
                result.push_str("</dl></div>");
                result
            }
            Style::Inline => {
                let mut result = punct("{");
                let members: Vec<String> = node
                    .children
                    .iter()
                    .map(|&child| self.render(child, Style::Inline))
                    .collect();
                result.push_str(&members.join(&punct("; ")));
                if let Some(index_signature) = node.index_signature {
                    result.push_str(&self.render(index_signature, Style::Inline));
                }
                result.push_str(&punct("}"));
                result
            }
            _ => {
                log::debug!("type literal rendered at unsupported style");
                String::new()
            }
        }
    }

    fn render_type_opt(&self, ty: Option<&TypeExpr>, style: Style) -> String {
        ty.map_or_else(String::new, |ty| self.render_type(ty, style))
    }

    /// `class Foo`, `abstract class Foo`, `interface Bar`, ...
    pub(crate) fn qualified_name(&self, id: NodeId) -> String {
        let node = self.graph.node(id);
        if node.kind == DeclKind::Root {
            return String::new();
        }
        if node.kind == DeclKind::Class && node.flags.is_abstract {
            return format!("{}{}", keyword("abstract class "), strong(&self.graph.display_name(id)));
        }
        let prefix = match node.kind {
            DeclKind::Interface => "interface ",
            DeclKind::Class => "class ",
            DeclKind::Enum => "enum ",
            DeclKind::Namespace => "namespace ",
            DeclKind::Module => "module ",
            _ => "",
        };
        format!("{}{}", keyword(prefix), strong(&self.graph.display_name(id)))
    }

    /// Complexity score steering the inline-first heuristic
    pub(crate) fn complexity(&self, id: NodeId) -> u32 {
        let node = self.graph.node(id);
        if !node.parameters.is_empty() {
            return node
                .parameters
                .iter()
                .map(|&parameter| self.complexity(parameter))
                .sum();
        }
        match node.kind {
            DeclKind::CallSignature | DeclKind::ConstructorSignature | DeclKind::GetSignature => {
                1 + node.ty.as_ref().map_or(0, |ty| self.complexity_type(ty))
            }
            DeclKind::Parameter | DeclKind::Property => {
                1 + node.ty.as_ref().map_or(0, |ty| self.complexity_type(ty))
            }
            DeclKind::TypeLiteral => {
                if !node.children.is_empty() {
                    1 + node
                        .children
                        .iter()
                        .map(|&child| self.complexity(child))
                        .sum::<u32>()
                } else if !node.signatures.is_empty() {
                    1 + node
                        .signatures
                        .iter()
                        .map(|&signature| self.complexity(signature))
                        .sum::<u32>()
                } else {
                    1
                }
            }
            _ => 1,
        }
    }

    pub(crate) fn complexity_type(&self, ty: &TypeExpr) -> u32 {
        match ty {
            TypeExpr::Intrinsic { .. } | TypeExpr::Literal { .. } => 1,
            TypeExpr::Reflection { declaration } => 1 + self.complexity(*declaration),
            TypeExpr::Rest { element } | TypeExpr::Array { element } => {
                1 + self.complexity_type(element)
            }
            TypeExpr::Query { target } | TypeExpr::Operator { target, .. } => {
                1 + self.complexity_type(target)
            }
            TypeExpr::Tuple { elements } => {
                1 + elements.iter().map(|e| self.complexity_type(e)).sum::<u32>()
            }
            TypeExpr::NamedTupleMember { element, .. } => 1 + self.complexity_type(element),
            TypeExpr::TypeParameterRef { constraint, .. } => match constraint {
                Some(constraint) => 2 + self.complexity_type(constraint),
                None => 1,
            },
            TypeExpr::Union { types } => {
                1 + types.iter().map(|t| self.complexity_type(t)).sum::<u32>()
            }
            TypeExpr::Reference { type_arguments, .. } => {
                1 + type_arguments
                    .iter()
                    .map(|t| self.complexity_type(t))
                    .sum::<u32>()
            }
            _ => 1,
        }
    }

    /// Render the whole document body
    ///
    /// With a module filter, only the named modules (plus a module
    /// index) render; otherwise the entire root renders as a section.
    pub fn render_project(&self) -> String {
        use crate::category::Category;

        if !self.options.modules.is_empty() {
            let modules: Vec<NodeId> = self
                .options
                .modules
                .iter()
                .filter_map(|name| {
                    self.graph
                        .find_by_name(name, None, Some(&crate::graph::KindFilter::Mask(1)))
                })
                .collect();
            if modules.len() != self.options.modules.len() {
                let found: Vec<String> = modules
                    .iter()
                    .map(|&module| self.graph.display_name(module))
                    .collect();
                let missing: Vec<&str> = self
                    .options
                    .modules
                    .iter()
                    .filter(|name| !found.contains(name))
                    .map(String::as_str)
                    .collect();
                log::warn!("modules not found: {}", missing.join(", "));
            }
            if !modules.is_empty() {
                let index = self.render_index(
                    self.graph.root(),
                    "Modules",
                    &[Category { kind: 1, title: String::new(), children: modules.clone() }],
                    "",
                );
                let body: Vec<String> = modules
                    .iter()
                    .map(|&module| self.render(module, Style::Section))
                    .collect();
                return section_html(
                    &format!("{index}{}", body.join("")),
                    &SectionOptions::default(),
                );
            }
        }
        self.render(self.graph.root(), Style::Section)
    }

    /// First link target for an inline permalink to a node
    pub(crate) fn link_to(&self, id: NodeId, title: Option<&str>) -> String {
        render_permalink(self.graph.permalink_of(id).as_ref(), title)
    }
}

pub(crate) fn is_void(ty: &TypeExpr) -> bool {
    matches!(ty, TypeExpr::Void)
        || matches!(ty, TypeExpr::Intrinsic { name } if name == "void")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::PlainRenderer;
    use crate::testutil::graph_from_json;
    use serde_json::json;

    #[test]
    fn ignored_nodes_render_empty_at_every_style() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [
                { "id": 1, "name": "#secret", "kind": 1024,
                  "type": { "type": "intrinsic", "name": "number" } },
                { "id": 2, "name": "hidden", "kind": 64,
                  "signatures": [{ "id": 3, "name": "hidden", "kind": 4096 }],
                  "comment": { "tags": [{ "tag": "hidden", "text": "" }] } },
            ],
        }));
        let options = RenderOptions::default();
        let renderer = Renderer::new(&graph, &options, &PlainRenderer);
        for style in [Style::Inline, Style::Block, Style::Card, Style::Section] {
            for id in [1_u64, 2] {
                let node = graph.find_by_id(id).unwrap();
                if matches!(style, Style::Card | Style::Section) {
                    assert_eq!(renderer.render(node, style), "", "id {id}");
                }
            }
            // Property with the private sigil is empty even inline.
            let private = graph.find_by_id(1).unwrap();
            if style == Style::Inline {
                assert_eq!(renderer.render(private, style), "");
            }
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "groups": [{ "kind": 128, "title": "Classes", "children": [1] }],
            "children": [{
                "id": 1, "name": "Widget", "kind": 128,
                "children": [
                    { "id": 2, "name": "b", "kind": 1024,
                      "type": { "type": "intrinsic", "name": "number" } },
                    { "id": 3, "name": "a", "kind": 2048,
                      "signatures": [{ "id": 4, "name": "a", "kind": 4096,
                        "type": { "type": "intrinsic", "name": "void" } }] },
                ],
                "groups": [
                    { "kind": 1024, "title": "Properties", "children": [2] },
                    { "kind": 2048, "title": "Methods", "children": [3] },
                ],
            }],
        }));
        let options = RenderOptions::default();
        let renderer = Renderer::new(&graph, &options, &PlainRenderer);
        let first = renderer.render_project();
        let second = renderer.render_project();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn unknown_kind_is_non_fatal() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [
                { "id": 1, "name": "mystery", "kind": 33_554_432 },
                { "id": 2, "name": "x", "kind": 32,
                  "type": { "type": "intrinsic", "name": "number" } },
            ],
        }));
        let options = RenderOptions::default();
        let renderer = Renderer::new(&graph, &options, &PlainRenderer);
        assert_eq!(renderer.render(graph.find_by_id(1).unwrap(), Style::Inline), "");
        // Siblings are unaffected.
        assert!(renderer
            .render(graph.find_by_id(2).unwrap(), Style::Inline)
            .contains("number"));
    }

    #[test]
    fn signature_block_lists_params_and_return() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{
                "id": 1, "name": "scale", "kind": 64,
                "signatures": [{
                    "id": 2, "name": "scale", "kind": 4096,
                    "parameters": [
                        { "id": 3, "name": "factor", "kind": 32768,
                          "type": { "type": "intrinsic", "name": "number" } },
                    ],
                    "type": { "type": "intrinsic", "name": "number" },
                    "comment": { "returns": "the scaled value" },
                }],
            }],
        }));
        let options = RenderOptions::default();
        let renderer = Renderer::new(&graph, &options, &PlainRenderer);
        let html = renderer.render(graph.find_by_id(2).unwrap(), Style::Block);
        assert!(html.contains("<var>factor</var>"));
        assert!(html.contains("the scaled value"));
        assert!(html.contains('\u{2192}'));
    }
}
