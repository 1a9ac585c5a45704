//! Card rendering: one anchored, titled unit per symbol

use crate::graph::{DeclKind, NodeId, TypeExpr};
use crate::permalink::{encode_anchor, render_permalink_anchor};
use crate::render::markup::{
    div, heading, keyword, punct, quoted_string, section_html, span, strong, var_tag,
    HeadingOptions, SectionOptions,
};
use crate::render::{Renderer, Style};

impl Renderer<'_> {
    /// Wrap content in an anchored card with a heading and keywords
    pub(crate) fn render_card(
        &self,
        id: NodeId,
        display_name: Option<String>,
        content: &str,
    ) -> String {
        if self.graph.is_ignorable(id) {
            return String::new();
        }
        let node = self.graph.node(id);
        let display_name = display_name.unwrap_or_else(|| {
            let mut name = strong(&self.graph.display_name(id));
            if node.kind == DeclKind::Function {
                name.push_str(&punct("()"));
            }
            name
        });

        let permalink = self.graph.permalink_of(id);
        let subhead = self
            .graph
            .parent(id)
            .filter(|&parent| self.graph.node(parent).kind.mask() > 2)
            .map(|parent| self.qualified_name(parent))
            .unwrap_or_default();
        let header = heading(
            3,
            &subhead,
            &display_name,
            permalink.as_ref(),
            &HeadingOptions {
                deprecated: self.graph.has_tag(id, "deprecated"),
                ..Default::default()
            },
        );
        section_html(
            &format!("{header}{content}"),
            &SectionOptions {
                permalink: permalink.as_ref(),
                class: Some("card"),
                keywords: Some(self.keywords(id).join(", ")),
            },
        )
    }

    /// One signature inside a method card
    ///
    /// Simple signatures with uncommented parameters render inline
    /// first; anything richer gets the full parameter breakdown.
    fn render_signature(&self, name: &str, id: NodeId) -> String {
        let node = self.graph.node(id);
        let no_param_comments = node
            .parameters
            .iter()
            .all(|&parameter| self.graph.node(parameter).comment.is_none());
        if no_param_comments && self.complexity(id) < 10 {
            let mut result = div(
                &format!("{name}{}", self.render(id, Style::Inline)),
                Some("code"),
            );
            result.push_str(&self.render_comment(id, Style::Block));
            return div(&result, None);
        }

        let mut result = String::new();
        if !node.parameters.is_empty() {
            let params: Vec<String> = node
                .parameters
                .iter()
                .map(|&parameter| {
                    let param = self.graph.node(parameter);
                    let mut rendered = var_tag(&param.name);
                    if param.flags.is_rest {
                        rendered = format!("{}{rendered}", span("...", "modifier"));
                    }
                    if param.flags.is_optional {
                        rendered.push_str(&span("?", "modifier"));
                    }
                    rendered
                })
                .collect();
            result.push_str(&div(
                &format!("{name}{}{}{}", punct("("), params.join(&punct(", ")), punct(")")),
                Some("code"),
            ));
        }
        result.push_str(&self.render(id, Style::Block));
        result.push_str(&self.render_comment(id, Style::Block));
        div(&result, None)
    }

    /// Card for a function, constructor or method
    pub(crate) fn render_method_card(&self, id: NodeId) -> String {
        if self.graph.is_ignorable(id) {
            return String::new();
        }
        let command = self.render_command_card(id);
        if !command.is_empty() {
            return command;
        }

        let node = self.graph.node(id);
        let signatures: Vec<NodeId> = node
            .signatures
            .iter()
            .copied()
            .filter(|&signature| !self.graph.is_ignorable(signature))
            .collect();
        if signatures.is_empty() {
            return String::new();
        }

        let short_name = if node.kind == DeclKind::Constructor {
            // Constructors always have a class parent.
            let class = self
                .graph
                .parent(id)
                .map(|parent| self.graph.node(parent).name.clone())
                .unwrap_or_default();
            format!("{}{}", keyword("new "), var_tag(&class))
        } else {
            var_tag(&node.name)
        };
        let display_name = format!("{short_name}{}", punct("()"));

        let bodies: Vec<String> = signatures
            .iter()
            .map(|&signature| self.render_signature(&short_name, signature))
            .collect();
        self.render_card(id, Some(display_name), &div(&bodies.join("\n<hr>\n"), None))
    }

    /// Card for a get/set accessor pair
    ///
    /// When the getter return type and setter parameter type agree, the
    /// pair collapses into a single typed row.
    pub(crate) fn render_accessor_card(&self, id: NodeId) -> String {
        if self.graph.is_ignorable(id) {
            return String::new();
        }
        let node = self.graph.node(id);
        let get_signatures: Vec<NodeId> = node
            .get_signatures
            .iter()
            .copied()
            .filter(|&signature| !self.graph.is_ignorable(signature))
            .collect();
        let set_signatures: Vec<NodeId> = node
            .set_signatures
            .iter()
            .copied()
            .filter(|&signature| !self.graph.is_ignorable(signature))
            .collect();
        if get_signatures.is_empty() && set_signatures.is_empty() {
            return String::new();
        }

        let getter_type = |signature: NodeId| {
            self.graph
                .node(signature)
                .ty
                .as_ref()
                .map(|ty| self.render_type(ty, Style::Inline))
                .unwrap_or_default()
        };
        let setter_type = |signature: NodeId| {
            self.graph
                .node(signature)
                .parameters
                .first()
                .and_then(|&parameter| self.graph.node(parameter).ty.as_ref())
                .map(|ty| self.render_type(ty, Style::Inline))
                .unwrap_or_default()
        };
        let simple = match (get_signatures.as_slice(), set_signatures.as_slice()) {
            ([get], [set]) => getter_type(*get) == setter_type(*set),
            ([_], []) | ([], [_]) => true,
            _ => false,
        };

        let mut primary_comment = String::new();
        let mut comments = String::new();
        for &signature in get_signatures.iter().chain(&set_signatures) {
            let mut comment = self.render_comment(signature, Style::Block);
            if !primary_comment.is_empty() && comment == primary_comment {
                comment.clear();
            }
            if primary_comment.is_empty() {
                primary_comment.clone_from(&comment);
            }
            comments.push_str(&comment);
        }

        if simple {
            let collapsed_type = get_signatures
                .first()
                .map(|&get| getter_type(get))
                .unwrap_or_else(|| setter_type(set_signatures[0]));
            let mut display_name =
                format!("{}{}{collapsed_type}", var_tag(&node.name), punct(": "));
            if set_signatures.is_empty() && node.set_signatures.is_empty() {
                display_name.push_str("&nbsp;&nbsp;");
                display_name.push_str(&span("read only", "modifier-tag"));
            } else if get_signatures.is_empty() && node.get_signatures.is_empty() {
                display_name.push_str("&nbsp;&nbsp;");
                display_name.push_str(&span("write only", "modifier-tag"));
            }
            return self.render_card(id, Some(display_name), &div(&comments, None));
        }

        let display_name = var_tag(&node.name);
        let mut body = String::new();
        for &signature in &get_signatures {
            body.push_str(&div(
                &format!(
                    "{}{display_name}{}{}",
                    keyword("get "),
                    punct("(): "),
                    getter_type(signature)
                ),
                None,
            ));
        }
        for &signature in &set_signatures {
            body.push_str(&div(
                &format!(
                    "{}{display_name}{}{}{}",
                    keyword("set "),
                    punct("("),
                    setter_type(signature),
                    punct(")")
                ),
                None,
            ));
        }
        self.render_card(id, Some(display_name), &format!("{body}{comments}"))
    }

    /// Card for a command member: `commandTag(["selector", ...params]): Ret`
    ///
    /// The first declared parameter is the implicit sender and is
    /// elided from the rendered invocation.
    pub(crate) fn render_command_card(&self, id: NodeId) -> String {
        let node = self.graph.node(id);
        let command_tag = self
            .graph
            .tag_text(id, "command")
            .or_else(|| {
                self.graph
                    .parent(id)
                    .and_then(|parent| self.graph.tag_text(parent, "command"))
            })
            .map(|tag| tag.trim().to_string())
            .unwrap_or_default();
        if command_tag.is_empty() {
            return String::new();
        }

        let signature = match node.kind {
            DeclKind::Property => match &node.ty {
                Some(TypeExpr::Reflection { declaration }) => {
                    self.graph.node(*declaration).signatures.first().copied()
                }
                _ => None,
            },
            DeclKind::Method => node.signatures.first().copied(),
            _ => None,
        };
        let Some(signature) = signature else {
            return String::new();
        };
        let signature_node = self.graph.node(signature);

        let mut params = signature_node.parameters.clone();
        if !params.is_empty() {
            params.remove(0);
        }

        let mut invocation = format!("{command_tag}{}", punct("("));
        if params.is_empty() {
            invocation.push_str(&quoted_string(&node.name));
        } else {
            invocation.push_str(&punct("["));
            invocation.push_str(&quoted_string(&node.name));
            invocation.push_str(&punct(", "));
            let rendered: Vec<String> = params
                .iter()
                .map(|&parameter| self.render(parameter, Style::Inline))
                .collect();
            invocation.push_str(&rendered.join(&punct(", ")));
            invocation.push_str(&punct("]"));
        }
        invocation.push_str(&punct(")"));
        if let Some(ty) = &signature_node.ty {
            invocation.push_str(&punct(": "));
            invocation.push_str(&self.render_type(ty, Style::Inline));
        }

        if !params.is_empty() || signature_node.ty.is_some() {
            invocation.push_str("\n<dl>\n");
            if !params.is_empty() {
                let rows: Vec<String> = params
                    .iter()
                    .map(|&parameter| {
                        let param = self.graph.node(parameter);
                        let mut row = var_tag(&param.name);
                        let type_def = param
                            .ty
                            .as_ref()
                            .map(|ty| self.render_type(ty, Style::Block))
                            .unwrap_or_default();
                        if !type_def.is_empty() {
                            row.push_str(&punct(": "));
                            row.push_str(&type_def);
                        }
                        row.push_str("\n</dt><dd>\n");
                        row.push_str(&self.render_comment(parameter, Style::Block));
                        row
                    })
                    .collect();
                invocation.push_str("\n<dt>\n");
                invocation.push_str(&rows.join("\n</dd><dt>\n"));
                invocation.push_str("\n</dd>\n");
            }
            if let (Some(ty), Some(returns)) =
                (&signature_node.ty, self.graph.tag_text(id, "returns"))
            {
                invocation.push_str("\n<dt>\n");
                invocation.push_str(&var_tag("\u{2192} "));
                invocation.push_str(&self.render_type(ty, Style::Inline));
                invocation.push_str("\n</dt><dd>\n");
                invocation.push_str(&self.render_notices(id, &returns));
                invocation.push_str("\n</dd>\n");
            }
            invocation.push_str("\n</dl>\n");
        }
        let body = div(&invocation, Some("code"));

        // The zero-width space keeps a double-click from selecting the
        // "command" badge together with the name.
        let display_name = format!(
            "{}&#8203;{}",
            span("command", "modifier-tag"),
            strong(&node.name)
        );
        self.render_card(
            id,
            Some(display_name),
            &format!("{body}{}", self.render_comment(id, Style::Block)),
        )
    }

    /// Card for a property
    pub(crate) fn render_property_card(&self, id: NodeId) -> String {
        if self.graph.is_ignorable(id) {
            return String::new();
        }
        let command = self.render_command_card(id);
        if !command.is_empty() {
            return command;
        }

        let node = self.graph.node(id);
        let display_name = strong(&node.name);
        if self.complexity(id) < 5 {
            // Simple property: the type fits in the card title.
            return self.render_card(
                id,
                Some(format!(
                    "{display_name}{}{}",
                    punct(": "),
                    self.render_type_opt(node.ty.as_ref(), Style::Inline)
                )),
                &self.render_comment(id, Style::Block),
            );
        }
        self.render_card(
            id,
            Some(display_name),
            &format!(
                "{}{}",
                self.render_type_opt(node.ty.as_ref(), Style::Block),
                self.render_comment(id, Style::Block)
            ),
        )
    }

    /// Card for an enum, listing members as definition rows
    pub(crate) fn render_enum_card(&self, id: NodeId) -> String {
        if self.graph.is_ignorable(id) {
            return String::new();
        }
        let node = self.graph.node(id);
        let mut comment = self.render_comment(id, Style::Block);
        let mut body = String::new();
        if !node.children.is_empty() {
            if !comment.is_empty() {
                comment.push_str("\n<hr>");
            }
            body.push_str("\n<dl>");
            for &member in &node.children {
                body.push_str(&self.render(member, Style::Block));
            }
            body.push_str("</dl>");
        }
        self.render_card(id, None, &format!("{comment}{body}"))
    }

    /// Card for a type alias, with its definition in a code block
    pub(crate) fn render_type_alias_card(&self, id: NodeId) -> String {
        if self.graph.is_ignorable(id) {
            return String::new();
        }
        let mut result = self.render_comment(id, Style::Block);
        let definition = self.render(id, Style::Block);
        if !definition.is_empty() {
            if !result.is_empty() {
                result.push_str("\n<hr>\n");
            }
            result.push_str(&div(&definition, Some("code")));
        }
        self.render_card(id, None, &result)
    }

    /// Collapsed card for a class or interface with uniform members
    pub(crate) fn render_class_card(&self, id: NodeId) -> String {
        let node = self.graph.node(id);
        if self.graph.is_ignorable(id) || node.children.is_empty() {
            return String::new();
        }
        let mut comment = self.render_comment(id, Style::Block);
        if !comment.is_empty() {
            comment.push_str("\n<hr>\n");
        }

        let mut rows: Vec<String> = Vec::new();
        for &child in &node.children {
            let member = self.graph.node(child);
            if member.name.starts_with('#') {
                continue;
            }
            let permalink = self.graph.permalink_of(child);
            let anchor = permalink
                .as_ref()
                .map(|p| encode_anchor(&p.anchor))
                .unwrap_or_default();
            let anchor_link = permalink
                .as_ref()
                .map(render_permalink_anchor)
                .unwrap_or_default();
            match member.kind {
                DeclKind::Method => {
                    for &signature in &member.signatures {
                        let mut row = format!("<dt id=\"{anchor}\">{}", var_tag(&member.name));
                        if member.flags.is_optional {
                            row.push_str(&span("?", "modifier"));
                        }
                        row.push_str(&anchor_link);
                        row.push_str(&self.render(signature, Style::Inline));
                        row.push_str("</dt><dd>");
                        row.push_str(&self.render_comment(signature, Style::Block));
                        row.push_str("</dd>");
                        rows.push(row);
                    }
                }
                DeclKind::Property => {
                    let mut row = format!("<dt id=\"{anchor}\">{}", var_tag(&member.name));
                    if member.flags.is_optional {
                        row.push_str(&span("?", "modifier"));
                    }
                    row.push_str(&punct(": "));
                    row.push_str(&self.render_type_opt(member.ty.as_ref(), Style::Inline));
                    row.push_str(&anchor_link);
                    row.push_str("</dt><dd>");
                    row.push_str(&self.render_comment(child, Style::Block));
                    row.push_str("</dd>");
                    rows.push(row);
                }
                _ => {
                    // A collapsed class card only holds properties and
                    // methods; the section path handles everything else.
                    log::debug!(
                        "unexpected {:?} member in collapsed card for \"{}\"",
                        member.kind,
                        node.name
                    );
                }
            }
        }
        let body = format!("<dl>{}</dl>\n", rows.join("\n"));
        self.render_card(id, Some(self.qualified_name(id)), &format!("{comment}{body}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderOptions;
    use crate::markdown::PlainRenderer;
    use crate::testutil::graph_from_json;
    use serde_json::json;

    #[test]
    fn command_card_elides_the_sender() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{
                "id": 1, "name": "Commands", "kind": 256,
                "comment": { "tags": [{ "tag": "command", "text": "perform" }] },
                "children": [{
                    "id": 2, "name": "jump", "kind": 2048,
                    "signatures": [{
                        "id": 3, "name": "jump", "kind": 4096,
                        "parameters": [
                            { "id": 4, "name": "sender", "kind": 32768,
                              "type": { "type": "intrinsic", "name": "object" } },
                            { "id": 5, "name": "power", "kind": 32768,
                              "type": { "type": "intrinsic", "name": "number" } },
                        ],
                        "type": { "type": "intrinsic", "name": "boolean" },
                    }],
                }],
            }],
        }));
        let options = RenderOptions::default();
        let renderer = Renderer::new(&graph, &options, &PlainRenderer);
        let html = renderer.render_command_card(graph.find_by_id(2).unwrap());
        assert!(html.contains(&quoted_string("jump")));
        assert!(html.contains("<var>power</var>"));
        assert!(!html.contains("sender"));
        assert!(html.contains("perform"));
    }

    #[test]
    fn matching_accessor_pair_collapses() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{
                "id": 1, "name": "Widget", "kind": 128,
                "children": [{
                    "id": 2, "name": "zoom", "kind": 262144,
                    "getSignature": [{
                        "id": 3, "name": "__get", "kind": 524288,
                        "type": { "type": "intrinsic", "name": "number" },
                    }],
                    "setSignature": [{
                        "id": 4, "name": "__set", "kind": 1048576,
                        "parameters": [{ "id": 5, "name": "value", "kind": 32768,
                          "type": { "type": "intrinsic", "name": "number" } }],
                    }],
                }],
            }],
        }));
        let options = RenderOptions::default();
        let renderer = Renderer::new(&graph, &options, &PlainRenderer);
        let html = renderer.render_accessor_card(graph.find_by_id(2).unwrap());
        // Exactly one type annotation for the collapsed pair.
        assert_eq!(html.matches(&keyword("number")).count(), 1);
        assert!(!html.contains(&keyword("get ")));
    }

    #[test]
    fn mismatched_accessor_pair_shows_both_signatures() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{
                "id": 1, "name": "Widget", "kind": 128,
                "children": [{
                    "id": 2, "name": "value", "kind": 262144,
                    "getSignature": [{
                        "id": 3, "name": "__get", "kind": 524288,
                        "type": { "type": "intrinsic", "name": "string" },
                    }],
                    "setSignature": [{
                        "id": 4, "name": "__set", "kind": 1048576,
                        "parameters": [{ "id": 5, "name": "value", "kind": 32768,
                          "type": { "type": "intrinsic", "name": "number" } }],
                    }],
                }],
            }],
        }));
        let options = RenderOptions::default();
        let renderer = Renderer::new(&graph, &options, &PlainRenderer);
        let html = renderer.render_accessor_card(graph.find_by_id(2).unwrap());
        assert!(html.contains(&keyword("get ")));
        assert!(html.contains(&keyword("set ")));
    }

    #[test]
    fn getter_only_accessor_is_read_only() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{
                "id": 1, "name": "Widget", "kind": 128,
                "children": [{
                    "id": 2, "name": "size", "kind": 262144,
                    "getSignature": [{
                        "id": 3, "name": "__get", "kind": 524288,
                        "type": { "type": "intrinsic", "name": "number" },
                    }],
                }],
            }],
        }));
        let options = RenderOptions::default();
        let renderer = Renderer::new(&graph, &options, &PlainRenderer);
        let html = renderer.render_accessor_card(graph.find_by_id(2).unwrap());
        assert!(html.contains("read only"));
    }

    #[test]
    fn simple_property_type_lands_in_title() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{
                "id": 1, "name": "Widget", "kind": 128,
                "children": [{
                    "id": 2, "name": "zoom", "kind": 1024,
                    "type": { "type": "intrinsic", "name": "number" },
                }],
            }],
        }));
        let options = RenderOptions::default();
        let renderer = Renderer::new(&graph, &options, &PlainRenderer);
        let html = renderer.render_property_card(graph.find_by_id(2).unwrap());
        let heading_end = html.find("</h3>").unwrap();
        assert!(html[..heading_end].contains(&keyword("number")));
    }

    #[test]
    fn enum_members_render_default_values() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{
                "id": 1, "name": "Direction", "kind": 4,
                "children": [
                    { "id": 2, "name": "Up", "kind": 16, "defaultValue": "0" },
                    { "id": 3, "name": "Down", "kind": 16, "defaultValue": "1" },
                ],
            }],
        }));
        let options = RenderOptions::default();
        let renderer = Renderer::new(&graph, &options, &PlainRenderer);
        let html = renderer.render_enum_card(graph.find_by_id(1).unwrap());
        assert!(html.contains(&strong("Up")));
        assert!(html.contains(&punct(" = ")));
        assert!(html.contains("id=\"(Direction%3Aenum).Up\""));
    }
}
