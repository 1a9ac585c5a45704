//! Section rendering: grouped member listings with indexes

use crate::category::{sort_groups, Category};
use crate::graph::{Group, NodeId, TypeExpr};
use crate::render::markup::{
    div, heading, list, section_html, span, HeadingOptions, SectionOptions,
};
use crate::render::{Renderer, Style};

/// Index heading per group kind; accessor and signature groups fold
/// into the member listing without one.
fn index_title(collection: &[&Group]) -> &'static str {
    for group in collection {
        let title = match group.kind {
            1 => "Modules",
            2 => "Namespaces",
            4 => "Enums",
            32 => "Variables",
            64 => "Functions",
            128 => "Classes",
            256 => "Interfaces",
            1024 => "Properties / Methods",
            2048 => "Methods / Properties",
            4_194_304 => "Types",
            _ => continue,
        };
        return title;
    }
    ""
}

impl Renderer<'_> {
    /// Section for a class or interface: heading, inheritance relations
    /// and grouped members
    ///
    /// A class holding nothing but plain members collapses into a
    /// single summary card.
    pub(crate) fn render_class_section(&self, id: NodeId) -> String {
        let node = self.graph.node(id);
        if self.graph.is_ignorable(id) || node.children.is_empty() {
            return String::new();
        }
        if node.groups.len() == 1
            && node.groups[0].kind & (1024 | 2048) != 0
            && !self.graph.has_tag(id, "command")
        {
            return self.render(id, Style::Card);
        }

        let permalink = self.graph.permalink_of(id);
        let subhead = self
            .graph
            .parent(id)
            .filter(|&parent| self.graph.node(parent).kind.mask() > 2)
            .map(|parent| self.qualified_name(parent))
            .unwrap_or_default();
        let mut result = heading(
            2,
            &subhead,
            &self.qualified_name(id),
            permalink.as_ref(),
            &HeadingOptions {
                deprecated: self.graph.has_tag(id, "deprecated"),
                ..Default::default()
            },
        );

        let own_source_id = node.source_id;
        let not_self = |ty: &&TypeExpr| match ty {
            TypeExpr::Reference { target, source_id, .. } => {
                *target != Some(id) && (source_id.is_none() || *source_id != own_source_id)
            }
            _ => true,
        };
        let relations: [(&str, Vec<&TypeExpr>); 4] = [
            ("Extends ", node.extended_types.iter().collect()),
            ("Implements ", node.implemented_types.iter().collect()),
            ("Extended by ", node.extended_by.iter().collect()),
            (
                "Implemented by ",
                node.implemented_by.iter().filter(not_self).collect(),
            ),
        ];
        for (label, types) in relations {
            if types.is_empty() {
                continue;
            }
            let rendered: Vec<String> = types
                .iter()
                .map(|ty| self.render_type(ty, Style::Inline))
                .collect();
            result.push_str(&format!(
                "<p>{}{}</p>",
                span(label, "class-label"),
                rendered.join(", ")
            ));
        }

        result.push_str(&self.render_groups(id));
        section_html(
            &result,
            &SectionOptions { permalink: permalink.as_ref(), ..Default::default() },
        )
    }

    /// Comment plus every member group, in display order
    pub(crate) fn render_groups(&self, id: NodeId) -> String {
        let node = self.graph.node(id);
        let mut parts = vec![self.render_comment(id, Style::Section)];
        for collection in sort_groups(&node.groups) {
            parts.push(self.render_group(id, &collection));
        }
        parts.retain(|part| !part.is_empty());
        parts.join("\n\n")
    }

    /// One collection of same-ranked groups: an optional index followed
    /// by the member cards, split by category
    pub(crate) fn render_group(&self, id: NodeId, collection: &[&Group]) -> String {
        let node = self.graph.node(id);
        let kind = collection.iter().fold(0, |mask, group| mask | group.kind);

        let mut categories = self.graph.categories_of(id, kind);
        for category in &mut categories {
            category
                .children
                .retain(|&child| !self.graph.is_ignorable(child));
            category
                .children
                .sort_by(|&a, &b| self.graph.node(a).name.cmp(&self.graph.node(b).name));
        }
        let total: usize = categories.iter().map(|c| c.children.len()).sum();

        // Constructor and enum groups carry their own card headers.
        let mut header = String::new();
        if kind & (512 | 4) == 0 {
            if kind & (1024 | 2048) != 0 && self.graph.has_tag(id, "command") {
                header = self.render_index(id, "", &categories, "");
            } else if kind & (1 | 2 | 4 | 64 | 128 | 256 | 1024 | 2048 | 4_194_304) != 0
                && total > 1
            {
                header = self.render_index(id, index_title(collection), &categories, "");
            }
        }

        // Members re-declared from an extended type document there.
        let extended_names: Vec<&str> = node
            .extended_types
            .iter()
            .filter_map(|ty| match ty {
                TypeExpr::Reference { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();

        let mut body = String::new();
        for category in &categories {
            let mut members = String::new();
            for &child in &category.children {
                let member = self.graph.node(child);
                if member.inherited_from.is_some()
                    || extended_names.contains(&member.name.as_str())
                {
                    continue;
                }
                members.push_str(&self.render(child, Style::Section));
            }
            if members.is_empty() {
                continue;
            }
            if !category.title.is_empty() {
                body.push_str(&heading(
                    3,
                    "",
                    &category.title,
                    None,
                    &HeadingOptions { class: Some("category-title"), ..Default::default() },
                ));
            }
            body.push_str(&members);
        }
        if body.is_empty() {
            return String::new();
        }
        section_html(&format!("{header}{body}"), &SectionOptions::default())
    }

    /// Linked table of contents over a set of categories
    ///
    /// Suppressed when a single category would index at most one
    /// visible entry.
    pub(crate) fn render_index(
        &self,
        id: NodeId,
        title: &str,
        categories: &[Category],
        suffix: &str,
    ) -> String {
        let visible = |child: NodeId| {
            let node = self.graph.node(child);
            node.inherited_from.is_none()
                && !node.name.starts_with('#')
                && !self.graph.is_ignorable(child)
                && (node.signatures.is_empty()
                    || node
                        .signatures
                        .iter()
                        .any(|&signature| !self.graph.is_ignorable(signature)))
        };

        let mut result = String::new();
        if !title.is_empty() {
            result.push_str(&heading(
                3,
                &self.qualified_name(id),
                title,
                None,
                &HeadingOptions::default(),
            ));
        }
        if categories.len() == 1 {
            let count = categories[0]
                .children
                .iter()
                .filter(|&&child| visible(child))
                .count();
            if count <= 1 {
                return result;
            }
        }
        for category in categories {
            let items: Vec<String> = category
                .children
                .iter()
                .filter(|&&child| visible(child))
                .map(|&child| {
                    let name = format!("{}{suffix}", self.graph.display_name(child));
                    self.link_to(child, Some(&name))
                })
                .collect();
            if items.is_empty() {
                continue;
            }
            if !category.title.is_empty() {
                result.push_str(&format!("<h4>{}</h4>", category.title));
            }
            result.push_str(&div(&list(&items, None), Some("index")));
        }
        result
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
    fn extended_class_lists_relation_and_skips_inherited_members() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [
                {
                    "id": 1, "name": "Shape", "kind": 128,
                    "children": [{
                        "id": 2, "name": "area", "kind": 2048,
                        "signatures": [{ "id": 3, "name": "area", "kind": 4096,
                          "type": { "type": "intrinsic", "name": "number" } }],
                    }],
                    "groups": [{ "kind": 2048, "title": "Methods", "children": [2] }],
                    "extendedBy": [{ "type": "reference", "name": "Circle", "id": 4 }],
                },
                {
                    "id": 4, "name": "Circle", "kind": 128,
                    "children": [
                        {
                            "id": 5, "name": "area", "kind": 2048,
                            "signatures": [{ "id": 6, "name": "area", "kind": 4096,
                              "type": { "type": "intrinsic", "name": "number" } }],
                            "inheritedFrom": { "type": "reference", "name": "Shape.area", "id": 3 },
                        },
                        {
                            "id": 7, "name": "radius", "kind": 1024,
                            "type": { "type": "intrinsic", "name": "number" },
                        },
                    ],
                    "groups": [
                        { "kind": 2048, "title": "Methods", "children": [5] },
                        { "kind": 1024, "title": "Properties", "children": [7] },
                    ],
                    "extendedTypes": [{ "type": "reference", "name": "Shape", "id": 1 }],
                },
            ],
        }));
        let options = RenderOptions::default();
        let renderer = Renderer::new(&graph, &options, &PlainRenderer);
        let html = renderer.render_class_section(graph.find_by_id(4).unwrap());
        assert!(html.contains("<span class=\"class-label\">Extends </span>"));
        assert!(html.contains("Shape"));
        assert!(html.contains("radius"));
        // The inherited method documents on the base class only.
        assert!(!html.contains("(area%3Ainstance)"));
    }

    #[test]
    fn nested_class_heading_carries_the_parent_subhead() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{
                "id": 1, "name": "Editor", "kind": 128,
                "children": [{
                    "id": 2, "name": "Cursor", "kind": 128,
                    "children": [
                        { "id": 3, "name": "line", "kind": 1024,
                          "type": { "type": "intrinsic", "name": "number" } },
                        { "id": 4, "name": "blink", "kind": 2048,
                          "signatures": [{ "id": 5, "name": "blink", "kind": 4096 }] },
                    ],
                    "groups": [
                        { "kind": 1024, "title": "Properties", "children": [3] },
                        { "kind": 2048, "title": "Methods", "children": [4] },
                    ],
                }],
                "groups": [{ "kind": 128, "title": "Classes", "children": [2] }],
            }],
        }));
        let options = RenderOptions::default();
        let renderer = Renderer::new(&graph, &options, &PlainRenderer);
        let html = renderer.render_class_section(graph.find_by_id(2).unwrap());
        assert!(html.contains("<span class=\"subhead\">"));
        assert!(html.contains("Editor"));
    }

    #[test]
    fn plain_member_class_collapses_to_a_card() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{
                "id": 1, "name": "Point", "kind": 128,
                "children": [
                    { "id": 2, "name": "x", "kind": 1024,
                      "type": { "type": "intrinsic", "name": "number" } },
                    { "id": 3, "name": "y", "kind": 1024,
                      "type": { "type": "intrinsic", "name": "number" } },
                ],
                "groups": [{ "kind": 1024, "title": "Properties", "children": [2, 3] }],
            }],
        }));
        let options = RenderOptions::default();
        let renderer = Renderer::new(&graph, &options, &PlainRenderer);
        let html = renderer.render_class_section(graph.find_by_id(1).unwrap());
        assert!(html.contains("class=\"card\""));
        assert!(!html.contains("<h2"));
    }

    #[test]
    fn single_entry_index_is_suppressed() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{
                "id": 1, "name": "Widget", "kind": 128,
                "children": [
                    { "id": 2, "name": "init", "kind": 2048,
                      "signatures": [{ "id": 3, "name": "init", "kind": 4096 }] },
                ],
            }],
        }));
        let options = RenderOptions::default();
        let renderer = Renderer::new(&graph, &options, &PlainRenderer);
        let widget = graph.find_by_id(1).unwrap();
        let categories = graph.categories_of(widget, 2048);
        let html = renderer.render_index(widget, "Methods / Properties", &categories, "");
        assert!(html.contains("Methods / Properties"));
        assert!(!html.contains("class=\"index\""));
    }

    #[test]
    fn index_links_use_member_anchors() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{
                "id": 1, "name": "Widget", "kind": 128,
                "children": [
                    { "id": 2, "name": "show", "kind": 2048,
                      "signatures": [{ "id": 3, "name": "show", "kind": 4096 }] },
                    { "id": 4, "name": "hide", "kind": 2048,
                      "signatures": [{ "id": 5, "name": "hide", "kind": 4096 }] },
                ],
            }],
        }));
        let options = RenderOptions::default();
        let renderer = Renderer::new(&graph, &options, &PlainRenderer);
        let widget = graph.find_by_id(1).unwrap();
        let categories = graph.categories_of(widget, 2048);
        let html = renderer.render_index(widget, "", &categories, "()");
        assert!(html.contains("href=\"#(Widget%3Aclass).(show%3Ainstance)\""));
        assert!(html.contains(">hide()</a>"));
    }

    #[test]
    fn groups_render_in_display_order() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{
                "id": 1, "name": "Widget", "kind": 128,
                "children": [
                    { "id": 2, "name": "make", "kind": 512,
                      "signatures": [{ "id": 3, "name": "new Widget", "kind": 16384 }] },
                    { "id": 4, "name": "zoom", "kind": 1024,
                      "type": { "type": "intrinsic", "name": "number" } },
                ],
                "groups": [
                    { "kind": 1024, "title": "Properties", "children": [4] },
                    { "kind": 512, "title": "Constructors", "children": [2] },
                ],
            }],
        }));
        let options = RenderOptions::default();
        let renderer = Renderer::new(&graph, &options, &PlainRenderer);
        let html = renderer.render_groups(graph.find_by_id(1).unwrap());
        let constructor = html.find("constructor").unwrap();
        let zoom = html.find("zoom").unwrap();
        assert!(constructor < zoom);
    }
}
