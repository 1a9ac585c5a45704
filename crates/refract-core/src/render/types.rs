//! Type-expression rendering

use crate::graph::{DeclKind, TypeExpr};
use crate::render::markup::{keyword, literal_to_string, punct, span, strong};
use crate::render::{Renderer, Style};
use crate::resolver::external_link;

fn every_string_literal(types: &[TypeExpr]) -> bool {
    types.iter().all(|ty| {
        matches!(ty, TypeExpr::Literal { value: Some(serde_json::Value::String(_)) })
    })
}

impl Renderer<'_> {
    /// Render a type expression at the requested detail level
    pub fn render_type(&self, ty: &TypeExpr, style: Style) -> String {
        match ty {
            TypeExpr::Array { element } => {
                if matches!(**element, TypeExpr::Union { .. }) {
                    format!(
                        "{}{}{}",
                        punct("("),
                        self.render_type(element, Style::Inline),
                        punct(")[]")
                    )
                } else {
                    format!("{}{}", self.render_type(element, Style::Inline), punct("[]"))
                }
            }
            TypeExpr::IndexedAccess { object, index } => format!(
                "{}{}{}{}",
                self.render_type(object, Style::Inline),
                punct("["),
                self.render_type(index, Style::Inline),
                punct("]")
            ),
            TypeExpr::Intersection { types } => {
                let parts: Vec<String> = types
                    .iter()
                    .map(|ty| self.render_type(ty, style))
                    .filter(|html| !html.is_empty())
                    .collect();
                if style == Style::Block {
                    format!(
                        "<ul class=\"type-block\"><li>{}</li></ul>",
                        parts.join(&format!("{}</li>\n<li>", punct(" & ")))
                    )
                } else {
                    parts.join(&punct(" & "))
                }
            }
            TypeExpr::Intrinsic { name } => keyword(name),
            TypeExpr::Literal { value } => literal_to_string(value.as_ref()),
            TypeExpr::NamedTupleMember { name, element } => format!(
                "{}{}{}",
                strong(name),
                punct(": "),
                self.render_type(element, Style::Inline)
            ),
            TypeExpr::Predicate { name, target } => format!(
                "{name}{}{}",
                keyword(" is "),
                self.render_type(target, Style::Inline)
            ),
            TypeExpr::Query { target } => {
                format!("{}{}", keyword("typeof "), self.render_type(target, Style::Inline))
            }
            TypeExpr::Reference { name, target, type_arguments, .. } => {
                self.render_type_reference(name, *target, type_arguments)
            }
            TypeExpr::Reflection { declaration } => self.render(*declaration, style),
            TypeExpr::Rest { element } => {
                format!("{}{}", span("...", "modifier"), self.render_type(element, style))
            }
            TypeExpr::Tuple { elements } => {
                let parts: Vec<String> = elements
                    .iter()
                    .map(|ty| self.render_type(ty, Style::Inline))
                    .filter(|html| !html.is_empty())
                    .collect();
                format!("{}{}{}", punct("["), parts.join(&punct(", ")), punct("]"))
            }
            TypeExpr::Operator { operator, target } => format!(
                "{}{}",
                keyword(&format!("{operator} ")),
                self.render_type(target, Style::Inline)
            ),
            TypeExpr::TypeParameterRef { name, declaration, constraint, .. } => {
                let mut result = match declaration {
                    Some(declaration) => self.link_to(*declaration, Some(name)),
                    None => name.clone(),
                };
                if let Some(constraint) = constraint {
                    result.push_str(&keyword(" extends "));
                    result.push_str(&self.render_type(constraint, Style::Inline));
                }
                result
            }
            TypeExpr::Union { types } => {
                if style == Style::Block && !every_string_literal(types) {
                    let parts: Vec<String> = types
                        .iter()
                        .map(|ty| self.render_type(ty, Style::Inline))
                        .collect();
                    format!(
                        "<ul class=\"type-block\"><li>{}{}</li></ul>",
                        punct("| "),
                        parts.join(&format!("</li>\n<li>{}", punct("| ")))
                    )
                } else {
                    let parts: Vec<String> = types
                        .iter()
                        .map(|ty| self.render_type(ty, Style::Inline))
                        .collect();
                    parts.join(&punct(" | "))
                }
            }
            // The engine uses "unknown" for inferred initializer values.
            TypeExpr::Unknown { .. } => String::new(),
            TypeExpr::Void => keyword("void"),
            TypeExpr::Unsupported { tag } => {
                log::warn!("unrecognized type tag \"{tag}\"");
                String::new()
            }
        }
    }

    /// A use of a named type, linked to its declaration when possible
    fn render_type_reference(
        &self,
        name: &str,
        target: Option<crate::graph::NodeId>,
        type_arguments: &[TypeExpr],
    ) -> String {
        let arguments = if type_arguments.is_empty() {
            String::new()
        } else {
            let parts: Vec<String> = type_arguments
                .iter()
                .map(|ty| self.render_type(ty, Style::Inline))
                .collect();
            format!("{}{}{}", punct("<"), parts.join(&punct(", ")), punct(">"))
        };

        let candidate = target.or_else(|| {
            self.graph.find_by_name(
                name,
                None,
                Some(&crate::graph::KindFilter::Mask(crate::graph::masks::TYPE_TARGET)),
            )
        });
        if let Some(candidate) = candidate {
            // Enum members display with their enum's name.
            let title = if self.graph.node(candidate).kind == DeclKind::EnumMember {
                match self.graph.parent(candidate) {
                    Some(parent) => format!("{}.{name}", self.graph.node(parent).name),
                    None => name.to_string(),
                }
            } else {
                name.to_string()
            };
            return format!("{}{arguments}", self.link_to(candidate, Some(&title)));
        }

        match external_link(self.options, name) {
            Some(url) => format!(
                "<a href=\"{url}\" class=\"externallink\">{name}\
                 <svg><use xlink:href=\"#external-link\"></use></svg></a>{arguments}"
            ),
            None => format!("{name}{arguments}"),
        }
    }
}
