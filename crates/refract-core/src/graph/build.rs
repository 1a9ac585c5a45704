//! Conversion from the raw wire model into the arena

use std::collections::HashMap;

use log::debug;

use super::raw::{RawCategory, RawGroup, RawNode, RawType};
use super::{
    CategoryDef, Comment, Declaration, DeclKind, Flags, Group, NodeId, SourceRef, SymbolGraph,
    TagEntry, TypeExpr,
};
use crate::error::Error;

pub(super) fn build(raw: &RawNode) -> Result<SymbolGraph, Error> {
    let mut builder = Builder::default();
    let root = builder.intern(raw);

    let Builder {
        mut nodes,
        by_source_id,
        reference_patches,
        group_patches,
    } = builder;

    // Parenthood follows `children` edges only; signatures, parameters
    // and inline reflection declarations stay orphans.
    let mut stack = vec![root];
    while let Some(current) = stack.pop() {
        let children = nodes[current.index()].children.clone();
        for child in children {
            nodes[child.index()].parent = Some(current);
            stack.push(child);
        }
    }

    for (id, target) in reference_patches {
        nodes[id.index()].reference_target = by_source_id.get(&target).copied();
    }

    for (id, groups, categories) in group_patches {
        nodes[id.index()].groups = groups
            .iter()
            .map(|g| Group {
                kind: g.kind,
                title: g.title.clone(),
                children: resolve_ids(&by_source_id, &g.children),
                categories: g
                    .categories
                    .iter()
                    .map(|c| convert_category(&by_source_id, c))
                    .collect(),
            })
            .collect();
        nodes[id.index()].categories = categories
            .iter()
            .map(|c| convert_category(&by_source_id, c))
            .collect();
    }

    for node in &mut nodes {
        if let Some(ty) = &mut node.ty {
            resolve_type_targets(&by_source_id, ty);
        }
        for ty in node
            .extended_types
            .iter_mut()
            .chain(node.implemented_types.iter_mut())
            .chain(node.extended_by.iter_mut())
            .chain(node.implemented_by.iter_mut())
            .chain(node.inherited_from.iter_mut())
        {
            resolve_type_targets(&by_source_id, ty);
        }
    }

    Ok(SymbolGraph::from_parts(nodes, root, by_source_id))
}

fn convert_category(map: &HashMap<u64, NodeId>, raw: &RawCategory) -> CategoryDef {
    CategoryDef {
        title: raw.title.clone(),
        children: resolve_ids(map, &raw.children),
    }
}

fn resolve_ids(map: &HashMap<u64, NodeId>, ids: &[u64]) -> Vec<NodeId> {
    ids.iter()
        .filter_map(|id| {
            let resolved = map.get(id).copied();
            if resolved.is_none() {
                debug!("group member id {id} does not resolve to a declaration");
            }
            resolved
        })
        .collect()
}

fn resolve_type_targets(map: &HashMap<u64, NodeId>, ty: &mut TypeExpr) {
    match ty {
        TypeExpr::Reference {
            source_id,
            target,
            type_arguments,
            ..
        } => {
            if target.is_none() {
                *target = source_id.and_then(|id| map.get(&id).copied());
            }
            for arg in type_arguments {
                resolve_type_targets(map, arg);
            }
        }
        TypeExpr::TypeParameterRef {
            source_id,
            declaration,
            constraint,
            ..
        } => {
            if declaration.is_none() {
                *declaration = source_id.and_then(|id| map.get(&id).copied());
            }
            if let Some(constraint) = constraint {
                resolve_type_targets(map, constraint);
            }
        }
        TypeExpr::Array { element }
        | TypeExpr::NamedTupleMember { element, .. }
        | TypeExpr::Rest { element } => resolve_type_targets(map, element),
        TypeExpr::IndexedAccess { object, index } => {
            resolve_type_targets(map, object);
            resolve_type_targets(map, index);
        }
        TypeExpr::Intersection { types } | TypeExpr::Union { types } => {
            for ty in types {
                resolve_type_targets(map, ty);
            }
        }
        TypeExpr::Predicate { target, .. }
        | TypeExpr::Query { target }
        | TypeExpr::Operator { target, .. } => resolve_type_targets(map, target),
        TypeExpr::Tuple { elements } => {
            for element in elements {
                resolve_type_targets(map, element);
            }
        }
        TypeExpr::Intrinsic { .. }
        | TypeExpr::Literal { .. }
        | TypeExpr::Reflection { .. }
        | TypeExpr::Unknown { .. }
        | TypeExpr::Void
        | TypeExpr::Unsupported { .. } => {}
    }
}

#[derive(Default)]
struct Builder<'a> {
    nodes: Vec<Declaration>,
    by_source_id: HashMap<u64, NodeId>,
    reference_patches: Vec<(NodeId, u64)>,
    group_patches: Vec<(NodeId, &'a [RawGroup], &'a [RawCategory])>,
}

impl<'a> Builder<'a> {
    fn intern(&mut self, raw: &'a RawNode) -> NodeId {
        let children = self.intern_all(&raw.children);
        let signatures = self.intern_all(&raw.signatures);
        let get_signatures = self.intern_all(&raw.get_signature);
        let set_signatures = self.intern_all(&raw.set_signature);
        let index_signature = raw.index_signature.as_deref().map(|sig| self.intern(sig));
        let parameters = self.intern_all(&raw.parameters);
        let type_parameters = self.intern_all(&raw.type_parameter);

        let ty = raw.ty.as_ref().map(|t| self.convert_type(t));
        let extended_types = self.convert_types(&raw.extended_types);
        let implemented_types = self.convert_types(&raw.implemented_types);
        let extended_by = self.convert_types(&raw.extended_by);
        let implemented_by = self.convert_types(&raw.implemented_by);
        let inherited_from = raw.inherited_from.as_ref().map(|t| self.convert_type(t));

        let kind = DeclKind::from_mask(raw.kind.unwrap_or(0));
        let declaration = Declaration {
            source_id: raw.id,
            name: raw.name.clone().unwrap_or_default(),
            kind,
            parent: None,
            children,
            ty,
            signatures,
            get_signatures,
            set_signatures,
            index_signature,
            parameters,
            type_parameters,
            comment: raw.comment.as_ref().map(|c| Comment {
                short_text: c.short_text.clone(),
                text: c.text.clone(),
                returns: c.returns.clone(),
                tags: c
                    .tags
                    .iter()
                    .map(|t| TagEntry {
                        tag: t.tag.clone(),
                        text: t.text.clone().unwrap_or_default(),
                    })
                    .collect(),
            }),
            flags: raw.flags.map_or_else(Flags::default, |f| Flags {
                is_abstract: f.is_abstract,
                is_private: f.is_private,
                is_protected: f.is_protected,
                is_public: f.is_public,
                is_external: f.is_external,
                is_static: f.is_static,
                is_optional: f.is_optional,
                is_rest: f.is_rest,
            }),
            groups: Vec::new(),
            categories: Vec::new(),
            extended_types,
            implemented_types,
            extended_by,
            implemented_by,
            inherited_from,
            default_value: raw.default_value.clone(),
            reference_target: None,
            sources: raw
                .sources
                .iter()
                .map(|s| SourceRef {
                    file_name: s.file_name.clone(),
                    line: s.line,
                    character: s.character,
                })
                .collect(),
        };

        let id = NodeId::new(self.nodes.len());
        self.nodes.push(declaration);

        if kind == DeclKind::Reference {
            // A reference carries its target's identity, either in an
            // explicit target field or in its own id.
            if let Some(target) = raw.target.or(raw.id) {
                self.reference_patches.push((id, target));
            }
        } else if let Some(source_id) = raw.id {
            self.by_source_id.entry(source_id).or_insert(id);
        }

        if !raw.groups.is_empty() || !raw.categories.is_empty() {
            self.group_patches.push((id, &raw.groups, &raw.categories));
        }

        id
    }

    fn intern_all(&mut self, raws: &'a [RawNode]) -> Vec<NodeId> {
        raws.iter().map(|raw| self.intern(raw)).collect()
    }

    fn convert_types(&mut self, raws: &'a [RawType]) -> Vec<TypeExpr> {
        raws.iter().map(|raw| self.convert_type(raw)).collect()
    }

    fn convert_type(&mut self, raw: &'a RawType) -> TypeExpr {
        let name = || raw.name.clone().unwrap_or_default();
        match raw.tag.as_deref() {
            Some("array") => TypeExpr::Array {
                element: self.convert_boxed(raw.element_type.as_deref()),
            },
            Some("indexedAccess") => TypeExpr::IndexedAccess {
                object: self.convert_boxed(raw.object_type.as_deref()),
                index: self.convert_boxed(raw.index_type.as_deref()),
            },
            Some("intersection") => TypeExpr::Intersection {
                types: self.convert_types(&raw.types),
            },
            Some("intrinsic") => TypeExpr::Intrinsic { name: name() },
            Some("literal" | "stringLiteral") => TypeExpr::Literal {
                value: raw.value.clone(),
            },
            Some("named-tuple-member") => TypeExpr::NamedTupleMember {
                name: name(),
                element: self.convert_boxed(raw.element.as_deref()),
            },
            Some("predicate") => TypeExpr::Predicate {
                name: name(),
                target: self.convert_boxed(raw.target_type.as_deref()),
            },
            Some("query") => TypeExpr::Query {
                target: self.convert_boxed(raw.query_type.as_deref()),
            },
            Some("reference") => TypeExpr::Reference {
                name: name(),
                source_id: raw.id,
                target: None,
                type_arguments: self.convert_types(&raw.type_arguments),
            },
            Some("reflection") => match raw.declaration.as_deref() {
                Some(declaration) => TypeExpr::Reflection {
                    declaration: self.intern(declaration),
                },
                None => TypeExpr::Unknown { name: name() },
            },
            Some("rest") => TypeExpr::Rest {
                element: self.convert_boxed(raw.element_type.as_deref()),
            },
            Some("tuple") => TypeExpr::Tuple {
                elements: self.convert_types(&raw.elements),
            },
            Some("typeOperator") => TypeExpr::Operator {
                operator: raw.operator.clone().unwrap_or_default(),
                target: self.convert_boxed(raw.target.as_deref()),
            },
            Some("union") => TypeExpr::Union {
                types: self.convert_types(&raw.types),
            },
            Some("typeParameter") => TypeExpr::TypeParameterRef {
                name: name(),
                source_id: raw.id,
                declaration: None,
                constraint: raw
                    .constraint
                    .as_deref()
                    .map(|c| Box::new(self.convert_type(c))),
            },
            Some("unknown") => TypeExpr::Unknown { name: name() },
            Some("void") => TypeExpr::Void,
            Some(tag) => TypeExpr::Unsupported {
                tag: tag.to_string(),
            },
            None => TypeExpr::Unknown { name: name() },
        }
    }

    fn convert_boxed(&mut self, raw: Option<&'a RawType>) -> Box<TypeExpr> {
        Box::new(match raw {
            Some(raw) => self.convert_type(raw),
            None => TypeExpr::Unknown {
                name: String::new(),
            },
        })
    }
}
