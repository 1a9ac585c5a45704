//! Lookup and ancestor-chain traversal over the symbol graph

use super::{masks, DeclKind, NodeId, SymbolGraph};

/// Narrowing applied by [`SymbolGraph::find_by_name`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindFilter {
    /// Keep candidates whose kind mask intersects the given mask
    Mask(u32),
    /// Keep static properties and methods
    Static,
    /// Keep instance properties, methods and accessors
    Instance,
    /// Keep candidates carrying a matching explicit `@label`
    Label(String),
}

impl KindFilter {
    /// Interpret a link-grammar selector
    ///
    /// System selectors map to kind masks; an all-uppercase selector is a
    /// user-defined label.
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector {
            "project" | "module" => Some(Self::Mask(1)),
            "namespace" => Some(Self::Mask(2)),
            "enum" => Some(Self::Mask(4)),
            "variable" => Some(Self::Mask(32)),
            "function" => Some(Self::Mask(64)),
            "class" => Some(Self::Mask(128)),
            "interface" => Some(Self::Mask(256)),
            "type" => Some(Self::Mask(4_194_304)),
            "static" => Some(Self::Static),
            "instance" => Some(Self::Instance),
            label if !label.is_empty() && label.chars().all(|c| c.is_ascii_uppercase() || c == '_') => {
                Some(Self::Label(label.to_string()))
            }
            _ => None,
        }
    }
}

impl SymbolGraph {
    /// Find the declaration carrying the given engine-assigned identity
    ///
    /// Reference nodes share their target's identity and are never
    /// returned here.
    pub fn find_by_id(&self, source_id: u64) -> Option<NodeId> {
        self.by_source_id().get(&source_id).copied()
    }

    /// Display name of a node
    ///
    /// Module nodes display as their source-path basename with
    /// surrounding quotes and a trailing `.d` suffix stripped; every
    /// other node displays as its declared name.
    pub fn display_name(&self, id: NodeId) -> String {
        let node = self.node(id);
        if node.kind == DeclKind::Module {
            self.module_name(id)
        } else {
            node.name.clone()
        }
    }

    /// Short name of the module enclosing `id`
    pub fn module_name(&self, id: NodeId) -> String {
        let node = self.node(id);
        if node.kind == DeclKind::Module {
            let trimmed = node
                .name
                .trim_matches('"')
                .trim_end_matches(".d")
                .to_string();
            match trimmed.rsplit('/').next() {
                Some(base) if !base.is_empty() => base.to_string(),
                _ => trimmed,
            }
        } else {
            match self.parent(id) {
                Some(parent) => self.module_name(parent),
                None => String::new(),
            }
        }
    }

    /// Collect every node in the subtree whose display name matches
    ///
    /// The search descends `children` edges only, in declaration order.
    pub fn find_all_by_name(&self, name: &str, scope: Option<NodeId>) -> Vec<NodeId> {
        let mut result = Vec::new();
        self.collect_by_name(name, scope.unwrap_or_else(|| self.root()), &mut result);
        result
    }

    fn collect_by_name(&self, name: &str, current: NodeId, result: &mut Vec<NodeId>) {
        if self.display_name(current) == name {
            result.push(current);
        }
        for &child in &self.node(current).children {
            self.collect_by_name(name, child, result);
        }
    }

    /// Resolve a possibly-ambiguous name to a single node
    ///
    /// Candidates are ranked by kind mask, descending, so collisions
    /// resolve deterministically; the filter then narrows the survivors.
    pub fn find_by_name(
        &self,
        name: &str,
        scope: Option<NodeId>,
        filter: Option<&KindFilter>,
    ) -> Option<NodeId> {
        let mut candidates = self.find_all_by_name(name, scope);
        candidates.sort_by(|a, b| self.node(*b).kind.mask().cmp(&self.node(*a).kind.mask()));
        if let Some(filter) = filter {
            candidates.retain(|&id| self.matches_filter(id, filter));
        }
        candidates.first().copied()
    }

    fn matches_filter(&self, id: NodeId, filter: &KindFilter) -> bool {
        let node = self.node(id);
        match filter {
            KindFilter::Mask(mask) => node.kind.mask() & mask != 0,
            KindFilter::Static => {
                node.kind.mask() & masks::STATIC_MEMBER != 0 && node.flags.is_static
            }
            KindFilter::Instance => {
                node.kind.mask() & masks::INSTANCE_MEMBER != 0 && !node.flags.is_static
            }
            KindFilter::Label(label) => node
                .comment
                .as_ref()
                .and_then(|c| c.tags.iter().find(|t| t.tag == "label"))
                .is_some_and(|t| t.text.trim() == label),
        }
    }

    /// Ancestor chain `[node, parent, grandparent, …, root]`
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::graph_from_json;
    use serde_json::json;

    #[test]
    fn find_by_id_skips_references() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [
                { "id": 7, "name": "alias", "kind": 16_777_216 },
                { "id": 7, "name": "Target", "kind": 128 },
            ],
        }));
        let found = graph.find_by_id(7).unwrap();
        assert_eq!(graph.node(found).kind, DeclKind::Class);
        assert_eq!(graph.node(found).name, "Target");
    }

    #[test]
    fn name_collision_resolves_by_kind_rank() {
        // A type alias (mask 4194304) outranks a variable (mask 32).
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [
                { "id": 1, "name": "Config", "kind": 32 },
                { "id": 2, "name": "Config", "kind": 4_194_304 },
            ],
        }));
        let found = graph.find_by_name("Config", None, None).unwrap();
        assert_eq!(graph.node(found).kind, DeclKind::TypeAlias);

        let narrowed = graph
            .find_by_name("Config", None, Some(&KindFilter::Mask(32)))
            .unwrap();
        assert_eq!(graph.node(narrowed).kind, DeclKind::Variable);
    }

    #[test]
    fn static_and_instance_filters() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{
                "id": 1, "name": "Widget", "kind": 128,
                "children": [
                    { "id": 2, "name": "create", "kind": 2048, "flags": { "isStatic": true } },
                    { "id": 3, "name": "create", "kind": 2048 },
                ],
            }],
        }));
        let stat = graph
            .find_by_name("create", None, Some(&KindFilter::Static))
            .unwrap();
        assert!(graph.node(stat).flags.is_static);
        let inst = graph
            .find_by_name("create", None, Some(&KindFilter::Instance))
            .unwrap();
        assert!(!graph.node(inst).flags.is_static);
    }

    #[test]
    fn ancestor_chain_ends_at_root() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{
                "id": 1, "name": "Widget", "kind": 128,
                "children": [{ "id": 2, "name": "render", "kind": 2048 }],
            }],
        }));
        let method = graph.find_by_id(2).unwrap();
        let chain = graph.ancestors(method);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[2], graph.root());
        assert_eq!(graph.parent(method), Some(graph.find_by_id(1).unwrap()));
    }

    #[test]
    fn module_display_name_strips_path_and_suffix() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{ "id": 1, "name": "\"src/widgets/core.d\"", "kind": 1 }],
        }));
        let module = graph.find_by_id(1).unwrap();
        assert_eq!(graph.display_name(module), "core");
    }

    #[test]
    fn selector_parsing() {
        assert_eq!(KindFilter::from_selector("class"), Some(KindFilter::Mask(128)));
        assert_eq!(KindFilter::from_selector("static"), Some(KindFilter::Static));
        assert_eq!(
            KindFilter::from_selector("WITH_NUMBERS"),
            Some(KindFilter::Label("WITH_NUMBERS".to_string()))
        );
        assert_eq!(KindFilter::from_selector("lowercase"), None);
    }
}
