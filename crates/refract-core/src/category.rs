//! Category and group organization for member listings

use std::cmp::Ordering;

use crate::graph::{Group, NodeId, SymbolGraph};

/// A named subgroup of sibling symbols
#[derive(Debug, Clone)]
pub struct Category {
    /// Kind mask of the group this category belongs to
    pub kind: u32,
    /// Empty for the implicit untitled category
    pub title: String,
    pub children: Vec<NodeId>,
}

/// Sort categories by title, forcing "Other" last
pub fn sort_other_last(categories: &mut [Category]) {
    categories.sort_by(|a, b| {
        if a.title == b.title {
            Ordering::Equal
        } else if a.title == "Other" {
            Ordering::Greater
        } else if b.title == "Other" {
            Ordering::Less
        } else {
            a.title.cmp(&b.title)
        }
    });
}

/// Display rank of a group kind in a member index
///
/// Constructors come first, then types, members, type aliases, enums
/// and functions; anything unrecognized trails.
fn group_rank(kind: u32) -> usize {
    match kind {
        1 | 2 => 0,
        512 => 1,
        128 | 256 => 2,
        32 | 1024 | 2048 | 262_144 | 524_288 | 1_048_576 => 3,
        4_194_304 => 4,
        4 => 5,
        64 => 6,
        16_777_216 => 11,
        _ => 100,
    }
}

/// Partition a container's groups into display-ordered collections
///
/// Groups sharing a rank (methods and accessors, say) form one
/// collection so their index is considered together.
pub fn sort_groups(groups: &[Group]) -> Vec<Vec<&Group>> {
    let mut buckets: Vec<Vec<&Group>> = Vec::new();
    for group in groups {
        let rank = group_rank(group.kind);
        if buckets.len() <= rank {
            buckets.resize_with(rank + 1, Vec::new);
        }
        buckets[rank].push(group);
    }
    buckets.retain(|bucket| !bucket.is_empty());
    buckets
}

impl SymbolGraph {
    /// Topic breakdown of a container's children for one kind mask
    ///
    /// Uses the precomputed group categories when present, merging
    /// same-titled categories across groups that share the mask;
    /// otherwise one implicit untitled category holds all matching
    /// children in declaration order.
    pub fn categories_of(&self, id: NodeId, kind: u32) -> Vec<Category> {
        let node = self.node(id);
        let matching: Vec<&Group> =
            node.groups.iter().filter(|g| g.kind & kind != 0).collect();
        if matching.is_empty() {
            if !node.categories.is_empty() {
                let mut result: Vec<Category> = node
                    .categories
                    .iter()
                    .map(|c| Category {
                        kind,
                        title: c.title.clone(),
                        children: c.children.clone(),
                    })
                    .collect();
                sort_other_last(&mut result);
                return result;
            }
            return vec![Category {
                kind,
                title: String::new(),
                children: node
                    .children
                    .iter()
                    .copied()
                    .filter(|&child| self.node(child).kind.mask() & kind != 0)
                    .collect(),
            }];
        }

        let mut result: Vec<Category> = Vec::new();
        for group in &matching {
            let partial: Vec<Category> = if group.categories.is_empty() {
                vec![Category {
                    kind,
                    title: String::new(),
                    children: group.children.clone(),
                }]
            } else {
                group
                    .categories
                    .iter()
                    .map(|c| Category {
                        kind,
                        title: c.title.clone(),
                        children: c.children.clone(),
                    })
                    .collect()
            };
            for category in partial {
                match result.iter_mut().find(|c| c.title == category.title) {
                    Some(existing) => existing.children.extend(category.children),
                    None => result.push(category),
                }
            }
        }
        sort_other_last(&mut result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::graph_from_json;
    use serde_json::json;

    #[test]
    fn other_category_sorts_last() {
        let mut categories = vec![
            Category { kind: 2048, title: "Other".to_string(), children: vec![] },
            Category { kind: 2048, title: "Zoom".to_string(), children: vec![] },
            Category { kind: 2048, title: "Editing".to_string(), children: vec![] },
        ];
        sort_other_last(&mut categories);
        let titles: Vec<&str> = categories.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Editing", "Zoom", "Other"]);
    }

    #[test]
    fn group_collections_follow_display_order() {
        let groups = vec![
            Group { kind: 64, title: "Functions".to_string(), children: vec![], categories: vec![] },
            Group { kind: 512, title: "Constructors".to_string(), children: vec![], categories: vec![] },
            Group { kind: 2048, title: "Methods".to_string(), children: vec![], categories: vec![] },
            Group { kind: 262_144, title: "Accessors".to_string(), children: vec![], categories: vec![] },
        ];
        let sorted = sort_groups(&groups);
        assert_eq!(sorted.len(), 3);
        assert_eq!(sorted[0][0].kind, 512);
        // Methods and accessors share one collection.
        assert_eq!(sorted[1].len(), 2);
        assert_eq!(sorted[2][0].kind, 64);
    }

    #[test]
    fn implicit_category_preserves_declaration_order() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{
                "id": 1, "name": "Widget", "kind": 128,
                "children": [
                    { "id": 2, "name": "zoom", "kind": 2048 },
                    { "id": 3, "name": "init", "kind": 2048 },
                ],
            }],
        }));
        let widget = graph.find_by_id(1).unwrap();
        let categories = graph.categories_of(widget, 2048);
        assert_eq!(categories.len(), 1);
        assert!(categories[0].title.is_empty());
        let names: Vec<&str> = categories[0]
            .children
            .iter()
            .map(|&id| graph.node(id).name.as_str())
            .collect();
        assert_eq!(names, ["zoom", "init"]);
    }

    #[test]
    fn shared_mask_groups_merge_categories_by_title() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{
                "id": 1, "name": "Widget", "kind": 128,
                "children": [
                    { "id": 2, "name": "zoom", "kind": 2048 },
                    { "id": 3, "name": "crop", "kind": 2048 },
                    { "id": 4, "name": "lens", "kind": 262_144 },
                ],
                "groups": [
                    {
                        "kind": 2048, "title": "Methods", "children": [2, 3],
                        "categories": [
                            { "title": "Camera", "children": [2] },
                            { "title": "Editing", "children": [3] },
                        ],
                    },
                    {
                        "kind": 262_144, "title": "Accessors", "children": [4],
                        "categories": [
                            { "title": "Camera", "children": [4] },
                        ],
                    },
                ],
            }],
        }));
        let widget = graph.find_by_id(1).unwrap();
        let categories = graph.categories_of(widget, 2048 | 262_144);
        let titles: Vec<&str> = categories.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Camera", "Editing"]);
        let camera: Vec<&str> = categories[0]
            .children
            .iter()
            .map(|&id| graph.node(id).name.as_str())
            .collect();
        assert_eq!(camera, ["zoom", "lens"]);
    }

    #[test]
    fn precomputed_group_categories_resolve_and_sort() {
        let graph = graph_from_json(json!({
            "id": 0, "name": "root", "kind": 0,
            "children": [{
                "id": 1, "name": "Widget", "kind": 128,
                "children": [
                    { "id": 2, "name": "zoom", "kind": 2048 },
                    { "id": 3, "name": "init", "kind": 2048 },
                ],
                "groups": [{
                    "kind": 2048, "title": "Methods", "children": [2, 3],
                    "categories": [
                        { "title": "Other", "children": [3] },
                        { "title": "Camera", "children": [2] },
                    ],
                }],
            }],
        }));
        let widget = graph.find_by_id(1).unwrap();
        let categories = graph.categories_of(widget, 2048);
        let titles: Vec<&str> = categories.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Camera", "Other"]);
        assert_eq!(graph.node(categories[0].children[0]).name, "zoom");
    }
}
