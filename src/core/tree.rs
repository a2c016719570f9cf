//! Category hierarchy built from flat category records
//!
//! Categories are stored on disk as flat records linked by parent id. This
//! module assembles them into an in-memory arena: nodes addressed by index,
//! parent/child expressed as id and index references rather than owning
//! pointers. A synthetic "All Categories" root aggregates the top-level
//! categories so every session starts from a single well-known node.
//!
//! The tree is a read-only snapshot. Records whose parent id does not
//! resolve are kept in the arena but never linked under a node, so they do
//! not appear in any listing and cannot be reached by [`CategoryTree::find`].

use std::collections::HashMap;

/// Reserved id of the synthetic root node
pub const ROOT_ID: &str = "root";

/// Display name of the synthetic root node
pub const ROOT_NAME: &str = "All Categories";

/// Flat input record for tree construction
#[derive(Debug, Clone)]
pub struct CategoryRecord {
    pub id: String,
    pub name: String,
    /// Parent category id; `None` marks a top-level category
    pub parent_id: Option<String>,
    /// Explicit ordering among siblings; records without one sort last
    pub display_order: Option<i64>,
}

impl CategoryRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: parent_id.map(str::to_string),
            display_order: None,
        }
    }
}

/// One node in the category arena
#[derive(Debug)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    /// Id of the parent node; `None` only for the synthetic root
    pub parent_id: Option<String>,
    children: Vec<usize>,
}

impl TreeNode {
    /// Whether this node has any linked children
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Arena of category nodes with a single synthetic root at index 0
#[derive(Debug)]
pub struct CategoryTree {
    nodes: Vec<TreeNode>,
    by_id: HashMap<String, usize>,
}

/// Index of the root node in every arena
pub const ROOT: usize = 0;

impl CategoryTree {
    /// Build a tree from flat records.
    ///
    /// Siblings are ordered by `display_order` ascending with absent values
    /// last, ties broken by name. Duplicate ids keep the first record seen.
    pub fn build(records: impl IntoIterator<Item = CategoryRecord>) -> Self {
        let mut records: Vec<CategoryRecord> = records.into_iter().collect();
        records.sort_by(|a, b| {
            let ka = (a.display_order.is_none(), a.display_order, a.name.as_str());
            let kb = (b.display_order.is_none(), b.display_order, b.name.as_str());
            ka.cmp(&kb)
        });

        let mut nodes = vec![TreeNode {
            id: ROOT_ID.to_string(),
            name: ROOT_NAME.to_string(),
            parent_id: None,
            children: Vec::new(),
        }];
        let mut by_id = HashMap::new();
        by_id.insert(ROOT_ID.to_string(), ROOT);

        // Allocate every record first so parent links can resolve in any order
        for record in &records {
            if by_id.contains_key(&record.id) {
                continue;
            }
            let idx = nodes.len();
            nodes.push(TreeNode {
                id: record.id.clone(),
                name: record.name.clone(),
                parent_id: Some(
                    record
                        .parent_id
                        .clone()
                        .unwrap_or_else(|| ROOT_ID.to_string()),
                ),
                children: Vec::new(),
            });
            by_id.insert(record.id.clone(), idx);
        }

        // Link children in sorted order; unresolvable parents stay unlinked
        for idx in 1..nodes.len() {
            let parent_idx = nodes[idx]
                .parent_id
                .as_deref()
                .and_then(|pid| by_id.get(pid).copied());
            if let Some(parent_idx) = parent_idx {
                if parent_idx != idx {
                    nodes[parent_idx].children.push(idx);
                }
            }
        }

        Self { nodes, by_id }
    }

    /// Build an empty tree containing only the synthetic root
    pub fn empty() -> Self {
        Self::build(std::iter::empty())
    }

    /// Get a node by arena index
    pub fn node(&self, idx: usize) -> &TreeNode {
        &self.nodes[idx]
    }

    /// Get the synthetic root node
    pub fn root(&self) -> &TreeNode {
        &self.nodes[ROOT]
    }

    /// Number of nodes in the arena, including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Children of a node, in tree order
    pub fn children(&self, idx: usize) -> impl Iterator<Item = &TreeNode> {
        self.nodes[idx].children.iter().map(|&c| &self.nodes[c])
    }

    /// Child indices of a node, in tree order
    pub fn child_indices(&self, idx: usize) -> &[usize] {
        &self.nodes[idx].children
    }

    /// Depth-first search for a node by id, in tree order.
    ///
    /// A miss is a normal outcome; nodes not linked under the root are
    /// never found.
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.find_index(id).map(|idx| &self.nodes[idx])
    }

    /// Depth-first search returning the arena index
    pub fn find_index(&self, id: &str) -> Option<usize> {
        self.dfs(ROOT, id)
    }

    fn dfs(&self, idx: usize, id: &str) -> Option<usize> {
        if self.nodes[idx].id == id {
            return Some(idx);
        }
        for &child in &self.nodes[idx].children {
            if let Some(found) = self.dfs(child, id) {
                return Some(found);
            }
        }
        None
    }

    /// Root-first path of arena indices from the root to the node with the
    /// given id.
    ///
    /// Returns `None` when the id cannot be resolved. The upward walk stops
    /// silently when a parent id resolves to no node, and is bounded by the
    /// arena size so a malformed snapshot cannot loop.
    pub fn path_to(&self, id: &str) -> Option<Vec<usize>> {
        let target = self.find_index(id)?;

        let mut path = vec![target];
        let mut current = target;
        for _ in 0..self.nodes.len() {
            let Some(parent_id) = self.nodes[current].parent_id.as_deref() else {
                break;
            };
            let Some(&parent_idx) = self.by_id.get(parent_id) else {
                break;
            };
            path.push(parent_idx);
            current = parent_idx;
        }

        path.reverse();
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<CategoryRecord> {
        vec![
            CategoryRecord {
                display_order: Some(1),
                ..CategoryRecord::new("1", "Electronics", None)
            },
            CategoryRecord::new("1-1", "Computers", Some("1")),
            CategoryRecord::new("1-2", "Phones", Some("1")),
            CategoryRecord::new("1-3", "Accessories", Some("1")),
            CategoryRecord::new("1-3-1", "Cables", Some("1-3")),
            CategoryRecord::new("1-3-2", "Chargers", Some("1-3")),
            CategoryRecord {
                display_order: Some(2),
                ..CategoryRecord::new("2", "Furniture", None)
            },
            CategoryRecord::new("2-1", "Office", Some("2")),
            CategoryRecord::new("2-2", "Home", Some("2")),
            CategoryRecord::new("3", "Stationery", None),
            CategoryRecord::new("4", "Lighting", None),
        ]
    }

    #[test]
    fn test_root_aggregates_top_level() {
        let tree = CategoryTree::build(sample_records());
        let names: Vec<&str> = tree.children(ROOT).map(|n| n.name.as_str()).collect();
        // Explicit display_order first, then the rest by name
        assert_eq!(names, vec!["Electronics", "Furniture", "Lighting", "Stationery"]);
    }

    #[test]
    fn test_display_order_beats_name() {
        let records = vec![
            CategoryRecord {
                display_order: Some(5),
                ..CategoryRecord::new("a", "Aardvark", None)
            },
            CategoryRecord {
                display_order: Some(1),
                ..CategoryRecord::new("z", "Zebra", None)
            },
        ];
        let tree = CategoryTree::build(records);
        let names: Vec<&str> = tree.children(ROOT).map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Zebra", "Aardvark"]);
    }

    #[test]
    fn test_find_present_and_absent() {
        let tree = CategoryTree::build(sample_records());
        assert_eq!(tree.find("1-3-1").unwrap().name, "Cables");
        assert_eq!(tree.find(ROOT_ID).unwrap().name, ROOT_NAME);
        assert!(tree.find("does-not-exist").is_none());
    }

    #[test]
    fn test_path_to_runs_root_to_target() {
        let tree = CategoryTree::build(sample_records());
        let path = tree.path_to("1-3-1").unwrap();
        let names: Vec<&str> = path.iter().map(|&i| tree.node(i).name.as_str()).collect();
        assert_eq!(names, vec![ROOT_NAME, "Electronics", "Accessories", "Cables"]);

        // Every adjacent pair satisfies the parent/child relation
        for pair in path.windows(2) {
            let (parent, child) = (tree.node(pair[0]), tree.node(pair[1]));
            assert_eq!(child.parent_id.as_deref(), Some(parent.id.as_str()));
        }
    }

    #[test]
    fn test_path_to_unknown_id_is_none() {
        let tree = CategoryTree::build(sample_records());
        assert!(tree.path_to("nope").is_none());
    }

    #[test]
    fn test_orphan_is_unreachable() {
        let mut records = sample_records();
        records.push(CategoryRecord::new("9", "Ghost", Some("missing-parent")));
        let tree = CategoryTree::build(records);

        // Allocated but never linked: DFS cannot reach it
        assert!(tree.find("9").is_none());
        assert!(tree.path_to("9").is_none());
        assert!(!tree.children(ROOT).any(|n| n.id == "9"));
    }

    #[test]
    fn test_cycle_does_not_loop() {
        let records = vec![
            CategoryRecord::new("a", "A", Some("b")),
            CategoryRecord::new("b", "B", Some("a")),
            CategoryRecord::new("1", "Top", None),
        ];
        let tree = CategoryTree::build(records);

        // The cycle members never attach under the root
        assert!(tree.find("a").is_none());
        assert!(tree.find("b").is_none());
        assert_eq!(tree.children(ROOT).count(), 1);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let records = vec![
            CategoryRecord::new("1", "First", None),
            CategoryRecord::new("1", "Second", None),
        ];
        let tree = CategoryTree::build(records);
        assert_eq!(tree.find("1").unwrap().name, "First");
        assert_eq!(tree.children(ROOT).count(), 1);
    }

    #[test]
    fn test_empty_tree_has_only_root() {
        let tree = CategoryTree::empty();
        assert!(tree.is_empty());
        assert_eq!(tree.root().name, ROOT_NAME);
        assert_eq!(tree.children(ROOT).count(), 0);
    }
}
