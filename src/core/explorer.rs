//! Breadcrumb navigation over a category tree snapshot
//!
//! The explorer owns a single piece of state: the current root-to-node
//! path. Every navigation action recomputes the path wholesale and replaces
//! it in one assignment; the path is never patched in place. All misuse
//! (unknown id, up at the root, out-of-range breadcrumb index) degrades to
//! a no-op or a clamp rather than an error: the explorer operates on an
//! already-loaded snapshot and has nothing to retry.

use crate::core::tree::{CategoryTree, TreeNode, ROOT};

/// Items that can be filed under a category, such as products
pub trait Categorized {
    /// Id of the category this item belongs to, if any
    fn category_id(&self) -> Option<&str>;
}

/// What is visible at the current level: subcategories then items
pub struct Listing<'t, 'i, T> {
    /// Children of the current node, in tree order
    pub folders: Vec<&'t TreeNode>,
    /// Items filed directly under the current node, in input order
    pub files: Vec<&'i T>,
}

/// Navigator over a read-only [`CategoryTree`]
pub struct Explorer<'t> {
    tree: &'t CategoryTree,
    /// Root-first breadcrumb; invariant: non-empty, starts at the root
    path: Vec<usize>,
}

impl<'t> Explorer<'t> {
    /// Start a session at the root of the given tree
    pub fn new(tree: &'t CategoryTree) -> Self {
        Self {
            tree,
            path: vec![ROOT],
        }
    }

    /// The tree this session navigates
    pub fn tree(&self) -> &'t CategoryTree {
        self.tree
    }

    /// Current breadcrumb, root-first
    pub fn path(&self) -> impl Iterator<Item = &'t TreeNode> + '_ {
        self.path.iter().map(|&idx| self.tree.node(idx))
    }

    /// Number of segments in the breadcrumb (always at least 1)
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// The node the session currently sits on
    pub fn current(&self) -> &'t TreeNode {
        self.tree.node(self.current_index())
    }

    fn current_index(&self) -> usize {
        *self.path.last().expect("path is never empty")
    }

    /// Whether the session is at the root
    pub fn at_root(&self) -> bool {
        self.path.len() == 1
    }

    /// Navigate to the category with the given id.
    ///
    /// Returns `false` and leaves the path untouched when the id does not
    /// resolve; on success the whole path is replaced in one assignment.
    pub fn navigate_to(&mut self, id: &str) -> bool {
        match self.tree.path_to(id) {
            Some(new_path) => {
                self.path = new_path;
                true
            }
            None => false,
        }
    }

    /// Navigate to the parent of the current node.
    ///
    /// At the root this is a no-op; returns whether anything moved.
    pub fn navigate_up(&mut self) -> bool {
        if self.path.len() > 1 {
            self.path.pop();
            true
        } else {
            false
        }
    }

    /// Jump to a breadcrumb segment, truncating the path to `index + 1`.
    ///
    /// Out-of-range indices are clamped to the last segment.
    pub fn jump_to_segment(&mut self, index: usize) {
        let index = index.min(self.path.len() - 1);
        self.path.truncate(index + 1);
    }

    /// What is visible at the current level.
    ///
    /// Folders are the current node's children in tree order; files are the
    /// items whose category id equals the current node's id, in input
    /// order. Items filed under a category missing from the tree never
    /// appear anywhere. Pure filter, recomputed on every call.
    pub fn list_current<'i, T: Categorized>(&self, items: &'i [T]) -> Listing<'t, 'i, T> {
        let current_idx = self.current_index();
        let current_id = self.tree.node(current_idx).id.as_str();

        let folders = self.tree.children(current_idx).collect();
        let files = items
            .iter()
            .filter(|item| item.category_id() == Some(current_id))
            .collect();

        Listing { folders, files }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tree::{CategoryRecord, ROOT_NAME};

    struct Item {
        id: &'static str,
        category_id: &'static str,
    }

    impl Categorized for Item {
        fn category_id(&self) -> Option<&str> {
            Some(self.category_id)
        }
    }

    fn sample_tree() -> CategoryTree {
        CategoryTree::build(vec![
            CategoryRecord::new("1", "Electronics", None),
            CategoryRecord::new("1-1", "Computers", Some("1")),
            CategoryRecord::new("1-2", "Phones", Some("1")),
            CategoryRecord::new("1-3", "Accessories", Some("1")),
            CategoryRecord::new("1-3-1", "Cables", Some("1-3")),
            CategoryRecord::new("1-3-2", "Chargers", Some("1-3")),
            CategoryRecord::new("2", "Furniture", None),
            CategoryRecord::new("3", "Stationery", None),
        ])
    }

    fn breadcrumb(explorer: &Explorer) -> Vec<String> {
        explorer.path().map(|n| n.name.clone()).collect()
    }

    #[test]
    fn test_session_starts_at_root() {
        let tree = sample_tree();
        let explorer = Explorer::new(&tree);
        assert!(explorer.at_root());
        assert_eq!(breadcrumb(&explorer), vec![ROOT_NAME]);
    }

    #[test]
    fn test_navigate_to_builds_full_breadcrumb() {
        let tree = sample_tree();
        let mut explorer = Explorer::new(&tree);

        assert!(explorer.navigate_to("1-3-1"));
        assert_eq!(
            breadcrumb(&explorer),
            vec![ROOT_NAME, "Electronics", "Accessories", "Cables"]
        );

        assert!(explorer.navigate_up());
        assert_eq!(
            breadcrumb(&explorer),
            vec![ROOT_NAME, "Electronics", "Accessories"]
        );
    }

    #[test]
    fn test_navigate_to_unknown_id_keeps_path() {
        let tree = sample_tree();
        let mut explorer = Explorer::new(&tree);
        explorer.navigate_to("1-3");
        let before = breadcrumb(&explorer);

        assert!(!explorer.navigate_to("does-not-exist"));
        assert_eq!(breadcrumb(&explorer), before);
    }

    #[test]
    fn test_navigate_up_at_root_is_noop() {
        let tree = sample_tree();
        let mut explorer = Explorer::new(&tree);

        assert!(!explorer.navigate_up());
        assert!(!explorer.navigate_up());
        assert_eq!(breadcrumb(&explorer), vec![ROOT_NAME]);
    }

    #[test]
    fn test_navigate_down_then_up_restores_path() {
        let tree = sample_tree();
        let mut explorer = Explorer::new(&tree);
        explorer.navigate_to("1-3");
        let before = breadcrumb(&explorer);

        // "1-3-1" is an immediate child of the current node
        explorer.navigate_to("1-3-1");
        explorer.navigate_up();
        assert_eq!(breadcrumb(&explorer), before);
    }

    #[test]
    fn test_jump_to_segment_zero_is_root() {
        let tree = sample_tree();
        let mut explorer = Explorer::new(&tree);
        explorer.navigate_to("1-3-1");

        explorer.jump_to_segment(0);
        assert_eq!(breadcrumb(&explorer), vec![ROOT_NAME]);
    }

    #[test]
    fn test_jump_to_segment_truncates() {
        let tree = sample_tree();
        let mut explorer = Explorer::new(&tree);
        explorer.navigate_to("1-3-1");

        explorer.jump_to_segment(1);
        assert_eq!(breadcrumb(&explorer), vec![ROOT_NAME, "Electronics"]);
    }

    #[test]
    fn test_jump_to_segment_clamps_out_of_range() {
        let tree = sample_tree();
        let mut explorer = Explorer::new(&tree);
        explorer.navigate_to("1-3");
        let before = breadcrumb(&explorer);

        explorer.jump_to_segment(99);
        assert_eq!(breadcrumb(&explorer), before);
    }

    #[test]
    fn test_list_current_filters_files_in_input_order() {
        let tree = sample_tree();
        let mut explorer = Explorer::new(&tree);
        explorer.navigate_to("1-3-1");

        let items = [
            Item { id: "p5", category_id: "1-3-1" },
            Item { id: "p6", category_id: "1-3-1" },
            Item { id: "p12", category_id: "3" },
        ];
        let listing = explorer.list_current(&items);

        assert!(listing.folders.is_empty());
        let ids: Vec<&str> = listing.files.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["p5", "p6"]);
    }

    #[test]
    fn test_list_current_folders_in_tree_order() {
        let tree = sample_tree();
        let mut explorer = Explorer::new(&tree);
        explorer.navigate_to("1");

        let listing = explorer.list_current::<Item>(&[]);
        let names: Vec<&str> = listing.folders.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Accessories", "Computers", "Phones"]);
    }

    #[test]
    fn test_orphaned_item_never_displays() {
        let tree = sample_tree();
        let explorer = Explorer::new(&tree);

        let items = [Item { id: "px", category_id: "not-a-category" }];
        let listing = explorer.list_current(&items);
        assert!(listing.files.is_empty());
    }
}
