use crate::cursor::CursorPosition;
use crate::model::record_at;
use crate::node::{TreeNode, is_visible, project_level};
use crate::path::TreePath;
use crate::tree::DragTree;

/// One nested level of a tree: the children of the node at `parent`.
///
/// Levels borrow the root [`DragTree`]; cursor and drag state are always read
/// from it, so a drag started in any level is visible from every other one.
#[derive(Clone, Debug)]
pub struct TreeLevel<'a, D> {
    root: &'a DragTree<D>,
    parent: TreePath,
}

impl<'a, D: Clone> TreeLevel<'a, D> {
    pub(crate) const fn new(root: &'a DragTree<D>, parent: TreePath) -> Self {
        Self { root, parent }
    }

    #[inline]
    pub const fn root(&self) -> &'a DragTree<D> {
        self.root
    }

    /// Path of the node owning this level (empty for the root level).
    #[inline]
    pub const fn parent_path(&self) -> &TreePath {
        &self.parent
    }

    /// Depth of the parent node; `0` for the root level.
    #[inline]
    pub fn level(&self) -> usize {
        self.parent.level()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_empty()
    }

    /// Projected nodes of this level; empty when the parent is collapsed.
    pub fn nodes(&self) -> Vec<TreeNode<D>> {
        let nodes = self.root.nodes();
        if self.is_root() {
            return project_level(nodes, &self.parent, true);
        }
        let Some(parent) = record_at(nodes, &self.parent) else {
            return Vec::new();
        };
        if !parent.expanded_or_default() {
            return Vec::new();
        }
        // Children of an expanded parent are visible iff the parent is.
        let visible = is_visible(nodes, &self.parent);
        project_level(parent.child_records(), &self.parent, visible)
    }

    /// Level of the `ind`-th node of this level.
    pub fn child(&self, ind: usize) -> Self {
        Self::new(self.root, self.parent.child(ind))
    }

    #[inline]
    pub const fn cursor_position(&self) -> Option<&'a CursorPosition<D>> {
        self.root.cursor_position()
    }

    #[inline]
    pub const fn is_dragging(&self) -> bool {
        self.root.is_dragging()
    }

    /// Indentation slots drawn before this level's nodes, outermost last.
    ///
    /// With branch glyphs enabled the last slot is taken by the branch itself.
    pub fn gaps(&self) -> Vec<usize> {
        let mut count = self.level();
        if self.root.config().show_branches {
            count = count.saturating_sub(1);
        }
        (0..count).rev().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreeConfig;
    use crate::cursor::Placement;
    use crate::model::NodeRecord;
    use pretty_assertions::assert_eq;

    fn tree() -> DragTree {
        DragTree::new(vec![
            NodeRecord::new("A").with_children(vec![
                NodeRecord::new("A1").with_children(vec![NodeRecord::leaf("A1a")]),
            ]),
            NodeRecord::new("B")
                .expanded(false)
                .with_children(vec![NodeRecord::leaf("B1")]),
        ])
    }

    #[test]
    fn nested_levels_project_children() {
        let tree = tree();
        let root = tree.root_level();
        assert!(root.is_root());
        assert_eq!(root.nodes().len(), 2);

        let nested = root.child(0).child(0);
        assert_eq!(nested.level(), 2);
        let titles: Vec<_> = nested.nodes().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["A1a"]);
    }

    #[test]
    fn collapsed_parent_yields_no_nodes() {
        let tree = tree();
        assert!(tree.root_level().child(1).nodes().is_empty());
        assert!(tree.root_level().child(9).nodes().is_empty());
    }

    #[test]
    fn nested_levels_share_the_root_cursor() {
        let mut tree = tree();
        tree.select(&[0, 0, 0], false, None, &mut ());
        assert!(tree.root_level().child(0).cursor_position().is_none());
        let outcome = tree.drop_onto(&[1], Placement::Inside, &mut ());
        assert_eq!(outcome, crate::drag::DropOutcome::Committed);
        assert!(tree.root_level().child(0).child(0).nodes().is_empty());
        assert_eq!(tree.nodes()[1].child_records()[0].title, "A1a");
    }

    #[test]
    fn gaps_depend_on_branch_glyphs() {
        let plain = tree();
        assert_eq!(plain.root_level().gaps(), Vec::<usize>::new());
        assert_eq!(plain.root_level().child(0).child(0).gaps(), vec![1, 0]);

        let mut branches = tree();
        branches.set_config(TreeConfig::builder().show_branches(true).build().expect("config"));
        assert_eq!(branches.root_level().child(0).child(0).gaps(), vec![0]);
    }
}
