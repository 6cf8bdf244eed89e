use crate::model::{NodeRecord, node_siblings};
use crate::path::TreePath;

/// Display-ready projection of a [`NodeRecord`] at a given position.
///
/// Projections are ephemeral: they are rebuilt from the current snapshot and
/// become stale after any mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode<D = ()> {
    pub title: String,
    pub is_leaf: bool,
    /// Projected children; empty when the node is collapsed.
    pub children: Vec<TreeNode<D>>,
    pub is_expanded: bool,
    pub is_selected: bool,
    pub is_draggable: bool,
    pub is_selectable: bool,
    pub is_visible: bool,
    pub data: D,
    pub path: TreePath,
    /// Canonical string form of `path`.
    pub path_str: String,
    pub level: usize,
    pub ind: usize,
    pub is_first_child: bool,
    pub is_last_child: bool,
}

impl<D: Clone> TreeNode<D> {
    /// Projects `record`, located at `path` inside a sibling list of `siblings_len`.
    ///
    /// `is_visible` must already account for every ancestor; it is passed down
    /// instead of recomputed so walks stay linear per level.
    pub fn from_record(
        record: &NodeRecord<D>,
        path: TreePath,
        siblings_len: usize,
        is_visible: bool,
    ) -> Self {
        Self::shallow(record, path, siblings_len, is_visible).with_children(record)
    }

    // Projection without `children`; walks use it to stay linear.
    pub(crate) fn shallow(
        record: &NodeRecord<D>,
        path: TreePath,
        siblings_len: usize,
        is_visible: bool,
    ) -> Self {
        let ind = path.last().unwrap_or(0);
        Self {
            title: record.title.clone(),
            is_leaf: record.is_leaf,
            children: Vec::new(),
            is_expanded: record.expanded_or_default(),
            is_selected: record.is_selected,
            is_draggable: record.draggable_or_default(),
            is_selectable: record.selectable_or_default(),
            is_visible,
            data: record.data.clone(),
            path_str: path.key(),
            level: path.level(),
            ind,
            is_first_child: ind == 0,
            is_last_child: ind + 1 == siblings_len,
            path,
        }
    }

    /// Projects the children of `record` into a node built from it.
    pub(crate) fn with_children(mut self, record: &NodeRecord<D>) -> Self {
        if self.is_expanded {
            self.children = project_level(record.child_records(), &self.path, self.is_visible);
        }
        self
    }
}

impl<D> TreeNode<D> {
    /// Returns `true` if the pointer may drop something inside this node.
    #[inline]
    pub const fn accepts_inside(&self) -> bool {
        !self.is_leaf
    }
}

/// Projects the node at `path`, or `None` if the path does not resolve.
pub fn project<D: Clone>(nodes: &[NodeRecord<D>], path: &[usize]) -> Option<TreeNode<D>> {
    let siblings = node_siblings(nodes, path)?;
    let ind = *path.last()?;
    let record = siblings.get(ind)?;
    Some(TreeNode::from_record(
        record,
        TreePath::from_slice(path),
        siblings.len(),
        is_visible(nodes, path),
    ))
}

/// Projects a whole sibling list whose parent sits at `parent`.
pub fn project_level<D: Clone>(
    records: &[NodeRecord<D>],
    parent: &TreePath,
    is_visible: bool,
) -> Vec<TreeNode<D>> {
    records
        .iter()
        .enumerate()
        .map(|(ind, record)| {
            TreeNode::from_record(record, parent.child(ind), records.len(), is_visible)
        })
        .collect()
}

/// Returns `true` if every strict ancestor of `path` is expanded.
///
/// Root-level nodes are always visible; an unresolvable ancestor reads as hidden.
pub fn is_visible<D>(nodes: &[NodeRecord<D>], path: &[usize]) -> bool {
    if path.len() < 2 {
        return true;
    }
    let mut level = nodes;
    for idx in &path[..path.len() - 1] {
        let Some(record) = level.get(*idx) else {
            return false;
        };
        if !record.expanded_or_default() {
            return false;
        }
        level = record.child_records();
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<NodeRecord> {
        vec![
            NodeRecord::leaf("A"),
            NodeRecord::new("B")
                .expanded(false)
                .with_children(vec![NodeRecord::leaf("C"), NodeRecord::leaf("D")]),
        ]
    }

    #[test]
    fn projects_position_fields() {
        let nodes = sample();
        let node = project(&nodes, &[1]).expect("node B");
        assert_eq!(node.title, "B");
        assert_eq!(node.level, 1);
        assert_eq!(node.ind, 1);
        assert_eq!(node.path_str, "[1]");
        assert!(!node.is_first_child);
        assert!(node.is_last_child);
        assert!(node.is_draggable);
        assert!(node.is_selectable);
    }

    #[test]
    fn collapsed_node_has_no_projected_children() {
        let nodes = sample();
        let node = project(&nodes, &[1]).expect("node B");
        assert!(!node.is_expanded);
        assert!(node.children.is_empty());
    }

    #[test]
    fn children_of_collapsed_node_are_hidden() {
        let nodes = sample();
        let node = project(&nodes, &[1, 1]).expect("node D");
        assert!(!node.is_visible);
        assert!(node.is_last_child);
        assert_eq!(node.level, 2);
    }

    #[test]
    fn expanded_children_are_materialized() {
        let mut nodes = sample();
        nodes[1].is_expanded = Some(true);
        let node = project(&nodes, &[1]).expect("node B");
        let titles: Vec<_> = node.children.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "D"]);
        assert_eq!(node.children[1].path, TreePath::from([1, 1]));
        assert!(node.children[0].is_visible);
    }

    #[test]
    fn projected_path_round_trips() {
        let nodes = sample();
        for path in [vec![0], vec![1], vec![1, 0], vec![1, 1]] {
            let node = project(&nodes, &path).expect("resolvable");
            assert_eq!(node.path.as_slice(), path.as_slice());
            assert_eq!(node.level, path.len());
        }
    }

    #[test]
    fn out_of_range_is_not_found() {
        let nodes = sample();
        assert!(project(&nodes, &[2]).is_none());
        assert!(project(&nodes, &[0, 0]).is_none());
        assert!(project(&nodes, &[]).is_none());
    }
}
