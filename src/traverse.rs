use crate::model::NodeRecord;
use crate::node::{TreeNode, project};
use crate::path::{TreePath, compare_paths};

/// Visitor verdict for a depth-first walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traversal {
    Continue,
    /// Halts the whole walk, not only the current subtree.
    Stop,
}

impl Traversal {
    #[inline]
    pub const fn is_stop(self) -> bool {
        matches!(self, Self::Stop)
    }
}

/// Walks every node in pre-order, sibling order.
///
/// Stored children are followed directly so collapsed subtrees are visited
/// too. Visited nodes carry no projected `children`; read them from the
/// record. Returns [`Traversal::Stop`] if the visitor stopped early.
pub fn traverse<D, F>(nodes: &[NodeRecord<D>], mut visitor: F) -> Traversal
where
    D: Clone,
    F: FnMut(&TreeNode<D>, &NodeRecord<D>) -> Traversal,
{
    let mut path = TreePath::root();
    walk(nodes, &mut path, true, &mut visitor)
}

fn walk<D, F>(
    records: &[NodeRecord<D>],
    path: &mut TreePath,
    is_visible: bool,
    visitor: &mut F,
) -> Traversal
where
    D: Clone,
    F: FnMut(&TreeNode<D>, &NodeRecord<D>) -> Traversal,
{
    for (ind, record) in records.iter().enumerate() {
        path.push(ind);
        let node = TreeNode::shallow(record, path.clone(), records.len(), is_visible);
        if visitor(&node, record).is_stop() {
            return Traversal::Stop;
        }
        let children_visible = is_visible && node.is_expanded;
        if walk(record.child_records(), path, children_visible, visitor).is_stop() {
            return Traversal::Stop;
        }
        path.pop();
    }
    Traversal::Continue
}

/// Same walk as [`traverse`], handing out mutable records.
///
/// Intended for the working copy of a copy-on-write edit. Children are
/// visited after the visitor ran on their parent, so edits to a parent's
/// children list are observed by the walk.
pub fn traverse_mut<D, F>(nodes: &mut [NodeRecord<D>], mut visitor: F) -> Traversal
where
    D: Clone,
    F: FnMut(&TreeNode<D>, &mut NodeRecord<D>) -> Traversal,
{
    let mut path = TreePath::root();
    walk_mut(nodes, &mut path, true, &mut visitor)
}

fn walk_mut<D, F>(
    records: &mut [NodeRecord<D>],
    path: &mut TreePath,
    is_visible: bool,
    visitor: &mut F,
) -> Traversal
where
    D: Clone,
    F: FnMut(&TreeNode<D>, &mut NodeRecord<D>) -> Traversal,
{
    let len = records.len();
    for (ind, record) in records.iter_mut().enumerate() {
        path.push(ind);
        let node = TreeNode::shallow(record, path.clone(), len, is_visible);
        if visitor(&node, record).is_stop() {
            return Traversal::Stop;
        }
        let children_visible = is_visible && record.expanded_or_default();
        if let Some(children) = record.children.as_mut()
            && walk_mut(children, path, children_visible, visitor).is_stop()
        {
            return Traversal::Stop;
        }
        path.pop();
    }
    Traversal::Continue
}

struct Frame<'a, D> {
    records: &'a [NodeRecord<D>],
    next: usize,
    is_visible: bool,
}

/// Lazy pre-order iterator over projected nodes.
///
/// A clone resumes from the same position; [`TreeWalk::new`] restarts from
/// the top of the snapshot.
pub struct TreeWalk<'a, D> {
    stack: Vec<Frame<'a, D>>,
    path: TreePath,
}

impl<D> Clone for Frame<'_, D> {
    fn clone(&self) -> Self {
        Self {
            records: self.records,
            next: self.next,
            is_visible: self.is_visible,
        }
    }
}

impl<D> Clone for TreeWalk<'_, D> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            path: self.path.clone(),
        }
    }
}

impl<'a, D> TreeWalk<'a, D> {
    pub fn new(nodes: &'a [NodeRecord<D>]) -> Self {
        Self {
            stack: vec![Frame {
                records: nodes,
                next: 0,
                is_visible: true,
            }],
            path: TreePath::root(),
        }
    }
}

impl<'a, D: Clone> TreeWalk<'a, D> {
    /// Yields each node without projected children, next to its record.
    pub(crate) fn with_records(
        mut self,
    ) -> impl Iterator<Item = (TreeNode<D>, &'a NodeRecord<D>)> {
        std::iter::from_fn(move || self.advance())
    }

    fn advance(&mut self) -> Option<(TreeNode<D>, &'a NodeRecord<D>)> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some(record) = frame.records.get(frame.next) else {
                self.stack.pop();
                // The frame's owner index is the last path component, if any.
                self.path.pop();
                continue;
            };
            let ind = frame.next;
            frame.next += 1;
            let siblings_len = frame.records.len();
            let is_visible = frame.is_visible;

            let mut path = self.path.clone();
            path.push(ind);
            let node = TreeNode::shallow(record, path, siblings_len, is_visible);
            let children = record.child_records();
            if !children.is_empty() {
                self.path.push(ind);
                self.stack.push(Frame {
                    records: children,
                    next: 0,
                    is_visible: is_visible && node.is_expanded,
                });
            }
            return Some((node, record));
        }
    }
}

impl<D: Clone> Iterator for TreeWalk<'_, D> {
    type Item = TreeNode<D>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().map(|(node, record)| node.with_children(record))
    }
}

/// Deletes every record whose original path satisfies `predicate`.
///
/// Siblings are visited last-to-first and children before their parent, so a
/// deletion never shifts a path that is still pending.
pub fn remove_where<D, F>(nodes: &mut Vec<NodeRecord<D>>, mut predicate: F)
where
    F: FnMut(&TreePath) -> bool,
{
    let mut path = TreePath::root();
    remove_level(nodes, &mut path, &mut predicate);
}

fn remove_level<D, F>(records: &mut Vec<NodeRecord<D>>, path: &mut TreePath, predicate: &mut F)
where
    F: FnMut(&TreePath) -> bool,
{
    for ind in (0..records.len()).rev() {
        path.push(ind);
        if let Some(children) = records[ind].children.as_mut() {
            remove_level(children, path, predicate);
        }
        if predicate(path) {
            records.remove(ind);
        }
        path.pop();
    }
}

/// Returns the first root-level node.
pub fn first_node<D: Clone>(nodes: &[NodeRecord<D>]) -> Option<TreeNode<D>> {
    TreeWalk::new(nodes).next()
}

/// Returns the last node in traversal order.
pub fn last_node<D: Clone>(nodes: &[NodeRecord<D>]) -> Option<TreeNode<D>> {
    let mut path = TreePath::root();
    let mut level = nodes;
    while let Some(record) = level.last() {
        path.push(level.len() - 1);
        level = record.child_records();
    }
    project(nodes, &path)
}

/// Returns the first node after `path` in traversal order that passes `filter`.
///
/// `filter` sees nodes without projected children, as in [`traverse`].
pub fn next_node<D, F>(nodes: &[NodeRecord<D>], path: &[usize], filter: F) -> Option<TreeNode<D>>
where
    D: Clone,
    F: Fn(&TreeNode<D>) -> bool,
{
    TreeWalk::new(nodes)
        .with_records()
        .filter(|(node, _)| compare_paths(&node.path, path).is_gt())
        .find(|(node, _)| filter(node))
        .map(|(node, record)| node.with_children(record))
}

/// Returns the closest node before `path` in traversal order that passes `filter`.
///
/// `filter` sees nodes without projected children, as in [`traverse`].
pub fn prev_node<D, F>(nodes: &[NodeRecord<D>], path: &[usize], filter: F) -> Option<TreeNode<D>>
where
    D: Clone,
    F: Fn(&TreeNode<D>) -> bool,
{
    let mut found = None;
    traverse(nodes, |node, _| {
        if compare_paths(&node.path, path).is_ge() {
            return Traversal::Stop;
        }
        if filter(node) {
            found = Some(node.path.clone());
        }
        Traversal::Continue
    });
    found.and_then(|path| project(nodes, &path))
}
