use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Positional address of a node: one sibling index per tree level.
///
/// Paths are invalidated by any structural mutation (insert, remove, move).
/// Re-resolve them from a fresh snapshot instead of caching them across edits.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TreePath(SmallVec<[usize; 8]>);

impl TreePath {
    /// Creates an empty path (the position above the root level).
    pub fn root() -> Self {
        Self(SmallVec::new())
    }

    /// Creates a path from a slice of sibling indices.
    pub fn from_slice(indices: &[usize]) -> Self {
        Self(SmallVec::from_slice(indices))
    }

    /// Returns the indices as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Returns the depth of the addressed node (root-level nodes have depth 1).
    #[inline]
    pub fn level(&self) -> usize {
        self.0.len()
    }

    /// Returns the index of the node within its sibling list.
    #[inline]
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Returns the parent path, or `None` for the empty path.
    pub fn parent(&self) -> Option<Self> {
        let (_, head) = self.0.split_last()?;
        Some(Self::from_slice(head))
    }

    /// Returns the path of the `index`-th child of this node.
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.0.push(index);
        path
    }

    /// Returns a sibling path with the last index replaced.
    pub fn with_last(&self, index: usize) -> Self {
        let mut path = self.clone();
        if let Some(last) = path.0.last_mut() {
            *last = index;
        }
        path
    }

    /// Appends an index in place.
    pub fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    /// Removes the last index in place.
    pub fn pop(&mut self) -> Option<usize> {
        self.0.pop()
    }

    /// Canonical string form used for equality lookups (`[1,0]`).
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Returns `true` when `self` is `other` or one of its ancestors.
    #[inline]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        is_ancestor(self, other)
    }

    // Bumps the index at `parent.len()` when this path lives under `parent` at
    // or after `at`. Used to follow sources across a sibling insertion.
    pub(crate) fn shift_after_insert(&mut self, parent: &[usize], at: usize, count: usize) {
        let depth = parent.len();
        if self.0.len() > depth && self.0[..depth] == *parent && self.0[depth] >= at {
            self.0[depth] += count;
        }
    }

    // Position of this path once the records at `removed` (original
    // coordinates) are deleted, or `None` when it is deleted with them.
    pub(crate) fn after_removal<'a, I>(&self, removed: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a [usize]>,
    {
        let mut shifted = self.clone();
        for path in removed {
            if is_ancestor(path, self) {
                return None;
            }
            let Some((last, parent)) = path.split_last() else {
                continue;
            };
            let depth = parent.len();
            if self.0.len() > depth && self.0[..depth] == *parent && self.0[depth] > *last {
                shifted.0[depth] -= 1;
            }
        }
        Some(shifted)
    }
}

impl Deref for TreePath {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[usize]> for TreePath {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

impl From<&[usize]> for TreePath {
    fn from(indices: &[usize]) -> Self {
        Self::from_slice(indices)
    }
}

impl<const N: usize> From<[usize; N]> for TreePath {
    fn from(indices: [usize; N]) -> Self {
        Self::from_slice(&indices)
    }
}

impl From<Vec<usize>> for TreePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(SmallVec::from_vec(indices))
    }
}

impl FromIterator<usize> for TreePath {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (idx, value) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

impl PartialOrd for TreePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreePath {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_paths(self, other)
    }
}

/// Orders two paths in display (pre-order) order.
///
/// Indices are compared over the shared prefix; when one path is a strict
/// prefix of the other, the shorter one (the ancestor) sorts first.
///
/// ```
/// use std::cmp::Ordering;
/// use tui_dragtree::compare_paths;
///
/// assert_eq!(compare_paths(&[1, 2, 3], &[1, 2, 4]), Ordering::Less);
/// assert_eq!(compare_paths(&[1, 2, 3], &[1, 1, 3]), Ordering::Greater);
/// assert_eq!(compare_paths(&[1, 2], &[1, 2, 0]), Ordering::Less);
/// ```
pub fn compare_paths(a: &[usize], b: &[usize]) -> Ordering {
    for (left, right) in a.iter().zip(b) {
        match left.cmp(right) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
    }
    a.len().cmp(&b.len())
}

/// Returns `true` if `path` starts with `candidate` (including equality).
///
/// Dropping a node onto any path for which this holds would create a cycle.
pub fn is_ancestor(candidate: &[usize], path: &[usize]) -> bool {
    path.len() >= candidate.len() && path[..candidate.len()] == *candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_paths_compare_equal() {
        assert_eq!(compare_paths(&[0, 3, 1], &[0, 3, 1]), Ordering::Equal);
        assert_eq!(compare_paths(&[], &[]), Ordering::Equal);
    }

    #[test]
    fn prefix_sorts_before_descendants() {
        assert_eq!(compare_paths(&[1], &[1, 0]), Ordering::Less);
        assert_eq!(compare_paths(&[1, 0, 5], &[1]), Ordering::Greater);
        assert_eq!(compare_paths(&[0, 9, 9], &[1]), Ordering::Less);
    }

    #[test]
    fn ancestor_check_matches_prefix() {
        assert!(is_ancestor(&[0], &[0, 0]));
        assert!(is_ancestor(&[0], &[0]));
        assert!(!is_ancestor(&[0, 1], &[0]));
        assert!(!is_ancestor(&[1], &[0, 1]));
    }

    #[test]
    fn display_uses_array_form() {
        assert_eq!(TreePath::from([1, 0, 12]).key(), "[1,0,12]");
        assert_eq!(TreePath::root().to_string(), "[]");
    }

    #[test]
    fn parent_and_child_navigation() {
        let path = TreePath::from([2, 4]);
        assert_eq!(path.parent(), Some(TreePath::from([2])));
        assert_eq!(path.child(1), TreePath::from([2, 4, 1]));
        assert_eq!(path.with_last(0), TreePath::from([2, 0]));
        assert_eq!(TreePath::root().parent(), None);
    }

    #[test]
    fn shift_only_moves_later_siblings() {
        let mut later = TreePath::from([1, 3, 0]);
        later.shift_after_insert(&[1], 2, 2);
        assert_eq!(later, TreePath::from([1, 5, 0]));

        let mut earlier = TreePath::from([1, 1]);
        earlier.shift_after_insert(&[1], 2, 2);
        assert_eq!(earlier, TreePath::from([1, 1]));

        let mut elsewhere = TreePath::from([0, 4]);
        elsewhere.shift_after_insert(&[1], 0, 1);
        assert_eq!(elsewhere, TreePath::from([0, 4]));
    }

    #[test]
    fn removal_shifts_by_earlier_removed_siblings() {
        let anchor = TreePath::from([2, 3]);
        let removed: [&[usize]; 3] = [&[0], &[2, 1], &[2, 5]];
        assert_eq!(anchor.after_removal(removed), Some(TreePath::from([1, 2])));
        assert_eq!(anchor.after_removal([[2].as_slice()]), None);
        assert_eq!(anchor.after_removal([[2, 3].as_slice()]), None);
        assert_eq!(anchor.after_removal([[2, 3, 0].as_slice()]), Some(anchor.clone()));
    }
}
