#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Persisted node record owned by the caller.
///
/// The tree is a strict forest: each record lives in exactly one sibling list.
/// Absent `is_expanded`/`is_draggable`/`is_selectable` flags read as `true`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeRecord<D = ()> {
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_leaf: bool,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub children: Option<Vec<NodeRecord<D>>>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub is_expanded: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_selected: bool,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub is_draggable: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub is_selectable: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub data: D,
}

impl<D: Default> NodeRecord<D> {
    /// Creates a branch record with the given title and no children list.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_leaf: false,
            children: None,
            is_expanded: None,
            is_selected: false,
            is_draggable: None,
            is_selectable: None,
            data: D::default(),
        }
    }

    /// Creates a leaf record.
    pub fn leaf(title: impl Into<String>) -> Self {
        Self {
            is_leaf: true,
            ..Self::new(title)
        }
    }
}

impl<D> NodeRecord<D> {
    /// Replaces the children list.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = Some(children);
        self
    }

    /// Sets the payload.
    #[must_use]
    pub fn with_data(mut self, data: D) -> Self {
        self.data = data;
        self
    }

    /// Sets the expansion flag.
    #[must_use]
    pub const fn expanded(mut self, expanded: bool) -> Self {
        self.is_expanded = Some(expanded);
        self
    }

    /// Sets the selection flag.
    #[must_use]
    pub const fn selected(mut self, selected: bool) -> Self {
        self.is_selected = selected;
        self
    }

    /// Sets the draggable flag.
    #[must_use]
    pub const fn draggable(mut self, draggable: bool) -> Self {
        self.is_draggable = Some(draggable);
        self
    }

    /// Sets the selectable flag.
    #[must_use]
    pub const fn selectable(mut self, selectable: bool) -> Self {
        self.is_selectable = Some(selectable);
        self
    }

    #[inline]
    pub fn expanded_or_default(&self) -> bool {
        self.is_expanded.unwrap_or(true)
    }

    #[inline]
    pub fn draggable_or_default(&self) -> bool {
        self.is_draggable.unwrap_or(true)
    }

    #[inline]
    pub fn selectable_or_default(&self) -> bool {
        self.is_selectable.unwrap_or(true)
    }

    /// Returns the stored children (empty when the list is absent).
    #[inline]
    pub fn child_records(&self) -> &[Self] {
        self.children.as_deref().unwrap_or_default()
    }
}

/// Field overrides merged into a record by `DragTree::update_node`.
#[derive(Clone, Debug, PartialEq)]
pub struct NodePatch<D = ()> {
    pub title: Option<String>,
    pub is_leaf: Option<bool>,
    pub children: Option<Vec<NodeRecord<D>>>,
    pub is_expanded: Option<bool>,
    pub is_selected: Option<bool>,
    pub is_draggable: Option<bool>,
    pub is_selectable: Option<bool>,
    pub data: Option<D>,
}

impl<D> Default for NodePatch<D> {
    fn default() -> Self {
        Self {
            title: None,
            is_leaf: None,
            children: None,
            is_expanded: None,
            is_selected: None,
            is_draggable: None,
            is_selectable: None,
            data: None,
        }
    }
}

impl<D> NodePatch<D> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub const fn is_leaf(mut self, is_leaf: bool) -> Self {
        self.is_leaf = Some(is_leaf);
        self
    }

    #[must_use]
    pub fn children(mut self, children: Vec<NodeRecord<D>>) -> Self {
        self.children = Some(children);
        self
    }

    #[must_use]
    pub const fn is_expanded(mut self, expanded: bool) -> Self {
        self.is_expanded = Some(expanded);
        self
    }

    #[must_use]
    pub const fn is_selected(mut self, selected: bool) -> Self {
        self.is_selected = Some(selected);
        self
    }

    #[must_use]
    pub const fn is_draggable(mut self, draggable: bool) -> Self {
        self.is_draggable = Some(draggable);
        self
    }

    #[must_use]
    pub const fn is_selectable(mut self, selectable: bool) -> Self {
        self.is_selectable = Some(selectable);
        self
    }

    #[must_use]
    pub fn data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }

    /// Merges the set fields into `record`, leaving the others untouched.
    pub fn apply(self, record: &mut NodeRecord<D>) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(is_leaf) = self.is_leaf {
            record.is_leaf = is_leaf;
        }
        if let Some(children) = self.children {
            record.children = Some(children);
        }
        if self.is_expanded.is_some() {
            record.is_expanded = self.is_expanded;
        }
        if let Some(selected) = self.is_selected {
            record.is_selected = selected;
        }
        if self.is_draggable.is_some() {
            record.is_draggable = self.is_draggable;
        }
        if self.is_selectable.is_some() {
            record.is_selectable = self.is_selectable;
        }
        if let Some(data) = self.data {
            record.data = data;
        }
    }
}

/// Returns the record at `path`, or `None` if any index is out of range.
pub fn record_at<'a, D>(nodes: &'a [NodeRecord<D>], path: &[usize]) -> Option<&'a NodeRecord<D>> {
    let (first, rest) = path.split_first()?;
    let mut record = nodes.get(*first)?;
    for idx in rest {
        record = record.child_records().get(*idx)?;
    }
    Some(record)
}

pub(crate) fn record_at_mut<'a, D>(
    nodes: &'a mut [NodeRecord<D>],
    path: &[usize],
) -> Option<&'a mut NodeRecord<D>> {
    let (first, rest) = path.split_first()?;
    let mut record = nodes.get_mut(*first)?;
    for idx in rest {
        record = record.children.as_mut()?.get_mut(*idx)?;
    }
    Some(record)
}

/// Returns the sibling list that contains the node at `path`.
pub fn node_siblings<'a, D>(
    nodes: &'a [NodeRecord<D>],
    path: &[usize],
) -> Option<&'a [NodeRecord<D>]> {
    let (_, parent) = path.split_last()?;
    if parent.is_empty() {
        return Some(nodes);
    }
    Some(record_at(nodes, parent)?.child_records())
}

pub(crate) fn node_siblings_mut<'a, D>(
    nodes: &'a mut Vec<NodeRecord<D>>,
    path: &[usize],
) -> Option<&'a mut Vec<NodeRecord<D>>> {
    let (_, parent) = path.split_last()?;
    if parent.is_empty() {
        return Some(nodes);
    }
    record_at_mut(nodes, parent)?.children.as_mut()
}
