use crate::cursor::{CursorPosition, Placement};
use crate::node::TreeNode;
use crate::path::{TreePath, is_ancestor};
use crate::scroll::AutoScroll;

/// Gesture phase of the pointer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Primary button is down on a node; no movement yet.
    Armed { pressed: TreePath },
    Dragging,
}

/// Why a drop did not change the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropRejection {
    NoCursor,
    NothingToDrag,
    OntoSelf,
    IntoDescendant,
    InsideLeaf,
    Vetoed,
}

/// Result of a release or a programmatic drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// The dragged nodes were moved and the new tree was published.
    Committed,
    /// The drag ended without a structural change.
    Rejected(DropRejection),
    /// Release without a drag: the target was selected.
    Clicked,
    Ignored,
}

/// Answer of a listener to a pending drop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DropDecision {
    #[default]
    Allow,
    Veto,
}

/// Drag context of one tree, shared by all of its nested levels.
#[derive(Clone, Debug)]
pub struct DragState<D> {
    pub(crate) phase: DragPhase,
    pub(crate) cursor: Option<CursorPosition<D>>,
    pub(crate) last_pointer: (f64, f64),
    // Set when a drag started with nothing draggable; cleared on release.
    pub(crate) prevent_drag: bool,
    pub(crate) scroll: AutoScroll,
}

impl<D> Default for DragState<D> {
    fn default() -> Self {
        Self {
            phase: DragPhase::Idle,
            cursor: None,
            last_pointer: (0.0, 0.0),
            prevent_drag: false,
            scroll: AutoScroll::new(),
        }
    }
}

impl<D> DragState<D> {
    #[inline]
    pub const fn phase(&self) -> &DragPhase {
        &self.phase
    }

    #[inline]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging)
    }

    #[inline]
    pub const fn cursor(&self) -> Option<&CursorPosition<D>> {
        self.cursor.as_ref()
    }

    #[inline]
    pub const fn auto_scroll(&self) -> &AutoScroll {
        &self.scroll
    }

    pub(crate) fn arm(&mut self, pressed: TreePath, at: (f64, f64)) {
        self.phase = DragPhase::Armed { pressed };
        self.last_pointer = at;
    }

    /// Returns to idle: clears the cursor and tears down the scroll timer.
    pub(crate) fn reset(&mut self) {
        self.phase = DragPhase::Idle;
        self.cursor = None;
        self.scroll.stop();
    }
}

/// Checks that `dragging` may land at `position`.
///
/// Rejects drops onto a dragged node, into one of its descendants, or inside
/// a leaf.
pub fn check_drop<D>(
    dragging: &[TreeNode<D>],
    position: &CursorPosition<D>,
) -> Result<(), DropRejection> {
    if dragging.is_empty() {
        return Err(DropRejection::NothingToDrag);
    }
    let dest = &position.node;
    if position.placement == Placement::Inside && !dest.accepts_inside() {
        return Err(DropRejection::InsideLeaf);
    }
    for node in dragging {
        if node.path == dest.path {
            return Err(DropRejection::OntoSelf);
        }
        if is_ancestor(&node.path, &dest.path) {
            return Err(DropRejection::IntoDescendant);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeRecord;
    use crate::node::project;

    fn sample() -> Vec<NodeRecord> {
        vec![
            NodeRecord::new("A").with_children(vec![NodeRecord::leaf("A1")]),
            NodeRecord::new("B"),
            NodeRecord::leaf("C"),
        ]
    }

    fn at(nodes: &[NodeRecord], path: &[usize], placement: Placement) -> CursorPosition {
        CursorPosition {
            node: project(nodes, path).expect("node"),
            placement,
        }
    }

    #[test]
    fn rejects_self_and_descendants() {
        let nodes = sample();
        let dragging = vec![project(&nodes, &[0]).expect("A")];
        assert_eq!(
            check_drop(&dragging, &at(&nodes, &[0], Placement::Before)),
            Err(DropRejection::OntoSelf)
        );
        assert_eq!(
            check_drop(&dragging, &at(&nodes, &[0, 0], Placement::After)),
            Err(DropRejection::IntoDescendant)
        );
        assert_eq!(check_drop(&dragging, &at(&nodes, &[1], Placement::Inside)), Ok(()));
    }

    #[test]
    fn rejects_inside_leaf_and_empty_sets() {
        let nodes = sample();
        let dragging = vec![project(&nodes, &[1]).expect("B")];
        assert_eq!(
            check_drop(&dragging, &at(&nodes, &[2], Placement::Inside)),
            Err(DropRejection::InsideLeaf)
        );
        assert_eq!(
            check_drop::<()>(&[], &at(&nodes, &[2], Placement::After)),
            Err(DropRejection::NothingToDrag)
        );
    }

    #[test]
    fn reset_tears_down_timer() {
        let mut state = DragState::<()>::default();
        state.phase = DragPhase::Dragging;
        state.scroll.start(0.4);
        state.reset();
        assert_eq!(state.phase, DragPhase::Idle);
        assert!(!state.scroll.is_running());
        assert!(state.cursor.is_none());
    }
}
