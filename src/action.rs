use std::rc::Rc;

use crate::cursor::CursorPosition;
use crate::drag::DropDecision;
use crate::input::PointerEvent;
use crate::model::NodeRecord;
use crate::node::TreeNode;

/// Published tree value. Earlier snapshots stay valid after later mutations.
pub type Snapshot<D> = Rc<Vec<NodeRecord<D>>>;

/// Observer of tree mutations and gestures. Every method defaults to a no-op.
pub trait TreeListener<D> {
    /// A mutation published a new tree.
    fn tree_replaced(&mut self, _nodes: &Snapshot<D>) {}
    /// A `select` call finished; `selected` is the full resulting set.
    fn selection_changed(&mut self, _selected: &[TreeNode<D>], _event: Option<&PointerEvent>) {}
    /// A drop passed validation; returning [`DropDecision::Veto`] cancels it.
    fn before_drop(
        &mut self,
        _dragging: &[TreeNode<D>],
        _position: &CursorPosition<D>,
    ) -> DropDecision {
        DropDecision::Allow
    }
    /// Dragged nodes were moved to `position`.
    fn dropped(
        &mut self,
        _dragging: &[TreeNode<D>],
        _position: &CursorPosition<D>,
        _event: Option<&PointerEvent>,
    ) {
    }
    /// A node's expansion flag flipped; `node` is the state before the flip.
    fn toggled(&mut self, _node: &TreeNode<D>, _event: Option<&PointerEvent>) {}
    /// Something foreign to this tree is dragged over it.
    fn external_drag_over(&mut self, _position: Option<&CursorPosition<D>>, _event: &PointerEvent) {
    }
    /// Something foreign to this tree was dropped on it.
    fn external_drop(&mut self, _position: Option<&CursorPosition<D>>, _event: &PointerEvent) {}
}

impl<D> TreeListener<D> for () {}

/// Recorded listener notification.
#[derive(Clone, Debug, PartialEq)]
pub enum TreeEvent<D = ()> {
    TreeReplaced(Snapshot<D>),
    SelectionChanged(Vec<TreeNode<D>>),
    BeforeDrop {
        dragging: Vec<TreeNode<D>>,
        position: CursorPosition<D>,
    },
    Dropped {
        dragging: Vec<TreeNode<D>>,
        position: CursorPosition<D>,
    },
    Toggled(TreeNode<D>),
    ExternalDragOver(Option<CursorPosition<D>>),
    ExternalDrop(Option<CursorPosition<D>>),
}

/// Collects every notification in order; never vetoes a drop.
impl<D: Clone> TreeListener<D> for Vec<TreeEvent<D>> {
    fn tree_replaced(&mut self, nodes: &Snapshot<D>) {
        self.push(TreeEvent::TreeReplaced(Rc::clone(nodes)));
    }

    fn selection_changed(&mut self, selected: &[TreeNode<D>], _event: Option<&PointerEvent>) {
        self.push(TreeEvent::SelectionChanged(selected.to_vec()));
    }

    fn before_drop(
        &mut self,
        dragging: &[TreeNode<D>],
        position: &CursorPosition<D>,
    ) -> DropDecision {
        self.push(TreeEvent::BeforeDrop {
            dragging: dragging.to_vec(),
            position: position.clone(),
        });
        DropDecision::Allow
    }

    fn dropped(
        &mut self,
        dragging: &[TreeNode<D>],
        position: &CursorPosition<D>,
        _event: Option<&PointerEvent>,
    ) {
        self.push(TreeEvent::Dropped {
            dragging: dragging.to_vec(),
            position: position.clone(),
        });
    }

    fn toggled(&mut self, node: &TreeNode<D>, _event: Option<&PointerEvent>) {
        self.push(TreeEvent::Toggled(node.clone()));
    }

    fn external_drag_over(&mut self, position: Option<&CursorPosition<D>>, _event: &PointerEvent) {
        self.push(TreeEvent::ExternalDragOver(position.cloned()));
    }

    fn external_drop(&mut self, position: Option<&CursorPosition<D>>, _event: &PointerEvent) {
        self.push(TreeEvent::ExternalDrop(position.cloned()));
    }
}
