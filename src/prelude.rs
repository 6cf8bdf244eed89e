pub use crate::{
    CursorPosition, DragPhase, DragTree, DropDecision, DropOutcome, DropRejection, Modifiers,
    NodePatch, NodeRecord, Placement, PointerButton, PointerEvent, Snapshot, Traversal,
    TreeConfig, TreeEvent, TreeGlyphs, TreeLabelRenderer, TreeLevel, TreeListener, TreeNode,
    TreePath, TreeSurface, TreeView, TreeViewState, TreeViewStyle,
};

#[cfg(feature = "mouse")]
pub use crate::handle_mouse;
