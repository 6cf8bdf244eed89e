//! Drag-and-drop tree engine with a ratatui front end.
//!
//! The tree is a nested list of [`NodeRecord`]s addressed by index paths.
//! [`DragTree`] owns the published snapshot and runs selection, pointer drag
//! gestures, auto-scroll and copy-on-write mutations; [`TreeView`] renders it
//! and doubles as the hit-testing [`TreeSurface`].
//!
//! Feature flags:
//! - `mouse`: crossterm mouse event adapter ([`handle_mouse`]).
//! - `serde`: serde support for records, paths, placements and modifiers.

mod action;
mod config;
mod context;
mod cursor;
mod drag;
mod glyphs;
mod input;
mod level;
mod model;
#[cfg(feature = "mouse")]
mod mouse;
mod node;
mod path;
pub mod prelude;
mod scroll;
mod selection;
mod style;
mod traverse;
mod tree;
mod widget;

pub use action::{Snapshot, TreeEvent, TreeListener};
pub use config::{ConfigError, TreeConfig, TreeConfigBuilder, parse_multiselect_key};
pub use context::TreeRowContext;
pub use cursor::{
    CursorPosition, NodeElement, Placement, SurfaceRect, TreeSurface, placement_for,
    resolve_cursor,
};
pub use drag::{DragPhase, DragState, DropDecision, DropOutcome, DropRejection, check_drop};
pub use glyphs::{TitleLabel, TreeGlyphs, TreeLabelRenderer, tree_label_line};
pub use input::{Modifiers, PointerButton, PointerEvent};
pub use level::TreeLevel;
pub use model::{NodePatch, NodeRecord, node_siblings, record_at};
#[cfg(feature = "mouse")]
pub use mouse::{handle_mouse, modifiers, pointer_button, pointer_event};
pub use node::{TreeNode, is_visible, project, project_level};
pub use path::{TreePath, compare_paths, is_ancestor};
pub use scroll::{AutoScroll, SCROLL_INTERVAL, scroll_speed};
pub use selection::{SelectionMode, apply_selection, draggable_nodes, selected_nodes};
pub use style::TreeViewStyle;
pub use traverse::{
    Traversal, TreeWalk, first_node, last_node, next_node, prev_node, remove_where, traverse,
    traverse_mut,
};
pub use tree::DragTree;
pub use widget::{TreeView, TreeViewState};
