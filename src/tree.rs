use std::mem;
use std::rc::Rc;

use log::{debug, trace};
use rustc_hash::FxHashSet;

use crate::action::{Snapshot, TreeListener};
use crate::config::TreeConfig;
use crate::cursor::{CursorPosition, Placement, TreeSurface, resolve_cursor};
use crate::drag::{DragPhase, DragState, DropDecision, DropOutcome, DropRejection, check_drop};
use crate::input::PointerEvent;
use crate::level::TreeLevel;
use crate::model::{NodePatch, NodeRecord, node_siblings_mut, record_at, record_at_mut};
use crate::node::{TreeNode, project, project_level};
use crate::path::{TreePath, is_ancestor};
use crate::selection::{SelectionMode, apply_selection, draggable_nodes, selected_nodes};
use crate::traverse::{
    Traversal, first_node, last_node, next_node, prev_node, remove_where, traverse,
};

/// Owner of one tree: the published snapshot, selection anchor and drag context.
///
/// Every mutation deep-copies the published tree, edits the copy and swaps it
/// in before notifying the listener, so a snapshot taken earlier never
/// changes. Paths handed out before a structural mutation are stale after it.
#[derive(Debug)]
pub struct DragTree<D = ()> {
    nodes: Snapshot<D>,
    config: TreeConfig,
    // Path of the node passed to the last `select` call; anchors shift-ranges.
    anchor: Option<TreePath>,
    drag: DragState<D>,
}

impl<D: Clone> Default for DragTree<D> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<D: Clone> DragTree<D> {
    /// Creates a tree with the default configuration.
    pub fn new(nodes: Vec<NodeRecord<D>>) -> Self {
        Self::with_config(nodes, TreeConfig::default())
    }

    pub fn with_config(nodes: Vec<NodeRecord<D>>, config: TreeConfig) -> Self {
        Self {
            nodes: Rc::new(nodes),
            config,
            anchor: None,
            drag: DragState::default(),
        }
    }

    /// Returns the published tree.
    #[inline]
    pub fn nodes(&self) -> &[NodeRecord<D>] {
        &self.nodes
    }

    /// Returns a handle to the published tree that survives later mutations.
    pub fn snapshot(&self) -> Snapshot<D> {
        Rc::clone(&self.nodes)
    }

    #[inline]
    pub const fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TreeConfig) {
        self.config = config;
    }

    /// Replaces the tree with a caller-provided value without notifying.
    ///
    /// Any gesture in progress is cancelled since its paths no longer apply.
    pub fn set_nodes(&mut self, nodes: Vec<NodeRecord<D>>) {
        self.nodes = Rc::new(nodes);
        self.anchor = None;
        self.drag.reset();
    }

    /// Returns the drag context shared by every level of this tree.
    #[inline]
    pub const fn drag_state(&self) -> &DragState<D> {
        &self.drag
    }

    #[inline]
    pub const fn cursor_position(&self) -> Option<&CursorPosition<D>> {
        self.drag.cursor()
    }

    #[inline]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Path of the last node passed to `select`.
    #[inline]
    pub const fn last_selected(&self) -> Option<&TreePath> {
        self.anchor.as_ref()
    }

    /// View of the root level.
    pub fn root_level(&self) -> TreeLevel<'_, D> {
        TreeLevel::new(self, TreePath::root())
    }

    /// Projects the root level (collapsed nodes carry no projected children).
    pub fn projected(&self) -> Vec<TreeNode<D>> {
        project_level(&self.nodes, &TreePath::root(), true)
    }

    pub fn get_node(&self, path: &[usize]) -> Option<TreeNode<D>> {
        project(&self.nodes, path)
    }

    pub fn get_first_node(&self) -> Option<TreeNode<D>> {
        first_node(&self.nodes)
    }

    pub fn get_last_node(&self) -> Option<TreeNode<D>> {
        last_node(&self.nodes)
    }

    pub fn get_next_node<F>(&self, path: &[usize], filter: F) -> Option<TreeNode<D>>
    where
        F: Fn(&TreeNode<D>) -> bool,
    {
        next_node(&self.nodes, path, filter)
    }

    pub fn get_prev_node<F>(&self, path: &[usize], filter: F) -> Option<TreeNode<D>>
    where
        F: Fn(&TreeNode<D>) -> bool,
    {
        prev_node(&self.nodes, path, filter)
    }

    pub fn get_selected(&self) -> Vec<TreeNode<D>> {
        selected_nodes(&self.nodes)
    }

    pub fn get_draggable(&self) -> Vec<TreeNode<D>> {
        draggable_nodes(&self.nodes)
    }

    pub fn selection_size(&self) -> usize {
        self.get_selected().len()
    }

    pub fn drag_size(&self) -> usize {
        self.get_draggable().len()
    }

    /// Walks the published tree; see [`crate::traverse()`].
    pub fn traverse<F>(&self, visitor: F) -> Traversal
    where
        F: FnMut(&TreeNode<D>, &NodeRecord<D>) -> Traversal,
    {
        traverse(&self.nodes, visitor)
    }

    /// Selects the node at `path`, returning it, or `None` if it does not exist.
    ///
    /// The selection anchor moves to `path` even when the node is not
    /// selectable.
    pub fn select<L>(
        &mut self,
        path: &[usize],
        add_to_selection: bool,
        event: Option<&PointerEvent>,
        listener: &mut L,
    ) -> Option<TreeNode<D>>
    where
        L: TreeListener<D> + ?Sized,
    {
        let target = self.get_node(path)?;
        let anchor = self
            .anchor
            .as_ref()
            .filter(|anchor| record_at(&self.nodes, anchor).is_some());
        let mode = SelectionMode::resolve(&self.config, add_to_selection, event, anchor);
        trace!("select {} mode={mode:?}", target.path);

        let mut next = self.working_copy();
        let selected = apply_selection(&mut next, &target.path, mode);
        self.anchor = Some(target.path.clone());
        self.publish(next, listener);
        listener.selection_changed(&selected, event);
        Some(target)
    }

    /// Merges `patch` into the record at `path`. Returns `false` if absent.
    ///
    /// Replacing the children of an ancestor of the selection anchor clears
    /// the anchor.
    pub fn update_node<L>(&mut self, path: &[usize], patch: NodePatch<D>, listener: &mut L) -> bool
    where
        L: TreeListener<D> + ?Sized,
    {
        if record_at(&self.nodes, path).is_none() {
            return false;
        }
        let mut next = self.working_copy();
        let Some(record) = record_at_mut(&mut next, path) else {
            return false;
        };
        if patch.children.is_some()
            && self
                .anchor
                .as_ref()
                .is_some_and(|anchor| anchor.len() > path.len() && is_ancestor(path, anchor))
        {
            self.anchor = None;
        }
        patch.apply(record);
        self.publish(next, listener);
        true
    }

    /// Removes the records at `paths` (original positions) in one pass.
    ///
    /// Absent paths are ignored. When none resolves, nothing is published.
    /// The selection anchor follows its node, or is cleared with it.
    pub fn remove<L, P>(&mut self, paths: &[P], listener: &mut L)
    where
        L: TreeListener<D> + ?Sized,
        P: AsRef<[usize]>,
    {
        let marked: FxHashSet<&[usize]> = paths
            .iter()
            .map(AsRef::as_ref)
            .filter(|path| record_at(&self.nodes, path).is_some())
            .collect();
        if marked.is_empty() {
            trace!("remove: no path resolves");
            return;
        }
        let mut next = self.working_copy();
        remove_where(&mut next, |path| marked.contains(path.as_slice()));
        debug!("removed {} path(s)", marked.len());
        self.anchor = self
            .anchor
            .take()
            .and_then(|anchor| anchor.after_removal(marked.iter().copied()));
        self.publish(next, listener);
    }

    /// Flips the expansion flag of the node at `path`.
    pub fn toggle<L>(
        &mut self,
        path: &[usize],
        event: Option<&PointerEvent>,
        listener: &mut L,
    ) -> Option<TreeNode<D>>
    where
        L: TreeListener<D> + ?Sized,
    {
        let node = self.get_node(path)?;
        self.update_node(path, NodePatch::new().is_expanded(!node.is_expanded), listener);
        listener.toggled(&node, event);
        Some(node)
    }

    /// Drops the current draggable selection at `path` without a pointer gesture.
    pub fn drop_onto<L>(
        &mut self,
        path: &[usize],
        placement: Placement,
        listener: &mut L,
    ) -> DropOutcome
    where
        L: TreeListener<D> + ?Sized,
    {
        let Some(node) = self.get_node(path) else {
            return DropOutcome::Rejected(DropRejection::NoCursor);
        };
        self.commit_drop(&CursorPosition { node, placement }, None, listener)
    }

    /// Primary-button press on the node at `path` arms a drag.
    pub fn on_node_mouse_down(&mut self, event: &PointerEvent, path: &[usize]) {
        if !event.is_primary() {
            return;
        }
        trace!("armed on {}", TreePath::from_slice(path));
        self.drag.arm(TreePath::from_slice(path), (event.x, event.y));
    }

    /// Pointer movement anywhere over the tree.
    pub fn on_mouse_move<S, L>(&mut self, event: &PointerEvent, surface: &S, listener: &mut L)
    where
        S: TreeSurface + ?Sized,
        L: TreeListener<D> + ?Sized,
    {
        if self.drag.prevent_drag {
            return;
        }
        let moved = !event.same_position(self.drag.last_pointer);
        self.drag.last_pointer = (event.x, event.y);

        let started = match &self.drag.phase {
            DragPhase::Dragging => None,
            DragPhase::Armed { pressed } if moved => Some(pressed.clone()),
            _ => return,
        };

        if let Some(pressed) = &started
            && self.get_node(pressed).is_some_and(|node| !node.is_selected)
        {
            self.select(pressed, false, Some(event), listener);
        }

        if self.get_draggable().is_empty() {
            debug!("nothing draggable, gesture blocked until release");
            self.drag.prevent_drag = true;
            return;
        }

        if started.is_some() {
            debug!("drag started with {} node(s)", self.drag_size());
        }
        self.drag.phase = DragPhase::Dragging;
        self.drag.cursor = self.cursor_at(event, surface);
        self.drag
            .scroll
            .follow(event.y, surface.bounds(), self.config.scroll_area_height());
    }

    /// Primary-button release over the node at `target` (or over no node).
    pub fn on_node_mouse_up<L>(
        &mut self,
        event: &PointerEvent,
        target: Option<&[usize]>,
        listener: &mut L,
    ) -> DropOutcome
    where
        L: TreeListener<D> + ?Sized,
    {
        if !event.is_primary() {
            return DropOutcome::Ignored;
        }
        let prevent = mem::take(&mut self.drag.prevent_drag);

        if !self.drag.is_dragging() {
            self.drag.reset();
            return match target {
                Some(path) if !prevent => self
                    .select(path, false, Some(event), listener)
                    .map_or(DropOutcome::Ignored, |_| DropOutcome::Clicked),
                _ => DropOutcome::Ignored,
            };
        }

        let outcome = match self.drag.cursor.clone() {
            Some(position) => self.commit_drop(&position, Some(event), listener),
            None => DropOutcome::Rejected(DropRejection::NoCursor),
        };
        self.drag.reset();
        outcome
    }

    /// Release caught outside every node element.
    pub fn on_document_mouse_up<L>(&mut self, event: &PointerEvent, listener: &mut L) -> DropOutcome
    where
        L: TreeListener<D> + ?Sized,
    {
        if self.drag.is_dragging() {
            return self.on_node_mouse_up(event, None, listener);
        }
        if event.is_primary() {
            self.drag.prevent_drag = false;
            self.drag.reset();
        }
        DropOutcome::Ignored
    }

    /// Pointer left the list while dragging: snap the cursor to the list end it left by.
    pub fn on_mouse_leave<S>(&mut self, event: &PointerEvent, surface: &S)
    where
        S: TreeSurface + ?Sized,
    {
        if !self.drag.is_dragging() {
            return;
        }
        let bounds = surface.bounds();
        if event.y >= bounds.bottom() {
            let last_root = self.nodes.len().checked_sub(1);
            self.drag.cursor = last_root.and_then(|ind| self.get_node(&[ind])).map(|node| {
                CursorPosition {
                    node,
                    placement: Placement::After,
                }
            });
        } else if event.y < bounds.top() {
            self.drag.cursor = self.get_first_node().map(|node| CursorPosition {
                node,
                placement: Placement::Before,
            });
        }
    }

    /// Advances the auto-scroll timer by one period; returns the scroll delta.
    pub fn on_tick<S>(&self, surface: &mut S) -> f64
    where
        S: TreeSurface + ?Sized,
    {
        if !self.drag.is_dragging() {
            return 0.0;
        }
        self.drag.scroll.tick(surface, self.config.max_scroll_speed())
    }

    /// Abandons the gesture in progress without touching the tree.
    pub fn cancel_drag(&mut self) {
        if self.drag.is_dragging() {
            debug!("drag cancelled");
        }
        self.drag.prevent_drag = false;
        self.drag.reset();
    }

    /// Foreign payload dragged over the list: report where it would land.
    pub fn on_external_drag_over<S, L>(
        &mut self,
        event: &PointerEvent,
        surface: &S,
        listener: &mut L,
    ) where
        S: TreeSurface + ?Sized,
        L: TreeListener<D> + ?Sized,
    {
        self.drag.cursor = self.cursor_at(event, surface);
        listener.external_drag_over(self.drag.cursor.as_ref(), event);
    }

    /// Foreign payload dropped on the list. The tree is left to the listener.
    pub fn on_external_drop<S, L>(&mut self, event: &PointerEvent, surface: &S, listener: &mut L)
    where
        S: TreeSurface + ?Sized,
        L: TreeListener<D> + ?Sized,
    {
        let position = self.cursor_at(event, surface);
        listener.external_drop(position.as_ref(), event);
        self.drag.cursor = None;
    }

    fn cursor_at<S>(&self, event: &PointerEvent, surface: &S) -> Option<CursorPosition<D>>
    where
        S: TreeSurface + ?Sized,
    {
        resolve_cursor(&self.nodes, surface, event.x, event.y, self.config.edge_size())
    }

    fn commit_drop<L>(
        &mut self,
        position: &CursorPosition<D>,
        event: Option<&PointerEvent>,
        listener: &mut L,
    ) -> DropOutcome
    where
        L: TreeListener<D> + ?Sized,
    {
        let dragging = self.get_draggable();
        if let Err(rejection) = check_drop(&dragging, position) {
            debug!("drop on {} rejected: {rejection:?}", position.node.path);
            return DropOutcome::Rejected(rejection);
        }
        if listener.before_drop(&dragging, position) == DropDecision::Veto {
            debug!("drop on {} vetoed", position.node.path);
            return DropOutcome::Rejected(DropRejection::Vetoed);
        }

        let sources: Vec<TreePath> = dragging.iter().map(|node| node.path.clone()).collect();
        let mut next = self.working_copy();
        if !move_records(&mut next, &sources, &position.node.path, position.placement) {
            return DropOutcome::Rejected(DropRejection::NoCursor);
        }
        debug!(
            "moved {} node(s) {:?} {}",
            sources.len(),
            position.placement,
            position.node.path
        );
        self.anchor = None;
        self.publish(next, listener);
        listener.dropped(&dragging, position, event);
        DropOutcome::Committed
    }

    fn working_copy(&self) -> Vec<NodeRecord<D>> {
        self.nodes.as_ref().clone()
    }

    fn publish<L>(&mut self, next: Vec<NodeRecord<D>>, listener: &mut L)
    where
        L: TreeListener<D> + ?Sized,
    {
        self.nodes = Rc::new(next);
        listener.tree_replaced(&self.nodes);
    }
}

/// Moves the records at `sources` next to (or into) `dest`.
///
/// A source nested under another source travels with its ancestor and is
/// not copied on its own. Copies are inserted together in `sources` order,
/// then the originals are deleted bottom-up at their post-insertion
/// positions. Returns `false` if `dest` does not resolve.
pub(crate) fn move_records<D: Clone>(
    nodes: &mut Vec<NodeRecord<D>>,
    sources: &[TreePath],
    dest: &TreePath,
    placement: Placement,
) -> bool {
    let dragged: FxHashSet<&[usize]> = sources.iter().map(TreePath::as_slice).collect();
    let mut pending: Vec<TreePath> = sources
        .iter()
        .filter(|path| (1..path.len()).all(|depth| !dragged.contains(&path[..depth])))
        .cloned()
        .collect();
    let copies: Vec<NodeRecord<D>> = pending
        .iter()
        .filter_map(|path| record_at(nodes, path).cloned())
        .collect();
    let count = copies.len();

    match placement {
        Placement::Inside => {
            let Some(target) = record_at_mut(nodes, dest) else {
                return false;
            };
            target.children.get_or_insert_with(Vec::new).splice(0..0, copies);
            for path in &mut pending {
                path.shift_after_insert(dest, 0, count);
            }
        }
        Placement::Before | Placement::After => {
            let (Some(ind), Some(parent)) = (dest.last(), dest.parent()) else {
                return false;
            };
            let at = if placement == Placement::Before { ind } else { ind + 1 };
            let Some(siblings) = node_siblings_mut(nodes, dest) else {
                return false;
            };
            if at > siblings.len() {
                return false;
            }
            siblings.splice(at..at, copies);
            for path in &mut pending {
                path.shift_after_insert(&parent, at, count);
            }
        }
    }

    let pending: FxHashSet<TreePath> = pending.into_iter().collect();
    remove_where(nodes, |path| pending.contains(path));
    true
}
