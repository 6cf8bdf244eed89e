use crate::config::TreeConfig;
use crate::input::PointerEvent;
use crate::model::NodeRecord;
use crate::node::{TreeNode, project};
use crate::path::TreePath;
use crate::traverse::{Traversal, TreeWalk, traverse_mut};

/// How a `select` call combines with the existing selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMode<'a> {
    /// Only the target stays selected.
    Replace,
    /// The target joins the current selection.
    Add,
    /// Everything between the anchor and the target (inclusive) joins the selection.
    Range { anchor: &'a TreePath },
}

impl<'a> SelectionMode<'a> {
    /// Resolves the mode from the explicit flag, the event modifiers and the anchor.
    pub fn resolve(
        config: &TreeConfig,
        add_to_selection: bool,
        event: Option<&PointerEvent>,
        anchor: Option<&'a TreePath>,
    ) -> Self {
        if !config.allow_multiselect {
            return Self::Replace;
        }
        if let Some(anchor) = anchor
            && event.is_some_and(PointerEvent::shift)
        {
            return Self::Range { anchor };
        }
        let key_pressed = event.is_some_and(|e| config.multiselect_pressed(e.modifiers));
        if key_pressed || add_to_selection {
            Self::Add
        } else {
            Self::Replace
        }
    }
}

/// Applies a selection transition to `nodes` in one walk.
///
/// Non-selectable nodes are never marked. Returns every selected node after
/// the transition, in traversal order.
pub fn apply_selection<D: Clone>(
    nodes: &mut [NodeRecord<D>],
    target: &TreePath,
    mode: SelectionMode<'_>,
) -> Vec<TreeNode<D>> {
    let mut selected: Vec<TreePath> = Vec::new();
    let mut in_range = false;
    traverse_mut(nodes, |node, record| {
        match mode {
            SelectionMode::Range { anchor } => {
                let hits = usize::from(node.path == *target) + usize::from(node.path == *anchor);
                if hits > 0 {
                    record.is_selected = node.is_selectable;
                    // A range whose bounds coincide opens and closes on the same node.
                    if hits == 1 {
                        in_range = !in_range;
                    }
                }
                if in_range {
                    record.is_selected = node.is_selectable;
                }
            }
            SelectionMode::Add | SelectionMode::Replace => {
                if node.path == *target {
                    record.is_selected = node.is_selectable;
                } else if matches!(mode, SelectionMode::Replace) {
                    record.is_selected = false;
                }
            }
        }
        if record.is_selected {
            selected.push(node.path.clone());
        }
        Traversal::Continue
    });
    selected
        .iter()
        .filter_map(|path| project(nodes, path))
        .collect()
}

/// Returns every selected node in traversal order.
pub fn selected_nodes<D: Clone>(nodes: &[NodeRecord<D>]) -> Vec<TreeNode<D>> {
    TreeWalk::new(nodes)
        .with_records()
        .filter(|(node, _)| node.is_selected)
        .map(|(node, record)| node.with_children(record))
        .collect()
}

/// Returns the selected nodes that may be dragged, in traversal order.
pub fn draggable_nodes<D: Clone>(nodes: &[NodeRecord<D>]) -> Vec<TreeNode<D>> {
    TreeWalk::new(nodes)
        .with_records()
        .filter(|(node, _)| node.is_selected && node.is_draggable)
        .map(|(node, record)| node.with_children(record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use pretty_assertions::assert_eq;

    fn flat(count: usize) -> Vec<NodeRecord> {
        (0..count).map(|i| NodeRecord::leaf(format!("n{i}"))).collect()
    }

    fn titles(nodes: &[TreeNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.title.as_str()).collect()
    }

    #[test]
    fn replace_clears_other_nodes() {
        let mut nodes = flat(3);
        nodes[0].is_selected = true;
        let selected = apply_selection(&mut nodes, &TreePath::from([2]), SelectionMode::Replace);
        assert_eq!(titles(&selected), vec!["n2"]);
        assert!(!nodes[0].is_selected);
    }

    #[test]
    fn add_keeps_existing_selection() {
        let mut nodes = flat(3);
        nodes[0].is_selected = true;
        let selected = apply_selection(&mut nodes, &TreePath::from([2]), SelectionMode::Add);
        assert_eq!(titles(&selected), vec!["n0", "n2"]);
    }

    #[test]
    fn range_is_inclusive_in_both_directions() {
        for (anchor, target) in [([0], [2]), ([2], [0])] {
            let mut nodes = flat(4);
            let anchor = TreePath::from(anchor);
            let selected = apply_selection(
                &mut nodes,
                &TreePath::from(target),
                SelectionMode::Range { anchor: &anchor },
            );
            assert_eq!(titles(&selected), vec!["n0", "n1", "n2"]);
        }
    }

    #[test]
    fn range_with_equal_bounds_selects_one_node() {
        let mut nodes = flat(3);
        let anchor = TreePath::from([1]);
        let mode = SelectionMode::Range { anchor: &anchor };
        let selected = apply_selection(&mut nodes, &anchor, mode);
        assert_eq!(titles(&selected), vec!["n1"]);
    }

    #[test]
    fn range_skips_unselectable_nodes() {
        let mut nodes = flat(3);
        nodes[1].is_selectable = Some(false);
        let anchor = TreePath::from([0]);
        let selected = apply_selection(
            &mut nodes,
            &TreePath::from([2]),
            SelectionMode::Range { anchor: &anchor },
        );
        assert_eq!(titles(&selected), vec!["n0", "n2"]);
    }

    #[test]
    fn unselectable_target_is_not_marked() {
        let mut nodes = flat(2);
        nodes[1].is_selectable = Some(false);
        let selected = apply_selection(&mut nodes, &TreePath::from([1]), SelectionMode::Replace);
        assert!(selected.is_empty());
    }

    #[test]
    fn reported_parent_shows_children_selected_in_the_same_pass() {
        let mut nodes = vec![
            NodeRecord::<()>::new("p").with_children(vec![NodeRecord::leaf("c")]),
            NodeRecord::leaf("q"),
        ];
        let anchor = TreePath::from([0]);
        let selected = apply_selection(
            &mut nodes,
            &TreePath::from([1]),
            SelectionMode::Range { anchor: &anchor },
        );
        assert_eq!(titles(&selected), vec!["p", "c", "q"]);
        assert!(selected[0].children[0].is_selected);
    }

    #[test]
    fn mode_resolution_follows_modifiers() {
        let config = TreeConfig::default();
        let anchor = TreePath::from([0]);
        let ctrl = PointerEvent::at(0.0, 0.0).with_modifiers(Modifiers::CTRL);
        let shift = PointerEvent::at(0.0, 0.0).with_modifiers(Modifiers::SHIFT);

        assert_eq!(
            SelectionMode::resolve(&config, false, Some(&ctrl), Some(&anchor)),
            SelectionMode::Add
        );
        assert_eq!(
            SelectionMode::resolve(&config, false, Some(&shift), Some(&anchor)),
            SelectionMode::Range { anchor: &anchor }
        );
        assert_eq!(
            SelectionMode::resolve(&config, false, Some(&shift), None),
            SelectionMode::Replace
        );
        assert_eq!(SelectionMode::resolve(&config, true, None, None), SelectionMode::Add);

        let single = TreeConfig::builder().allow_multiselect(false).build().expect("config");
        assert_eq!(
            SelectionMode::resolve(&single, true, Some(&shift), Some(&anchor)),
            SelectionMode::Replace
        );
    }

    #[test]
    fn derived_sets_respect_draggable() {
        let nodes = vec![
            NodeRecord::<()>::leaf("a").selected(true),
            NodeRecord::leaf("b").selected(true).draggable(false),
            NodeRecord::new("c")
                .expanded(false)
                .with_children(vec![NodeRecord::leaf("d").selected(true)]),
        ];
        assert_eq!(titles(&selected_nodes(&nodes)), vec!["a", "b", "d"]);
        assert_eq!(titles(&draggable_nodes(&nodes)), vec!["a", "d"]);
    }
}
