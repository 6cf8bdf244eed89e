use log::trace;

use crate::model::NodeRecord;
use crate::node::{TreeNode, project};
use crate::path::TreePath;
use crate::traverse::{first_node, last_node};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a drop lands relative to the target node.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    Before,
    After,
    /// Prepended to the target's children; only valid on non-leaf nodes.
    Inside,
}

/// Pending drop target while a drag is in progress.
#[derive(Clone, Debug, PartialEq)]
pub struct CursorPosition<D = ()> {
    pub node: TreeNode<D>,
    pub placement: Placement,
}

/// Axis-aligned box in surface coordinates (y grows downwards).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// Node element located by the rendering surface.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeElement {
    pub path: TreePath,
    /// Top edge of the element box in surface coordinates.
    pub top: f64,
    pub height: f64,
}

/// Rendering surface contract: hit testing, list bounds and scrolling.
pub trait TreeSurface {
    /// Returns the nearest node element enclosing the point, if any.
    fn element_at_point(&self, x: f64, y: f64) -> Option<NodeElement>;
    /// Bounding box of the whole list.
    fn bounds(&self) -> SurfaceRect;
    fn scroll_top(&self) -> f64;
    /// Moves the scroll offset; implementations clamp to their content.
    fn scroll_by(&mut self, delta: f64);
}

/// Placement inside an element box for a pointer `offset_y` below its top.
pub fn placement_for(is_leaf: bool, offset_y: f64, height: f64, edge_size: f64) -> Placement {
    if is_leaf {
        return if offset_y >= height / 2.0 {
            Placement::After
        } else {
            Placement::Before
        };
    }
    if offset_y <= edge_size {
        Placement::Before
    } else if offset_y >= height - edge_size {
        Placement::After
    } else {
        Placement::Inside
    }
}

/// Maps a surface point to a drop target.
///
/// Outside any node element, the lower half of the list resolves to after the
/// last node in traversal order and the upper half to before the first node.
/// Returns `None` for an empty tree or an element whose path went stale.
pub fn resolve_cursor<D, S>(
    nodes: &[NodeRecord<D>],
    surface: &S,
    x: f64,
    y: f64,
    edge_size: f64,
) -> Option<CursorPosition<D>>
where
    D: Clone,
    S: TreeSurface + ?Sized,
{
    if let Some(element) = surface.element_at_point(x, y) {
        let node = project(nodes, &element.path)?;
        let placement = placement_for(node.is_leaf, y - element.top, element.height, edge_size);
        trace!("cursor over {} -> {placement:?}", node.path);
        return Some(CursorPosition { node, placement });
    }

    let bounds = surface.bounds();
    let position = if y > bounds.mid_y() {
        last_node(nodes).map(|node| CursorPosition {
            node,
            placement: Placement::After,
        })
    } else {
        first_node(nodes).map(|node| CursorPosition {
            node,
            placement: Placement::Before,
        })
    };
    trace!("cursor outside nodes at y={y}: {:?}", position.as_ref().map(|p| p.placement));
    position
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Fixed-height rows stacked from `y = 0`, one per path.
    pub(crate) struct RowSurface {
        pub rows: Vec<TreePath>,
        pub row_height: f64,
        pub height: f64,
        pub scroll: f64,
    }

    impl RowSurface {
        pub(crate) fn new(rows: Vec<TreePath>, row_height: f64, height: f64) -> Self {
            Self {
                rows,
                row_height,
                height,
                scroll: 0.0,
            }
        }
    }

    impl TreeSurface for RowSurface {
        fn element_at_point(&self, _x: f64, y: f64) -> Option<NodeElement> {
            if y < 0.0 {
                return None;
            }
            let row = ((y + self.scroll) / self.row_height).floor();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let path = self.rows.get(row as usize)?.clone();
            Some(NodeElement {
                path,
                top: row.mul_add(self.row_height, -self.scroll),
                height: self.row_height,
            })
        }

        fn bounds(&self) -> SurfaceRect {
            SurfaceRect::new(0.0, 0.0, 100.0, self.height)
        }

        fn scroll_top(&self) -> f64 {
            self.scroll
        }

        fn scroll_by(&mut self, delta: f64) {
            self.scroll = (self.scroll + delta).max(0.0);
        }
    }

    fn sample() -> Vec<NodeRecord> {
        vec![
            NodeRecord::leaf("A"),
            NodeRecord::new("B").with_children(vec![NodeRecord::leaf("C")]),
        ]
    }

    fn surface() -> RowSurface {
        RowSurface::new(
            vec![TreePath::from([0]), TreePath::from([1]), TreePath::from([1, 0])],
            20.0,
            200.0,
        )
    }

    #[test]
    fn leaf_splits_at_midpoint() {
        let nodes = sample();
        let surface = surface();
        let top = resolve_cursor(&nodes, &surface, 5.0, 9.0, 3.0).expect("cursor");
        assert_eq!(top.placement, Placement::Before);
        let bottom = resolve_cursor(&nodes, &surface, 5.0, 10.0, 3.0).expect("cursor");
        assert_eq!(bottom.placement, Placement::After);
        assert_eq!(bottom.node.title, "A");
    }

    #[test]
    fn branch_uses_three_zones() {
        let nodes = sample();
        let surface = surface();
        let at = |y| {
            resolve_cursor(&nodes, &surface, 5.0, y, 3.0)
                .map(|c| c.placement)
                .expect("cursor")
        };
        assert_eq!(at(22.0), Placement::Before);
        assert_eq!(at(30.0), Placement::Inside);
        assert_eq!(at(38.0), Placement::After);
    }

    #[test]
    fn outside_nodes_snaps_to_list_ends() {
        let nodes = sample();
        let surface = surface();
        let below = resolve_cursor(&nodes, &surface, 5.0, 150.0, 3.0).expect("cursor");
        assert_eq!(below.placement, Placement::After);
        assert_eq!(below.node.path, TreePath::from([1, 0]));

        let above = resolve_cursor(&nodes, &surface, 5.0, -4.0, 3.0).expect("cursor");
        assert_eq!(above.placement, Placement::Before);
        assert_eq!(above.node.path, TreePath::from([0]));
    }

    #[test]
    fn empty_tree_has_no_cursor() {
        let nodes: Vec<NodeRecord> = Vec::new();
        let surface = RowSurface::new(Vec::new(), 20.0, 200.0);
        assert!(resolve_cursor(&nodes, &surface, 0.0, 150.0, 3.0).is_none());
    }
}
