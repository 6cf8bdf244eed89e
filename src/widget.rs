use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::Buffer;
use ratatui::widgets::{
    Block, Borders, Cell, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget,
    Table, TableState,
};
use smallvec::SmallVec;

use crate::context::TreeRowContext;
use crate::cursor::{NodeElement, SurfaceRect, TreeSurface};
use crate::glyphs::{TitleLabel, TreeGlyphs, TreeLabelRenderer};
use crate::model::NodeRecord;
use crate::node::TreeNode;
use crate::path::TreePath;
use crate::style::TreeViewStyle;
use crate::tree::DragTree;

/// Terminal rendering of a [`DragTree`]: one row per visible node.
pub struct TreeView<'a, D, L = TitleLabel>
where
    L: TreeLabelRenderer<D>,
{
    tree: &'a DragTree<D>,
    label: L,
    style: TreeViewStyle<'a>,
    glyphs: TreeGlyphs<'a>,
}

impl<'a, D: Clone> TreeView<'a, D, TitleLabel> {
    pub fn new(tree: &'a DragTree<D>) -> Self {
        Self {
            tree,
            label: TitleLabel,
            style: TreeViewStyle::default(),
            glyphs: TreeGlyphs::unicode(),
        }
    }
}

impl<'a, D, L> TreeView<'a, D, L>
where
    D: Clone,
    L: TreeLabelRenderer<D>,
{
    #[must_use]
    pub fn style(mut self, style: TreeViewStyle<'a>) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub const fn glyphs(mut self, glyphs: TreeGlyphs<'a>) -> Self {
        self.glyphs = glyphs;
        self
    }

    pub fn label<M>(self, label: M) -> TreeView<'a, D, M>
    where
        M: TreeLabelRenderer<D>,
    {
        TreeView {
            tree: self.tree,
            label,
            style: self.style,
            glyphs: self.glyphs,
        }
    }

    fn build_rows(&self, rows: &[VisibleRow<D>]) -> Vec<Row<'a>> {
        let cursor = self.tree.cursor_position();
        let draw_lines = self.tree.config().show_branches;
        rows.iter()
            .map(|VisibleRow { node, tail, has_children }| {
                let drop_marker = cursor
                    .filter(|position| position.node.path == node.path)
                    .map(|position| position.placement);
                let ctx = TreeRowContext {
                    level: node.level,
                    is_tail_stack: tail.as_slice(),
                    is_expanded: node.is_expanded,
                    is_leaf: node.is_leaf,
                    has_children: *has_children,
                    is_selected: node.is_selected,
                    drop_marker,
                    draw_lines,
                    line_style: self.style.line_style,
                };
                let line = self.label.line(node, &ctx, &self.glyphs);
                let mut row = Row::new([Cell::from(line)]);
                if node.is_selected {
                    row = row.style(self.style.selected_style);
                }
                if drop_marker.is_some() {
                    row = row.style(self.style.cursor_style);
                }
                row
            })
            .collect()
    }
}

struct VisibleRow<D> {
    node: TreeNode<D>,
    tail: SmallVec<[bool; 8]>,
    // Read from the record: a collapsed node projects no children.
    has_children: bool,
}

fn collect_visible<D: Clone>(
    records: &[NodeRecord<D>],
    path: &mut TreePath,
    tail: &mut SmallVec<[bool; 8]>,
    out: &mut Vec<VisibleRow<D>>,
) {
    for (ind, record) in records.iter().enumerate() {
        path.push(ind);
        tail.push(ind + 1 == records.len());
        let node = TreeNode::from_record(record, path.clone(), records.len(), true);
        let descend = node.is_expanded;
        out.push(VisibleRow {
            node,
            tail: tail.clone(),
            has_children: !record.child_records().is_empty(),
        });
        if descend {
            collect_visible(record.child_records(), path, tail, out);
        }
        tail.pop();
        path.pop();
    }
}

/// Layout of the last render; doubles as the [`TreeSurface`] for pointer input.
///
/// Surface coordinates are terminal cells, every row one cell high.
#[derive(Clone, Debug, Default)]
pub struct TreeViewState {
    area: Rect,
    offset: usize,
    rows: Vec<TreePath>,
    // Fractional part of scroll deltas not yet applied to `offset`.
    carry: f64,
}

impl TreeViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inner list area of the last render.
    #[inline]
    pub const fn area(&self) -> Rect {
        self.area
    }

    #[inline]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset.min(self.max_offset());
        self.carry = 0.0;
    }

    /// Paths of the visible rows in display order.
    pub fn rows(&self) -> &[TreePath] {
        &self.rows
    }

    /// Path of the row under the given cell, if any.
    pub fn row_at(&self, column: u16, row: u16) -> Option<&TreePath> {
        let area = self.area;
        if column < area.x || column >= area.right() || row < area.y || row >= area.bottom() {
            return None;
        }
        self.rows.get(self.offset + usize::from(row - area.y))
    }

    fn max_offset(&self) -> usize {
        self.rows.len().saturating_sub(usize::from(self.area.height))
    }
}

impl TreeSurface for TreeViewState {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn element_at_point(&self, x: f64, y: f64) -> Option<NodeElement> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let (column, row) = (x.floor() as u16, y.floor() as u16);
        let path = self.row_at(column, row)?;
        Some(NodeElement {
            path: path.clone(),
            top: f64::from(row),
            height: 1.0,
        })
    }

    fn bounds(&self) -> SurfaceRect {
        SurfaceRect::new(
            f64::from(self.area.x),
            f64::from(self.area.y),
            f64::from(self.area.width),
            f64::from(self.area.height),
        )
    }

    #[allow(clippy::cast_precision_loss)]
    fn scroll_top(&self) -> f64 {
        self.offset as f64
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn scroll_by(&mut self, delta: f64) {
        self.carry += delta;
        let whole = self.carry.trunc();
        self.carry -= whole;
        let target = (self.offset as f64 + whole).clamp(0.0, self.max_offset() as f64);
        self.offset = target as usize;
    }
}

impl<D, L> StatefulWidget for TreeView<'_, D, L>
where
    D: Clone,
    L: TreeLabelRenderer<D>,
{
    type State = TreeViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let mut visible = Vec::new();
        collect_visible(
            self.tree.nodes(),
            &mut TreePath::root(),
            &mut SmallVec::new(),
            &mut visible,
        );

        let mut block = Block::default().borders(self.style.borders);
        if let Some(title) = self.style.title.clone() {
            block = block.title(title);
        }
        block = block
            .style(self.style.block_style)
            .border_style(self.style.border_style);

        let inner_height = usize::from(block.inner(area).height);
        let total_rows = visible.len();
        let scroll_rows = total_rows.saturating_sub(inner_height);

        let (table_area, table_block, scrollbar_area) = if scroll_rows > 0 {
            let table_area = Rect {
                width: area.width.saturating_sub(1),
                ..area
            };
            let scrollbar_area = Rect {
                x: area.x + area.width.saturating_sub(1),
                y: area.y,
                width: 1,
                height: area.height,
            };
            let mut table_borders = self.style.borders;
            table_borders.remove(Borders::RIGHT);
            (table_area, block.borders(table_borders), Some(scrollbar_area))
        } else {
            (area, block, None)
        };

        state.area = table_block.inner(table_area);
        state.rows = visible.iter().map(|row| row.node.path.clone()).collect();
        state.offset = state.offset.min(scroll_rows);

        let start = state.offset;
        let end = (start + inner_height).min(total_rows);
        let rows = self.build_rows(&visible[start..end]);
        let table = Table::new(rows, [Constraint::Percentage(100)])
            .style(self.style.block_style)
            .block(table_block);
        table.render(table_area, buf, &mut TableState::default());

        if let Some(scrollbar_area) = scrollbar_area {
            let scroll_len = scroll_rows.saturating_add(1);
            let mut scrollbar_state = ScrollbarState::new(scroll_len)
                .position(state.offset)
                .viewport_content_length(inner_height);
            Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .render(scrollbar_area, buf, &mut scrollbar_state);
        }
    }
}
