use ratatui::style::Style;

use crate::cursor::Placement;

/// Per-row facts handed to label renderers.
#[derive(Clone, Copy, Debug)]
pub struct TreeRowContext<'a> {
    pub level: usize,
    /// `is_last_child` of every ancestor and of the row itself, outermost first.
    pub is_tail_stack: &'a [bool],
    pub is_expanded: bool,
    pub is_leaf: bool,
    pub has_children: bool,
    pub is_selected: bool,
    /// Pending drop placement when this row is the cursor target.
    pub drop_marker: Option<Placement>,
    pub draw_lines: bool,
    pub line_style: Style,
}
