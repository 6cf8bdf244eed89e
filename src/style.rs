use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Borders;

/// Visual options of [`crate::TreeView`].
#[derive(Clone)]
pub struct TreeViewStyle<'a> {
    pub title: Option<Line<'a>>,
    pub block_style: Style,
    pub border_style: Style,
    pub selected_style: Style,
    /// Style of the row the pending drop targets.
    pub cursor_style: Style,
    pub line_style: Style,
    pub borders: Borders,
}

impl Default for TreeViewStyle<'_> {
    fn default() -> Self {
        Self {
            title: None,
            block_style: Style::default(),
            border_style: Style::default(),
            selected_style: Style::default().add_modifier(Modifier::REVERSED),
            cursor_style: Style::default().add_modifier(Modifier::UNDERLINED),
            line_style: Style::default(),
            borders: Borders::ALL,
        }
    }
}
