// Drag demo: render a small tree, then replay a mouse drag that moves a leaf into a folder.
use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::widgets::StatefulWidget;

use tui_dragtree::prelude::*;

// Terminal rows are one cell high, so the drop edges are fractions of a cell.
fn config() -> TreeConfig {
    TreeConfig::builder()
        .edge_size(0.25)
        .scroll_area_height(1.0)
        .max_scroll_speed(1.0)
        .show_branches(true)
        .build()
        .expect("valid config")
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn render(tree: &DragTree, state: &mut TreeViewState) -> Buffer {
    let area = Rect::new(0, 0, 32, 8);
    let mut buffer = Buffer::empty(area);
    let style = TreeViewStyle {
        title: Some("drag demo".into()),
        ..TreeViewStyle::default()
    };
    TreeView::new(tree).style(style).render(area, &mut buffer, state);
    buffer
}

fn print(buffer: &Buffer) {
    for y in 0..buffer.area.height {
        let line: String = (0..buffer.area.width).map(|x| buffer[(x, y)].symbol()).collect();
        println!("{line}");
    }
}

fn main() {
    let mut tree = DragTree::with_config(
        vec![
            NodeRecord::leaf("notes.txt"),
            NodeRecord::new("docs").with_children(vec![NodeRecord::leaf("guide.md")]),
            NodeRecord::new("src")
                .expanded(false)
                .with_children(vec![NodeRecord::leaf("main.rs")]),
        ],
        config(),
    );
    // The view state is the hit-testing surface; it must be rendered before input.
    let mut state = TreeViewState::new();
    print(&render(&tree, &mut state));

    // Record every notification the gesture produces.
    let mut events: Vec<TreeEvent> = Vec::new();
    // Press on "notes.txt" (row 1), drag onto "docs" (row 2), release.
    for event in [
        mouse(MouseEventKind::Down(MouseButton::Left), 4, 1),
        mouse(MouseEventKind::Drag(MouseButton::Left), 4, 2),
    ] {
        tui_dragtree::handle_mouse(&mut tree, &mut state, event, &mut events);
    }
    // While dragging the cursor row shows the pending placement.
    print(&render(&tree, &mut state));

    let outcome = tui_dragtree::handle_mouse(
        &mut tree,
        &mut state,
        mouse(MouseEventKind::Up(MouseButton::Left), 4, 2),
        &mut events,
    );
    println!("{outcome:?} after {} event(s)", events.len());
    print(&render(&tree, &mut state));
}
