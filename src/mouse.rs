use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::action::TreeListener;
use crate::cursor::TreeSurface;
use crate::drag::DropOutcome;
use crate::input::{Modifiers, PointerButton, PointerEvent};
use crate::tree::DragTree;

/// Rows scrolled per wheel notch.
const WHEEL_STEP: f64 = 1.0;

pub const fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
    }
}

pub fn modifiers(mods: KeyModifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    out.set(Modifiers::CTRL, mods.contains(KeyModifiers::CONTROL));
    out.set(
        Modifiers::META,
        mods.intersects(KeyModifiers::META | KeyModifiers::SUPER),
    );
    out.set(Modifiers::ALT, mods.contains(KeyModifiers::ALT));
    out.set(Modifiers::SHIFT, mods.contains(KeyModifiers::SHIFT));
    out
}

/// Converts a terminal mouse event to a pointer event at the centre of its cell.
pub fn pointer_event(event: &MouseEvent) -> PointerEvent {
    let button = match event.kind {
        MouseEventKind::Down(button)
        | MouseEventKind::Up(button)
        | MouseEventKind::Drag(button) => pointer_button(button),
        _ => PointerButton::Primary,
    };
    PointerEvent::at(f64::from(event.column) + 0.5, f64::from(event.row) + 0.5)
        .with_button(button)
        .with_modifiers(modifiers(event.modifiers))
}

/// Routes one terminal mouse event through the drag state machine of `tree`.
///
/// Returns the outcome of a release; other events yield `None`. Dragging past
/// the top or bottom edge of the surface snaps the cursor to that end of the
/// list. Wheel events scroll the surface directly.
pub fn handle_mouse<D, S, L>(
    tree: &mut DragTree<D>,
    surface: &mut S,
    event: MouseEvent,
    listener: &mut L,
) -> Option<DropOutcome>
where
    D: Clone,
    S: TreeSurface + ?Sized,
    L: TreeListener<D> + ?Sized,
{
    let pointer = pointer_event(&event);
    let hit = surface.element_at_point(pointer.x, pointer.y);
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(element) = hit {
                tree.on_node_mouse_down(&pointer, &element.path);
            }
            None
        }
        MouseEventKind::Up(MouseButton::Left) => Some(match hit {
            Some(element) => {
                tree.on_node_mouse_up(&pointer, Some(element.path.as_slice()), listener)
            }
            None => tree.on_document_mouse_up(&pointer, listener),
        }),
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
            tree.on_mouse_move(&pointer, &*surface, listener);
            let bounds = surface.bounds();
            if pointer.y < bounds.top() || pointer.y >= bounds.bottom() {
                tree.on_mouse_leave(&pointer, &*surface);
            }
            None
        }
        MouseEventKind::ScrollDown => {
            surface.scroll_by(WHEEL_STEP);
            None
        }
        MouseEventKind::ScrollUp => {
            surface.scroll_by(-WHEEL_STEP);
            None
        }
        _ => None,
    }
}
