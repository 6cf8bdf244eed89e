use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// Modifier keys held while a pointer event fired.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const CTRL = 1;
        const META = 1 << 1;
        const ALT = 1 << 2;
        const SHIFT = 1 << 3;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Raw pointer event supplied by the rendering surface.
///
/// Coordinates are absolute surface units (pixels, or cells for a terminal).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Creates a primary-button event without modifiers.
    pub const fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            button: PointerButton::Primary,
            modifiers: Modifiers::empty(),
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    #[inline]
    pub const fn is_primary(&self) -> bool {
        matches!(self.button, PointerButton::Primary)
    }

    #[inline]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    pub(crate) fn same_position(&self, other: (f64, f64)) -> bool {
        self.x.total_cmp(&other.0).is_eq() && self.y.total_cmp(&other.1).is_eq()
    }
}
