//! Pointer actions produced by the gesture tracker.
//!
//! A [`PointerAction`] is a one-shot value: the tracker creates it, the
//! emitter hands it to the virtual pointer device, and nothing keeps it
//! afterwards.

use std::fmt;

/// Mouse button synthesised by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// A relative pointer action for the host OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// Relative cursor displacement in host pixels.
    Move { dx: i32, dy: i32 },
    /// Button transition; `down == false` is a release.
    Button { which: MouseButton, down: bool },
    /// Signed wheel delta, passed to the device unscaled.
    Scroll { delta: i32 },
}

impl PointerAction {
    pub fn press(which: MouseButton) -> Self {
        Self::Button { which, down: true }
    }

    pub fn release(which: MouseButton) -> Self {
        Self::Button { which, down: false }
    }
}

impl fmt::Display for PointerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move { dx, dy } => write!(f, "move({dx}, {dy})"),
            Self::Button { which, down: true } => write!(f, "{which} down"),
            Self::Button { which, down: false } => write!(f, "{which} up"),
            Self::Scroll { delta } => write!(f, "scroll({delta})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release_helpers() {
        assert_eq!(
            PointerAction::press(MouseButton::Left),
            PointerAction::Button { which: MouseButton::Left, down: true }
        );
        assert_eq!(
            PointerAction::release(MouseButton::Right),
            PointerAction::Button { which: MouseButton::Right, down: false }
        );
    }

    #[test]
    fn test_display_is_compact() {
        assert_eq!(PointerAction::Move { dx: -3, dy: 7 }.to_string(), "move(-3, 7)");
        assert_eq!(PointerAction::press(MouseButton::Right).to_string(), "right down");
        assert_eq!(PointerAction::Scroll { delta: 120 }.to_string(), "scroll(120)");
    }
}
