//! Windows virtual pointer via the `SendInput` API.
//!
//! Every action becomes exactly one `INPUT` record of type `INPUT_MOUSE`.
//! Motion is relative (no `MOUSEEVENTF_ABSOLUTE`), so the OS applies its own
//! pointer acceleration on top of the engine's sensitivity.

#![cfg(target_os = "windows")]

use std::mem::size_of;

use touchpad_core::{MouseButton, PointerAction};
use tracing::debug;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP,
    MOUSEEVENTF_MOVE, MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSEEVENTF_WHEEL,
    MOUSEINPUT, MOUSE_EVENT_FLAGS,
};

use crate::application::emit_pointer::{DeviceError, PointerDevice};

// SendInput rejects a cbSize that does not match the host ABI.
#[cfg(target_pointer_width = "64")]
const _: () = assert!(size_of::<INPUT>() == 40);
#[cfg(target_pointer_width = "32")]
const _: () = assert!(size_of::<INPUT>() == 28);

/// [`PointerDevice`] that injects through `SendInput`.
///
/// There is no OS object to release, so `close` only logs.
#[derive(Debug, Default)]
pub struct SendInputPointerDevice;

impl SendInputPointerDevice {
    pub fn new() -> Self {
        Self
    }
}

impl PointerDevice for SendInputPointerDevice {
    fn move_by(&self, dx: i32, dy: i32) -> Result<(), DeviceError> {
        send(mouse_input(PointerAction::Move { dx, dy }))
    }

    fn button(&self, which: MouseButton, down: bool) -> Result<(), DeviceError> {
        send(mouse_input(PointerAction::Button { which, down }))
    }

    fn scroll(&self, delta: i32) -> Result<(), DeviceError> {
        send(mouse_input(PointerAction::Scroll { delta }))
    }

    fn close(&self) {
        debug!("SendInput pointer closed");
    }
}

/// Builds the single `INPUT` record for `action`.
pub fn mouse_input(action: PointerAction) -> INPUT {
    let (dx, dy, data, flags) = match action {
        PointerAction::Move { dx, dy } => (dx, dy, 0, MOUSEEVENTF_MOVE),
        PointerAction::Button { which, down } => (0, 0, 0, button_flags(which, down)),
        PointerAction::Scroll { delta } => (0, 0, delta, MOUSEEVENTF_WHEEL),
    };
    // Signed wheel delta carried in the unsigned field bit-for-bit.
    #[allow(clippy::cast_sign_loss)]
    let mouse_data = data as u32;

    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx,
                dy,
                mouseData: mouse_data,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn button_flags(which: MouseButton, down: bool) -> MOUSE_EVENT_FLAGS {
    match (which, down) {
        (MouseButton::Left, true) => MOUSEEVENTF_LEFTDOWN,
        (MouseButton::Left, false) => MOUSEEVENTF_LEFTUP,
        (MouseButton::Right, true) => MOUSEEVENTF_RIGHTDOWN,
        (MouseButton::Right, false) => MOUSEEVENTF_RIGHTUP,
    }
}

fn send(input: INPUT) -> Result<(), DeviceError> {
    // SAFETY: `input` is a fully initialised INPUT_MOUSE record and the size
    // argument matches the struct layout asserted above.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let sent = unsafe { SendInput(&[input], size_of::<INPUT>() as i32) };
    if sent == 1 {
        Ok(())
    } else {
        Err(DeviceError::Io(std::io::Error::last_os_error()))
    }
}
