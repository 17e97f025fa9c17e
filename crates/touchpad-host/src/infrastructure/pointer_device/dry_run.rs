//! Logging-only pointer backend.
//!
//! Useful for tuning gesture parameters on a machine where creating a
//! virtual device needs privileges the user does not have.

use std::sync::atomic::{AtomicBool, Ordering};

use touchpad_core::{MouseButton, PointerAction};
use tracing::info;

use crate::application::emit_pointer::{DeviceError, PointerDevice};

/// Writes each action to the log at `info` level.
#[derive(Debug, Default)]
pub struct DryRunPointerDevice {
    closed: AtomicBool,
}

impl DryRunPointerDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self, action: PointerAction) -> Result<(), DeviceError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(DeviceError::Closed);
        }
        info!(target: "pointer", "{action}");
        Ok(())
    }
}

impl PointerDevice for DryRunPointerDevice {
    fn move_by(&self, dx: i32, dy: i32) -> Result<(), DeviceError> {
        self.log(PointerAction::Move { dx, dy })
    }

    fn button(&self, which: MouseButton, down: bool) -> Result<(), DeviceError> {
        self.log(PointerAction::Button { which, down })
    }

    fn scroll(&self, delta: i32) -> Result<(), DeviceError> {
        self.log(PointerAction::Scroll { delta })
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!(target: "pointer", "closed");
        }
    }
}
