//! Mock pointer device for tests.
//!
//! Every accepted call is pushed into `actions` in call order, so tests can
//! assert on the exact sequence the engine produced. `close` calls are
//! counted rather than acted on.
//!
//! Set `should_fail = true` to make every injection return
//! `DeviceError::Platform` and exercise the failure path of callers.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use touchpad_core::{MouseButton, PointerAction};

use crate::application::emit_pointer::{DeviceError, PointerDevice};

/// A recording device that performs no OS calls.
#[derive(Default)]
pub struct MockPointerDevice {
    /// Actions accepted so far, in order.
    pub actions: Mutex<Vec<PointerAction>>,
    /// Number of `close` calls.
    pub closes: AtomicU32,
    /// When `true`, every injection fails.
    pub should_fail: bool,
}

impl MockPointerDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// A device whose injections all fail.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Snapshot of the recorded actions.
    pub fn recorded(&self) -> Vec<PointerAction> {
        self.actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn close_count(&self) -> u32 {
        self.closes.load(Ordering::Acquire)
    }

    fn record(&self, action: PointerAction) -> Result<(), DeviceError> {
        if self.should_fail {
            return Err(DeviceError::Platform("mock failure".into()));
        }
        self.actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(action);
        Ok(())
    }
}

impl PointerDevice for MockPointerDevice {
    fn move_by(&self, dx: i32, dy: i32) -> Result<(), DeviceError> {
        self.record(PointerAction::Move { dx, dy })
    }

    fn button(&self, which: MouseButton, down: bool) -> Result<(), DeviceError> {
        self.record(PointerAction::Button { which, down })
    }

    fn scroll(&self, delta: i32) -> Result<(), DeviceError> {
        self.record(PointerAction::Scroll { delta })
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::AcqRel);
    }
}
