//! PointerEmitter: hands tracker output to the virtual pointer device.
//!
//! This use case sits at the application layer and delegates to a
//! [`PointerDevice`] trait object for OS-level injection. The platform
//! implementations live in the infrastructure layer.
//!
//! Injection is fire-and-forget: a failed action is logged and counted,
//! never retried.

use std::sync::Arc;

use thiserror::Error;
use touchpad_core::{MouseButton, PointerAction};
use tracing::{trace, warn};

/// Error type for virtual pointer device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The OS refused to create the virtual device (privileges, missing node).
    #[error("failed to create {backend} virtual pointer: {source}")]
    Create {
        backend: &'static str,
        #[source]
        source: std::io::Error,
    },
    /// Writing an event to the device failed.
    #[error("I/O error while injecting pointer event: {0}")]
    Io(#[from] std::io::Error),
    /// The platform API rejected the event.
    #[error("platform error: {0}")]
    Platform(String),
    /// The device has already been closed.
    #[error("virtual pointer device is closed")]
    Closed,
    /// No backend exists for the running OS.
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// Platform-agnostic relative pointer sink.
///
/// Each supported OS provides an implementation in the infrastructure layer.
/// Exactly one instance exists per process.
pub trait PointerDevice: Send + Sync {
    /// Moves the cursor by a relative displacement.
    fn move_by(&self, dx: i32, dy: i32) -> Result<(), DeviceError>;

    /// Presses (`down == true`) or releases a button.
    fn button(&self, which: MouseButton, down: bool) -> Result<(), DeviceError>;

    /// Emits a vertical wheel event with the given signed delta, unscaled.
    fn scroll(&self, delta: i32) -> Result<(), DeviceError>;

    /// Releases all OS resources. Safe to call more than once.
    fn close(&self);
}

/// Dispatches one action onto the matching device call.
pub fn dispatch(device: &dyn PointerDevice, action: PointerAction) -> Result<(), DeviceError> {
    match action {
        PointerAction::Move { dx, dy } => device.move_by(dx, dy),
        PointerAction::Button { which, down } => device.button(which, down),
        PointerAction::Scroll { delta } => device.scroll(delta),
    }
}

/// The pointer emitter.
pub struct PointerEmitter {
    device: Arc<dyn PointerDevice>,
    emitted: u64,
    failures: u64,
}

impl PointerEmitter {
    pub fn new(device: Arc<dyn PointerDevice>) -> Self {
        Self {
            device,
            emitted: 0,
            failures: 0,
        }
    }

    /// Sends one action to the device, logging (not returning) failures.
    pub fn emit(&mut self, action: PointerAction) {
        trace!(%action, "emit");
        match dispatch(self.device.as_ref(), action) {
            Ok(()) => self.emitted += 1,
            Err(e) => {
                self.failures += 1;
                warn!("failed to inject {action}: {e}");
            }
        }
    }

    /// Sends `actions` in order.
    pub fn emit_all(&mut self, actions: impl IntoIterator<Item = PointerAction>) {
        for action in actions {
            self.emit(action);
        }
    }

    /// Number of actions the device accepted.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Number of actions the device rejected.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn device(&self) -> &Arc<dyn PointerDevice> {
        &self.device
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::{mock, predicate::eq, Sequence};

    mock! {
        Device {}
        impl PointerDevice for Device {
            fn move_by(&self, dx: i32, dy: i32) -> Result<(), DeviceError>;
            fn button(&self, which: MouseButton, down: bool) -> Result<(), DeviceError>;
            fn scroll(&self, delta: i32) -> Result<(), DeviceError>;
            fn close(&self);
        }
    }

    #[test]
    fn test_each_action_maps_to_exactly_one_device_call() {
        // Arrange
        let mut device = MockDevice::new();
        let mut seq = Sequence::new();
        device
            .expect_move_by()
            .with(eq(4), eq(-2))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        device
            .expect_button()
            .with(eq(MouseButton::Right), eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        device
            .expect_scroll()
            .with(eq(-120))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        device.expect_close().never();
        let mut emitter = PointerEmitter::new(Arc::new(device));

        // Act
        emitter.emit_all([
            PointerAction::Move { dx: 4, dy: -2 },
            PointerAction::press(MouseButton::Right),
            PointerAction::Scroll { delta: -120 },
        ]);

        // Assert
        assert_eq!(emitter.emitted(), 3);
        assert_eq!(emitter.failures(), 0);
    }

    #[test]
    fn test_device_failure_is_counted_and_not_retried() {
        // Arrange
        let mut device = MockDevice::new();
        device
            .expect_button()
            .times(2)
            .returning(|_, _| Err(DeviceError::Platform("injected failure".into())));
        let mut emitter = PointerEmitter::new(Arc::new(device));

        // Act
        emitter.emit(PointerAction::press(MouseButton::Left));
        emitter.emit(PointerAction::release(MouseButton::Left));

        // Assert
        assert_eq!(emitter.failures(), 2);
        assert_eq!(emitter.emitted(), 0);
    }
}
