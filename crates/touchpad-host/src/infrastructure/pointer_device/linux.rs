//! Linux virtual pointer via `/dev/uinput`.
//!
//! The device advertises exactly what the gesture engine can produce:
//! `BTN_LEFT`/`BTN_RIGHT` on `EV_KEY` and `REL_X`/`REL_Y`/`REL_WHEEL` on
//! `EV_REL`. Each action is written as one batch that `evdev` terminates
//! with `SYN_REPORT`, so the kernel never sees half of a motion.
//!
//! Creating the device needs write access to `/dev/uinput` (root, or a udev
//! rule granting the `input` group).

#![cfg(target_os = "linux")]

use std::sync::{Mutex, PoisonError};

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, BusType, EventType, InputEvent, InputId, Key, RelativeAxisType,
};
use touchpad_core::{MouseButton, PointerAction};
use tracing::{debug, info, warn};

use crate::application::emit_pointer::{DeviceError, PointerDevice};
use crate::infrastructure::storage::config::DeviceConfig;

const BACKEND: &str = "uinput";

/// [`PointerDevice`] backed by a uinput virtual mouse.
pub struct UinputPointerDevice {
    device: Mutex<Option<VirtualDevice>>,
}

impl UinputPointerDevice {
    /// Registers the virtual mouse with the kernel.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Create`] if `/dev/uinput` cannot be opened or
    /// the kernel rejects the device description.
    pub fn create(config: &DeviceConfig) -> Result<Self, DeviceError> {
        let mut device = build_device(config).map_err(|source| DeviceError::Create {
            backend: BACKEND,
            source,
        })?;

        info!(name = %config.name, "uinput pointer created");
        match device.enumerate_dev_nodes_blocking() {
            Ok(nodes) => {
                for node in nodes.flatten() {
                    info!("virtual pointer available as {}", node.display());
                }
            }
            Err(e) => debug!("could not list device nodes: {e}"),
        }

        Ok(Self {
            device: Mutex::new(Some(device)),
        })
    }

    fn write(&self, events: &[InputEvent]) -> Result<(), DeviceError> {
        let mut guard = self.device.lock().unwrap_or_else(PoisonError::into_inner);
        let device = guard.as_mut().ok_or(DeviceError::Closed)?;
        device.emit(events)?;
        Ok(())
    }
}

fn build_device(config: &DeviceConfig) -> std::io::Result<VirtualDevice> {
    let keys = AttributeSet::from_iter([Key::BTN_LEFT, Key::BTN_RIGHT]);
    let axes = AttributeSet::from_iter([
        RelativeAxisType::REL_X,
        RelativeAxisType::REL_Y,
        RelativeAxisType::REL_WHEEL,
    ]);

    VirtualDeviceBuilder::new()?
        .name(&config.name)
        .input_id(InputId::new(
            BusType::BUS_USB,
            config.vendor_id,
            config.product_id,
            1,
        ))
        .with_keys(&keys)?
        .with_relative_axes(&axes)?
        .build()
}

impl PointerDevice for UinputPointerDevice {
    fn move_by(&self, dx: i32, dy: i32) -> Result<(), DeviceError> {
        self.write(&events_for(PointerAction::Move { dx, dy }))
    }

    fn button(&self, which: MouseButton, down: bool) -> Result<(), DeviceError> {
        self.write(&events_for(PointerAction::Button { which, down }))
    }

    fn scroll(&self, delta: i32) -> Result<(), DeviceError> {
        self.write(&events_for(PointerAction::Scroll { delta }))
    }

    fn close(&self) {
        let taken = self
            .device
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match taken {
            // Dropping the handle closes the fd; the kernel destroys the device.
            Some(device) => {
                drop(device);
                info!("uinput pointer destroyed");
            }
            None => warn!("uinput pointer already closed"),
        }
    }
}

// ── Event encoding ────────────────────────────────────────────────────────────

/// Event batch for one action, excluding the trailing `SYN_REPORT`.
pub fn events_for(action: PointerAction) -> Vec<InputEvent> {
    match action {
        PointerAction::Move { dx, dy } => vec![
            relative(RelativeAxisType::REL_X, dx),
            relative(RelativeAxisType::REL_Y, dy),
        ],
        PointerAction::Button { which, down } => vec![InputEvent::new(
            EventType::KEY,
            key_for(which).code(),
            i32::from(down),
        )],
        PointerAction::Scroll { delta } => vec![relative(RelativeAxisType::REL_WHEEL, delta)],
    }
}

fn relative(axis: RelativeAxisType, value: i32) -> InputEvent {
    InputEvent::new(EventType::RELATIVE, axis.0, value)
}

fn key_for(button: MouseButton) -> Key {
    match button {
        MouseButton::Left => Key::BTN_LEFT,
        MouseButton::Right => Key::BTN_RIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triples(events: &[InputEvent]) -> Vec<(EventType, u16, i32)> {
        events
            .iter()
            .map(|e| (e.event_type(), e.code(), e.value()))
            .collect()
    }

    #[test]
    fn test_move_writes_x_then_y() {
        let events = events_for(PointerAction::Move { dx: -3, dy: 7 });
        assert_eq!(
            triples(&events),
            vec![
                (EventType::RELATIVE, RelativeAxisType::REL_X.0, -3),
                (EventType::RELATIVE, RelativeAxisType::REL_Y.0, 7),
            ]
        );
    }

    #[test]
    fn test_button_writes_single_key_event() {
        let down = events_for(PointerAction::press(MouseButton::Right));
        let up = events_for(PointerAction::release(MouseButton::Left));
        assert_eq!(
            triples(&down),
            vec![(EventType::KEY, Key::BTN_RIGHT.code(), 1)]
        );
        assert_eq!(triples(&up), vec![(EventType::KEY, Key::BTN_LEFT.code(), 0)]);
    }

    #[test]
    fn test_scroll_writes_unscaled_wheel_delta() {
        let events = events_for(PointerAction::Scroll { delta: -384 });
        assert_eq!(
            triples(&events),
            vec![(EventType::RELATIVE, RelativeAxisType::REL_WHEEL.0, -384)]
        );
    }
}
