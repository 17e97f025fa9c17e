//! # touchpad-core
//!
//! Turns raw multi-touch event lines into relative pointer actions.
//!
//! This crate has no OS dependencies. It is split in two:
//!
//! - **`protocol`** – decodes one `getevent`-style text line into a typed
//!   [`TouchEvent`]. Unknown or malformed lines are dropped.
//!
//! - **`domain`** – the [`GestureTracker`] state machine that classifies
//!   taps, long presses, double-tap drags, single-finger motion, and
//!   multi-finger scrolling, producing [`PointerAction`]s.
//!
//! The host crate wires these to a real virtual pointer device and to the
//! long-press timer.

pub mod domain;
pub mod protocol;

pub use domain::action::{MouseButton, PointerAction};
pub use domain::config::GestureConfig;
pub use domain::gesture::{
    GesturePhase, GestureTracker, LongPressToken, Point, Reaction, TimerCommand, TouchSession,
};
pub use protocol::event_line::{parse_line, Axis, EventLineParser, TouchEvent};
