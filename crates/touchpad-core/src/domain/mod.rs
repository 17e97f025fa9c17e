//! Gesture domain: pure state machine and value types.
//!
//! Nothing in here touches the OS, a clock, or a runtime. Time is an input
//! to [`gesture::GestureTracker`], and the long-press timer is requested
//! rather than owned, so every gesture rule can be tested with plain
//! `Instant` arithmetic.

/// Pointer action values handed to the virtual pointer device.
pub mod action;

/// Tunable timing windows and multipliers.
pub mod config;

/// The finger and gesture state tracker.
pub mod gesture;
