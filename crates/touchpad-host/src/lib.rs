//! touchpad-host library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does touchpad-host do?
//!
//! A phone running a relay streams its raw touchscreen events as
//! `getevent -l` text lines. The host:
//!
//! 1. Reads those lines from stdin, a capture file, or a relay command.
//! 2. Decodes and classifies them with `touchpad_core`'s gesture tracker.
//! 3. Injects the resulting relative motion, clicks and wheel events through
//!    a virtual pointer (uinput on Linux, `SendInput` on Windows).
//!
//! Gestures are only honoured while the companion app is in the foreground;
//! an optional watcher keeps that flag current.

/// Application layer: pointer emission, shared context, the engine loop.
pub mod application;

/// Infrastructure layer: OS pointer backends, event source, config storage.
pub mod infrastructure;
