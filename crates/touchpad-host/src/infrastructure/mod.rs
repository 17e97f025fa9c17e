//! Infrastructure layer for the host.
//!
//! Contains OS-facing adapters: virtual pointer backends, the event line
//! source, the foreground watcher, and config file storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `touchpad_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`pointer_device`** – OS-specific implementations of `PointerDevice`
//!   (uinput on Linux, `SendInput` on Windows), a dry-run logger, and a
//!   recording mock for tests.
//!
//! - **`event_source`** – opens stdin, a capture file, or a relay command and
//!   pumps its lines into the engine queue.
//!
//! - **`foreground`** – polls a probe command and updates the shared
//!   foreground flag.
//!
//! - **`storage`** – TOML config loading and saving.

pub mod event_source;
pub mod foreground;
pub mod pointer_device;
pub mod storage;
