//! Application layer use cases for the host.
//!
//! - **`emit_pointer`** – Hands tracker output to a `PointerDevice`
//!   implementation injected at construction time. Also defines the
//!   `PointerDevice` trait and its error type.
//!
//! - **`context`** – Process-wide flags (foreground focus, running) shared
//!   between the engine and the infrastructure tasks.
//!
//! - **`run_engine`** – The single consumer of the event queue. Owns the
//!   parser, the gesture tracker, the long-press timer and the emitter.

pub mod context;
pub mod emit_pointer;
pub mod run_engine;
