//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML configuration from the
//! platform-appropriate directory (or an explicit path), falls back to
//! defaults on first run, and can write a starter file back to disk.

pub mod config;
