//! Raw event line decoding.

pub mod event_line;

pub use event_line::{parse_line, Axis, EventLineParser, ParsedLine, TouchEvent, LIFT_TRACKING_ID};
