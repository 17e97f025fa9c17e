//! Tokenizer for raw touch event lines.
//!
//! The relay produces one field update per line in the form printed by
//! Android's `getevent -l`:
//!
//! ```text
//! /dev/input/event4: EV_ABS       ABS_MT_TRACKING_ID   0000002a
//! /dev/input/event4: EV_ABS       ABS_MT_POSITION_X    000001a4
//! /dev/input/event4: EV_ABS       ABS_MT_POSITION_Y    00000310
//! /dev/input/event4: EV_KEY       BTN_TOUCH            DOWN
//! /dev/input/event4: EV_SYN       SYN_REPORT           00000000
//! ```
//!
//! Only the field name and the token after it matter. The leading device tag
//! is optional and the `EV_*` type column is skipped. Anything that does not
//! look like one of the recognised fields is dropped; parsing never fails.

/// Tracking-id value the touch controller reports when a finger is lifted.
pub const LIFT_TRACKING_ID: u32 = 0xFFFF_FFFF;

const FIELD_TRACKING_ID: &str = "ABS_MT_TRACKING_ID";
const FIELD_TOUCH: &str = "BTN_TOUCH";
const FIELD_POSITION_X: &str = "ABS_MT_POSITION_X";
const FIELD_POSITION_Y: &str = "ABS_MT_POSITION_Y";
const FIELD_SYNC: &str = "SYN_REPORT";

/// Sensor axis of an absolute position sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// A typed field update decoded from one event line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEvent {
    /// A finger was assigned a tracking id (new contact).
    FingerDown { tracking_id: u32 },
    /// A finger was lifted (tracking id set to the lift sentinel).
    FingerUp,
    /// The touch button went down.
    TouchDown,
    /// The touch button went up.
    TouchUp,
    /// Absolute position sample on one axis.
    Position { axis: Axis, value: i32 },
    /// Sync report: closes one batch of coordinated field updates.
    Sync,
}

impl TouchEvent {
    /// Returns `true` for events that belong to a coordinate batch
    /// (position samples and the sync report closing them).
    pub fn is_coordinate(&self) -> bool {
        matches!(self, Self::Position { .. } | Self::Sync)
    }
}

/// One decoded line: the optional device tag plus the semantic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    pub device: Option<&'a str>,
    pub event: TouchEvent,
}

/// Decodes a single raw line.
///
/// Returns `None` for blank, unrecognised, or malformed lines.
///
/// # Examples
///
/// ```rust
/// use touchpad_core::protocol::event_line::{parse_line, Axis, TouchEvent};
///
/// let parsed = parse_line("/dev/input/event4: EV_ABS ABS_MT_POSITION_X 00000064").unwrap();
/// assert_eq!(parsed.device, Some("/dev/input/event4"));
/// assert_eq!(parsed.event, TouchEvent::Position { axis: Axis::X, value: 100 });
/// assert!(parse_line("add device 1: /dev/input/event4").is_none());
/// ```
pub fn parse_line(line: &str) -> Option<ParsedLine<'_>> {
    let mut tokens = line.split_whitespace();
    let mut device = None;
    let mut first = true;

    while let Some(token) = tokens.next() {
        if is_field_name(token) {
            let event = decode_field(token, tokens.next())?;
            return Some(ParsedLine { device, event });
        }
        if first && !token.starts_with("EV_") {
            device = Some(token.trim_end_matches(':'));
        }
        first = false;
    }
    None
}

fn is_field_name(token: &str) -> bool {
    matches!(
        token,
        FIELD_TRACKING_ID | FIELD_TOUCH | FIELD_POSITION_X | FIELD_POSITION_Y | FIELD_SYNC
    )
}

fn decode_field(field: &str, value: Option<&str>) -> Option<TouchEvent> {
    match field {
        FIELD_TRACKING_ID => {
            let id = parse_hex(value?)?;
            if id == LIFT_TRACKING_ID {
                Some(TouchEvent::FingerUp)
            } else {
                Some(TouchEvent::FingerDown { tracking_id: id })
            }
        }
        FIELD_TOUCH => match value? {
            "DOWN" => Some(TouchEvent::TouchDown),
            "UP" => Some(TouchEvent::TouchUp),
            _ => None,
        },
        FIELD_POSITION_X => position(Axis::X, value?),
        FIELD_POSITION_Y => position(Axis::Y, value?),
        FIELD_SYNC => Some(TouchEvent::Sync),
        _ => None,
    }
}

fn position(axis: Axis, value: &str) -> Option<TouchEvent> {
    let value = i32::try_from(parse_hex(value)?).ok()?;
    Some(TouchEvent::Position { axis, value })
}

fn parse_hex(value: &str) -> Option<u32> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u32::from_str_radix(digits, 16).ok()
}

/// Line parser with an optional device filter.
///
/// When a filter is set, coordinate lines (positions and sync reports) are
/// only accepted from the matching device tag. Tracking-id and touch-button
/// lines pass regardless of their tag, as the relay reports them for the
/// whole controller.
#[derive(Debug, Clone, Default)]
pub struct EventLineParser {
    device_filter: Option<String>,
}

impl EventLineParser {
    /// Creates a parser that accepts lines from any device.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser that only accepts coordinate lines tagged `device`.
    pub fn with_device_filter(device: impl Into<String>) -> Self {
        Self {
            device_filter: Some(device.into()),
        }
    }

    /// Decodes `line` into a [`TouchEvent`], applying the device filter.
    pub fn parse(&self, line: &str) -> Option<TouchEvent> {
        let parsed = parse_line(line)?;
        match (&self.device_filter, parsed.device) {
            (Some(filter), device) if parsed.event.is_coordinate() => {
                (device == Some(filter.as_str())).then_some(parsed.event)
            }
            _ => Some(parsed.event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEV: &str = "/dev/input/event4:";

    fn line(field: &str, value: &str) -> String {
        format!("{DEV} EV_ABS       {field}    {value}")
    }

    #[test]
    fn test_tracking_id_assignment_yields_finger_down() {
        let raw = line("ABS_MT_TRACKING_ID", "0000002a");
        let parsed = parse_line(&raw).unwrap();
        assert_eq!(parsed.event, TouchEvent::FingerDown { tracking_id: 42 });
        assert_eq!(parsed.device, Some("/dev/input/event4"));
    }

    #[test]
    fn test_lift_sentinel_yields_finger_up() {
        let raw = line("ABS_MT_TRACKING_ID", "ffffffff");
        let parsed = parse_line(&raw).unwrap();
        assert_eq!(parsed.event, TouchEvent::FingerUp);
    }

    #[test]
    fn test_touch_button_keywords() {
        let down = parse_line("/dev/input/event4: EV_KEY BTN_TOUCH DOWN").unwrap();
        let up = parse_line("/dev/input/event4: EV_KEY BTN_TOUCH UP").unwrap();
        assert_eq!(down.event, TouchEvent::TouchDown);
        assert_eq!(up.event, TouchEvent::TouchUp);
    }

    #[test]
    fn test_touch_button_with_unknown_keyword_is_dropped() {
        assert!(parse_line("/dev/input/event4: EV_KEY BTN_TOUCH 00000001").is_none());
    }

    #[test]
    fn test_position_samples_are_hexadecimal() {
        let raw_x = line("ABS_MT_POSITION_X", "000001a4");
        let raw_y = line("ABS_MT_POSITION_Y", "0x6E");
        let x = parse_line(&raw_x).unwrap();
        let y = parse_line(&raw_y).unwrap();
        assert_eq!(x.event, TouchEvent::Position { axis: Axis::X, value: 420 });
        assert_eq!(y.event, TouchEvent::Position { axis: Axis::Y, value: 110 });
    }

    #[test]
    fn test_sync_report_needs_no_value() {
        let parsed = parse_line("/dev/input/event4: EV_SYN SYN_REPORT").unwrap();
        assert_eq!(parsed.event, TouchEvent::Sync);
    }

    #[test]
    fn test_line_without_device_tag_is_accepted() {
        let parsed = parse_line("EV_SYN SYN_REPORT 00000000").unwrap();
        assert_eq!(parsed.device, None);
        assert_eq!(parsed.event, TouchEvent::Sync);
    }

    #[test]
    fn test_malformed_and_unknown_lines_are_dropped() {
        assert!(parse_line("").is_none());
        assert!(parse_line("   ").is_none());
        assert!(parse_line("add device 1: /dev/input/event4").is_none());
        assert!(parse_line(&line("ABS_MT_PRESSURE", "00000010")).is_none());
        assert!(parse_line(&line("ABS_MT_POSITION_X", "zzzz")).is_none());
        assert!(parse_line(&line("ABS_MT_POSITION_X", "")).is_none());
        assert!(parse_line(&line("ABS_MT_TRACKING_ID", "1ffffffff")).is_none());
    }

    #[test]
    fn test_position_above_i32_range_is_dropped() {
        assert!(parse_line(&line("ABS_MT_POSITION_Y", "80000000")).is_none());
    }

    #[test]
    fn test_device_filter_applies_to_coordinate_lines_only() {
        // Arrange
        let parser = EventLineParser::with_device_filter("/dev/input/event4");

        // Act / Assert
        assert!(parser
            .parse("/dev/input/event2: EV_ABS ABS_MT_POSITION_X 00000010")
            .is_none());
        assert!(parser.parse("/dev/input/event2: EV_SYN SYN_REPORT 0").is_none());
        assert_eq!(
            parser.parse("/dev/input/event2: EV_KEY BTN_TOUCH DOWN"),
            Some(TouchEvent::TouchDown)
        );
        assert_eq!(
            parser.parse("/dev/input/event4: EV_SYN SYN_REPORT 0"),
            Some(TouchEvent::Sync)
        );
    }

    #[test]
    fn test_parser_without_filter_accepts_every_device() {
        let parser = EventLineParser::new();
        assert_eq!(
            parser.parse("/dev/input/event9: EV_SYN SYN_REPORT 0"),
            Some(TouchEvent::Sync)
        );
    }
}
