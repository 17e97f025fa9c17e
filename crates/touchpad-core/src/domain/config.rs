//! Tunable gesture parameters.
//!
//! Stored under the `[gesture]` table of the host's TOML config. Every field
//! has a serde default so a partial table (or no table at all) works.
//!
//! ```toml
//! [gesture]
//! sensitivity = 3.2
//! scroll_sensitivity = 120.0
//! tap_timeout_ms = 200
//! double_tap_window_ms = 250
//! long_press_timeout_ms = 600
//! scroll_threshold = 1.0
//! scroll_step = 0.1
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing windows and multipliers used by the gesture tracker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GestureConfig {
    /// Multiplier applied to raw coordinate deltas before they become host pixels.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
    /// Multiplier applied to the scroll accumulator when a wheel event is emitted.
    #[serde(default = "default_scroll_sensitivity")]
    pub scroll_sensitivity: f64,
    /// Maximum touch duration that still counts as a tap.
    #[serde(default = "default_tap_timeout_ms")]
    pub tap_timeout_ms: u64,
    /// Window after a pure tap in which a new touch starts a drag.
    #[serde(default = "default_double_tap_window_ms")]
    pub double_tap_window_ms: u64,
    /// Hold time before a motionless single finger becomes a right click.
    #[serde(default = "default_long_press_timeout_ms")]
    pub long_press_timeout_ms: u64,
    /// Accumulated magnitude at which a scroll event is emitted.
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold: f64,
    /// Per-sample factor applied to the vertical host delta while scrolling.
    #[serde(default = "default_scroll_step")]
    pub scroll_step: f64,
}

fn default_sensitivity() -> f64 {
    3.2
}
fn default_scroll_sensitivity() -> f64 {
    120.0
}
fn default_tap_timeout_ms() -> u64 {
    200
}
fn default_double_tap_window_ms() -> u64 {
    250
}
fn default_long_press_timeout_ms() -> u64 {
    600
}
fn default_scroll_threshold() -> f64 {
    1.0
}
fn default_scroll_step() -> f64 {
    0.1
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            scroll_sensitivity: default_scroll_sensitivity(),
            tap_timeout_ms: default_tap_timeout_ms(),
            double_tap_window_ms: default_double_tap_window_ms(),
            long_press_timeout_ms: default_long_press_timeout_ms(),
            scroll_threshold: default_scroll_threshold(),
            scroll_step: default_scroll_step(),
        }
    }
}

impl GestureConfig {
    pub fn tap_timeout(&self) -> Duration {
        Duration::from_millis(self.tap_timeout_ms)
    }

    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }

    pub fn long_press_timeout(&self) -> Duration {
        Duration::from_millis(self.long_press_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let cfg = GestureConfig::default();
        assert_eq!(cfg.sensitivity, 3.2);
        assert_eq!(cfg.scroll_sensitivity, 120.0);
        assert_eq!(cfg.tap_timeout(), Duration::from_millis(200));
        assert_eq!(cfg.double_tap_window(), Duration::from_millis(250));
        assert_eq!(cfg.long_press_timeout(), Duration::from_millis(600));
        assert_eq!(cfg.scroll_threshold, 1.0);
        assert_eq!(cfg.scroll_step, 0.1);
    }

    #[test]
    fn test_partial_table_keeps_remaining_defaults() {
        // Arrange
        let toml_str = "sensitivity = 1.5\nlong_press_timeout_ms = 800\n";

        // Act
        let cfg: GestureConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.sensitivity, 1.5);
        assert_eq!(cfg.long_press_timeout_ms, 800);
        assert_eq!(cfg.tap_timeout_ms, 200);
        assert_eq!(cfg.scroll_sensitivity, 120.0);
    }
}
