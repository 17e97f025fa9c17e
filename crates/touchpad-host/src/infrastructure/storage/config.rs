//! TOML-based configuration for the host binary.
//!
//! Reads `AppConfig` from `--config <path>` when given, otherwise from the
//! platform-appropriate config file:
//! - Windows:  `%APPDATA%\TouchpadBridge\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/touchpad-bridge/config.toml` (or `~/.config/...`)
//! - macOS:    `~/Library/Application Support/TouchpadBridge/config.toml`
//!
//! ```toml
//! [app]
//! log_level = "info"
//!
//! [gesture]
//! sensitivity = 3.2
//!
//! [device]
//! backend = "auto"          # or "dry-run"
//! name = "Sponge Virtual Mouse"
//!
//! [source]
//! command = "adb"
//! args = ["shell", "getevent", "-l"]
//! device_filter = "/dev/input/event4"
//!
//! [foreground]
//! command = "adb"
//! args = ["shell", "dumpsys", "window"]
//! match_text = "com.example.touchpad"
//! ```
//!
//! Every field carries a serde default, so a missing file, a missing table,
//! or a missing key all fall back to the values below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use touchpad_core::GestureConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub app: GeneralConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub foreground: ForegroundConfig,
}

/// Process-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` log level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Which virtual pointer implementation to open.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceBackend {
    /// The OS backend for the running platform.
    #[default]
    Auto,
    /// Log actions instead of injecting them.
    DryRun,
}

/// Virtual pointer device settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    #[serde(default)]
    pub backend: DeviceBackend,
    /// Name the uinput device registers under.
    #[serde(default = "default_device_name")]
    pub name: String,
    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,
    #[serde(default = "default_product_id")]
    pub product_id: u16,
}

/// Where raw event lines come from.
///
/// `path` wins over `command`; with neither set, lines are read from stdin.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    /// Relay program whose stdout carries event lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    /// File to read event lines from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Only accept coordinate lines from this device tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_filter: Option<String>,
}

/// Optional foreground watcher.
///
/// Without a `command`, the foreground flag stays `true`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForegroundConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    /// Foreground is reported while the command's stdout contains this text.
    #[serde(default)]
    pub match_text: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_device_name() -> String {
    "Sponge Virtual Mouse".to_string()
}
fn default_vendor_id() -> u16 {
    0x1234
}
fn default_product_id() -> u16 {
    0x5678
}
fn default_poll_interval_ms() -> u64 {
    500
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            backend: DeviceBackend::default(),
            name: default_device_name(),
            vendor_id: default_vendor_id(),
            product_id: default_product_id(),
        }
    }
}

impl Default for ForegroundConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            match_text: String::new(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the default config file path.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    let dir = platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)?;
    Ok(dir.join("config.toml"))
}

/// Loads `AppConfig` from `path`, or from [`config_file_path`] when `None`.
///
/// A missing file yields `AppConfig::default()`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io { path, source }),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory, including the app subdirectory.
pub fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("TouchpadBridge"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("touchpad-bridge"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("TouchpadBridge")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("touchpad_test_{}", Uuid::new_v4()))
    }

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_device_config_default_matches_registered_identity() {
        // Arrange / Act
        let cfg = DeviceConfig::default();

        // Assert
        assert_eq!(cfg.backend, DeviceBackend::Auto);
        assert_eq!(cfg.name, "Sponge Virtual Mouse");
        assert_eq!(cfg.vendor_id, 0x1234);
        assert_eq!(cfg.product_id, 0x5678);
    }

    #[test]
    fn test_default_source_reads_stdin() {
        let cfg = SourceConfig::default();
        assert!(cfg.command.is_none());
        assert!(cfg.path.is_none());
        assert!(cfg.device_filter.is_none());
    }

    #[test]
    fn test_foreground_default_polls_every_half_second() {
        let cfg = ForegroundConfig::default();
        assert_eq!(cfg.poll_interval_ms, 500);
        assert!(cfg.command.is_none());
    }

    // ── Parsing ───────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_toml_yields_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.app.log_level, "info");
    }

    #[test]
    fn test_partial_tables_override_only_given_keys() {
        // Arrange
        let toml_str = r#"
[gesture]
sensitivity = 2.0

[device]
backend = "dry-run"

[source]
command = "adb"
args = ["shell", "getevent", "-l"]
device_filter = "/dev/input/event4"
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.gesture.sensitivity, 2.0);
        assert_eq!(cfg.gesture.tap_timeout_ms, 200);
        assert_eq!(cfg.device.backend, DeviceBackend::DryRun);
        assert_eq!(cfg.device.name, "Sponge Virtual Mouse");
        assert_eq!(cfg.source.command.as_deref(), Some("adb"));
        assert_eq!(cfg.source.args, vec!["shell", "getevent", "-l"]);
        assert_eq!(cfg.source.device_filter.as_deref(), Some("/dev/input/event4"));
    }

    #[test]
    fn test_unknown_backend_is_a_parse_error() {
        let result: Result<AppConfig, _> = toml::from_str("[device]\nbackend = \"x11\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_none_fields_are_omitted_when_serialized() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        assert!(!toml_str.contains("device_filter"));
        assert!(!toml_str.contains("command"));
        assert!(toml_str.contains("backend = \"auto\""));
    }

    // ── load_config / save_config ─────────────────────────────────────────────

    #[test]
    fn test_load_config_returns_default_when_file_absent() {
        // Arrange
        let path = temp_dir().join("config.toml");

        // Act
        let cfg = load_config(Some(&path)).expect("load");

        // Assert
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_save_and_load_config_round_trip_via_temp_dir() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("nested").join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.app.log_level = "debug".to_string();
        cfg.foreground.command = Some("adb".to_string());
        cfg.foreground.match_text = "com.example.touchpad".to_string();

        // Act
        save_config(&cfg, &path).expect("save");
        let loaded = load_config(Some(&path)).expect("load");

        // Assert
        assert_eq!(loaded, cfg);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_config_reports_malformed_toml() {
        // Arrange
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        // Act
        let result = load_config(Some(&path));

        // Assert
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        if let Ok(path) = config_file_path() {
            assert!(
                path.ends_with("config.toml"),
                "config file must be named config.toml, got {path:?}"
            );
        }
    }
}
