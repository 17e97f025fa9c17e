//! Foreground focus watcher.
//!
//! Periodically runs the configured probe command (for example
//! `adb shell dumpsys window`) and sets the shared foreground flag to whether
//! its stdout contains `match_text`. A probe that fails to run or exits
//! unsuccessfully leaves the flag unchanged.
//!
//! Without a configured command no watcher is started and the flag keeps its
//! initial value of `true`.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::application::context::SharedContext;
use crate::infrastructure::storage::config::ForegroundConfig;

/// Starts the watcher task, or returns `None` when no probe is configured.
pub fn spawn_foreground_watcher(
    config: ForegroundConfig,
    context: Arc<SharedContext>,
) -> Option<JoinHandle<()>> {
    let command = config.command.clone()?;
    let period = Duration::from_millis(config.poll_interval_ms.max(1));
    info!(%command, ?period, "foreground watcher started");

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_error_logged = false;

        while context.is_running() {
            ticker.tick().await;
            match probe(&command, &config.args, &config.match_text).await {
                Ok(foreground) => {
                    last_error_logged = false;
                    if context.is_foreground() != foreground {
                        info!(foreground, "foreground changed");
                    }
                    context.set_foreground(foreground);
                }
                // Log the first failure of a streak only.
                Err(e) if !last_error_logged => {
                    warn!("foreground probe failed: {e}");
                    last_error_logged = true;
                }
                Err(e) => debug!("foreground probe failed: {e}"),
            }
        }
    }))
}

/// Runs the probe once and reports whether `match_text` appeared.
///
/// # Errors
///
/// Returns an I/O error if the command cannot be run, or an
/// [`std::io::ErrorKind::Other`] error if it exits unsuccessfully.
pub async fn probe(command: &str, args: &[String], match_text: &str) -> std::io::Result<bool> {
    let output = Command::new(command)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await?;

    if !output.status.success() {
        return Err(std::io::Error::other(format!(
            "`{command}` exited with {}",
            output.status
        )));
    }
    Ok(contains(&output.stdout, match_text.as_bytes()))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_finds_package_name_in_dump() {
        let dump = b"  mCurrentFocus=Window{1f2 u0 com.example.touchpad/.MainActivity}\n";
        assert!(contains(dump, b"com.example.touchpad"));
        assert!(!contains(dump, b"com.example.other"));
        assert!(!contains(b"", b"x"));
    }

    #[test]
    fn test_no_command_starts_no_watcher() {
        let handle = spawn_foreground_watcher(ForegroundConfig::default(), SharedContext::new());
        assert!(handle.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_probe_matches_command_output() {
        let args = vec!["focus=com.example.touchpad".to_string()];

        assert!(probe("echo", &args, "com.example.touchpad").await.unwrap());
        assert!(!probe("echo", &args, "com.example.other").await.unwrap());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_probe_is_an_error() {
        assert!(probe("false", &[], "anything").await.is_err());
        assert!(probe("/nonexistent/probe", &[], "anything").await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_watcher_clears_foreground_when_text_missing() {
        // Arrange
        let context = SharedContext::new();
        let config = ForegroundConfig {
            command: Some("echo".to_string()),
            args: vec!["launcher".to_string()],
            match_text: "com.example.touchpad".to_string(),
            poll_interval_ms: 10,
        };

        // Act
        let handle = spawn_foreground_watcher(config, Arc::clone(&context)).unwrap();
        for _ in 0..200 {
            if !context.is_foreground() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        context.stop();
        handle.await.unwrap();

        // Assert
        assert!(!context.is_foreground());
    }
}
