//! Raw event line sources.
//!
//! Lines come from one of three places, in order of precedence:
//!
//! 1. a file (`source.path` or `--input`), useful for replaying captures;
//! 2. a relay command (`source.command`), whose stdout is read;
//! 3. the process's stdin.
//!
//! [`spawn_line_reader`] pumps the chosen reader into the engine queue one
//! line at a time and posts `SourceClosed` when the stream ends.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::context::SharedContext;
use crate::application::run_engine::{EngineInput, EngineSender};
use crate::infrastructure::storage::config::SourceConfig;

/// Error type for opening an event source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open event file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn relay command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("relay command `{0}` has no stdout pipe")]
    NoStdout(String),
}

/// Boxed line reader handed to [`spawn_line_reader`].
pub type LineReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// An opened event source.
///
/// When the source is a relay command, `child` keeps it alive; dropping the
/// source kills the process.
pub struct EventSource {
    pub reader: LineReader,
    pub child: Option<Child>,
    pub description: String,
}

/// Opens the source described by `config`.
///
/// # Errors
///
/// Returns [`SourceError::Open`] if the file cannot be opened and
/// [`SourceError::Spawn`] if the relay command cannot be started.
pub async fn open_event_source(config: &SourceConfig) -> Result<EventSource, SourceError> {
    if let Some(path) = &config.path {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|source| SourceError::Open {
                path: path.clone(),
                source,
            })?;
        return Ok(EventSource {
            reader: Box::new(BufReader::new(file)),
            child: None,
            description: format!("file {}", path.display()),
        });
    }

    if let Some(command) = &config.command {
        let mut child = Command::new(command)
            .args(&config.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SourceError::Spawn {
                command: command.clone(),
                source,
            })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SourceError::NoStdout(command.clone()))?;
        return Ok(EventSource {
            reader: Box::new(BufReader::new(stdout)),
            child: Some(child),
            description: format!("command {command}"),
        });
    }

    Ok(EventSource {
        reader: Box::new(BufReader::new(tokio::io::stdin())),
        child: None,
        description: "stdin".to_string(),
    })
}

/// Spawns the task that forwards lines from `reader` into the engine queue.
///
/// The task ends at end of stream, on a read error, when the engine queue is
/// gone, or when the context stops running. In the first two cases it posts
/// [`EngineInput::SourceClosed`]. Returns the number of lines forwarded.
pub fn spawn_line_reader<R>(
    mut reader: R,
    sender: EngineSender,
    context: Arc<SharedContext>,
) -> JoinHandle<u64>
where
    R: AsyncBufRead + Send + Unpin + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::with_capacity(128);
        let mut forwarded = 0u64;

        while context.is_running() {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => {
                    info!(lines = forwarded, "event source reached end of stream");
                    let _ = sender.send(EngineInput::SourceClosed);
                    break;
                }
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']);
                    if sender.send(EngineInput::Line(line.to_owned())).is_err() {
                        debug!("engine queue closed; line reader exiting");
                        break;
                    }
                    forwarded += 1;
                }
                Err(e) => {
                    warn!("event source read failed: {e}");
                    let _ = sender.send(EngineInput::SourceClosed);
                    break;
                }
            }
        }
        forwarded
    })
}
