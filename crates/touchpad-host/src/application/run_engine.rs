//! Engine: the single owner of all gesture state.
//!
//! # Architecture
//!
//! ```text
//! line reader task ──Line──┐
//!                          ├──▶ mpsc queue ──▶ Engine::run ──▶ PointerEmitter ──▶ PointerDevice
//! long-press timer ──Elapsed┘                      │
//!                                                  └── GestureTracker (owned)
//! ```
//!
//! Every tracker mutation happens inside [`Engine::run`]. The long-press
//! timer never touches the tracker directly: it posts
//! [`EngineInput::LongPressElapsed`] onto the same queue the reader uses, so
//! timer expiry is ordered against line events like any other message.
//!
//! Shutdown aborts the pending timer before the device is closed, and the
//! device is closed exactly once.

use std::future::Future;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use tokio::{sync::mpsc, task::JoinHandle, time::Instant};
use touchpad_core::{EventLineParser, GestureTracker, LongPressToken, Reaction, TimerCommand};
use tracing::{debug, info, trace, warn};

use crate::application::context::SharedContext;
use crate::application::emit_pointer::PointerEmitter;

/// A message for the engine queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineInput {
    /// One raw line from the event source.
    Line(String),
    /// The long-press timer armed with this token expired.
    LongPressElapsed(LongPressToken),
    /// The event source reached end of stream.
    SourceClosed,
}

/// Producer side of the engine queue.
pub type EngineSender = mpsc::UnboundedSender<EngineInput>;

/// Counters reported when the engine stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub lines: u64,
    pub dropped_lines: u64,
    pub actions: u64,
    pub failed_actions: u64,
}

/// The gesture engine.
pub struct Engine {
    parser: EventLineParser,
    tracker: GestureTracker,
    emitter: PointerEmitter,
    context: Arc<SharedContext>,
    tx: EngineSender,
    rx: mpsc::UnboundedReceiver<EngineInput>,
    /// The armed timer task and the token it will report.
    long_press: Option<(LongPressToken, JoinHandle<()>)>,
    stats: EngineStats,
}

impl Engine {
    pub fn new(
        parser: EventLineParser,
        tracker: GestureTracker,
        emitter: PointerEmitter,
        context: Arc<SharedContext>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            parser,
            tracker,
            emitter,
            context,
            tx,
            rx,
            long_press: None,
            stats: EngineStats::default(),
        }
    }

    /// Returns a sender for the line reader.
    pub fn sender(&self) -> EngineSender {
        self.tx.clone()
    }

    /// Consumes the queue until `shutdown` resolves or the source closes.
    ///
    /// On return the long-press timer is gone and the device is closed.
    pub async fn run<F>(mut self, shutdown: F) -> EngineStats
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!("engine started");

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
                input = self.rx.recv() => {
                    let Some(input) = input else { break };
                    if self.dispatch(input).is_break() {
                        break;
                    }
                }
            }
        }

        self.finish();
        self.stats
    }

    fn dispatch(&mut self, input: EngineInput) -> ControlFlow<()> {
        match input {
            EngineInput::Line(line) => {
                self.stats.lines += 1;
                match self.parser.parse(&line) {
                    Some(event) => {
                        let now = Instant::now().into_std();
                        let foreground = self.context.is_foreground();
                        let reaction = self.tracker.handle(event, now, foreground);
                        self.apply(reaction);
                    }
                    None => {
                        self.stats.dropped_lines += 1;
                        trace!(%line, "dropped line");
                    }
                }
            }
            EngineInput::LongPressElapsed(token) => {
                // A stale expiry must not detach the live timer.
                if self.long_press.as_ref().is_some_and(|(armed, _)| *armed == token) {
                    self.long_press = None;
                }
                let reaction = self.tracker.long_press_elapsed(token);
                self.apply(reaction);
            }
            EngineInput::SourceClosed => {
                warn!("event source closed; no further pointer actions");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn apply(&mut self, reaction: Reaction) {
        match reaction.timer {
            Some(TimerCommand::Arm { token, after }) => self.arm_long_press(token, after),
            Some(TimerCommand::Cancel) => self.cancel_long_press(),
            None => {}
        }
        self.emitter.emit_all(reaction.actions);
    }

    fn arm_long_press(&mut self, token: LongPressToken, after: Duration) {
        self.cancel_long_press();
        debug!(?token, ?after, "long press armed");
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            // The engine may already be gone during shutdown.
            let _ = tx.send(EngineInput::LongPressElapsed(token));
        });
        self.long_press = Some((token, handle));
    }

    fn cancel_long_press(&mut self) {
        if let Some((_, handle)) = self.long_press.take() {
            handle.abort();
        }
    }

    fn finish(&mut self) {
        self.context.stop();
        self.cancel_long_press();
        self.emitter.device().close();
        self.stats.actions = self.emitter.emitted();
        self.stats.failed_actions = self.emitter.failures();
        info!(
            lines = self.stats.lines,
            dropped = self.stats.dropped_lines,
            actions = self.stats.actions,
            failed = self.stats.failed_actions,
            "engine stopped"
        );
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
