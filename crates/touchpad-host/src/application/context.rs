//! Process-wide flags shared between the engine, the line reader, and the
//! foreground watcher.
//!
//! Writers use `Release` and readers use `Acquire`, so a reader that sees a
//! flag change also sees everything the writer did before flipping it. The
//! foreground flag may lag the companion app by one watcher poll; it only
//! gates motion, never gesture classification.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Shared flags, always handled through an `Arc`.
#[derive(Debug)]
pub struct SharedContext {
    foreground: AtomicBool,
    running: AtomicBool,
}

impl SharedContext {
    /// Creates a running context with the companion app assumed focused.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            foreground: AtomicBool::new(true),
            running: AtomicBool::new(true),
        })
    }

    pub fn is_foreground(&self) -> bool {
        self.foreground.load(Ordering::Acquire)
    }

    pub fn set_foreground(&self, focused: bool) {
        self.foreground.store(focused, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Signals every background task to wind down.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_is_running_and_focused() {
        let ctx = SharedContext::new();
        assert!(ctx.is_running());
        assert!(ctx.is_foreground());
    }

    #[test]
    fn test_flags_are_visible_across_clones() {
        let ctx = SharedContext::new();
        let other = Arc::clone(&ctx);

        other.set_foreground(false);
        other.stop();

        assert!(!ctx.is_foreground());
        assert!(!ctx.is_running());
    }
}
