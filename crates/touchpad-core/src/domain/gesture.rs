//! Finger and gesture state tracker.
//!
//! [`GestureTracker`] consumes decoded [`TouchEvent`]s one at a time and
//! turns them into [`PointerAction`]s:
//!
//! | Gesture                                   | Result                          |
//! |-------------------------------------------|---------------------------------|
//! | one finger moves                          | `Move`                          |
//! | short touch without movement              | left click                      |
//! | motionless single finger held             | right click (long press)        |
//! | touch again shortly after a pure tap      | left button held until lift     |
//! | two or more fingers move                  | `Scroll`                        |
//!
//! The tracker never sleeps and never spawns anything. Time is passed in
//! with every event, and the long-press timer is requested through a
//! [`TimerCommand`] in the returned [`Reaction`]. Whoever owns the timer
//! reports expiry back through [`GestureTracker::long_press_elapsed`] with the
//! token it was armed with; stale tokens are ignored, so a timer that fires
//! after being cancelled can never produce a click.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::domain::action::{MouseButton, PointerAction};
use crate::domain::config::GestureConfig;
use crate::protocol::event_line::{Axis, TouchEvent};

/// Raw sensor coordinate sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Baseline sentinel meaning "no sample yet".
    ///
    /// A real sample at (0, 0) is indistinguishable from this value and is
    /// treated as unset.
    pub const UNSET: Point = Point { x: 0, y: 0 };

    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }
}

/// Identifies one armed long-press timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LongPressToken(u64);

/// Request to the timer owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Start (or restart) the long-press timer; report `token` after `after`.
    Arm { token: LongPressToken, after: Duration },
    /// Drop the outstanding long-press timer.
    Cancel,
}

/// Output of one tracker step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reaction {
    /// Pointer actions in emission order.
    pub actions: Vec<PointerAction>,
    /// Long-press timer change, if any.
    pub timer: Option<TimerCommand>,
}

impl Reaction {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.timer.is_none()
    }

    fn push(&mut self, action: PointerAction) {
        self.actions.push(action);
    }

    fn click(&mut self, which: MouseButton) {
        self.push(PointerAction::press(which));
        self.push(PointerAction::release(which));
    }
}

/// Coarse tracker state, derived from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Touching,
    Dragging,
}

/// Per-process touch state, mutated only by [`GestureTracker`].
#[derive(Debug, Clone)]
pub struct TouchSession {
    pub active_fingers: u32,
    pub baseline: Point,
    pub current: Point,
    pub touch_down_at: Option<Instant>,
    pub has_moved: bool,
    pub right_click_fired: bool,
    pub dragging: bool,
    pub last_release_at: Option<Instant>,
    pub last_release_was_pure_tap: bool,
    pub scroll_accumulator: f64,
    pub pending_long_press: Option<LongPressToken>,
}

impl Default for TouchSession {
    fn default() -> Self {
        Self {
            active_fingers: 0,
            baseline: Point::UNSET,
            current: Point::UNSET,
            touch_down_at: None,
            has_moved: false,
            right_click_fired: false,
            dragging: false,
            last_release_at: None,
            last_release_was_pure_tap: false,
            scroll_accumulator: 0.0,
            pending_long_press: None,
        }
    }
}

/// The gesture state machine.
#[derive(Debug)]
pub struct GestureTracker {
    config: GestureConfig,
    session: TouchSession,
    next_token: u64,
}

impl GestureTracker {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            session: TouchSession::default(),
            next_token: 0,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn session(&self) -> &TouchSession {
        &self.session
    }

    pub fn phase(&self) -> GesturePhase {
        if self.session.dragging {
            GesturePhase::Dragging
        } else if self.session.active_fingers > 0 {
            GesturePhase::Touching
        } else {
            GesturePhase::Idle
        }
    }

    /// Applies one decoded event.
    ///
    /// `foreground` is the current value of the external focus signal; it
    /// only gates coordinate batches.
    pub fn handle(&mut self, event: TouchEvent, now: Instant, foreground: bool) -> Reaction {
        let mut reaction = Reaction::default();
        match event {
            TouchEvent::FingerDown { .. } => self.finger_down(now, &mut reaction),
            TouchEvent::FingerUp => self.finger_up(now, &mut reaction),
            TouchEvent::TouchDown => self.touch_down(now, &mut reaction),
            TouchEvent::TouchUp => self.touch_up(now, &mut reaction),
            TouchEvent::Position { axis: Axis::X, value } => self.session.current.x = value,
            TouchEvent::Position { axis: Axis::Y, value } => self.session.current.y = value,
            TouchEvent::Sync => self.sync(foreground, &mut reaction),
        }
        reaction
    }

    /// Reports that the long-press timer armed with `token` has expired.
    ///
    /// The guards are evaluated against the state at expiry, not at arming.
    pub fn long_press_elapsed(&mut self, token: LongPressToken) -> Reaction {
        let mut reaction = Reaction::default();
        if self.session.pending_long_press != Some(token) {
            debug!(?token, "ignoring stale long-press expiry");
            return reaction;
        }
        self.session.pending_long_press = None;

        let s = &self.session;
        if !s.has_moved && !s.right_click_fired && s.active_fingers == 1 {
            debug!("long press: right click");
            reaction.click(MouseButton::Right);
            self.session.right_click_fired = true;
        }
        reaction
    }

    fn finger_down(&mut self, now: Instant, reaction: &mut Reaction) {
        self.session.active_fingers += 1;
        self.session.baseline = Point::UNSET;

        let within_window = self
            .session
            .last_release_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.config.double_tap_window());
        if self.session.last_release_was_pure_tap && within_window && !self.session.dragging {
            debug!("double tap: drag started");
            self.session.dragging = true;
            reaction.push(PointerAction::press(MouseButton::Left));
        }
    }

    fn finger_up(&mut self, now: Instant, reaction: &mut Reaction) {
        self.session.active_fingers = self.session.active_fingers.saturating_sub(1);
        if self.session.dragging {
            debug!("drag released");
            self.session.dragging = false;
            reaction.push(PointerAction::release(MouseButton::Left));
        }
        self.session.last_release_was_pure_tap =
            !self.session.has_moved && self.session.active_fingers == 0;
        self.session.last_release_at = Some(now);
    }

    fn touch_down(&mut self, now: Instant, reaction: &mut Reaction) {
        self.session.touch_down_at = Some(now);
        self.session.has_moved = false;
        self.session.right_click_fired = false;
        if !self.session.dragging {
            self.arm_long_press(reaction);
        }
    }

    fn touch_up(&mut self, now: Instant, reaction: &mut Reaction) {
        self.cancel_long_press(reaction);

        let s = &self.session;
        let quick = s
            .touch_down_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.config.tap_timeout());
        if !s.dragging && !s.has_moved && !s.right_click_fired && quick {
            debug!("tap: left click");
            reaction.click(MouseButton::Left);
        }
    }

    fn sync(&mut self, foreground: bool, reaction: &mut Reaction) {
        if !foreground {
            self.session.baseline = Point::UNSET;
            return;
        }

        let last = self.session.baseline;
        let cur = self.session.current;
        self.session.baseline = cur;
        if last.is_unset() {
            return;
        }

        // The sensor is mounted rotated 90° against the screen.
        let dx = scale(i64::from(last.y) - i64::from(cur.y), self.config.sensitivity);
        let dy = scale(i64::from(cur.x) - i64::from(last.x), self.config.sensitivity);
        if dx == 0 && dy == 0 {
            return;
        }

        self.session.has_moved = true;
        self.cancel_long_press(reaction);

        if self.session.active_fingers >= 2 {
            self.session.scroll_accumulator += f64::from(dy) * self.config.scroll_step;
            let acc = self.session.scroll_accumulator;
            if acc.abs() >= self.config.scroll_threshold {
                #[allow(clippy::cast_possible_truncation)]
                let delta = (acc * self.config.scroll_sensitivity).round() as i32;
                reaction.push(PointerAction::Scroll { delta });
                self.session.scroll_accumulator = 0.0;
            }
        } else {
            reaction.push(PointerAction::Move { dx, dy });
        }
    }

    fn arm_long_press(&mut self, reaction: &mut Reaction) {
        self.next_token += 1;
        let token = LongPressToken(self.next_token);
        self.session.pending_long_press = Some(token);
        reaction.timer = Some(TimerCommand::Arm {
            token,
            after: self.config.long_press_timeout(),
        });
    }

    fn cancel_long_press(&mut self, reaction: &mut Reaction) {
        if self.session.pending_long_press.take().is_some() {
            reaction.timer = Some(TimerCommand::Cancel);
        }
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn scale(delta: i64, factor: f64) -> i32 {
    (delta as f64 * factor) as i32
}

// ── Tests ─────────────────────────────────────────────────────────────────────
