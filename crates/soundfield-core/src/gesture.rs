//! Gesture lifecycle state machine.
//!
//! A *gesture* is a bracketed continuous-edit interval reported to host
//! automation as a begin/end pair; hosts use it to record touch-automation
//! envelopes. Gestures open in two ways:
//!
//! - explicitly, when the user presses a control
//!   ([`GestureState::begin_gui`]), and
//! - implicitly, when a value change arrives while no gesture is open
//!   ([`GestureState::on_value_change`]) — typically a host automation pass
//!   or a stream of incoming network values, which has no mouse-up to end it.
//!
//! Implicit gestures are closed by the idle-tick timeout: once
//! `hold_ticks` periodic ticks pass without an accepted value change, the
//! gesture ends. The machine is pure state; it returns which host signal
//! the caller must emit and knows nothing about locking or the host itself.
//!
//! Protocol misuse (double begin, end without begin) is a caller bug: it is
//! asserted in debug builds and treated as a no-op in release builds, so the
//! begin/end alternation invariant is never corrupted.

/// Host signal the caller must emit after a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    /// Emit a gesture-begin notification.
    Begin,
    /// Emit a gesture-end notification.
    End,
}

/// Per-parameter gesture lifecycle state.
///
/// Guarantees that across any call sequence, begin and end events strictly
/// alternate starting with begin, with exactly one end per begin.
#[derive(Debug, Clone)]
pub struct GestureState {
    /// True while a begin has been emitted with no matching end yet.
    open: bool,
    /// True while an explicit GUI gesture is held (mouse down).
    in_gui_gesture: bool,
    /// Ticks since the last accepted value change. Saturates at
    /// `hold_ticks`; while a GUI gesture is held it is not advanced.
    idle_ticks: u32,
    /// Timeout threshold in ticks.
    hold_ticks: u32,
}

impl GestureState {
    /// Create a closed, idle gesture state.
    ///
    /// The idle counter starts saturated so the very first value change
    /// opens a gesture immediately.
    pub fn new(hold_ticks: u32) -> Self {
        debug_assert!(hold_ticks >= 1, "hold_ticks must be at least 1");
        Self {
            open: false,
            in_gui_gesture: false,
            idle_ticks: hold_ticks,
            hold_ticks,
        }
    }

    /// Whether a gesture is currently open (begin emitted, end pending).
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether an explicit GUI gesture is currently held.
    pub fn in_gui_gesture(&self) -> bool {
        self.in_gui_gesture
    }

    /// Record an accepted value change.
    ///
    /// Opens a gesture if none is open and resets the idle counter so the
    /// timeout window starts over.
    #[must_use]
    pub fn on_value_change(&mut self) -> Option<GestureEvent> {
        // Closed implies the idle counter sits at the threshold.
        debug_assert!(self.open || self.idle_ticks >= self.hold_ticks);
        let event = if self.open {
            None
        } else {
            self.open = true;
            Some(GestureEvent::Begin)
        };
        self.idle_ticks = 0;
        event
    }

    /// Explicitly open a gesture (control pressed).
    ///
    /// Bypasses the idle-tick heuristic. If a gesture is already open
    /// implicitly, no second begin is emitted; the gesture is simply pinned
    /// until [`end_gui`](Self::end_gui).
    #[must_use]
    pub fn begin_gui(&mut self) -> Option<GestureEvent> {
        debug_assert!(
            !self.in_gui_gesture,
            "begin_gui while a GUI gesture is already held"
        );
        if self.in_gui_gesture {
            log::warn!("ignoring begin_gui: a GUI gesture is already held");
            return None;
        }
        self.in_gui_gesture = true;
        if self.open {
            None
        } else {
            self.open = true;
            Some(GestureEvent::Begin)
        }
    }

    /// Explicitly close a gesture (control released).
    ///
    /// Parks the idle counter at the threshold so the immediately following
    /// ticks cannot re-fire a spurious timeout close.
    #[must_use]
    pub fn end_gui(&mut self) -> Option<GestureEvent> {
        debug_assert!(self.in_gui_gesture, "end_gui without a held GUI gesture");
        if !self.in_gui_gesture {
            log::warn!("ignoring end_gui: no GUI gesture is held");
            return None;
        }
        self.in_gui_gesture = false;
        self.idle_ticks = self.hold_ticks;
        if self.open {
            self.open = false;
            Some(GestureEvent::End)
        } else {
            None
        }
    }

    /// Advance one periodic tick.
    ///
    /// While no explicit GUI gesture is held, ages the idle counter; the
    /// tick on which it reaches the threshold closes an open implicit
    /// gesture. Past the threshold the counter saturates, so further ticks
    /// are no-ops.
    #[must_use]
    pub fn tick(&mut self) -> Option<GestureEvent> {
        if self.in_gui_gesture {
            return None;
        }
        if self.idle_ticks < self.hold_ticks {
            self.idle_ticks += 1;
            if self.idle_ticks == self.hold_ticks && self.open {
                self.open = false;
                return Some(GestureEvent::End);
            }
        }
        None
    }
}
