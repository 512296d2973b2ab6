//! Gesture-managed automation parameters.
//!
//! Each parameter owns one automation-visible scalar plus the gesture
//! lifecycle that brackets its edits for the host, regardless of whether a
//! change originates from a literal GUI drag, a host automation pass or an
//! incoming network value. Two variants exist:
//!
//! - [`FloatParameter`] — continuous value with a range and a per-parameter
//!   step size acting as the change-detection tolerance (ranges differ
//!   wildly between parameters, e.g. dB gain vs. normalized position, so a
//!   global epsilon would be wrong).
//! - [`ChoiceParameter`] — discrete index over a fixed name list; any index
//!   change is a real change. It carries the identical gesture machine,
//!   including the explicit GUI pair, so the two variants cannot diverge.
//!
//! Internal state is guarded by a lock scoped to this one parameter:
//! `set_value` and `tick` on the same parameter are mutually exclusive,
//! while different parameters never share a lock (over-locking would
//! serialize unrelated automation lanes). Host notifications are emitted
//! while the lock is held, so the begin/end order the host observes matches
//! call order.

use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::gesture::{GestureEvent, GestureState};
use crate::host::HostLink;
use crate::types::{ParameterId, ParameterValue};

/// Guarded state of a [`FloatParameter`].
#[derive(Debug)]
struct FloatState {
    value: ParameterValue,
    /// The two most recently applied values, newest first.
    last_values: [ParameterValue; 2],
    gesture: GestureState,
}

/// Continuous gesture-managed parameter.
pub struct FloatParameter {
    id: ParameterId,
    name: &'static str,
    min: ParameterValue,
    max: ParameterValue,
    /// Minimum delta considered a real change.
    step: ParameterValue,
    state: Mutex<FloatState>,
    host: Arc<dyn HostLink>,
}

impl FloatParameter {
    /// Create a parameter with the given native range and step tolerance.
    pub fn new(
        id: ParameterId,
        name: &'static str,
        default: ParameterValue,
        range: RangeInclusive<ParameterValue>,
        step: ParameterValue,
        hold_ticks: u32,
        host: Arc<dyn HostLink>,
    ) -> Self {
        let min = *range.start();
        let max = *range.end();
        debug_assert!(min <= max, "parameter '{name}' has an inverted range");
        let default = default.clamp(min, max);
        Self {
            id,
            name,
            min,
            max,
            step,
            state: Mutex::new(FloatState {
                value: default,
                last_values: [default; 2],
                gesture: GestureState::new(hold_ticks),
            }),
            host,
        }
    }

    /// Host-visible id of this parameter.
    pub fn id(&self) -> ParameterId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Native range bounds.
    pub fn range(&self) -> RangeInclusive<ParameterValue> {
        self.min..=self.max
    }

    /// Change-detection step size.
    pub fn step(&self) -> ParameterValue {
        self.step
    }

    /// Current value in native units.
    pub fn get(&self) -> ParameterValue {
        self.locked().value
    }

    /// The two most recently applied values, newest first.
    pub fn last_values(&self) -> [ParameterValue; 2] {
        self.locked().last_values
    }

    /// Current value normalized to `[0, 1]`.
    pub fn normalized(&self) -> ParameterValue {
        self.normalize(self.get())
    }

    /// Map a native value onto `[0, 1]`.
    pub fn normalize(&self, value: ParameterValue) -> ParameterValue {
        if self.max <= self.min {
            return 0.0;
        }
        ((value.clamp(self.min, self.max)) - self.min) / (self.max - self.min)
    }

    /// Whether a gesture is currently open for this parameter.
    pub fn gesture_open(&self) -> bool {
        self.locked().gesture.is_open()
    }

    /// Apply a value change.
    ///
    /// The value is clamped to the native range. A write within the step
    /// tolerance of the current value is a complete no-op: no gesture side
    /// effects, no host push, and the return value `false` tells the owning
    /// processor not to broadcast. On a real change the gesture machine may
    /// open a gesture, the value history advances, and the normalized value
    /// is pushed to the host.
    pub fn set_value(&self, value: ParameterValue) -> bool {
        let value = value.clamp(self.min, self.max);
        let mut state = self.locked();

        let real = value >= state.value + self.step || value <= state.value - self.step;
        if !real {
            return false;
        }

        if let Some(event) = state.gesture.on_value_change() {
            self.emit(event);
        }
        state.last_values = [value, state.last_values[0]];
        state.value = value;
        self.host.push_normalized(self.id, self.normalize(value));
        true
    }

    /// Explicitly open a gesture (control pressed).
    pub fn begin_gui_gesture(&self) {
        let mut state = self.locked();
        if let Some(event) = state.gesture.begin_gui() {
            self.emit(event);
        }
    }

    /// Explicitly close a gesture (control released).
    pub fn end_gui_gesture(&self) {
        let mut state = self.locked();
        if let Some(event) = state.gesture.end_gui() {
            self.emit(event);
        }
    }

    /// Advance one periodic tick, closing a timed-out implicit gesture.
    pub fn tick(&self) {
        let mut state = self.locked();
        if let Some(event) = state.gesture.tick() {
            self.emit(event);
        }
    }

    fn emit(&self, event: GestureEvent) {
        match event {
            GestureEvent::Begin => self.host.begin_gesture(self.id),
            GestureEvent::End => self.host.end_gesture(self.id),
        }
    }

    fn locked(&self) -> MutexGuard<'_, FloatState> {
        // State is consistent at every unlock point; a poisoned lock only
        // means a host callback panicked, so the state itself is reusable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for FloatParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloatParameter")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("range", &(self.min..=self.max))
            .field("step", &self.step)
            .finish_non_exhaustive()
    }
}

/// Guarded state of a [`ChoiceParameter`].
#[derive(Debug)]
struct ChoiceState {
    index: usize,
    last_indices: [usize; 2],
    gesture: GestureState,
}

/// Discrete gesture-managed parameter over a fixed choice list.
pub struct ChoiceParameter {
    id: ParameterId,
    name: &'static str,
    choices: &'static [&'static str],
    state: Mutex<ChoiceState>,
    host: Arc<dyn HostLink>,
}

impl ChoiceParameter {
    /// Create a choice parameter. `choices` must be non-empty.
    pub fn new(
        id: ParameterId,
        name: &'static str,
        default: usize,
        choices: &'static [&'static str],
        hold_ticks: u32,
        host: Arc<dyn HostLink>,
    ) -> Self {
        debug_assert!(!choices.is_empty(), "parameter '{name}' has no choices");
        let default = default.min(choices.len().saturating_sub(1));
        Self {
            id,
            name,
            choices,
            state: Mutex::new(ChoiceState {
                index: default,
                last_indices: [default; 2],
                gesture: GestureState::new(hold_ticks),
            }),
            host,
        }
    }

    /// Host-visible id of this parameter.
    pub fn id(&self) -> ParameterId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The choice names.
    pub fn choices(&self) -> &'static [&'static str] {
        self.choices
    }

    /// Current choice index.
    pub fn get(&self) -> usize {
        self.locked().index
    }

    /// Display name of the current choice.
    pub fn current_name(&self) -> &'static str {
        self.choices[self.get()]
    }

    /// Current index normalized to `[0, 1]`.
    pub fn normalized(&self) -> ParameterValue {
        self.normalize(self.get())
    }

    /// Map an index onto `[0, 1]`.
    pub fn normalize(&self, index: usize) -> ParameterValue {
        let last = self.choices.len().saturating_sub(1);
        if last == 0 {
            return 0.0;
        }
        index.min(last) as ParameterValue / last as ParameterValue
    }

    /// Whether a gesture is currently open for this parameter.
    pub fn gesture_open(&self) -> bool {
        self.locked().gesture.is_open()
    }

    /// Apply an index change.
    ///
    /// Out-of-range indices are clamped to the last choice. There is no
    /// step tolerance: any index different from the current one is a real
    /// change. Returns whether a change was applied.
    pub fn set_index(&self, index: usize) -> bool {
        let index = index.min(self.choices.len().saturating_sub(1));
        let mut state = self.locked();

        if index == state.index {
            return false;
        }

        if let Some(event) = state.gesture.on_value_change() {
            self.emit(event);
        }
        state.last_indices = [index, state.last_indices[0]];
        state.index = index;
        self.host.push_normalized(self.id, self.normalize(index));
        true
    }

    /// Explicitly open a gesture.
    pub fn begin_gui_gesture(&self) {
        let mut state = self.locked();
        if let Some(event) = state.gesture.begin_gui() {
            self.emit(event);
        }
    }

    /// Explicitly close a gesture.
    pub fn end_gui_gesture(&self) {
        let mut state = self.locked();
        if let Some(event) = state.gesture.end_gui() {
            self.emit(event);
        }
    }

    /// Advance one periodic tick.
    pub fn tick(&self) {
        let mut state = self.locked();
        if let Some(event) = state.gesture.tick() {
            self.emit(event);
        }
    }

    fn emit(&self, event: GestureEvent) {
        match event {
            GestureEvent::Begin => self.host.begin_gesture(self.id),
            GestureEvent::End => self.host.end_gesture(self.id),
        }
    }

    fn locked(&self) -> MutexGuard<'_, ChoiceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ChoiceParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChoiceParameter")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("choices", &self.choices)
            .finish_non_exhaustive()
    }
}
