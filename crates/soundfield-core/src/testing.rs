//! Test doubles shared by the unit tests.

use std::sync::Mutex;

use crate::host::HostLink;
use crate::types::{ParameterId, ParameterValue};

/// One recorded host notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum HostEvent {
    Begin(ParameterId),
    End(ParameterId),
    Value(ParameterId, ParameterValue),
}

/// A [`HostLink`] that records every notification in call order.
#[derive(Debug, Default)]
pub(crate) struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingHost {
    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn count(&self, predicate: impl Fn(&HostEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| predicate(e)).count()
    }

    /// Assert that the begin/end events recorded for `parameter` strictly
    /// alternate starting with begin.
    pub fn assert_alternating(&self, parameter: ParameterId) {
        let gestures: Vec<HostEvent> = self
            .events()
            .into_iter()
            .filter(|e| match e {
                HostEvent::Begin(id) | HostEvent::End(id) => *id == parameter,
                HostEvent::Value(..) => false,
            })
            .collect();
        for (i, event) in gestures.iter().enumerate() {
            let expected_begin = i % 2 == 0;
            match event {
                HostEvent::Begin(_) => {
                    assert!(expected_begin, "event {i} is a begin out of turn: {gestures:?}")
                }
                HostEvent::End(_) => {
                    assert!(!expected_begin, "event {i} is an end out of turn: {gestures:?}")
                }
                HostEvent::Value(..) => unreachable!(),
            }
        }
    }
}

impl HostLink for RecordingHost {
    fn begin_gesture(&self, parameter: ParameterId) {
        self.events.lock().unwrap().push(HostEvent::Begin(parameter));
    }

    fn end_gesture(&self, parameter: ParameterId) {
        self.events.lock().unwrap().push(HostEvent::End(parameter));
    }

    fn push_normalized(&self, parameter: ParameterId, value: ParameterValue) {
        self.events
            .lock()
            .unwrap()
            .push(HostEvent::Value(parameter, value));
    }
}
