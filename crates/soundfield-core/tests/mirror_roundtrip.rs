//! End-to-end scenarios over the public API: one engine, concurrent-style
//! writers with distinct participant identities, and an externally driven
//! tick.

use std::sync::{Arc, Mutex};

use soundfield_core::{
    change, Engine, EngineConfig, HostLink, MatrixInputId, Participant, ParameterId,
    ParameterValue, Processor, SoundobjectId, SoundobjectParameter,
};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Begin(ParameterId),
    End(ParameterId),
    Value(ParameterId, ParameterValue),
}

#[derive(Debug, Default)]
struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl HostLink for Recorder {
    fn begin_gesture(&self, parameter: ParameterId) {
        self.events.lock().unwrap().push(Event::Begin(parameter));
    }

    fn end_gesture(&self, parameter: ParameterId) {
        self.events.lock().unwrap().push(Event::End(parameter));
    }

    fn push_normalized(&self, parameter: ParameterId, value: ParameterValue) {
        self.events.lock().unwrap().push(Event::Value(parameter, value));
    }
}

#[test]
fn network_burst_reaches_every_consumer_once_and_never_echoes() {
    let host = Arc::new(Recorder::default());
    let engine = Engine::new(EngineConfig::default(), Arc::clone(&host) as Arc<dyn HostLink>).unwrap();
    let object = engine.add_soundobject(SoundobjectId(3));

    // A burst of incoming position updates from the device.
    for i in 1..=5 {
        object.set_parameter_value(
            Participant::Protocol,
            SoundobjectParameter::X,
            i as f64 / 10.0,
        );
    }

    // The protocol layer never sees its own writes.
    assert!(!object.changed(Participant::Protocol, change::POSITION));

    // Every other consumer sees the change exactly once.
    for consumer in [
        Participant::Editor,
        Participant::TableView,
        Participant::MultiSurface,
        Participant::Host,
    ] {
        assert!(object.poll(consumer, change::POSITION), "{consumer:?} missed");
        assert!(!object.poll(consumer, change::POSITION), "{consumer:?} double");
    }

    // The burst opened exactly one gesture; the tick driver closes it.
    for _ in 0..engine.config().gesture_hold_ticks {
        engine.tick_all();
    }
    let begins = host
        .events()
        .iter()
        .filter(|e| matches!(e, Event::Begin(_)))
        .count();
    let ends = host
        .events()
        .iter()
        .filter(|e| matches!(e, Event::End(_)))
        .count();
    assert_eq!(begins, 1);
    assert_eq!(ends, 1);
}

#[test]
fn gui_drag_and_automation_interleave_without_broken_envelopes() {
    let host = Arc::new(Recorder::default());
    let engine = Engine::new(EngineConfig::default(), Arc::clone(&host) as Arc<dyn HostLink>).unwrap();
    let object = engine.add_soundobject(SoundobjectId(1));
    let x = object.processor_id().parameter_id(SoundobjectParameter::X as u32);

    // User drags the object on the surface.
    object.begin_gui_gesture(SoundobjectParameter::X);
    object.set_parameter_value(Participant::MultiSurface, SoundobjectParameter::X, 0.2);
    object.set_parameter_value(Participant::MultiSurface, SoundobjectParameter::X, 0.3);
    object.end_gui_gesture(SoundobjectParameter::X);

    // Later, host automation replays values with no mouse involved.
    object.set_parameter_value(Participant::Host, SoundobjectParameter::X, 0.8);
    for _ in 0..engine.config().gesture_hold_ticks {
        engine.tick_all();
    }

    // Two complete envelopes, strictly alternating.
    let events = host.events();
    let gestures: Vec<&Event> = events
        .iter()
        .filter(|e| matches!(e, Event::Begin(id) | Event::End(id) if *id == x))
        .collect();
    assert_eq!(gestures.len(), 4);
    assert!(matches!(gestures[0], Event::Begin(_)));
    assert!(matches!(gestures[1], Event::End(_)));
    assert!(matches!(gestures[2], Event::Begin(_)));
    assert!(matches!(gestures[3], Event::End(_)));
}

#[test]
fn matrix_and_object_processors_tick_from_one_driver() {
    let host = Arc::new(Recorder::default());
    let engine = Engine::new(EngineConfig::default(), Arc::clone(&host) as Arc<dyn HostLink>).unwrap();
    let object = engine.add_soundobject(SoundobjectId(1));
    let input = engine.add_matrix_input(MatrixInputId(2));

    object.set_parameter_value(Participant::Host, SoundobjectParameter::Y, 0.9);
    input.set_parameter_value(
        Participant::Host,
        soundfield_core::MatrixParameter::Gain,
        -6.0,
    );

    for _ in 0..engine.config().gesture_hold_ticks {
        engine.tick_all();
    }

    // Both processors' gestures were closed by the same driver.
    let ends = host
        .events()
        .iter()
        .filter(|e| matches!(e, Event::End(_)))
        .count();
    assert_eq!(ends, 2);
}
