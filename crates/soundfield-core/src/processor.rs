//! Processor instances: the unit at which change propagation and gesture
//! management are scoped.
//!
//! Each processor owns a fixed small set of gesture-managed parameters and
//! one [`ChangeRegistry`]. Any module writes through
//! `set_parameter_value(source, parameter, value)`; on a real change the
//! processor broadcasts the parameter's change bits to every other
//! participant, while the gesture bracketing happens inside the parameter
//! itself. All methods take `&self`: processors are shared across the UI,
//! host, network and tick contexts behind an `Arc`, and every piece of
//! mutable state has its own narrowly scoped guard.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::EngineConfig;
use crate::host::HostLink;
use crate::registry::{change, ChangeMask, ChangeRegistry, Participant};
use crate::types::{
    MatrixInputId, MatrixOutputId, ParameterValue, ProcessorId, SoundobjectId,
};

/// Behavior common to all processor kinds, object-safe so the engine can
/// drive a heterogeneous set uniformly.
pub trait Processor: Send + Sync {
    /// Engine-local id of this instance.
    fn processor_id(&self) -> ProcessorId;

    /// Advance one periodic tick on every owned parameter.
    fn tick(&self);

    /// Non-destructive dirty-flag test for `participant`.
    fn changed(&self, participant: Participant, mask: ChangeMask) -> bool;

    /// Atomic read-and-clear of `participant`'s dirty flags in `mask`.
    fn poll(&self, participant: Participant, mask: ChangeMask) -> bool;
}

// =========================================================================
// Sound object
// =========================================================================

/// Parameters of a [`SoundobjectProcessor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SoundobjectParameter {
    /// Horizontal position, normalized 0..1.
    X = 0,
    /// Vertical position, normalized 0..1.
    Y = 1,
    /// Reverb send gain in dB.
    ReverbSendGain = 2,
    /// Object spread factor, 0..1.
    Spread = 3,
    /// Delay mode selection.
    DelayMode = 4,
}

impl SoundobjectParameter {
    /// Change bits broadcast when this parameter changes. X and Y raise the
    /// same combined position bit.
    pub fn change_mask(self) -> ChangeMask {
        match self {
            Self::X | Self::Y => change::POSITION,
            Self::ReverbSendGain => change::REVERB_SEND_GAIN,
            Self::Spread => change::SPREAD,
            Self::DelayMode => change::DELAY_MODE,
        }
    }
}

/// Delay mode of a sound object on the remote device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum DelayMode {
    /// No delay processing.
    Off = 0,
    /// Tight delay rendering.
    Tight = 1,
    /// Full delay rendering.
    Full = 2,
}

impl DelayMode {
    const NAMES: &'static [&'static str] = &["Off", "Tight", "Full"];

    fn from_index(index: usize) -> DelayMode {
        match index {
            1 => DelayMode::Tight,
            2 => DelayMode::Full,
            _ => DelayMode::Off,
        }
    }
}

/// Direction in which a processor exchanges values with the remote device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComsMode {
    /// Neither send nor receive.
    Off,
    /// Receive remote values only.
    #[default]
    Rx,
    /// Send local values only.
    Tx,
    /// Bidirectional.
    RxTx,
}

/// Processor for one spatial sound object.
pub struct SoundobjectProcessor {
    id: ProcessorId,
    object: Mutex<SoundobjectId>,
    coms_mode: Mutex<ComsMode>,
    x: crate::parameter::FloatParameter,
    y: crate::parameter::FloatParameter,
    reverb_send_gain: crate::parameter::FloatParameter,
    spread: crate::parameter::FloatParameter,
    delay_mode: crate::parameter::ChoiceParameter,
    changes: ChangeRegistry,
}

impl SoundobjectProcessor {
    /// Create a processor mapped to `object` on the remote device.
    pub fn new(
        id: ProcessorId,
        object: SoundobjectId,
        config: &EngineConfig,
        host: Arc<dyn HostLink>,
    ) -> Self {
        use crate::parameter::{ChoiceParameter, FloatParameter};
        let hold = config.gesture_hold_ticks;
        Self {
            id,
            object: Mutex::new(object),
            coms_mode: Mutex::new(ComsMode::default()),
            x: FloatParameter::new(
                id.parameter_id(SoundobjectParameter::X as u32),
                "Object Position X",
                0.5,
                0.0..=1.0,
                0.001,
                hold,
                Arc::clone(&host) as Arc<dyn HostLink>,
            ),
            y: FloatParameter::new(
                id.parameter_id(SoundobjectParameter::Y as u32),
                "Object Position Y",
                0.5,
                0.0..=1.0,
                0.001,
                hold,
                Arc::clone(&host) as Arc<dyn HostLink>,
            ),
            reverb_send_gain: FloatParameter::new(
                id.parameter_id(SoundobjectParameter::ReverbSendGain as u32),
                "Reverb Send Gain",
                0.0,
                -120.0..=24.0,
                0.1,
                hold,
                Arc::clone(&host) as Arc<dyn HostLink>,
            ),
            spread: FloatParameter::new(
                id.parameter_id(SoundobjectParameter::Spread as u32),
                "Object Spread",
                0.0,
                0.0..=1.0,
                0.001,
                hold,
                Arc::clone(&host) as Arc<dyn HostLink>,
            ),
            delay_mode: ChoiceParameter::new(
                id.parameter_id(SoundobjectParameter::DelayMode as u32),
                "Delay Mode",
                DelayMode::Off as usize,
                DelayMode::NAMES,
                hold,
                host,
            ),
            changes: ChangeRegistry::new(),
        }
    }

    /// Remote sound-object channel this processor is mapped to.
    pub fn object_id(&self) -> SoundobjectId {
        *locked(&self.object)
    }

    /// Remap the processor to a different remote channel.
    pub fn set_object_id(&self, source: Participant, object: SoundobjectId) {
        let mut current = locked(&self.object);
        if *current != object {
            *current = object;
            drop(current);
            self.changes.broadcast(source, change::MAPPING);
        }
    }

    /// Current communication mode.
    pub fn coms_mode(&self) -> ComsMode {
        *locked(&self.coms_mode)
    }

    /// Change the communication mode, broadcasting on a real change.
    pub fn set_coms_mode(&self, source: Participant, mode: ComsMode) {
        let mut current = locked(&self.coms_mode);
        if *current != mode {
            *current = mode;
            drop(current);
            self.changes.broadcast(source, change::COMS_MODE);
        }
    }

    /// Write a parameter value on behalf of `source`.
    ///
    /// For [`SoundobjectParameter::DelayMode`] the value is interpreted as a
    /// choice index. Returns whether a real change was applied (and
    /// broadcast); sub-threshold writes change nothing anywhere.
    pub fn set_parameter_value(
        &self,
        source: Participant,
        parameter: SoundobjectParameter,
        value: ParameterValue,
    ) -> bool {
        let applied = match parameter {
            SoundobjectParameter::X => self.x.set_value(value),
            SoundobjectParameter::Y => self.y.set_value(value),
            SoundobjectParameter::ReverbSendGain => self.reverb_send_gain.set_value(value),
            SoundobjectParameter::Spread => self.spread.set_value(value),
            SoundobjectParameter::DelayMode => {
                self.delay_mode.set_index(value.max(0.0).round() as usize)
            }
        };
        if applied {
            self.changes.broadcast(source, parameter.change_mask());
        }
        applied
    }

    /// Current native value of `parameter` (choice index for delay mode).
    pub fn parameter_value(&self, parameter: SoundobjectParameter) -> ParameterValue {
        match parameter {
            SoundobjectParameter::X => self.x.get(),
            SoundobjectParameter::Y => self.y.get(),
            SoundobjectParameter::ReverbSendGain => self.reverb_send_gain.get(),
            SoundobjectParameter::Spread => self.spread.get(),
            SoundobjectParameter::DelayMode => self.delay_mode.get() as ParameterValue,
        }
    }

    /// Current delay mode as the typed enum.
    pub fn delay_mode(&self) -> DelayMode {
        DelayMode::from_index(self.delay_mode.get())
    }

    /// Explicitly open a gesture on `parameter` (control pressed).
    pub fn begin_gui_gesture(&self, parameter: SoundobjectParameter) {
        match parameter {
            SoundobjectParameter::X => self.x.begin_gui_gesture(),
            SoundobjectParameter::Y => self.y.begin_gui_gesture(),
            SoundobjectParameter::ReverbSendGain => self.reverb_send_gain.begin_gui_gesture(),
            SoundobjectParameter::Spread => self.spread.begin_gui_gesture(),
            SoundobjectParameter::DelayMode => self.delay_mode.begin_gui_gesture(),
        }
    }

    /// Explicitly close a gesture on `parameter` (control released).
    pub fn end_gui_gesture(&self, parameter: SoundobjectParameter) {
        match parameter {
            SoundobjectParameter::X => self.x.end_gui_gesture(),
            SoundobjectParameter::Y => self.y.end_gui_gesture(),
            SoundobjectParameter::ReverbSendGain => self.reverb_send_gain.end_gui_gesture(),
            SoundobjectParameter::Spread => self.spread.end_gui_gesture(),
            SoundobjectParameter::DelayMode => self.delay_mode.end_gui_gesture(),
        }
    }
}

impl Processor for SoundobjectProcessor {
    fn processor_id(&self) -> ProcessorId {
        self.id
    }

    fn tick(&self) {
        self.x.tick();
        self.y.tick();
        self.reverb_send_gain.tick();
        self.spread.tick();
        self.delay_mode.tick();
    }

    fn changed(&self, participant: Participant, mask: ChangeMask) -> bool {
        self.changes.changed(participant, mask)
    }

    fn poll(&self, participant: Participant, mask: ChangeMask) -> bool {
        self.changes.poll(participant, mask)
    }
}

// =========================================================================
// Matrix channels
// =========================================================================

/// Parameters of a matrix input or output processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MatrixParameter {
    /// Channel gain in dB.
    Gain = 0,
    /// Channel mute.
    Mute = 1,
}

impl MatrixParameter {
    /// Change bits broadcast when this parameter changes.
    pub fn change_mask(self) -> ChangeMask {
        match self {
            Self::Gain => change::GAIN,
            Self::Mute => change::MUTE,
        }
    }
}

const MUTE_NAMES: &[&str] = &["Off", "On"];

/// Gain/mute parameter pair shared by the two matrix processor kinds.
struct MatrixChannel {
    gain: crate::parameter::FloatParameter,
    mute: crate::parameter::ChoiceParameter,
    changes: ChangeRegistry,
}

impl MatrixChannel {
    fn new(id: ProcessorId, config: &EngineConfig, host: Arc<dyn HostLink>) -> Self {
        use crate::parameter::{ChoiceParameter, FloatParameter};
        let hold = config.gesture_hold_ticks;
        Self {
            gain: FloatParameter::new(
                id.parameter_id(MatrixParameter::Gain as u32),
                "Gain",
                0.0,
                -120.0..=24.0,
                0.1,
                hold,
                Arc::clone(&host) as Arc<dyn HostLink>,
            ),
            mute: ChoiceParameter::new(
                id.parameter_id(MatrixParameter::Mute as u32),
                "Mute",
                0,
                MUTE_NAMES,
                hold,
                host,
            ),
            changes: ChangeRegistry::new(),
        }
    }

    fn set_parameter_value(
        &self,
        source: Participant,
        parameter: MatrixParameter,
        value: ParameterValue,
    ) -> bool {
        let applied = match parameter {
            MatrixParameter::Gain => self.gain.set_value(value),
            MatrixParameter::Mute => self.mute.set_index(value.max(0.0).round() as usize),
        };
        if applied {
            self.changes.broadcast(source, parameter.change_mask());
        }
        applied
    }

    fn parameter_value(&self, parameter: MatrixParameter) -> ParameterValue {
        match parameter {
            MatrixParameter::Gain => self.gain.get(),
            MatrixParameter::Mute => self.mute.get() as ParameterValue,
        }
    }

    fn begin_gui_gesture(&self, parameter: MatrixParameter) {
        match parameter {
            MatrixParameter::Gain => self.gain.begin_gui_gesture(),
            MatrixParameter::Mute => self.mute.begin_gui_gesture(),
        }
    }

    fn end_gui_gesture(&self, parameter: MatrixParameter) {
        match parameter {
            MatrixParameter::Gain => self.gain.end_gui_gesture(),
            MatrixParameter::Mute => self.mute.end_gui_gesture(),
        }
    }

    fn tick(&self) {
        self.gain.tick();
        self.mute.tick();
    }
}

/// Processor for one matrix input channel.
pub struct MatrixInputProcessor {
    id: ProcessorId,
    channel: Mutex<MatrixInputId>,
    inner: MatrixChannel,
}

impl MatrixInputProcessor {
    /// Create a processor mapped to `channel` on the remote device.
    pub fn new(
        id: ProcessorId,
        channel: MatrixInputId,
        config: &EngineConfig,
        host: Arc<dyn HostLink>,
    ) -> Self {
        Self {
            id,
            channel: Mutex::new(channel),
            inner: MatrixChannel::new(id, config, host),
        }
    }

    /// Remote matrix input channel this processor is mapped to.
    pub fn channel_id(&self) -> MatrixInputId {
        *locked(&self.channel)
    }

    /// Remap the processor to a different remote channel.
    pub fn set_channel_id(&self, source: Participant, channel: MatrixInputId) {
        let mut current = locked(&self.channel);
        if *current != channel {
            *current = channel;
            drop(current);
            self.inner.changes.broadcast(source, change::MAPPING);
        }
    }

    /// Write a parameter value on behalf of `source`.
    pub fn set_parameter_value(
        &self,
        source: Participant,
        parameter: MatrixParameter,
        value: ParameterValue,
    ) -> bool {
        self.inner.set_parameter_value(source, parameter, value)
    }

    /// Current native value of `parameter` (0/1 for mute).
    pub fn parameter_value(&self, parameter: MatrixParameter) -> ParameterValue {
        self.inner.parameter_value(parameter)
    }

    /// Explicitly open a gesture on `parameter`.
    pub fn begin_gui_gesture(&self, parameter: MatrixParameter) {
        self.inner.begin_gui_gesture(parameter);
    }

    /// Explicitly close a gesture on `parameter`.
    pub fn end_gui_gesture(&self, parameter: MatrixParameter) {
        self.inner.end_gui_gesture(parameter);
    }
}

impl Processor for MatrixInputProcessor {
    fn processor_id(&self) -> ProcessorId {
        self.id
    }

    fn tick(&self) {
        self.inner.tick();
    }

    fn changed(&self, participant: Participant, mask: ChangeMask) -> bool {
        self.inner.changes.changed(participant, mask)
    }

    fn poll(&self, participant: Participant, mask: ChangeMask) -> bool {
        self.inner.changes.poll(participant, mask)
    }
}

/// Processor for one matrix output channel.
pub struct MatrixOutputProcessor {
    id: ProcessorId,
    channel: Mutex<MatrixOutputId>,
    inner: MatrixChannel,
}

impl MatrixOutputProcessor {
    /// Create a processor mapped to `channel` on the remote device.
    pub fn new(
        id: ProcessorId,
        channel: MatrixOutputId,
        config: &EngineConfig,
        host: Arc<dyn HostLink>,
    ) -> Self {
        Self {
            id,
            channel: Mutex::new(channel),
            inner: MatrixChannel::new(id, config, host),
        }
    }

    /// Remote matrix output channel this processor is mapped to.
    pub fn channel_id(&self) -> MatrixOutputId {
        *locked(&self.channel)
    }

    /// Remap the processor to a different remote channel.
    pub fn set_channel_id(&self, source: Participant, channel: MatrixOutputId) {
        let mut current = locked(&self.channel);
        if *current != channel {
            *current = channel;
            drop(current);
            self.inner.changes.broadcast(source, change::MAPPING);
        }
    }

    /// Write a parameter value on behalf of `source`.
    pub fn set_parameter_value(
        &self,
        source: Participant,
        parameter: MatrixParameter,
        value: ParameterValue,
    ) -> bool {
        self.inner.set_parameter_value(source, parameter, value)
    }

    /// Current native value of `parameter` (0/1 for mute).
    pub fn parameter_value(&self, parameter: MatrixParameter) -> ParameterValue {
        self.inner.parameter_value(parameter)
    }

    /// Explicitly open a gesture on `parameter`.
    pub fn begin_gui_gesture(&self, parameter: MatrixParameter) {
        self.inner.begin_gui_gesture(parameter);
    }

    /// Explicitly close a gesture on `parameter`.
    pub fn end_gui_gesture(&self, parameter: MatrixParameter) {
        self.inner.end_gui_gesture(parameter);
    }
}

impl Processor for MatrixOutputProcessor {
    fn processor_id(&self) -> ProcessorId {
        self.id
    }

    fn tick(&self) {
        self.inner.tick();
    }

    fn changed(&self, participant: Participant, mask: ChangeMask) -> bool {
        self.inner.changes.changed(participant, mask)
    }

    fn poll(&self, participant: Participant, mask: ChangeMask) -> bool {
        self.inner.changes.poll(participant, mask)
    }
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{HostEvent, RecordingHost};

    fn soundobject(host: Arc<RecordingHost>) -> SoundobjectProcessor {
        SoundobjectProcessor::new(
            ProcessorId(1),
            SoundobjectId(1),
            &EngineConfig::default(),
            host,
        )
    }

    #[test]
    fn test_network_write_not_echoed_to_protocol() {
        let processor = soundobject(Arc::new(RecordingHost::default()));

        assert!(processor.set_parameter_value(
            Participant::Protocol,
            SoundobjectParameter::X,
            0.7
        ));
        assert!(!processor.changed(Participant::Protocol, change::POSITION));
        assert!(processor.changed(Participant::TableView, change::POSITION));
        assert!(processor.poll(Participant::TableView, change::POSITION));
        assert!(!processor.changed(Participant::TableView, change::POSITION));
    }

    #[test]
    fn test_x_and_y_share_combined_position_bit() {
        let processor = soundobject(Arc::new(RecordingHost::default()));

        processor.set_parameter_value(Participant::Host, SoundobjectParameter::Y, 0.9);
        assert!(processor.poll(Participant::TableView, change::POSITION));
    }

    #[test]
    fn test_sub_threshold_write_sets_no_dirty_bits() {
        let processor = soundobject(Arc::new(RecordingHost::default()));
        processor.set_parameter_value(Participant::Host, SoundobjectParameter::X, 0.5);
        let _ = processor.poll(Participant::TableView, change::ALL);

        // Step is 0.001: this write is rounding noise and must vanish.
        assert!(!processor.set_parameter_value(
            Participant::Host,
            SoundobjectParameter::X,
            0.5004
        ));
        assert!(!processor.changed(Participant::TableView, change::ALL));
        assert_eq!(processor.parameter_value(SoundobjectParameter::X), 0.5);
    }

    #[test]
    fn test_delay_mode_value_interpreted_as_index() {
        let processor = soundobject(Arc::new(RecordingHost::default()));

        assert!(processor.set_parameter_value(
            Participant::Editor,
            SoundobjectParameter::DelayMode,
            2.0
        ));
        assert_eq!(processor.delay_mode(), DelayMode::Full);
        assert!(processor.changed(Participant::Protocol, change::DELAY_MODE));
        // The editor is a self-notify surface and sees its own write.
        assert!(processor.changed(Participant::Editor, change::DELAY_MODE));
    }

    #[test]
    fn test_coms_mode_broadcasts_own_bit() {
        let processor = soundobject(Arc::new(RecordingHost::default()));

        processor.set_coms_mode(Participant::Editor, ComsMode::RxTx);
        assert_eq!(processor.coms_mode(), ComsMode::RxTx);
        assert!(processor.poll(Participant::Protocol, change::COMS_MODE));

        // Setting the same mode again is not a change.
        processor.set_coms_mode(Participant::Editor, ComsMode::RxTx);
        assert!(!processor.changed(Participant::Protocol, change::COMS_MODE));
    }

    #[test]
    fn test_remap_broadcasts_mapping_bit() {
        let processor = soundobject(Arc::new(RecordingHost::default()));

        processor.set_object_id(Participant::TableView, SoundobjectId(12));
        assert_eq!(processor.object_id(), SoundobjectId(12));
        assert!(processor.poll(Participant::Protocol, change::MAPPING));
    }

    #[test]
    fn test_tick_drives_gesture_timeout_per_parameter() {
        let host = Arc::new(RecordingHost::default());
        let processor = soundobject(Arc::clone(&host));
        let hold = EngineConfig::default().gesture_hold_ticks;

        processor.set_parameter_value(Participant::Protocol, SoundobjectParameter::X, 0.8);
        for _ in 0..hold {
            processor.tick();
        }

        let x_id = ProcessorId(1).parameter_id(SoundobjectParameter::X as u32);
        assert_eq!(host.count(|e| matches!(e, HostEvent::Begin(id) if *id == x_id)), 1);
        assert_eq!(host.count(|e| matches!(e, HostEvent::End(id) if *id == x_id)), 1);
        // Only the written parameter produced gesture traffic.
        assert_eq!(host.count(|e| matches!(e, HostEvent::Begin(_))), 1);
    }

    #[test]
    fn test_matrix_input_gain_and_mute() {
        let host = Arc::new(RecordingHost::default());
        let processor = MatrixInputProcessor::new(
            ProcessorId(2),
            MatrixInputId(4),
            &EngineConfig::default(),
            Arc::clone(&host) as Arc<dyn HostLink>,
        );

        assert!(processor.set_parameter_value(Participant::Host, MatrixParameter::Gain, -6.0));
        assert!(processor.poll(Participant::TableView, change::GAIN));

        assert!(processor.set_parameter_value(Participant::Host, MatrixParameter::Mute, 1.0));
        assert_eq!(processor.parameter_value(MatrixParameter::Mute), 1.0);
        assert!(processor.changed(Participant::TableView, change::MUTE));
        // Gain poll above already cleared that bit.
        assert!(!processor.changed(Participant::TableView, change::GAIN));
    }

    #[test]
    fn test_matrix_output_explicit_gesture() {
        let host = Arc::new(RecordingHost::default());
        let processor = MatrixOutputProcessor::new(
            ProcessorId(3),
            MatrixOutputId(4),
            &EngineConfig::default(),
            Arc::clone(&host) as Arc<dyn HostLink>,
        );

        processor.begin_gui_gesture(MatrixParameter::Gain);
        processor.set_parameter_value(Participant::Editor, MatrixParameter::Gain, -3.0);
        processor.set_parameter_value(Participant::Editor, MatrixParameter::Gain, -2.0);
        processor.end_gui_gesture(MatrixParameter::Gain);

        let gain_id = ProcessorId(3).parameter_id(MatrixParameter::Gain as u32);
        assert_eq!(host.count(|e| matches!(e, HostEvent::Begin(id) if *id == gain_id)), 1);
        assert_eq!(host.count(|e| matches!(e, HostEvent::End(id) if *id == gain_id)), 1);
        host.assert_alternating(gain_id);
    }

    #[test]
    fn test_parameters_do_not_share_locks_or_gestures() {
        let host = Arc::new(RecordingHost::default());
        let processor = soundobject(Arc::clone(&host));
        let hold = EngineConfig::default().gesture_hold_ticks;

        // Open a gesture on spread, then let X time out independently.
        processor.begin_gui_gesture(SoundobjectParameter::Spread);
        processor.set_parameter_value(Participant::Host, SoundobjectParameter::X, 0.9);
        for _ in 0..hold {
            processor.tick();
        }

        let x_id = ProcessorId(1).parameter_id(SoundobjectParameter::X as u32);
        let spread_id = ProcessorId(1).parameter_id(SoundobjectParameter::Spread as u32);
        assert_eq!(host.count(|e| matches!(e, HostEvent::End(id) if *id == x_id)), 1);
        // Spread's explicit gesture is still open: no end yet.
        assert_eq!(host.count(|e| matches!(e, HostEvent::End(id) if *id == spread_id)), 0);
        processor.end_gui_gesture(SoundobjectParameter::Spread);
        assert_eq!(host.count(|e| matches!(e, HostEvent::End(id) if *id == spread_id)), 1);
    }
}
