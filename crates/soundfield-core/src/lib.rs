//! # soundfield-core
//!
//! Change-propagation and gesture-lifecycle engine for the Soundfield
//! spatial control plugin. The plugin carries no audio processing; its
//! parameters mirror sound-object and matrix-channel state between a DAW,
//! its GUI surfaces and a networked device, and the same value can be
//! written concurrently by the host, a GUI drag, and incoming network
//! traffic.
//!
//! Two mechanisms make that safe:
//!
//! - every parameter write is broadcast as per-participant dirty bits that
//!   each consumer polls and clears independently, with the originator
//!   excluded so network-origin changes never echo back onto the wire
//!   ([`registry`]), and
//! - every parameter brackets its edits with host gesture begin/end signals
//!   driven by a per-parameter state machine and a periodic tick, so even
//!   network-driven edits — which have no mouse-up — produce well-formed
//!   touch-automation envelopes ([`gesture`], [`parameter`]).
//!
//! [`processor`] scopes both mechanisms to sound-object, matrix-input and
//! matrix-output instances; [`engine`] owns the live processors and fans
//! out the external periodic tick.

pub mod config;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod host;
pub mod parameter;
pub mod processor;
pub mod registry;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{EngineConfig, DEFAULT_GESTURE_HOLD_TICKS, DEFAULT_TICK_INTERVAL_MS};
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use gesture::{GestureEvent, GestureState};
pub use host::{HostLink, NullHostLink};
pub use parameter::{ChoiceParameter, FloatParameter};
pub use processor::{
    ComsMode, DelayMode, MatrixInputProcessor, MatrixOutputProcessor, MatrixParameter,
    Processor, SoundobjectParameter, SoundobjectProcessor,
};
pub use registry::{change, ChangeMask, ChangeRegistry, Participant};
pub use types::{
    MatrixInputId, MatrixOutputId, ParameterId, ParameterValue, ProcessorId, SoundobjectId,
};
