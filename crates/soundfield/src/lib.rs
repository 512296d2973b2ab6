//! # Soundfield
//!
//! Control engine for a spatial-audio object plugin. Soundfield mirrors
//! sound-object and matrix-channel parameters between a DAW, its GUI
//! surfaces and a networked rendering device, keeping host automation
//! gestures well-formed and network traffic free of echo loops.
//!
//! ## Architecture
//!
//! ```text
//! DAW host / GUI / network protocol layer
//!        ↓ set_parameter_value(source, …)
//! SoundobjectProcessor / MatrixInputProcessor / MatrixOutputProcessor
//!        ↓ broadcast                 ↓ gesture machine
//! ChangeRegistry (per-participant   HostLink (begin/end gesture,
//! dirty bits, polled exactly once)  normalized value pushes)
//! ```
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use soundfield::prelude::*;
//!
//! let engine = Engine::new(EngineConfig::default(), host_link)?;
//! let object = engine.add_soundobject(SoundobjectId(1));
//!
//! // Incoming network value: every other consumer is notified, the
//! // protocol layer itself is not.
//! object.set_parameter_value(Participant::Protocol, SoundobjectParameter::X, 0.7);
//! assert!(!object.changed(Participant::Protocol, change::POSITION));
//!
//! // Driven by an external timer:
//! engine.tick_all();
//! ```

// Re-export the engine crate
pub use soundfield_core as core;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use soundfield::prelude::*;
/// ```
pub mod prelude {
    pub use soundfield_core::{
        // Change propagation
        change, ChangeMask, ChangeRegistry, Participant,
        // Configuration
        EngineConfig, DEFAULT_GESTURE_HOLD_TICKS, DEFAULT_TICK_INTERVAL_MS,
        // Engine and processors
        ComsMode, DelayMode, Engine, MatrixInputProcessor, MatrixOutputProcessor,
        MatrixParameter, Processor, SoundobjectParameter, SoundobjectProcessor,
        // Error types
        EngineError, Result,
        // Gesture lifecycle
        GestureEvent, GestureState,
        // Host boundary
        HostLink, NullHostLink,
        // Parameters
        ChoiceParameter, FloatParameter,
        // Identifiers
        MatrixInputId, MatrixOutputId, ParameterId, ParameterValue, ProcessorId,
        SoundobjectId,
    };
}
