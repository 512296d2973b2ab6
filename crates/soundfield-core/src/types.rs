//! Identifier newtypes and value aliases used across the engine.

/// Native parameter value type. All ranges, steps and host pushes use f64.
pub type ParameterValue = f64;

/// Host-visible automation parameter identifier.
///
/// Unique across one engine instance. Processors derive these from their
/// [`ProcessorId`](ProcessorId) and the parameter's slot index, so the host
/// boundary can address any parameter with a single integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterId(pub u32);

impl std::fmt::Display for ParameterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one processor instance within an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessorId(pub u32);

impl ProcessorId {
    /// Number of parameter slots reserved per processor in the
    /// [`ParameterId`] space.
    pub const PARAMETER_SLOTS: u32 = 16;

    /// Derive the host-visible id of the parameter at `slot`.
    pub const fn parameter_id(self, slot: u32) -> ParameterId {
        ParameterId(self.0 * Self::PARAMETER_SLOTS + slot)
    }
}

impl std::fmt::Display for ProcessorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remote sound-object channel a [`SoundobjectProcessor`](crate::processor::SoundobjectProcessor)
/// is mapped to on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundobjectId(pub u16);

impl std::fmt::Display for SoundobjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remote matrix input channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatrixInputId(pub u16);

impl std::fmt::Display for MatrixInputId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remote matrix output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatrixOutputId(pub u16);

impl std::fmt::Display for MatrixOutputId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
