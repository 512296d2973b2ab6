//! Host-automation boundary.
//!
//! The engine reports gesture brackets and normalized values through this
//! trait; the plugin-format layer (VST3/AU glue, excluded from this crate)
//! turns them into whatever the host's automation lanes require.

use crate::types::{ParameterId, ParameterValue};

/// Outbound notifications to the host-automation layer.
///
/// Implementations must be thread-safe: gesture and value notifications can
/// arrive from the UI thread, a host-automation callback, the network
/// receive context and the periodic tick context.
///
/// Notifications for one parameter are emitted while that parameter's own
/// lock is held, which is what guarantees the begin/end ordering the host
/// observes. Implementations must therefore not call back into the same
/// parameter from these methods.
pub trait HostLink: Send + Sync {
    /// A continuous edit of `parameter` has started.
    fn begin_gesture(&self, parameter: ParameterId);

    /// The continuous edit of `parameter` has ended.
    ///
    /// The engine emits exactly one end per begin, strictly alternating.
    fn end_gesture(&self, parameter: ParameterId);

    /// The parameter's value changed; `value` is normalized to `[0, 1]`
    /// over the parameter's native range.
    fn push_normalized(&self, parameter: ParameterId, value: ParameterValue);
}

/// A [`HostLink`] that drops every notification.
///
/// Used by processors that are not attached to a host, and as a convenient
/// default in tests that only exercise change propagation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHostLink;

impl HostLink for NullHostLink {
    fn begin_gesture(&self, _parameter: ParameterId) {}

    fn end_gesture(&self, _parameter: ParameterId) {}

    fn push_normalized(&self, _parameter: ParameterId, _value: ParameterValue) {}
}
