//! Error types for engine configuration.
//!
//! Runtime misuse of the gesture or change-propagation protocol is never
//! surfaced as an error; it is asserted in debug builds and ignored in
//! release builds (see the module docs of [`crate::gesture`] and
//! [`crate::registry`]). Only configuration parsing and validation can fail.

/// Errors that can occur while building an engine from configuration.
#[derive(Debug)]
pub enum EngineError {
    /// A configuration value is out of its valid range.
    InvalidConfig(String),
    /// Configuration data could not be parsed.
    ConfigFormat(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::ConfigFormat(msg) => write!(f, "malformed configuration: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Result type for engine configuration operations.
pub type Result<T> = std::result::Result<T, EngineError>;
