//! Engine configuration.
//!
//! The engine does not own a clock: the tick interval stored here is carried
//! for whatever external driver calls [`Engine::tick_all`](crate::engine::Engine::tick_all)
//! periodically. The gesture hold length is the number of idle ticks after
//! which an implicitly opened automation gesture is closed.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Default number of idle ticks before an implicit gesture is closed.
pub const DEFAULT_GESTURE_HOLD_TICKS: u32 = 8;

/// Default tick interval in milliseconds for external drivers.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;

/// Runtime configuration for one [`Engine`](crate::engine::Engine) instance.
///
/// # Example
///
/// ```ignore
/// let config = EngineConfig::default().with_gesture_hold_ticks(12);
/// let engine = Engine::new(config);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Idle ticks after the last accepted value change before an implicitly
    /// opened gesture is ended. Must be at least 1.
    pub gesture_hold_ticks: u32,
    /// Interval at which the external driver is expected to tick the engine.
    /// Informational for the engine itself; must be at least 1.
    pub tick_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gesture_hold_ticks: DEFAULT_GESTURE_HOLD_TICKS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl EngineConfig {
    /// Set the gesture hold length.
    pub fn with_gesture_hold_ticks(mut self, ticks: u32) -> Self {
        self.gesture_hold_ticks = ticks;
        self
    }

    /// Set the expected tick interval.
    pub fn with_tick_interval_ms(mut self, interval: u64) -> Self {
        self.tick_interval_ms = interval;
        self
    }

    /// Check that all values are within their valid ranges.
    pub fn validate(&self) -> Result<()> {
        if self.gesture_hold_ticks == 0 {
            return Err(EngineError::InvalidConfig(
                "gesture_hold_ticks must be at least 1".into(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "tick_interval_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EngineError::ConfigFormat(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> String {
        // Serialization of this plain struct cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
