//! System configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use super::motor::MotorConfig;
use super::units::Microseconds;
use crate::motor::MAX_MOTORS;

/// Cycle-wide settings.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CycleConfig {
    /// Fixed tick period. When absent the cycle ticks at the smallest
    /// minimum pulse delay among the motors it drives.
    #[serde(default, rename = "tick_us")]
    pub tick: Option<Microseconds>,
}

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    /// Cycle settings.
    #[serde(default)]
    pub cycle: CycleConfig,

    /// Motor configurations keyed by table name, in registration order.
    pub motors: FnvIndexMap<String<32>, MotorConfig, MAX_MOTORS>,
}

impl SystemConfig {
    /// Get a motor configuration by table key.
    pub fn motor(&self, key: &str) -> Option<&MotorConfig> {
        self.motors
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    /// List all motor keys.
    pub fn motor_keys(&self) -> impl Iterator<Item = &str> {
        self.motors.keys().map(|s| s.as_str())
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            cycle: CycleConfig::default(),
            motors: FnvIndexMap::new(),
        }
    }
}
