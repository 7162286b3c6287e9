//! Motor configuration from TOML.

use heapless::String;
use serde::Deserialize;

use super::bounds::BoundsConfig;
use super::units::Micrometers;
use crate::cycle::LineId;
use crate::error::ConfigError;

/// Complete motor configuration from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct MotorConfig {
    /// One-character axis name (X, Y, Z ...).
    pub name: String<32>,

    /// Step line: each pulse advances the motor one step.
    pub step_line: LineId,

    /// Direction line.
    pub dir_line: LineId,

    /// Enable line (LOW = enabled).
    pub enable_line: LineId,

    /// Invert direction line logic (dir_inv = -1).
    #[serde(default)]
    pub invert_direction: bool,

    /// Minimum delay between pulses in microseconds.
    #[serde(rename = "pulse_delay_us")]
    pub pulse_delay: i32,

    /// Distance covered by one step.
    #[serde(rename = "distance_per_step_um")]
    pub distance_per_step: Micrometers,

    /// Optional working-area bounds (INF/INF when omitted).
    #[serde(default)]
    pub bounds: Option<BoundsConfig>,
}

impl MotorConfig {
    /// The single-character motor name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMotorName` unless the name is exactly one character.
    pub fn name_char(&self) -> Result<char, ConfigError> {
        let mut chars = self.name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ConfigError::InvalidMotorName(self.name.clone())),
        }
    }

    /// Direction inversion sign (+1 or -1).
    pub fn dir_inv(&self) -> i8 {
        if self.invert_direction {
            -1
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(name: &str) -> MotorConfig {
        MotorConfig {
            name: String::try_from(name).unwrap(),
            step_line: LineId(2),
            dir_line: LineId(3),
            enable_line: LineId(4),
            invert_direction: true,
            pulse_delay: 100,
            distance_per_step: Micrometers(10.0),
            bounds: None,
        }
    }

    #[test]
    fn test_name_char() {
        assert_eq!(make_config("X").name_char(), Ok('X'));
        assert!(make_config("XY").name_char().is_err());
        assert!(make_config("").name_char().is_err());
    }

    #[test]
    fn test_dir_inv_sign() {
        assert_eq!(make_config("X").dir_inv(), -1);
    }
}
