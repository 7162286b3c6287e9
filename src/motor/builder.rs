//! Builder pattern for Stepper.

use crate::config::units::Micrometers;
use crate::config::{Bounds, MotorConfig, SystemConfig};
use crate::cycle::LineId;
use crate::error::{ConfigError, Error, Result};

use super::stepper::Stepper;

/// Builder for creating [`Stepper`] instances.
#[derive(Debug, Clone, Default)]
pub struct StepperBuilder {
    name: Option<char>,
    step_line: Option<LineId>,
    dir_line: Option<LineId>,
    enable_line: Option<LineId>,
    invert_direction: bool,
    pulse_delay: i32,
    distance_per_step: Option<Micrometers>,
    bounds: Option<Bounds>,
}

impl StepperBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the one-character motor name.
    pub fn name(mut self, name: char) -> Self {
        self.name = Some(name);
        self
    }

    /// Set the step line.
    pub fn step_line(mut self, line: LineId) -> Self {
        self.step_line = Some(line);
        self
    }

    /// Set the direction line.
    pub fn dir_line(mut self, line: LineId) -> Self {
        self.dir_line = Some(line);
        self
    }

    /// Set the enable line.
    pub fn enable_line(mut self, line: LineId) -> Self {
        self.enable_line = Some(line);
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Set the minimum pulse delay in microseconds (default 0).
    pub fn pulse_delay(mut self, delay_us: i32) -> Self {
        self.pulse_delay = delay_us;
        self
    }

    /// Set the distance covered by one step.
    pub fn distance_per_step(mut self, distance: Micrometers) -> Self {
        self.distance_per_step = Some(distance);
        self
    }

    /// Set working-area bounds (default INF/INF).
    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Configure from a MotorConfig.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not one character or the bounds are invalid.
    pub fn from_motor_config(mut self, config: &MotorConfig) -> Result<Self> {
        self.name = Some(config.name_char()?);
        self.step_line = Some(config.step_line);
        self.dir_line = Some(config.dir_line);
        self.enable_line = Some(config.enable_line);
        self.invert_direction = config.invert_direction;
        self.pulse_delay = config.pulse_delay;
        self.distance_per_step = Some(config.distance_per_step);
        self.bounds = match config.bounds {
            Some(ref bounds) => Some(bounds.to_bounds()?),
            None => None,
        };
        Ok(self)
    }

    /// Configure from SystemConfig by motor key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MotorNotFound` if the key is not configured.
    pub fn from_config(self, config: &SystemConfig, key: &str) -> Result<Self> {
        let motor_config = config.motor(key).ok_or_else(|| {
            Error::Config(ConfigError::MotorNotFound(
                heapless::String::try_from(key).unwrap_or_default(),
            ))
        })?;

        self.from_motor_config(motor_config)
    }

    /// Build the Stepper.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or a value is invalid.
    pub fn build(self) -> Result<Stepper> {
        let name = self.name.ok_or(ConfigError::MissingField("name"))?;
        let step_line = self.step_line.ok_or(ConfigError::MissingField("step_line"))?;
        let dir_line = self.dir_line.ok_or(ConfigError::MissingField("dir_line"))?;
        let enable_line = self
            .enable_line
            .ok_or(ConfigError::MissingField("enable_line"))?;
        let distance_per_step = self
            .distance_per_step
            .ok_or(ConfigError::MissingField("distance_per_step"))?;

        let dir_inv = if self.invert_direction { -1 } else { 1 };
        let stepper = Stepper::new(
            name,
            step_line,
            dir_line,
            enable_line,
            dir_inv,
            self.pulse_delay,
            distance_per_step.0,
        )?;

        Ok(match self.bounds {
            Some(bounds) => stepper.with_bounds(bounds),
            None => stepper,
        })
    }
}
