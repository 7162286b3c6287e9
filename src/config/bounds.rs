//! Working-area bounds: per-end strategy, positions and limit sensors.

use serde::Deserialize;

use super::units::Micrometers;
use crate::cycle::LineId;
use crate::error::ConfigError;
use crate::motor::Direction;

/// How one end of the working area is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum EndStrategy {
    /// Fixed position from configuration.
    Const,
    /// Established by a calibration run, then enforced like `Const`.
    Auto,
    /// Never enforced.
    #[default]
    Inf,
}

impl EndStrategy {
    /// Whether the scheduler enforces this end.
    #[inline]
    pub fn is_enforced(self) -> bool {
        !matches!(self, EndStrategy::Inf)
    }
}

/// One end of the working area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum End {
    /// Minimum position end.
    Min,
    /// Maximum position end.
    Max,
}

impl End {
    /// The end a motor moving in `direction` approaches.
    #[inline]
    pub fn toward(direction: Direction) -> Self {
        match direction {
            Direction::Forward => End::Max,
            Direction::Backward => End::Min,
        }
    }
}

/// Bounds section of a motor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BoundsConfig {
    /// Limit sensor at the minimum end.
    #[serde(default)]
    pub min_sensor_line: Option<LineId>,

    /// Limit sensor at the maximum end.
    #[serde(default)]
    pub max_sensor_line: Option<LineId>,

    /// Strategy for the minimum end.
    #[serde(default)]
    pub min_strategy: EndStrategy,

    /// Strategy for the maximum end.
    #[serde(default)]
    pub max_strategy: EndStrategy,

    /// Minimum position.
    #[serde(default, rename = "min_pos_um")]
    pub min_pos: Micrometers,

    /// Maximum position.
    #[serde(default, rename = "max_pos_um")]
    pub max_pos: Micrometers,
}

impl BoundsConfig {
    /// Convert to runtime bounds, validating positions.
    pub fn to_bounds(&self) -> Result<Bounds, ConfigError> {
        Bounds::new(
            self.min_sensor_line,
            self.max_sensor_line,
            self.min_strategy,
            self.max_strategy,
            self.min_pos,
            self.max_pos,
        )
    }
}

/// Runtime bounds of a motor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bounds {
    /// Limit sensor at the minimum end (None = not connected).
    pub min_sensor: Option<LineId>,
    /// Limit sensor at the maximum end (None = not connected).
    pub max_sensor: Option<LineId>,
    /// Strategy for the minimum end.
    pub min_strategy: EndStrategy,
    /// Strategy for the maximum end.
    pub max_strategy: EndStrategy,
    /// Minimum position (ignored for `Inf`).
    pub min_pos: Micrometers,
    /// Maximum position (ignored for `Inf`, updated by calibration).
    pub max_pos: Micrometers,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl Bounds {
    /// No sensors, both ends `Inf`.
    pub const UNBOUNDED: Self = Self {
        min_sensor: None,
        max_sensor: None,
        min_strategy: EndStrategy::Inf,
        max_strategy: EndStrategy::Inf,
        min_pos: Micrometers(0.0),
        max_pos: Micrometers(0.0),
    };

    /// Create bounds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBounds` if both ends are `Const` and
    /// `min_pos > max_pos`.
    pub fn new(
        min_sensor: Option<LineId>,
        max_sensor: Option<LineId>,
        min_strategy: EndStrategy,
        max_strategy: EndStrategy,
        min_pos: Micrometers,
        max_pos: Micrometers,
    ) -> Result<Self, ConfigError> {
        let bounds = Self {
            min_sensor,
            max_sensor,
            min_strategy,
            max_strategy,
            min_pos,
            max_pos,
        };
        if !bounds.is_valid() {
            return Err(ConfigError::InvalidBounds {
                min: min_pos.0,
                max: max_pos.0,
            });
        }
        Ok(bounds)
    }

    /// Check the CONST/CONST ordering constraint.
    pub fn is_valid(&self) -> bool {
        !(self.min_strategy == EndStrategy::Const
            && self.max_strategy == EndStrategy::Const
            && self.min_pos.0 > self.max_pos.0)
    }

    /// Strategy of one end.
    #[inline]
    pub fn strategy(&self, end: End) -> EndStrategy {
        match end {
            End::Min => self.min_strategy,
            End::Max => self.max_strategy,
        }
    }

    /// Limit sensor of one end.
    #[inline]
    pub fn sensor(&self, end: End) -> Option<LineId> {
        match end {
            End::Min => self.min_sensor,
            End::Max => self.max_sensor,
        }
    }

    /// Whether `next` lies past the enforced bound at `end`.
    #[inline]
    pub fn exceeds(&self, end: End, next: f32) -> bool {
        if !self.strategy(end).is_enforced() {
            return false;
        }
        match end {
            End::Min => next < self.min_pos.0,
            End::Max => next > self.max_pos.0,
        }
    }

    /// Check if a position is inside every enforced end.
    pub fn contains(&self, position: Micrometers) -> bool {
        !self.exceeds(End::Min, position.0) && !self.exceeds(End::Max, position.0)
    }
}
