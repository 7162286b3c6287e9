//! Unit types for physical quantities.
//!
//! Positions are tracked in micrometres, planner requests are expressed in
//! millimetres and millimetres per second, and step timing in microseconds.
//! The newtypes keep those scales from being mixed up.

use core::ops::{Add, Neg, Sub};

use serde::Deserialize;

/// Micrometres per millimetre.
pub const UM_PER_MM: f32 = 1000.0;

/// Microseconds per second.
pub const US_PER_SEC: f32 = 1_000_000.0;

/// Linear position or distance in micrometres.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Micrometers(pub f32);

impl Micrometers {
    /// Create a new Micrometers value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Convert to millimetres.
    #[inline]
    pub fn to_mm(self) -> Millimeters {
        Millimeters(self.0 / UM_PER_MM)
    }
}

impl Add for Micrometers {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Micrometers {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Linear distance in millimetres (planner input).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Millimeters(pub f32);

impl Millimeters {
    /// Create a new Millimeters value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Convert to micrometres.
    #[inline]
    pub fn to_um(self) -> Micrometers {
        Micrometers(self.0 * UM_PER_MM)
    }
}

impl Neg for Millimeters {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

/// Linear speed in millimetres per second. Zero means "as fast as the motor allows".
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct MillimetersPerSec(pub f32);

impl MillimetersPerSec {
    /// Fastest speed the involved motors allow.
    pub const FASTEST: Self = Self(0.0);

    /// Create a new MillimetersPerSec value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Whether this is the "fastest" marker.
    #[inline]
    pub fn is_fastest(self) -> bool {
        self.0 == 0.0
    }

    /// Delay between steps needed to cover `distance_per_step` at this speed.
    ///
    /// Returns `None` for the fastest marker.
    pub fn step_delay(self, distance_per_step: Micrometers) -> Option<Microseconds> {
        if self.is_fastest() {
            return None;
        }
        // um / (mm/s * 1000) = s, then to us
        let secs = distance_per_step.0 / (self.0 * UM_PER_MM);
        Some(Microseconds::from_f32(secs * US_PER_SEC))
    }
}

/// Time interval in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Microseconds(pub u32);

impl Microseconds {
    /// Create a new Microseconds value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Round a floating point duration, saturating at the `u32` range.
    #[inline]
    pub fn from_f32(us: f32) -> Self {
        let rounded = libm::roundf(us);
        if rounded <= 0.0 {
            Self(0)
        } else if rounded >= u32::MAX as f32 {
            Self(u32::MAX)
        } else {
            Self(rounded as u32)
        }
    }
}

/// Extension trait for creating unit types from primitives.
pub trait UnitExt {
    /// Convert to Micrometers.
    fn um(self) -> Micrometers;
    /// Convert to Millimeters.
    fn mm(self) -> Millimeters;
    /// Convert to MillimetersPerSec.
    fn mm_per_sec(self) -> MillimetersPerSec;
}

impl UnitExt for f32 {
    #[inline]
    fn um(self) -> Micrometers {
        Micrometers(self)
    }

    #[inline]
    fn mm(self) -> Millimeters {
        Millimeters(self)
    }

    #[inline]
    fn mm_per_sec(self) -> MillimetersPerSec {
        MillimetersPerSec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_um_conversion() {
        assert_eq!(Millimeters(2.0).to_um(), Micrometers(2000.0));
        assert_eq!(Micrometers(1500.0).to_mm(), Millimeters(1.5));
    }

    #[test]
    fn test_step_delay_from_speed() {
        // 10 um per step at 10 mm/s -> 1000 steps/s -> 1000 us
        let delay = MillimetersPerSec(10.0).step_delay(Micrometers(10.0));
        assert_eq!(delay, Some(Microseconds(1000)));
        assert_eq!(MillimetersPerSec::FASTEST.step_delay(Micrometers(10.0)), None);
    }

    #[test]
    fn test_microseconds_rounding_saturates() {
        assert_eq!(Microseconds::from_f32(99.6), Microseconds(100));
        assert_eq!(Microseconds::from_f32(-4.0), Microseconds(0));
        assert_eq!(Microseconds::from_f32(1.0e12), Microseconds(u32::MAX));
    }
}
