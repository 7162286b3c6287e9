//! Position tracking for stepper motors.
//!
//! Tracks the axis coordinate in micrometres from the step count and the
//! distance covered per step.

use crate::config::units::Micrometers;

use super::state::Direction;

/// Motor position tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    /// Current coordinate.
    current: Micrometers,
    /// Distance covered by one step.
    distance_per_step: Micrometers,
}

impl Position {
    /// Create a new position tracker at zero.
    #[inline]
    pub fn new(distance_per_step: Micrometers) -> Self {
        Self {
            current: Micrometers::default(),
            distance_per_step,
        }
    }

    /// Create a position tracker at a specific coordinate.
    #[inline]
    pub fn at(current: Micrometers, distance_per_step: Micrometers) -> Self {
        Self {
            current,
            distance_per_step,
        }
    }

    /// Get current coordinate.
    #[inline]
    pub fn current(&self) -> Micrometers {
        self.current
    }

    /// Set current coordinate.
    #[inline]
    pub fn set(&mut self, position: Micrometers) {
        self.current = position;
    }

    /// Get distance per step.
    #[inline]
    pub fn distance_per_step(&self) -> Micrometers {
        self.distance_per_step
    }

    /// Coordinate after one step in `direction`, without moving.
    #[inline]
    pub fn next(&self, direction: Direction) -> f32 {
        match direction {
            Direction::Forward => self.current.0 + self.distance_per_step.0,
            Direction::Backward => self.current.0 - self.distance_per_step.0,
        }
    }

    /// Move by one step.
    #[inline]
    pub fn step(&mut self, direction: Direction) {
        self.current = Micrometers(self.next(direction));
    }

    /// Signed number of whole steps needed to travel `distance`.
    #[inline]
    pub fn steps_for(&self, distance: Micrometers) -> i64 {
        libm::roundf(distance.0 / self.distance_per_step.0) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_tracking() {
        let mut pos = Position::new(Micrometers(10.0));
        assert_eq!(pos.current(), Micrometers(0.0));

        for _ in 0..25 {
            pos.step(Direction::Forward);
        }
        assert_eq!(pos.current(), Micrometers(250.0));

        pos.step(Direction::Backward);
        assert_eq!(pos.current(), Micrometers(240.0));
        assert_eq!(pos.next(Direction::Forward), 250.0);
    }

    #[test]
    fn test_steps_for_distance() {
        let pos = Position::at(Micrometers(500.0), Micrometers(2.5));

        assert_eq!(pos.steps_for(Micrometers(1000.0)), 400);
        assert_eq!(pos.steps_for(Micrometers(-12.4)), -5);
    }
}
