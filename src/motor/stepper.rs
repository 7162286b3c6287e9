//! Step-dir stepper motor.
//!
//! A [`Stepper`] holds the wiring, characteristics and bounds of one axis
//! together with its position and the state the scheduler keeps for it.

use crate::config::units::{Micrometers, Microseconds};
use crate::config::{Bounds, EndStrategy};
use crate::cycle::{Drive, LineId};
use crate::error::{ConfigError, Result};
use crate::program::StepProgram;

use super::position::Position;
use super::state::{MotorState, StopReason};

/// One physical axis driven through step, direction and enable lines.
#[derive(Debug, Clone)]
pub struct Stepper {
    /// One-character axis name.
    name: char,

    /// Line pulsed once per step.
    step_line: LineId,

    /// Direction line.
    dir_line: LineId,

    /// Enable line (LOW = enabled).
    enable_line: LineId,

    /// +1 when forward is HIGH on the direction line, -1 when inverted.
    dir_inv: i8,

    /// Fastest allowed delay between pulses.
    min_delay: Microseconds,

    /// Coordinate tracker.
    pub(crate) position: Position,

    /// Working-area bounds and limit sensors.
    pub(crate) bounds: Bounds,

    /// Scheduler bookkeeping.
    pub(crate) drive: Drive,
}

impl Stepper {
    /// Create a motor with INF/INF bounds at position 0.
    ///
    /// A negative `dir_inv` inverts the direction line.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPulseDelay` if `pulse_delay < 0` and
    /// `ConfigError::InvalidDistancePerStep` unless `distance_per_step > 0`.
    pub fn new(
        name: char,
        step_line: LineId,
        dir_line: LineId,
        enable_line: LineId,
        dir_inv: i8,
        pulse_delay: i32,
        distance_per_step: f32,
    ) -> Result<Self> {
        if pulse_delay < 0 {
            return Err(ConfigError::InvalidPulseDelay(pulse_delay).into());
        }
        // Also rejects NaN
        if !(distance_per_step > 0.0) {
            return Err(ConfigError::InvalidDistancePerStep(distance_per_step).into());
        }

        Ok(Self {
            name,
            step_line,
            dir_line,
            enable_line,
            dir_inv: if dir_inv < 0 { -1 } else { 1 },
            min_delay: Microseconds(pulse_delay as u32),
            position: Position::new(Micrometers(distance_per_step)),
            bounds: Bounds::UNBOUNDED,
            drive: Drive::default(),
        })
    }

    /// Create a builder.
    pub fn builder() -> super::StepperBuilder {
        super::StepperBuilder::new()
    }

    /// Attach limit sensors and bounds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBounds` if both ends are `Const` and
    /// `min_pos > max_pos`.
    pub fn set_bounds(
        &mut self,
        min_sensor: Option<LineId>,
        max_sensor: Option<LineId>,
        min_strategy: EndStrategy,
        max_strategy: EndStrategy,
        min_pos: Micrometers,
        max_pos: Micrometers,
    ) -> Result<()> {
        self.bounds = Bounds::new(
            min_sensor,
            max_sensor,
            min_strategy,
            max_strategy,
            min_pos,
            max_pos,
        )?;
        Ok(())
    }

    /// Replace the bounds with already validated ones.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Get the motor name.
    #[inline]
    pub fn name(&self) -> char {
        self.name
    }

    /// Get the step line.
    #[inline]
    pub fn step_line(&self) -> LineId {
        self.step_line
    }

    /// Get the direction line.
    #[inline]
    pub fn dir_line(&self) -> LineId {
        self.dir_line
    }

    /// Get the enable line.
    #[inline]
    pub fn enable_line(&self) -> LineId {
        self.enable_line
    }

    /// Direction inversion sign (+1 or -1).
    #[inline]
    pub fn dir_inv(&self) -> i8 {
        self.dir_inv
    }

    /// Fastest allowed delay between pulses.
    #[inline]
    pub fn min_delay(&self) -> Microseconds {
        self.min_delay
    }

    /// Distance covered by one step.
    #[inline]
    pub fn distance_per_step(&self) -> Micrometers {
        self.position.distance_per_step()
    }

    /// Current coordinate.
    #[inline]
    pub fn position(&self) -> Micrometers {
        self.position.current()
    }

    /// Overwrite the current coordinate.
    pub fn set_position(&mut self, position: Micrometers) {
        self.position.set(position);
    }

    /// Working-area bounds.
    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Scheduler state.
    #[inline]
    pub fn state(&self) -> MotorState {
        self.drive.state
    }

    /// Why the last program ended, if it has.
    #[inline]
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.drive.stop_reason
    }

    /// The attached program, if any.
    pub fn program(&self) -> Option<&StepProgram> {
        self.drive.cursor.as_ref().map(|c| c.program())
    }

    /// Steps left in the attached program (`None` for a whirl or no program).
    pub fn remaining(&self) -> Option<u32> {
        self.drive.cursor.as_ref().and_then(|c| c.remaining())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn make_motor() -> Stepper {
        Stepper::new('X', LineId(2), LineId(3), LineId(4), 1, 100, 10.0).unwrap()
    }

    #[test]
    fn test_new_motor_defaults() {
        let motor = make_motor();
        assert_eq!(motor.name(), 'X');
        assert_eq!(motor.position(), Micrometers(0.0));
        assert_eq!(*motor.bounds(), Bounds::UNBOUNDED);
        assert_eq!(motor.state(), MotorState::Idle);
        assert!(motor.program().is_none());
    }

    #[test]
    fn test_new_rejects_bad_characteristics() {
        let err = Stepper::new('X', LineId(2), LineId(3), LineId(4), 1, -5, 10.0).unwrap_err();
        assert_eq!(err, Error::Config(ConfigError::InvalidPulseDelay(-5)));

        let err = Stepper::new('X', LineId(2), LineId(3), LineId(4), 1, 100, 0.0).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidDistancePerStep(_))
        ));
    }

    #[test]
    fn test_dir_inv_normalised() {
        let motor = Stepper::new('Y', LineId(2), LineId(3), LineId(4), -7, 0, 1.0).unwrap();
        assert_eq!(motor.dir_inv(), -1);
    }

    #[test]
    fn test_set_bounds_rejects_inverted_const() {
        let mut motor = make_motor();
        let result = motor.set_bounds(
            None,
            None,
            EndStrategy::Const,
            EndStrategy::Const,
            Micrometers(500.0),
            Micrometers(100.0),
        );
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidBounds { .. }))
        ));
        assert_eq!(*motor.bounds(), Bounds::UNBOUNDED);
    }
}
