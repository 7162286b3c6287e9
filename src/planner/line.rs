//! Straight moves on one or two axes.

use crate::config::units::{Millimeters, MillimetersPerSec, US_PER_SEC};
use crate::cycle::{Cycle, Lines, TickSource};
use crate::error::{PlanError, Result};
use crate::motor::{MotorId, Stepper};
use crate::program::StepProgram;

use super::dda::secondary_program;

/// Check that a speed is finite and not negative.
pub(crate) fn check_speed(speed: MillimetersPerSec) -> core::result::Result<f32, PlanError> {
    if speed.0.is_finite() && speed.0 >= 0.0 {
        Ok(speed.0)
    } else {
        Err(PlanError::InvalidSpeed(speed.0))
    }
}

/// Check that a distance is finite.
pub(crate) fn check_distance(distance: Millimeters) -> core::result::Result<f32, PlanError> {
    if distance.0.is_finite() {
        Ok(distance.0)
    } else {
        Err(PlanError::InvalidDistance(distance.0))
    }
}

/// Signed whole steps a motor needs to travel `distance`.
pub(crate) fn steps_for(motor: &Stepper, distance: Millimeters) -> core::result::Result<i32, PlanError> {
    let steps = motor.position.steps_for(distance.to_um());
    i32::try_from(steps).map_err(|_| PlanError::StepOverflow)
}

/// Fastest speed (mm/s) the motor allows, infinite without a minimum delay.
pub(crate) fn speed_limit(motor: &Stepper) -> f32 {
    let min_delay = motor.min_delay().0;
    if min_delay == 0 {
        return f32::INFINITY;
    }
    // um/us == mm/ms
    motor.distance_per_step().0 / min_delay as f32 * 1000.0
}

impl<L, T> Cycle<L, T>
where
    L: Lines,
    T: TickSource,
{
    /// Attach a single-axis move of `distance` at `speed`.
    ///
    /// The step count is `distance / distance_per_step` rounded; a speed of
    /// [`MillimetersPerSec::FASTEST`] uses the motor's minimum delay.
    ///
    /// # Errors
    ///
    /// Returns a `PlanError` for a non-finite distance or a negative speed,
    /// or an attach error.
    pub fn prepare_line(
        &mut self,
        id: MotorId,
        distance: Millimeters,
        speed: MillimetersPerSec,
    ) -> Result<()> {
        check_distance(distance)?;
        check_speed(speed)?;

        let motor = self.motors().require(id)?;
        let steps = steps_for(motor, distance)?;
        let min_delay = motor.min_delay();
        let delay = speed
            .step_delay(motor.distance_per_step())
            .map_or(min_delay, |d| d.max(min_delay));

        debug!("line on {}: {} steps at {} us", motor.name(), steps, delay.0);
        self.attach(id, StepProgram::steps(steps, delay.0))
    }

    /// Attach a synchronized straight move on two axes.
    ///
    /// The axis with more steps is the reference and steps at a constant
    /// delay chosen so the whole move takes `hypot(d1, d2) / speed`. The
    /// other axis spreads its steps over the reference steps (see
    /// [`Bresenham`](super::Bresenham)). Neither axis is driven faster than
    /// its minimum delay.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::SameAxis` if both ids are equal, a `PlanError` for
    /// invalid inputs, or an attach error.
    pub fn prepare_line_2d(
        &mut self,
        id1: MotorId,
        id2: MotorId,
        d1: Millimeters,
        d2: Millimeters,
        speed: MillimetersPerSec,
    ) -> Result<()> {
        if id1 == id2 {
            return Err(PlanError::SameAxis.into());
        }
        let dist1 = check_distance(d1)?;
        let dist2 = check_distance(d2)?;
        let speed = check_speed(speed)?;

        let m1 = self.motors().require(id1)?;
        let m2 = self.motors().require(id2)?;
        let s1 = steps_for(m1, d1)?;
        let s2 = steps_for(m2, d2)?;

        let (ref_id, ref_steps, ref_motor, sec_id, sec_steps, sec_motor) =
            if s1.unsigned_abs() >= s2.unsigned_abs() {
                (id1, s1, m1, id2, s2, m2)
            } else {
                (id2, s2, m2, id1, s1, m1)
            };

        let a = ref_steps.unsigned_abs();
        let b = sec_steps.unsigned_abs();
        if a == 0 {
            self.attach(id1, StepProgram::steps(0, 0))?;
            return self.attach(id2, StepProgram::steps(0, 0));
        }

        let mut ref_delay = ref_motor.min_delay().0;
        if speed > 0.0 {
            let length = libm::hypotf(dist1, dist2);
            let total_us = length / speed * US_PER_SEC;
            ref_delay = ref_delay.max(libm::ceilf(total_us / a as f32) as u32);
        }
        if b > 0 {
            // the secondary's shortest gap is floor(a / b) reference steps
            let min_gap = a / b;
            let sec_min = sec_motor.min_delay().0;
            ref_delay = ref_delay.max(sec_min.saturating_add(min_gap - 1) / min_gap);
        }

        let reference = StepProgram::steps(ref_steps, ref_delay);
        let secondary = secondary_program(sec_steps, a, ref_delay)?;

        debug!(
            "line_2d: reference {} steps at {} us, secondary {} steps",
            a,
            ref_delay,
            b
        );
        self.attach(ref_id, reference)?;
        self.attach(sec_id, secondary)
    }
}
