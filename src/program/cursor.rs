//! Program execution cursor.

use super::step_program::{CalibrateMode, StepProgram};
use crate::motor::Direction;

/// Runtime position inside an attached program.
///
/// Owns the program for its whole lifetime, so buffers and curve contexts
/// cannot change underneath the tick handler.
#[derive(Debug, Clone)]
pub struct ProgramCursor {
    /// The program being executed.
    program: StepProgram,

    /// Hardware steps emitted so far.
    taken: u32,

    /// Delay before the next step in microseconds, clamped to `min_delay`.
    next_delay: u32,

    /// Motor minimum delay.
    min_delay: u32,
}

impl ProgramCursor {
    /// Create a cursor at the first step of `program`.
    pub fn new(program: StepProgram, min_delay: u32) -> Self {
        let next_delay = program.delay_at(0).max(min_delay);
        Self {
            program,
            taken: 0,
            next_delay,
            min_delay,
        }
    }

    /// The program being executed.
    #[inline]
    pub fn program(&self) -> &StepProgram {
        &self.program
    }

    /// Direction of travel.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.program.direction()
    }

    /// Calibration mode of the program.
    #[inline]
    pub fn calibrate(&self) -> CalibrateMode {
        self.program.calibrate()
    }

    /// Number of hardware steps emitted.
    #[inline]
    pub fn steps_taken(&self) -> u32 {
        self.taken
    }

    /// Steps left, `None` for a whirl.
    #[inline]
    pub fn remaining(&self) -> Option<u32> {
        self.program
            .total_steps()
            .map(|total| total.saturating_sub(self.taken))
    }

    /// Check if the step budget is consumed.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == Some(0)
    }

    /// Delay before the next step in microseconds.
    #[inline]
    pub fn next_delay(&self) -> u32 {
        self.next_delay
    }

    /// Record one emitted step and compute the following delay.
    ///
    /// Returns `false` once the budget is consumed.
    pub fn advance(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }

        self.taken = self.taken.saturating_add(1);

        if self.is_exhausted() {
            return false;
        }

        self.next_delay = self.program.delay_at(self.taken).max(self.min_delay);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::CurveContext;

    fn ramp(index: u32, ctx: &CurveContext) -> u32 {
        ctx.ints[0].saturating_sub(index * ctx.ints[1])
    }

    #[test]
    fn test_cursor_runs_to_completion() {
        let mut cursor = ProgramCursor::new(StepProgram::steps(10, 500), 100);

        assert!(!cursor.is_exhausted());
        assert_eq!(cursor.next_delay(), 500);

        while cursor.advance() {}

        assert!(cursor.is_exhausted());
        assert_eq!(cursor.steps_taken(), 10);
        assert_eq!(cursor.remaining(), Some(0));
    }

    #[test]
    fn test_zero_length_program() {
        let cursor = ProgramCursor::new(StepProgram::steps(0, 0), 100);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_delays_clamped_to_motor_minimum() {
        let cursor = ProgramCursor::new(StepProgram::steps(5, 0), 120);
        assert_eq!(cursor.next_delay(), 120);

        let mut curved = ProgramCursor::new(
            StepProgram::curved(4, ramp, CurveContext::with_ints([400, 150, 0, 0])),
            200,
        );
        assert_eq!(curved.next_delay(), 400);
        curved.advance();
        assert_eq!(curved.next_delay(), 250);
        curved.advance();
        assert_eq!(curved.next_delay(), 200);
    }

    #[test]
    fn test_whirl_never_exhausts() {
        let mut cursor = ProgramCursor::new(
            StepProgram::whirl(Direction::Forward, 300, CalibrateMode::Off),
            100,
        );
        for _ in 0..1000 {
            assert!(cursor.advance());
        }
        assert_eq!(cursor.remaining(), None);
        assert_eq!(cursor.steps_taken(), 1000);
    }
}
