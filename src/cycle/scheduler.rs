//! Per-motor pulse scheduling.
//!
//! Each motor accumulates the time since its last pulse independently of
//! its siblings. When its deadline elapses the limit sensor for the current
//! direction is checked, then the soft bound, and only then is a pulse
//! emitted.

use crate::config::End;
use crate::motor::{Direction, MotorState, Stepper, StopReason};
use crate::program::{CalibrateMode, ProgramCursor, StepProgram};

use super::io::{Level, Lines};

/// Scheduler bookkeeping kept in every motor.
#[derive(Debug, Clone, Default)]
pub(crate) struct Drive {
    /// Attached program and its progress.
    pub(crate) cursor: Option<ProgramCursor>,
    /// Scheduler state.
    pub(crate) state: MotorState,
    /// Why the last program ended.
    pub(crate) stop_reason: Option<StopReason>,
    /// Microseconds accumulated toward the next deadline.
    pub(crate) elapsed: u32,
    /// Stop requested by the caller, honoured on the next tick.
    pub(crate) pending_stop: bool,
    /// Last level written to the direction line.
    pub(crate) dir_level: Option<Level>,
}

impl Drive {
    /// Install a program, returning whether one was replaced.
    pub(crate) fn attach(&mut self, program: StepProgram, min_delay: u32) -> bool {
        let replaced = self.cursor.is_some();
        self.cursor = Some(ProgramCursor::new(program, min_delay));
        self.state = MotorState::Idle;
        self.stop_reason = None;
        self.pending_stop = false;
        replaced
    }

    /// Move to `Armed` if a program is attached.
    ///
    /// Forgets the cached direction level, so the first pulse of every cycle
    /// writes the direction line.
    pub(crate) fn arm(&mut self) -> bool {
        if self.cursor.is_none() {
            return false;
        }
        self.state = MotorState::Armed;
        self.stop_reason = None;
        self.elapsed = 0;
        self.pending_stop = false;
        self.dir_level = None;
        true
    }

    /// Drop the program; a motor still in flight ends as cancelled.
    pub(crate) fn clear(&mut self) {
        if self.state.is_active() {
            self.halt(MotorState::Stopped, StopReason::Cancelled);
        }
        self.cursor = None;
        self.pending_stop = false;
    }

    fn halt(&mut self, state: MotorState, reason: StopReason) {
        self.state = state;
        self.stop_reason = Some(reason);
    }
}

/// Level of the direction line for `direction` under inversion `dir_inv`.
#[inline]
pub(crate) fn dir_level(direction: Direction, dir_inv: i8) -> Level {
    Level::from_high(direction.sign() * dir_inv > 0)
}

impl Stepper {
    /// Advance this motor by one tick of `period` microseconds.
    ///
    /// Never fails: every way a program can end is recorded as a
    /// [`StopReason`].
    pub(crate) fn on_tick<L: Lines>(&mut self, lines: &mut L, period: u32) {
        let name = self.name();
        let dir_inv = self.dir_inv();
        let dir_line = self.dir_line();
        let step_line = self.step_line();

        let drive = &mut self.drive;
        if !drive.state.is_active() {
            return;
        }

        if drive.pending_stop {
            drive.pending_stop = false;
            drive.halt(MotorState::Stopped, StopReason::Cancelled);
            debug!("motor {} cancelled", name);
            return;
        }

        let Some(cursor) = drive.cursor.as_mut() else {
            drive.halt(MotorState::Stopped, StopReason::Cancelled);
            return;
        };

        if cursor.is_exhausted() {
            drive.halt(MotorState::Done, StopReason::Completed);
            return;
        }

        drive.elapsed = drive.elapsed.saturating_add(period);
        let deadline = cursor.next_delay();
        if drive.elapsed < deadline {
            return;
        }

        let direction = cursor.direction();
        let end = End::toward(direction);

        if let Some(sensor) = self.bounds.sensor(end) {
            if lines.read_line(sensor) == Level::High {
                drive.halt(MotorState::Stopped, StopReason::LimitSensor(end));
                info!("motor {} stopped by limit sensor", name);
                return;
            }
        }

        let calibrate = cursor.calibrate();
        if calibrate == CalibrateMode::Off && self.bounds.exceeds(end, self.position.next(direction))
        {
            drive.halt(MotorState::Stopped, StopReason::SoftBound(end));
            info!(
                "motor {} stopped at bound, position {} um",
                name,
                self.position.current().0
            );
            return;
        }

        let level = dir_level(direction, dir_inv);
        if drive.dir_level != Some(level) {
            lines.set_line(dir_line, level);
            drive.dir_level = Some(level);
        }
        lines.set_line(step_line, Level::High);
        lines.set_line(step_line, Level::Low);
        self.position.step(direction);

        match calibrate {
            CalibrateMode::Off => {}
            CalibrateMode::StartMinPos => self.position.set(self.bounds.min_pos),
            CalibrateMode::BoundsMaxPos => self.bounds.max_pos = self.position.current(),
        }

        let more = cursor.advance();
        // Carry the remainder, at most one pending pulse.
        drive.elapsed = (drive.elapsed - deadline).min(cursor.next_delay());
        drive.state = MotorState::Pulsing;

        if !more {
            drive.halt(MotorState::Done, StopReason::Completed);
            trace!("motor {} completed", name);
        }
    }
}
