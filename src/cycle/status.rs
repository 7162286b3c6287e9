//! Cycle status snapshots.

use core::fmt;

use heapless::Vec;

use crate::config::units::{Micrometers, Microseconds};
use crate::motor::{MotorState, StopReason, MAX_MOTORS};

/// Snapshot of one motor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorStatus {
    /// Motor name.
    pub name: char,
    /// Scheduler state.
    pub state: MotorState,
    /// Steps left (`None` for a whirl or when no program is attached).
    pub remaining: Option<u32>,
    /// Why the last program ended.
    pub stop_reason: Option<StopReason>,
    /// Current coordinate.
    pub position: Micrometers,
}

impl MotorStatus {
    /// Still being driven.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.is_active()
    }

    /// Program ran to its end.
    #[inline]
    pub fn finished_naturally(&self) -> bool {
        self.stop_reason == Some(StopReason::Completed)
    }

    /// Stopped by a limit sensor.
    #[inline]
    pub fn stopped_by_sensor(&self) -> bool {
        matches!(self.stop_reason, Some(StopReason::LimitSensor(_)))
    }

    /// Stopped by a soft bound.
    #[inline]
    pub fn stopped_by_bound(&self) -> bool {
        matches!(self.stop_reason, Some(StopReason::SoftBound(_)))
    }
}

/// Snapshot of the whole cycle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleStatus {
    /// Whether the cycle is running.
    pub running: bool,
    /// Tick period of the running or last cycle.
    pub period: Microseconds,
    /// Per-motor snapshots in registry order.
    pub motors: Vec<MotorStatus, MAX_MOTORS>,
}

impl CycleStatus {
    /// Snapshot of a motor by name.
    pub fn motor(&self, name: char) -> Option<&MotorStatus> {
        self.motors.iter().find(|m| m.name == name)
    }
}

impl fmt::Display for MotorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.state.name())?;
        if let Some(reason) = self.stop_reason {
            write!(f, " ({})", reason.name())?;
        }
        match self.remaining {
            Some(steps) if self.state.is_active() => write!(f, ", {} steps left", steps)?,
            None if self.state.is_active() => write!(f, ", whirling")?,
            _ => {}
        }
        write!(f, ", pos {} um", self.position.0)
    }
}

impl fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.running {
            writeln!(f, "cycle running, tick {} us", self.period.0)?;
        } else {
            writeln!(f, "cycle stopped")?;
        }
        for motor in &self.motors {
            writeln!(f, "  {}", motor)?;
        }
        Ok(())
    }
}
