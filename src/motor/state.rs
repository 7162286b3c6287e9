//! Motor run states, stop reasons and direction.

use crate::config::End;

/// Direction of travel along the motor's coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Increasing coordinate.
    #[default]
    Forward,
    /// Decreasing coordinate.
    Backward,
}

impl Direction {
    /// Get direction from signed step count (zero counts as forward).
    #[inline]
    pub fn from_steps(steps: i32) -> Self {
        if steps >= 0 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i8 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Per-motor scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorState {
    /// No program is running.
    #[default]
    Idle,
    /// Program attached and cycle started, no pulse emitted yet.
    Armed,
    /// At least one pulse emitted, program not exhausted.
    Pulsing,
    /// Program exhausted.
    Done,
    /// Stopped before exhausting the program.
    Stopped,
}

impl MotorState {
    /// Whether the scheduler still drives this motor.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, MotorState::Armed | MotorState::Pulsing)
    }

    /// State name for display/debugging.
    pub fn name(self) -> &'static str {
        match self {
            MotorState::Idle => "idle",
            MotorState::Armed => "armed",
            MotorState::Pulsing => "pulsing",
            MotorState::Done => "done",
            MotorState::Stopped => "stopped",
        }
    }
}

/// Why a motor's last program ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopReason {
    /// Program exhausted its step budget.
    Completed,
    /// Hardware limit sensor at this end tripped.
    LimitSensor(End),
    /// Next step would have passed the bound at this end.
    SoftBound(End),
    /// Stopped by the caller (motor stop or cycle finish).
    Cancelled,
}

impl StopReason {
    /// Short description for status output.
    pub fn name(self) -> &'static str {
        match self {
            StopReason::Completed => "completed",
            StopReason::LimitSensor(End::Min) => "min sensor",
            StopReason::LimitSensor(End::Max) => "max sensor",
            StopReason::SoftBound(End::Min) => "min bound",
            StopReason::SoftBound(End::Max) => "max bound",
            StopReason::Cancelled => "cancelled",
        }
    }
}
