//! Step programs: the four ways a motor can be told to move.

use crate::error::ProgramError;
use crate::motor::Direction;

use super::curve::{Curve, CurveContext, CurveFn};

/// Maximum number of delays a buffered program owns.
pub const DELAY_BUFFER_CAPACITY: usize = 256;

/// Delay storage owned by a buffered program.
pub type DelayBuffer = heapless::Vec<u32, DELAY_BUFFER_CAPACITY>;

/// Calibration side effect applied after every step of a whirl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrateMode {
    /// No calibration, bounds are enforced.
    #[default]
    Off,
    /// Reset the position to `min_pos` after each step.
    StartMinPos,
    /// Record each reached position as `max_pos`.
    BoundsMaxPos,
}

/// A pending or active movement of one motor.
///
/// Step counts are magnitudes; the sign given to the constructors selects
/// [`direction`](StepProgram::direction). A delay of 0 means "as fast as the
/// motor allows", and every delay is clamped up to the motor's minimum.
#[derive(Debug, Clone)]
pub enum StepProgram {
    /// Fixed number of steps at a constant delay.
    Steps {
        /// Number of steps.
        steps: u32,
        /// Direction of travel.
        direction: Direction,
        /// Delay between steps (µs).
        delay: u32,
    },
    /// Unbounded rotation until stopped by a sensor, a bound or the caller.
    Whirl {
        /// Direction of travel.
        direction: Direction,
        /// Delay between steps (µs).
        delay: u32,
        /// Calibration side effect.
        calibrate: CalibrateMode,
    },
    /// Variable delays, each used for `scale` consecutive steps.
    Buffered {
        /// Number of virtual steps (one per buffer slot).
        steps: u32,
        /// Direction of travel.
        direction: Direction,
        /// One delay per virtual step (µs).
        delays: DelayBuffer,
        /// Hardware steps per virtual step.
        scale: u16,
    },
    /// Delay computed per step by a curve function.
    Curved {
        /// Number of steps.
        steps: u32,
        /// Direction of travel.
        direction: Direction,
        /// Delay function and its context.
        curve: Curve,
    },
}

impl StepProgram {
    /// Burst of `steps` steps (sign selects direction) at `delay` µs.
    pub fn steps(steps: i32, delay: u32) -> Self {
        StepProgram::Steps {
            steps: steps.unsigned_abs(),
            direction: Direction::from_steps(steps),
            delay,
        }
    }

    /// Continuous rotation.
    pub fn whirl(direction: Direction, delay: u32, calibrate: CalibrateMode) -> Self {
        StepProgram::Whirl {
            direction,
            delay,
            calibrate,
        }
    }

    /// Buffered program of `steps` virtual steps (sign selects direction).
    ///
    /// Produces `|steps| * scale` hardware steps; virtual step `i` uses
    /// `delays[i]` for each of its `scale` hardware steps.
    ///
    /// # Errors
    ///
    /// - `InvalidScale` if `scale` is 0
    /// - `EmptyBuffer` if `delays` is empty and `steps` is not 0
    /// - `BufferLengthMismatch` if `delays.len() != |steps|`
    /// - `BufferTooLong` if `delays` exceeds [`DELAY_BUFFER_CAPACITY`]
    pub fn buffered(steps: i32, delays: &[u32], scale: u16) -> Result<Self, ProgramError> {
        if scale == 0 {
            return Err(ProgramError::InvalidScale(scale));
        }

        let count = steps.unsigned_abs();
        if count != 0 && delays.is_empty() {
            return Err(ProgramError::EmptyBuffer);
        }
        if delays.len() > DELAY_BUFFER_CAPACITY {
            return Err(ProgramError::BufferTooLong {
                len: delays.len(),
                capacity: DELAY_BUFFER_CAPACITY,
            });
        }
        if delays.len() != count as usize {
            return Err(ProgramError::BufferLengthMismatch {
                steps: count,
                len: delays.len(),
            });
        }

        let delays = DelayBuffer::from_slice(delays).map_err(|_| ProgramError::BufferTooLong {
            len: delays.len(),
            capacity: DELAY_BUFFER_CAPACITY,
        })?;

        Ok(StepProgram::Buffered {
            steps: count,
            direction: Direction::from_steps(steps),
            delays,
            scale,
        })
    }

    /// Program whose delays come from `func(step_index, &context)`.
    pub fn curved(steps: i32, func: CurveFn, context: CurveContext) -> Self {
        StepProgram::Curved {
            steps: steps.unsigned_abs(),
            direction: Direction::from_steps(steps),
            curve: Curve::new(func, context),
        }
    }

    /// Direction of travel.
    #[inline]
    pub fn direction(&self) -> Direction {
        match self {
            StepProgram::Steps { direction, .. }
            | StepProgram::Whirl { direction, .. }
            | StepProgram::Buffered { direction, .. }
            | StepProgram::Curved { direction, .. } => *direction,
        }
    }

    /// Total hardware steps, `None` for a whirl.
    pub fn total_steps(&self) -> Option<u32> {
        match self {
            StepProgram::Steps { steps, .. } | StepProgram::Curved { steps, .. } => Some(*steps),
            StepProgram::Buffered { steps, scale, .. } => {
                Some(steps.saturating_mul(u32::from(*scale)))
            }
            StepProgram::Whirl { .. } => None,
        }
    }

    /// Calibration mode (only whirls calibrate).
    #[inline]
    pub fn calibrate(&self) -> CalibrateMode {
        match self {
            StepProgram::Whirl { calibrate, .. } => *calibrate,
            _ => CalibrateMode::Off,
        }
    }

    /// Whether this is a whirl.
    #[inline]
    pub fn is_whirl(&self) -> bool {
        matches!(self, StepProgram::Whirl { .. })
    }

    /// Requested delay before hardware step `index`, before clamping.
    pub fn delay_at(&self, index: u32) -> u32 {
        match self {
            StepProgram::Steps { delay, .. } | StepProgram::Whirl { delay, .. } => *delay,
            StepProgram::Buffered { delays, scale, .. } => {
                let slot = (index / u32::from(*scale)) as usize;
                delays.get(slot).copied().unwrap_or(0)
            }
            StepProgram::Curved { curve, .. } => curve.delay_at(index),
        }
    }
}
