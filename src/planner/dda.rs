//! Two-axis step distribution (digital differential analyzer).
//!
//! The reference axis takes `a` evenly spaced steps, the secondary axis
//! `b <= a`. At every reference step the error term grows by `b`; whenever
//! it reaches `a` the secondary axis steps too and `a` is subtracted. The
//! `n`-th secondary step therefore lands on reference step `ceil(n * a / b)`.

use crate::error::PlanError;
use crate::program::{CurveContext, DelayBuffer, StepProgram, DELAY_BUFFER_CAPACITY};

/// Iterator over the gaps, in reference steps, between secondary steps.
///
/// The first gap is counted from the start of the move.
#[derive(Debug, Clone)]
pub struct Bresenham {
    reference: u32,
    secondary: u32,
    error: u64,
    tick: u32,
    last: u32,
}

impl Bresenham {
    /// Distribute `secondary` steps over `reference` steps (`secondary <= reference`).
    pub fn new(reference: u32, secondary: u32) -> Self {
        Self {
            reference,
            secondary: secondary.min(reference),
            error: 0,
            tick: 0,
            last: 0,
        }
    }
}

impl Iterator for Bresenham {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        while self.tick < self.reference {
            self.tick += 1;
            self.error += u64::from(self.secondary);
            if self.error >= u64::from(self.reference) {
                self.error -= u64::from(self.reference);
                let gap = self.tick - self.last;
                self.last = self.tick;
                return Some(gap);
            }
        }
        None
    }
}

/// Reference step (1-based) on which secondary step `n` (1-based) fires.
#[inline]
pub fn dda_tick(n: u32, reference: u32, secondary: u32) -> u64 {
    if secondary == 0 {
        return 0;
    }
    let secondary = u64::from(secondary);
    (u64::from(n) * u64::from(reference) + secondary - 1) / secondary
}

/// Curve form of the distribution for moves too long to buffer.
///
/// Context: `ints = [reference, secondary, reference_delay, _]`.
pub fn dda_curve(index: u32, ctx: &CurveContext) -> u32 {
    let [reference, secondary, ref_delay, _] = ctx.ints;
    let gap = dda_tick(index + 1, reference, secondary) - dda_tick(index, reference, secondary);
    saturate(gap * u64::from(ref_delay))
}

/// Program for the secondary axis of a synchronized move.
///
/// `secondary` is signed (sign selects direction). Buffered when the step
/// count fits [`DELAY_BUFFER_CAPACITY`], curve-driven otherwise.
///
/// # Errors
///
/// Returns `PlanError::StepOverflow` if `|secondary|` exceeds `reference`.
pub fn secondary_program(
    secondary: i32,
    reference: u32,
    ref_delay: u32,
) -> Result<StepProgram, PlanError> {
    let count = secondary.unsigned_abs();
    if count > reference {
        return Err(PlanError::StepOverflow);
    }
    if count == 0 {
        return Ok(StepProgram::steps(0, 0));
    }

    if count as usize > DELAY_BUFFER_CAPACITY {
        return Ok(StepProgram::curved(
            secondary,
            dda_curve,
            CurveContext::with_ints([reference, count, ref_delay, 0]),
        ));
    }

    let mut delays = DelayBuffer::new();
    for gap in Bresenham::new(reference, count) {
        delays
            .push(saturate(u64::from(gap) * u64::from(ref_delay)))
            .map_err(|_| PlanError::StepOverflow)?;
    }

    StepProgram::buffered(secondary, &delays, 1).map_err(|_| PlanError::StepOverflow)
}

#[inline]
fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
