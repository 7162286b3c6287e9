//! Callback-computed delay curves.

use core::fmt;

/// Delay function: maps a hardware step index and the curve context to the
/// delay in microseconds before that step.
///
/// Called from the tick handler, so it must be pure and must not block.
pub type CurveFn = fn(u32, &CurveContext) -> u32;

/// Fixed-size parameter block handed to a [`CurveFn`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurveContext {
    /// Integer parameters.
    pub ints: [u32; 4],
    /// Floating point parameters.
    pub floats: [f32; 6],
}

impl CurveContext {
    /// Context with only integer parameters set.
    pub const fn with_ints(ints: [u32; 4]) -> Self {
        Self {
            ints,
            floats: [0.0; 6],
        }
    }
}

/// A delay function bound to its context.
#[derive(Clone, Copy)]
pub struct Curve {
    func: CurveFn,
    context: CurveContext,
}

impl Curve {
    /// Bind `func` to `context`.
    pub const fn new(func: CurveFn, context: CurveContext) -> Self {
        Self { func, context }
    }

    /// Delay before hardware step `index`.
    #[inline]
    pub fn delay_at(&self, index: u32) -> u32 {
        (self.func)(index, &self.context)
    }

    /// The bound context.
    #[inline]
    pub fn context(&self) -> &CurveContext {
        &self.context
    }
}

impl fmt::Debug for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Curve")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doubling(index: u32, ctx: &CurveContext) -> u32 {
        ctx.ints[0] * (index + 1)
    }

    #[test]
    fn test_curve_evaluates_with_context() {
        let curve = Curve::new(doubling, CurveContext::with_ints([50, 0, 0, 0]));
        assert_eq!(curve.delay_at(0), 50);
        assert_eq!(curve.delay_at(3), 200);
    }
}
