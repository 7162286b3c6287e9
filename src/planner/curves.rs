//! Built-in delay curves for arc and spiral moves.
//!
//! Each curve returns `round(t(i + 1)) - round(t(i))` where `t(n)` is the
//! time, from the start of the segment, at which step `n` (1-based) is due
//! and `t(0) = 0`. Rounding the absolute times keeps the per-step rounding
//! errors from adding up.

use core::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::program::CurveContext;

/// Which coordinate of the circle an axis follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AxisKind {
    /// `c1 = centre + r cos(theta)`
    Cos = 0,
    /// `c2 = centre + r sin(theta)`
    Sin = 1,
}

/// Parameters of one axis over one monotone arc segment, in steps.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ArcAxis {
    pub kind: AxisKind,
    /// Quadrant (0..4) holding the whole segment.
    pub quadrant: u32,
    /// Whether the step count grows along the segment.
    pub increasing: bool,
    /// Centre coordinate in steps.
    pub centre: f32,
    /// Radius in steps of this axis.
    pub radius: f32,
    /// Segment start angle, inside `quadrant`.
    pub start_angle: f32,
    /// Microseconds per radian of travel.
    pub us_per_rad: f32,
    /// Step count at the segment start.
    pub start_step: f32,
}

impl ArcAxis {
    /// Pack into a curve context for [`arc_axis_curve`].
    pub fn context(&self) -> CurveContext {
        CurveContext {
            ints: [
                self.kind as u32,
                self.quadrant,
                u32::from(self.increasing),
                0,
            ],
            floats: [
                self.centre,
                self.radius,
                self.start_angle,
                self.us_per_rad,
                self.start_step,
                0.0,
            ],
        }
    }
}

/// Angle inside `quadrant` at which the axis reaches `value` steps.
fn crossing_angle(kind: u32, quadrant: u32, centre: f32, radius: f32, value: f32) -> f32 {
    let ratio = ((value - centre) / radius).clamp(-1.0, 1.0);
    let lo = quadrant as f32 * FRAC_PI_2;
    let angle = if kind == AxisKind::Cos as u32 {
        let a = libm::acosf(ratio);
        if quadrant < 2 {
            a
        } else {
            TAU - a
        }
    } else {
        let a = libm::asinf(ratio);
        match quadrant {
            0 => a,
            1 | 2 => PI - a,
            _ => TAU + a,
        }
    };
    angle.clamp(lo, lo + FRAC_PI_2)
}

fn arc_axis_time(n: u32, ctx: &CurveContext) -> f32 {
    if n == 0 {
        return 0.0;
    }
    let [kind, quadrant, increasing, _] = ctx.ints;
    let [centre, radius, start_angle, us_per_rad, start_step, _] = ctx.floats;

    let half = n as f32 - 0.5;
    let value = if increasing != 0 {
        start_step + half
    } else {
        start_step - half
    };
    let angle = crossing_angle(kind, quadrant, centre, radius, value);
    libm::fabsf(angle - start_angle) * us_per_rad
}

/// Delay curve of one axis following a circle inside one quadrant.
///
/// Context layout is produced by `ArcAxis::context`.
pub fn arc_axis_curve(index: u32, ctx: &CurveContext) -> u32 {
    delay_between(arc_axis_time(index, ctx), arc_axis_time(index + 1, ctx))
}

/// Delay curve of evenly spaced steps.
///
/// Context: `floats = [first_step_us, us_per_step, ..]`; step `n` is due at
/// `first_step_us + (n - 1) * us_per_step`.
pub fn linear_spread_curve(index: u32, ctx: &CurveContext) -> u32 {
    let time = |n: u32| {
        if n == 0 {
            0.0
        } else {
            ctx.floats[0] + (n - 1) as f32 * ctx.floats[1]
        }
    };
    delay_between(time(index), time(index + 1))
}

/// Context for [`linear_spread_curve`].
pub(crate) fn linear_spread_context(first_step_us: f32, us_per_step: f32) -> CurveContext {
    CurveContext {
        ints: [0; 4],
        floats: [first_step_us, us_per_step, 0.0, 0.0, 0.0, 0.0],
    }
}

#[inline]
fn delay_between(from: f32, to: f32) -> u32 {
    let delta = libm::roundf(to) - libm::roundf(from);
    if delta <= 0.0 {
        0
    } else if delta >= u32::MAX as f32 {
        u32::MAX
    } else {
        delta as u32
    }
}
