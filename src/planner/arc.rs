//! Circle geometry for arc moves.
//!
//! Coordinates are millimetres relative to the axes' positions when the move
//! is prepared, so the start point is always the origin. Angles are measured
//! counter-clockwise from axis 1 toward axis 2.

use core::f32::consts::{FRAC_PI_2, TAU};

use heapless::Vec;

use crate::error::PlanError;

/// Most monotone segments a single arc splits into.
pub const MAX_ARC_SEGMENTS: usize = 6;

/// Direction of travel around the centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Decreasing angle (G2).
    Clockwise,
    /// Increasing angle (G3).
    #[default]
    CounterClockwise,
}

impl Rotation {
    /// +1 for counter-clockwise, -1 for clockwise.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Rotation::Clockwise => -1.0,
            Rotation::CounterClockwise => 1.0,
        }
    }
}

/// Part of an arc on which both planar axes move monotonically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    /// Start angle, in `[quadrant * PI/2, (quadrant + 1) * PI/2]`.
    pub from: f32,
    /// End angle, same range as `from`.
    pub to: f32,
    /// Quadrant holding the segment.
    pub quadrant: u32,
    /// Angle travelled before this segment (radians, unsigned).
    pub travelled: f32,
}

impl ArcSegment {
    /// Angle covered by this segment (radians, unsigned).
    #[inline]
    pub fn span(&self) -> f32 {
        libm::fabsf(self.to - self.from)
    }
}

/// A circle through the origin and the part of it to travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    /// Centre (mm) relative to the start point.
    pub centre: [f32; 2],
    /// Radius (mm).
    pub radius: f32,
    /// Angle of the start point seen from the centre, in `[0, 2 PI)`.
    pub start_angle: f32,
    /// Signed angle to travel; positive is counter-clockwise.
    pub sweep: f32,
}

impl ArcGeometry {
    /// Full turn around `centre`.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidRadius` if the centre is the start point.
    pub fn full_circle(centre: [f32; 2], rotation: Rotation) -> Result<Self, PlanError> {
        let radius = radius_of(centre)?;
        Ok(Self {
            centre,
            radius,
            start_angle: angle_of(-centre[0], -centre[1]),
            sweep: rotation.sign() * TAU,
        })
    }

    /// Arc around `centre` ending at `target`.
    ///
    /// A target within `tolerance` of the start makes a full turn.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidRadius` for a centre on the start point and
    /// `PlanError::InconsistentArc` if `target` is off the circle by more
    /// than `tolerance`.
    pub fn through(
        target: [f32; 2],
        centre: [f32; 2],
        rotation: Rotation,
        tolerance: f32,
    ) -> Result<Self, PlanError> {
        let radius = radius_of(centre)?;
        let end_radius = libm::hypotf(target[0] - centre[0], target[1] - centre[1]);
        if !end_radius.is_finite() || libm::fabsf(end_radius - radius) > tolerance {
            return Err(PlanError::InconsistentArc {
                start_radius: radius,
                end_radius,
            });
        }

        if libm::hypotf(target[0], target[1]) <= tolerance {
            return Self::full_circle(centre, rotation);
        }

        let start_angle = angle_of(-centre[0], -centre[1]);
        let end_angle = angle_of(target[0] - centre[0], target[1] - centre[1]);
        let ccw = wrap(end_angle - start_angle);
        let sweep = match rotation {
            Rotation::CounterClockwise => ccw,
            Rotation::Clockwise => -wrap(TAU - ccw),
        };

        Ok(Self {
            centre,
            radius,
            start_angle,
            sweep,
        })
    }

    /// Arc of `radius` ending at `target`.
    ///
    /// A positive radius takes the arc shorter than half a turn, a negative
    /// one the longer arc.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::DegenerateArc` if `target` is the start point,
    /// `PlanError::InvalidRadius` for a zero radius and
    /// `PlanError::RadiusTooSmall` if the chord is longer than the diameter.
    pub fn with_radius(
        target: [f32; 2],
        radius: f32,
        rotation: Rotation,
        tolerance: f32,
    ) -> Result<Self, PlanError> {
        let centre = centre_for_radius(target, radius, rotation, tolerance)?;
        Self::through(target, centre, rotation, tolerance)
    }

    /// Point on the circle at `angle` (mm, relative to the start).
    pub fn point(&self, angle: f32) -> [f32; 2] {
        [
            self.centre[0] + self.radius * libm::cosf(angle),
            self.centre[1] + self.radius * libm::sinf(angle),
        ]
    }

    /// Length of the path (mm).
    #[inline]
    pub fn length(&self) -> f32 {
        libm::fabsf(self.sweep) * self.radius
    }

    /// Split the arc at quadrant boundaries.
    pub fn segments(&self) -> Vec<ArcSegment, MAX_ARC_SEGMENTS> {
        const MIN_SPAN: f32 = 1.0e-6;

        let mut out = Vec::new();
        let dir = if self.sweep >= 0.0 { 1.0 } else { -1.0 };
        let end = self.start_angle + self.sweep;
        let mut cur = self.start_angle;

        while (end - cur) * dir > MIN_SPAN {
            let index = cur / FRAC_PI_2;
            let mut boundary = if dir > 0.0 {
                (libm::floorf(index) + 1.0) * FRAC_PI_2
            } else {
                (libm::ceilf(index) - 1.0) * FRAC_PI_2
            };
            if (boundary - cur) * dir < MIN_SPAN {
                boundary += dir * FRAC_PI_2;
            }
            let next = if (boundary - end) * dir > 0.0 { end } else { boundary };

            let mid = 0.5 * (cur + next);
            let shift = libm::floorf(mid / TAU) * TAU;
            let quadrant = (libm::floorf((mid - shift) / FRAC_PI_2) as u32).min(3);
            let segment = ArcSegment {
                from: cur - shift,
                to: next - shift,
                quadrant,
                travelled: libm::fabsf(cur - self.start_angle),
            };
            if out.push(segment).is_err() {
                break;
            }
            cur = next;
        }
        out
    }
}

/// Centre of the circle of `radius` through the origin and `target`.
///
/// Of the two candidates, the one that gives the requested arc (minor for a
/// positive radius, major for a negative one) in the requested rotation is
/// picked.
pub fn centre_for_radius(
    target: [f32; 2],
    radius: f32,
    rotation: Rotation,
    tolerance: f32,
) -> Result<[f32; 2], PlanError> {
    if !radius.is_finite() || radius == 0.0 {
        return Err(PlanError::InvalidRadius(radius));
    }
    let chord = libm::hypotf(target[0], target[1]);
    if chord <= tolerance {
        return Err(PlanError::DegenerateArc);
    }

    let r = libm::fabsf(radius);
    let half = 0.5 * chord;
    if r + tolerance < half {
        return Err(PlanError::RadiusTooSmall { radius, chord });
    }
    let h = libm::sqrtf((r * r - half * half).max(0.0));

    // Left normal of the chord
    let normal = [-target[1] / chord, target[0] / chord];
    let minor = radius > 0.0;
    let side = if minor == (rotation == Rotation::CounterClockwise) {
        1.0
    } else {
        -1.0
    };

    Ok([
        0.5 * target[0] + side * h * normal[0],
        0.5 * target[1] + side * h * normal[1],
    ])
}

fn radius_of(centre: [f32; 2]) -> Result<f32, PlanError> {
    let radius = libm::hypotf(centre[0], centre[1]);
    if !radius.is_finite() || radius == 0.0 {
        return Err(PlanError::InvalidRadius(radius));
    }
    Ok(radius)
}

/// Angle of a vector in `[0, 2 PI)`.
fn angle_of(x: f32, y: f32) -> f32 {
    wrap(libm::atan2f(y, x))
}

/// Wrap an angle into `[0, 2 PI)`.
fn wrap(angle: f32) -> f32 {
    let wrapped = angle - libm::floorf(angle / TAU) * TAU;
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
