//! Arc, circle and spiral moves.
//!
//! A step program has a single direction, so an arc is split where an axis
//! reverses (at quadrant boundaries) and each monotone segment runs as its
//! own cycle. The `prepare_*` calls attach the first segment and return an
//! [`ArcPath`]; [`ArcPath::prepare_next`] attaches the following ones once
//! the previous cycle has finished.
//!
//! ```rust,ignore
//! let mut path = cycle.prepare_circle(x, y, [10.0.mm(), 0.0.mm()], Rotation::Clockwise, 5.0.mm_per_sec())?;
//! loop {
//!     cycle.run_blocking(&mut delay)?;
//!     if !path.prepare_next(&mut cycle)? {
//!         break;
//!     }
//! }
//! ```

use heapless::Vec;

use crate::config::units::{Millimeters, MillimetersPerSec, UM_PER_MM, US_PER_SEC};
use crate::cycle::{Cycle, Lines, TickSource};
use crate::error::{CycleError, PlanError, Result};
use crate::motor::{MotorId, Stepper, StopReason};
use crate::program::StepProgram;

use super::arc::{ArcGeometry, ArcSegment, Rotation, MAX_ARC_SEGMENTS};
use super::curves::{arc_axis_curve, linear_spread_context, linear_spread_curve, ArcAxis, AxisKind};
use super::line::{check_distance, check_speed, speed_limit, steps_for};

/// Linearly fed third axis of a spiral.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Feed {
    motor: MotorId,
    /// Total signed steps over the whole path.
    steps: i32,
}

/// A prepared arc, attached one monotone segment at a time.
#[derive(Debug, Clone)]
pub struct ArcPath {
    axes: [MotorId; 2],
    feed: Option<Feed>,
    geometry: ArcGeometry,
    us_per_rad: f32,
    segments: Vec<ArcSegment, MAX_ARC_SEGMENTS>,
    next: usize,
}

impl ArcPath {
    /// The circle and the angle travelled.
    #[inline]
    pub fn geometry(&self) -> &ArcGeometry {
        &self.geometry
    }

    /// All segments of the path.
    #[inline]
    pub fn segments(&self) -> &[ArcSegment] {
        &self.segments
    }

    /// Segments not yet attached.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.segments.len() - self.next
    }

    /// Check if every segment has been attached.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.next >= self.segments.len()
    }

    /// Planned duration of the whole path in microseconds.
    pub fn duration_us(&self) -> f32 {
        libm::fabsf(self.geometry.sweep) * self.us_per_rad
    }

    /// Attach the next segment's programs.
    ///
    /// Returns `false` once every segment has been attached.
    ///
    /// # Errors
    ///
    /// Returns `CycleError::Busy` while the previous segment is still running.
    /// Returns `PlanError::PathInterrupted`, and abandons the path, if an axis
    /// of the previous segment was stopped before completing.
    pub fn prepare_next<L, T>(&mut self, cycle: &mut Cycle<L, T>) -> Result<bool>
    where
        L: Lines,
        T: TickSource,
    {
        let Some(segment) = self.segments.get(self.next).copied() else {
            return Ok(false);
        };
        if cycle.is_running() {
            return Err(CycleError::Busy.into());
        }
        if self.next > 0 && !self.previous_completed(cycle)? {
            warn!(
                "arc path abandoned after {} of {} segments",
                self.next,
                self.segments.len()
            );
            self.next = self.segments.len();
            return Err(PlanError::PathInterrupted.into());
        }

        let mut programs: Vec<(MotorId, StepProgram), 3> = Vec::new();
        for (axis, kind) in [(0usize, AxisKind::Cos), (1, AxisKind::Sin)] {
            let id = self.axes[axis];
            let motor = cycle.motors().require(id)?;
            let program = self.axis_program(motor, kind, axis, &segment);
            let _ = programs.push((id, program));
        }
        if let Some(feed) = self.feed {
            let program = self.feed_program(feed, &segment);
            let _ = programs.push((feed.motor, program));
        }

        for (id, program) in programs {
            cycle.attach(id, program)?;
        }

        trace!(
            "arc segment {} of {} attached (quadrant {})",
            self.next + 1,
            self.segments.len(),
            segment.quadrant
        );
        self.next += 1;
        Ok(true)
    }

    /// Whether every axis of the last attached segment ran to its end.
    fn previous_completed<L, T>(&self, cycle: &Cycle<L, T>) -> Result<bool>
    where
        L: Lines,
        T: TickSource,
    {
        let feed = self.feed.map(|f| f.motor);
        for id in self.axes.iter().copied().chain(feed) {
            let motor = cycle.motors().require(id)?;
            if motor.stop_reason() != Some(StopReason::Completed) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn axis_program(
        &self,
        motor: &Stepper,
        kind: AxisKind,
        axis: usize,
        segment: &ArcSegment,
    ) -> StepProgram {
        let mm_per_step = motor.distance_per_step().0 / UM_PER_MM;
        let centre = self.geometry.centre[axis] / mm_per_step;
        let radius = self.geometry.radius / mm_per_step;
        let at = |angle: f32| match kind {
            AxisKind::Cos => centre + radius * libm::cosf(angle),
            AxisKind::Sin => centre + radius * libm::sinf(angle),
        };

        let start = libm::roundf(at(segment.from));
        let end = libm::roundf(at(segment.to));
        let steps = (end - start) as i32;
        if steps == 0 {
            return StepProgram::steps(0, 0);
        }

        let axis = ArcAxis {
            kind,
            quadrant: segment.quadrant,
            increasing: steps > 0,
            centre,
            radius,
            start_angle: segment.from,
            us_per_rad: self.us_per_rad,
            start_step: start,
        };
        StepProgram::curved(steps, arc_axis_curve, axis.context())
    }

    fn feed_program(&self, feed: Feed, segment: &ArcSegment) -> StepProgram {
        let total_angle = libm::fabsf(self.geometry.sweep);
        let at = |travelled: f32| feed.steps as f32 * (travelled / total_angle);

        let p_start = at(segment.travelled);
        let p_end = at(segment.travelled + segment.span());
        let start = libm::roundf(p_start);
        let steps = (libm::roundf(p_end) - start) as i32;
        if steps == 0 {
            return StepProgram::steps(0, 0);
        }

        let sign = if steps > 0 { 1.0 } else { -1.0 };
        let duration = segment.span() * self.us_per_rad;
        let per_step = duration / libm::fabsf(p_end - p_start);
        let first = (0.5 + sign * (start - p_start)) * per_step;
        StepProgram::curved(steps, linear_spread_curve, linear_spread_context(first, per_step))
    }
}

impl<L, T> Cycle<L, T>
where
    L: Lines,
    T: TickSource,
{
    /// Full circle around `centre` on axes `id1`/`id2`.
    ///
    /// # Errors
    ///
    /// Returns a `PlanError` for invalid geometry or speed, or an attach error.
    pub fn prepare_circle(
        &mut self,
        id1: MotorId,
        id2: MotorId,
        centre: [Millimeters; 2],
        rotation: Rotation,
        speed: MillimetersPerSec,
    ) -> Result<ArcPath> {
        let centre = check_point(centre)?;
        let geometry = ArcGeometry::full_circle(centre, rotation)?;
        self.prepare_arc_path([id1, id2], None, geometry, speed)
    }

    /// Full circle on `id1`/`id2` while `id3` travels `target3`.
    ///
    /// # Errors
    ///
    /// See [`prepare_circle`](Cycle::prepare_circle).
    #[allow(clippy::too_many_arguments)]
    pub fn prepare_spiral_circle(
        &mut self,
        id1: MotorId,
        id2: MotorId,
        id3: MotorId,
        target3: Millimeters,
        centre: [Millimeters; 2],
        rotation: Rotation,
        speed: MillimetersPerSec,
    ) -> Result<ArcPath> {
        let centre = check_point(centre)?;
        let geometry = ArcGeometry::full_circle(centre, rotation)?;
        self.prepare_arc_path([id1, id2], Some((id3, target3)), geometry, speed)
    }

    /// Arc around `centre` to `target` on axes `id1`/`id2`.
    ///
    /// A target at the start point makes a full circle.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InconsistentArc` if `target` is not on the circle,
    /// another `PlanError` for invalid input, or an attach error.
    #[allow(clippy::too_many_arguments)]
    pub fn prepare_arc(
        &mut self,
        id1: MotorId,
        id2: MotorId,
        target: [Millimeters; 2],
        centre: [Millimeters; 2],
        rotation: Rotation,
        speed: MillimetersPerSec,
    ) -> Result<ArcPath> {
        let target = check_point(target)?;
        let centre = check_point(centre)?;
        let tolerance = self.arc_tolerance([id1, id2], radius_hint(centre))?;
        let geometry = ArcGeometry::through(target, centre, rotation, tolerance)?;
        self.prepare_arc_path([id1, id2], None, geometry, speed)
    }

    /// Arc around `centre` to `target` while `id3` travels `target3`.
    ///
    /// # Errors
    ///
    /// See [`prepare_arc`](Cycle::prepare_arc).
    #[allow(clippy::too_many_arguments)]
    pub fn prepare_spiral_arc(
        &mut self,
        id1: MotorId,
        id2: MotorId,
        id3: MotorId,
        target: [Millimeters; 2],
        target3: Millimeters,
        centre: [Millimeters; 2],
        rotation: Rotation,
        speed: MillimetersPerSec,
    ) -> Result<ArcPath> {
        let target = check_point(target)?;
        let centre = check_point(centre)?;
        let tolerance = self.arc_tolerance([id1, id2], radius_hint(centre))?;
        let geometry = ArcGeometry::through(target, centre, rotation, tolerance)?;
        self.prepare_arc_path([id1, id2], Some((id3, target3)), geometry, speed)
    }

    /// Arc of `radius` to `target` on axes `id1`/`id2`.
    ///
    /// A positive radius takes the shorter arc, a negative one the longer.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::RadiusTooSmall` or `PlanError::DegenerateArc` if no
    /// such arc exists, another `PlanError` for invalid input, or an attach
    /// error.
    pub fn prepare_arc2(
        &mut self,
        id1: MotorId,
        id2: MotorId,
        target: [Millimeters; 2],
        radius: Millimeters,
        rotation: Rotation,
        speed: MillimetersPerSec,
    ) -> Result<ArcPath> {
        let target = check_point(target)?;
        let tolerance = self.arc_tolerance([id1, id2], libm::fabsf(radius.0))?;
        let geometry = ArcGeometry::with_radius(target, radius.0, rotation, tolerance)?;
        self.prepare_arc_path([id1, id2], None, geometry, speed)
    }

    /// Arc of `radius` to `target` while `id3` travels `target3`.
    ///
    /// # Errors
    ///
    /// See [`prepare_arc2`](Cycle::prepare_arc2).
    #[allow(clippy::too_many_arguments)]
    pub fn prepare_spiral_arc2(
        &mut self,
        id1: MotorId,
        id2: MotorId,
        id3: MotorId,
        target: [Millimeters; 2],
        target3: Millimeters,
        radius: Millimeters,
        rotation: Rotation,
        speed: MillimetersPerSec,
    ) -> Result<ArcPath> {
        let target = check_point(target)?;
        let tolerance = self.arc_tolerance([id1, id2], libm::fabsf(radius.0))?;
        let geometry = ArcGeometry::with_radius(target, radius.0, rotation, tolerance)?;
        self.prepare_arc_path([id1, id2], Some((id3, target3)), geometry, speed)
    }

    /// Two steps of the coarser axis plus a small relative slack.
    fn arc_tolerance(&self, axes: [MotorId; 2], radius: f32) -> Result<f32> {
        let mut coarsest: f32 = 0.0;
        for id in axes {
            let motor = self.motors().require(id)?;
            coarsest = coarsest.max(motor.distance_per_step().0 / UM_PER_MM);
        }
        Ok(2.0 * coarsest + 1.0e-4 * radius)
    }

    fn prepare_arc_path(
        &mut self,
        axes: [MotorId; 2],
        feed: Option<(MotorId, Millimeters)>,
        geometry: ArcGeometry,
        speed: MillimetersPerSec,
    ) -> Result<ArcPath> {
        let requested = check_speed(speed)?;
        if axes[0] == axes[1] || feed.is_some_and(|(id, _)| axes.contains(&id)) {
            return Err(PlanError::SameAxis.into());
        }

        // Tangential speed at which no axis exceeds its own limit.
        let mut limit = f32::INFINITY;
        for id in axes {
            limit = limit.min(speed_limit(self.motors().require(id)?));
        }

        let feed = match feed {
            Some((id, distance)) => {
                check_distance(distance)?;
                let motor = self.motors().require(id)?;
                let steps = steps_for(motor, distance)?;
                if distance.0 != 0.0 {
                    // feed speed is |d3| / duration = |d3| * v / length
                    let feed_limit = speed_limit(motor) * geometry.length() / libm::fabsf(distance.0);
                    limit = limit.min(feed_limit);
                }
                Some(Feed { motor: id, steps })
            }
            None => None,
        };

        let speed = if requested == 0.0 || requested > limit {
            limit
        } else {
            requested
        };
        let us_per_rad = if speed.is_finite() && speed > 0.0 {
            geometry.radius / speed * US_PER_SEC
        } else {
            0.0
        };

        let mut path = ArcPath {
            axes,
            feed,
            geometry,
            us_per_rad,
            segments: geometry.segments(),
            next: 0,
        };
        debug!(
            "arc: radius {} mm, sweep {} rad, {} segments, {} mm/s",
            geometry.radius,
            geometry.sweep,
            path.segments.len(),
            speed
        );
        path.prepare_next(self)?;
        Ok(path)
    }
}

fn check_point(point: [Millimeters; 2]) -> core::result::Result<[f32; 2], PlanError> {
    Ok([check_distance(point[0])?, check_distance(point[1])?])
}

fn radius_hint(centre: [f32; 2]) -> f32 {
    libm::hypotf(centre[0], centre[1])
}
