//! Motion planning: Cartesian moves to synchronized step programs.
//!
//! The planner only chooses step counts and delays. Its programs go through
//! [`Cycle::attach`](crate::cycle::Cycle::attach) like any other, so bounds
//! and limit sensors apply to them unchanged.
//!
//! - [`Cycle::prepare_line`](crate::cycle::Cycle::prepare_line) and
//!   [`Cycle::prepare_line_2d`](crate::cycle::Cycle::prepare_line_2d):
//!   straight moves, the second one synchronized with [`Bresenham`].
//! - `prepare_circle`, `prepare_arc`, `prepare_arc2` and their `spiral`
//!   variants: arcs split into monotone segments, see [`ArcPath`].

mod arc;
mod curves;
mod dda;
mod line;
mod path;

pub use arc::{centre_for_radius, ArcGeometry, ArcSegment, Rotation, MAX_ARC_SEGMENTS};
pub use curves::{arc_axis_curve, linear_spread_curve};
pub use dda::{dda_curve, dda_tick, secondary_program, Bresenham};
pub use path::ArcPath;
