//! Step programs and their execution cursor.
//!
//! A [`StepProgram`] describes one motor's movement as a tagged union of
//! constant-delay bursts, whirls, buffered delays and curve-computed delays.
//! The scheduler walks it with a [`ProgramCursor`].

mod curve;
mod cursor;
mod step_program;

pub use curve::{Curve, CurveContext, CurveFn};
pub use cursor::ProgramCursor;
pub use step_program::{CalibrateMode, DelayBuffer, StepProgram, DELAY_BUFFER_CAPACITY};
