//! Motor module for stepper-cycle.
//!
//! Provides the step-dir motor, its position tracker and the registry of
//! motors a cycle drives.

mod builder;
mod position;
mod registry;
pub mod state;
mod stepper;

pub use builder::StepperBuilder;
pub use position::Position;
pub use registry::{MotorId, MotorRegistry, MAX_MOTORS};
pub use state::{Direction, MotorState, StopReason};
pub use stepper::Stepper;
