//! Step cycle: the pulse scheduler and the hardware seams it drives.
//!
//! A [`Cycle`] owns the [`MotorRegistry`](crate::motor::MotorRegistry), a
//! [`Lines`] implementation and a [`TickSource`]. The firmware's timer
//! interrupt calls [`Cycle::on_tick`], which is the only place motor state
//! changes while a cycle runs.

mod io;
mod pins;
mod scheduler;
mod status;
mod step_cycle;

pub use io::{Level, LineId, Lines, PolledTicks, TickSource};
pub use pins::PinBank;
pub use status::{CycleStatus, MotorStatus};
pub use step_cycle::Cycle;

pub(crate) use scheduler::Drive;
