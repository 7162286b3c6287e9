//! # stepper-cycle
//!
//! Interrupt-driven step-dir stepper control: a per-motor pulse scheduler
//! driven by a single timer tick, plus the planning math that turns lines,
//! arcs and spirals into synchronized per-axis step programs.
//!
//! ## Features
//!
//! - **One tick, many motors**: every motor keeps its own deadline, so
//!   siblings never delay each other
//! - **Four program kinds**: constant-delay bursts, whirls, buffered delays
//!   with a scale factor, and curve-computed delays
//! - **Bounds**: per-end CONST/AUTO/INF strategies and limit sensors,
//!   enforced before every pulse
//! - **Calibration**: whirls that reset `min_pos` or record `max_pos`
//! - **Planning**: Bresenham-synchronized 2D lines, circles, arcs and spirals
//! - **no_std compatible**: fixed-capacity storage, no allocation on the tick path
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_cycle::{Cycle, PinBank, PolledTicks};
//! use stepper_cycle::config::units::UnitExt;
//!
//! let config = stepper_cycle::load_config("machine.toml")?;
//! let mut cycle = Cycle::from_config(&config, pins, PolledTicks::new())?;
//!
//! let x = cycle.find('X').unwrap();
//! cycle.prepare_line(x, 2.0.mm(), 10.0.mm_per_sec())?;
//! cycle.start()?;
//!
//! // in the timer interrupt
//! cycle.on_tick();
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Logging macros, must come first
#[macro_use]
mod fmt;

// Core modules
pub mod config;
pub mod cycle;
pub mod error;
pub mod motor;
pub mod planner;
pub mod program;

// Re-exports for ergonomic API
pub use config::{validate_config, Bounds, EndStrategy, MotorConfig, SystemConfig};
pub use cycle::{Cycle, CycleStatus, Level, LineId, Lines, PinBank, PolledTicks, TickSource};
pub use error::{Error, Result};
pub use motor::{Direction, MotorId, MotorRegistry, MotorState, Stepper, StopReason};
pub use planner::{ArcPath, Rotation};
pub use program::{CalibrateMode, CurveContext, StepProgram};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Micrometers, Microseconds, Millimeters, MillimetersPerSec, UnitExt};
