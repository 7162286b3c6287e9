//! Configuration module for stepper-cycle.
//!
//! Provides types for loading and validating motor configurations from TOML
//! files (with `std` feature) or pre-parsed data.

mod bounds;
mod motor;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use bounds::{Bounds, BoundsConfig, End, EndStrategy};
pub use motor::MotorConfig;
pub use system::{CycleConfig, SystemConfig};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Micrometers, Microseconds, Millimeters, MillimetersPerSec};
