//! Unit test harness for stepper-cycle.
//!
//! This module organizes unit tests for each component of the library.

mod config_parsing;
mod config_validation;
mod dda_properties;
mod programs;
