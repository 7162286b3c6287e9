//! Error types for stepper-cycle.
//!
//! Every error is raised synchronously at the call that introduces it:
//! configuration, program construction, attachment or planning. The tick
//! handler never returns an error; limit trips and exhausted programs are
//! reported as [`StopReason`](crate::motor::StopReason) in the cycle status.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepper-cycle operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor registry error
    Motor(MotorError),
    /// Step program construction error
    Program(ProgramError),
    /// Cycle misuse
    Cycle(CycleError),
    /// Motion planning error
    Plan(PlanError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Minimum pulse delay must not be negative
    InvalidPulseDelay(i32),
    /// Distance per step must be > 0
    InvalidDistancePerStep(f32),
    /// Both ends are CONST and min_pos > max_pos
    InvalidBounds {
        /// Configured minimum position (µm)
        min: f32,
        /// Configured maximum position (µm)
        max: f32,
    },
    /// Fixed tick period must be > 0
    InvalidTickPeriod(u32),
    /// Motor name must be exactly one character
    InvalidMotorName(heapless::String<32>),
    /// Motor key not found in configuration
    MotorNotFound(heapless::String<32>),
    /// Two motors share the same one-character name
    DuplicateMotorName(char),
    /// A required builder field was not set
    MissingField(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor registry errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// No motor registered under this id
    NotFound(u8),
    /// Registry already holds the maximum number of motors
    RegistryFull,
    /// A motor with this name is already registered
    DuplicateName(char),
}

/// Step program construction errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProgramError {
    /// Scale must be at least 1
    InvalidScale(u16),
    /// Delay buffer is empty but the step count is not zero
    EmptyBuffer,
    /// Delay buffer length does not match the virtual step count
    BufferLengthMismatch {
        /// Absolute virtual step count
        steps: u32,
        /// Number of delays supplied
        len: usize,
    },
    /// Delay buffer exceeds the fixed program capacity
    BufferTooLong {
        /// Number of delays supplied
        len: usize,
        /// Maximum number of delays a program can own
        capacity: usize,
    },
}

/// Cycle misuse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleError {
    /// A cycle is already running
    AlreadyRunning,
    /// No motor holds a program
    NoPrograms,
    /// Registry or programs cannot change while a cycle runs
    Busy,
    /// The configured tick is longer than an armed motor's minimum delay
    TickTooCoarse {
        /// Configured tick (µs)
        tick: u32,
        /// Smallest minimum delay among the armed motors (µs)
        min_delay: u32,
    },
}

/// Motion planning errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlanError {
    /// Speed must be >= 0 and finite
    InvalidSpeed(f32),
    /// Distance must be finite
    InvalidDistance(f32),
    /// The same motor was passed for two axes
    SameAxis,
    /// Arc radius is zero or not finite
    InvalidRadius(f32),
    /// Target does not lie on the circle given by the centre
    InconsistentArc {
        /// Radius at the start point (mm)
        start_radius: f32,
        /// Radius at the target point (mm)
        end_radius: f32,
    },
    /// Radius too small to reach the target
    RadiusTooSmall {
        /// Requested radius (mm)
        radius: f32,
        /// Chord length between start and target (mm)
        chord: f32,
    },
    /// Start and target coincide, no centre can be derived from a radius
    DegenerateArc,
    /// Step count does not fit the program representation
    StepOverflow,
    /// An axis of the previous path segment did not complete
    PathInterrupted,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Program(e) => write!(f, "Program error: {}", e),
            Error::Cycle(e) => write!(f, "Cycle error: {}", e),
            Error::Plan(e) => write!(f, "Planning error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidPulseDelay(v) => {
                write!(f, "Invalid pulse delay: {} us. Must be >= 0", v)
            }
            ConfigError::InvalidDistancePerStep(v) => {
                write!(f, "Invalid distance per step: {} um. Must be > 0", v)
            }
            ConfigError::InvalidBounds { min, max } => {
                write!(f, "Invalid bounds: min_pos ({}) must be <= max_pos ({})", min, max)
            }
            ConfigError::InvalidTickPeriod(v) => write!(f, "Invalid tick period: {} us", v),
            ConfigError::InvalidMotorName(name) => {
                write!(f, "Invalid motor name '{}': must be a single character", name)
            }
            ConfigError::MotorNotFound(name) => write!(f, "Motor '{}' not found", name),
            ConfigError::DuplicateMotorName(name) => write!(f, "Duplicate motor name: '{}'", name),
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::NotFound(id) => write!(f, "No motor with id {}", id),
            MotorError::RegistryFull => write!(f, "Motor registry is full"),
            MotorError::DuplicateName(name) => write!(f, "Motor '{}' already registered", name),
        }
    }
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::InvalidScale(v) => write!(f, "Invalid scale: {}. Must be >= 1", v),
            ProgramError::EmptyBuffer => write!(f, "Delay buffer is empty"),
            ProgramError::BufferLengthMismatch { steps, len } => {
                write!(f, "Delay buffer holds {} delays for {} virtual steps", len, steps)
            }
            ProgramError::BufferTooLong { len, capacity } => {
                write!(f, "Delay buffer of {} entries exceeds capacity {}", len, capacity)
            }
        }
    }
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleError::AlreadyRunning => write!(f, "A cycle is already running"),
            CycleError::NoPrograms => write!(f, "No motor has a program attached"),
            CycleError::Busy => write!(f, "Cannot change motors while a cycle is running"),
            CycleError::TickTooCoarse { tick, min_delay } => write!(
                f,
                "Tick of {} us is longer than the {} us minimum pulse delay",
                tick, min_delay
            ),
        }
    }
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::InvalidSpeed(v) => write!(f, "Invalid speed: {} mm/s", v),
            PlanError::InvalidDistance(v) => write!(f, "Invalid distance: {} mm", v),
            PlanError::SameAxis => write!(f, "Each axis must use a different motor"),
            PlanError::InvalidRadius(v) => write!(f, "Invalid radius: {} mm", v),
            PlanError::InconsistentArc { start_radius, end_radius } => write!(
                f,
                "Target radius {} mm does not match start radius {} mm",
                end_radius, start_radius
            ),
            PlanError::RadiusTooSmall { radius, chord } => {
                write!(f, "Radius {} mm cannot span a chord of {} mm", radius, chord)
            }
            PlanError::DegenerateArc => write!(f, "Arc start and target coincide"),
            PlanError::StepOverflow => write!(f, "Step count overflow"),
            PlanError::PathInterrupted => {
                write!(f, "Previous path segment was stopped before completing")
            }
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<ProgramError> for Error {
    fn from(e: ProgramError) -> Self {
        Error::Program(e)
    }
}

impl From<CycleError> for Error {
    fn from(e: CycleError) -> Self {
        Error::Cycle(e)
    }
}

impl From<PlanError> for Error {
    fn from(e: PlanError) -> Self {
        Error::Plan(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for ProgramError {}

#[cfg(feature = "std")]
impl std::error::Error for CycleError {}

#[cfg(feature = "std")]
impl std::error::Error for PlanError {}
