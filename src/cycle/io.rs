//! Hardware seams consumed by the scheduler: digital lines and the timer.

use serde::Deserialize;

use crate::config::units::Microseconds;

/// Identifier of a digital I/O line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct LineId(pub u8);

/// Logic level of a digital line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic low.
    Low,
    /// Logic high.
    High,
}

impl Level {
    /// Level for a boolean "high" flag.
    #[inline]
    pub fn from_high(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Digital lines driven and polled by the scheduler.
///
/// Both calls happen inside the tick handler and must be fast and
/// infallible; implementations deal with hardware faults themselves.
pub trait Lines {
    /// Drive an output line.
    fn set_line(&mut self, line: LineId, level: Level);

    /// Sample an input line.
    fn read_line(&mut self, line: LineId) -> Level;
}

/// The single periodic timing source that calls [`Cycle::on_tick`](super::Cycle::on_tick).
pub trait TickSource {
    /// Start firing ticks every `period`.
    fn arm(&mut self, period: Microseconds);

    /// Stop firing ticks.
    fn disarm(&mut self);
}

/// Tick source for callers that drive ticks themselves, e.g. with
/// [`Cycle::run_blocking`](super::Cycle::run_blocking).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolledTicks {
    armed: Option<Microseconds>,
}

impl PolledTicks {
    /// Create a disarmed tick source.
    pub const fn new() -> Self {
        Self { armed: None }
    }

    /// Period of the running cycle, if armed.
    #[inline]
    pub fn armed(&self) -> Option<Microseconds> {
        self.armed
    }
}

impl TickSource for PolledTicks {
    fn arm(&mut self, period: Microseconds) {
        self.armed = Some(period);
    }

    fn disarm(&mut self) {
        self.armed = None;
    }
}
