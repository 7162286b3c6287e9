//! The step cycle: motors, lines and the timing source in one context.

use embedded_hal::delay::DelayNs;

use crate::config::units::{Micrometers, Microseconds};
use crate::config::{CycleConfig, EndStrategy, SystemConfig};
use crate::error::{CycleError, Result};
use crate::motor::{Direction, MotorId, MotorRegistry, Stepper};
use crate::program::{CalibrateMode, CurveContext, CurveFn, StepProgram};

use super::io::{Level, LineId, Lines, TickSource};
use super::status::{CycleStatus, MotorStatus};

/// Owns the motor registry, the digital lines and the timing source.
///
/// Programs are attached while the cycle is stopped, [`start`](Cycle::start)
/// arms the timer, and the firmware's timer interrupt calls
/// [`on_tick`](Cycle::on_tick) until every motor is done or stopped.
///
/// # Example
///
/// ```rust,ignore
/// let mut cycle = Cycle::new(registry, pins, timer);
/// cycle.prepare_steps(x, 200, 0)?;
/// cycle.start()?;
/// // timer interrupt:
/// cycle.on_tick();
/// ```
pub struct Cycle<L, T>
where
    L: Lines,
    T: TickSource,
{
    /// Motors in processing order.
    motors: MotorRegistry,

    /// Digital lines.
    lines: L,

    /// Periodic timing source.
    timer: T,

    /// Cycle settings.
    config: CycleConfig,

    /// Whether the timer is armed.
    running: bool,

    /// Tick period of the running or last cycle.
    period: Microseconds,
}

impl<L, T> Cycle<L, T>
where
    L: Lines,
    T: TickSource,
{
    /// Create a stopped cycle.
    pub fn new(motors: MotorRegistry, lines: L, timer: T) -> Self {
        Self {
            motors,
            lines,
            timer,
            config: CycleConfig::default(),
            running: false,
            period: Microseconds(0),
        }
    }

    /// Create a stopped cycle with every configured motor registered.
    ///
    /// # Errors
    ///
    /// Returns an error if a motor configuration is invalid.
    pub fn from_config(config: &SystemConfig, lines: L, timer: T) -> Result<Self> {
        let motors = MotorRegistry::from_config(config)?;
        Ok(Self::new(motors, lines, timer).with_config(config.cycle))
    }

    /// Use cycle settings.
    pub fn with_config(mut self, config: CycleConfig) -> Self {
        self.config = config;
        self
    }

    /// The motor registry.
    #[inline]
    pub fn motors(&self) -> &MotorRegistry {
        &self.motors
    }

    /// Get a motor by id.
    #[inline]
    pub fn motor(&self, id: MotorId) -> Option<&Stepper> {
        self.motors.get(id)
    }

    /// Look up a motor by name.
    #[inline]
    pub fn find(&self, name: char) -> Option<MotorId> {
        self.motors.find(name)
    }

    /// The digital lines.
    #[inline]
    pub fn lines(&self) -> &L {
        &self.lines
    }

    /// The digital lines, mutably.
    #[inline]
    pub fn lines_mut(&mut self) -> &mut L {
        &mut self.lines
    }

    /// The timing source.
    #[inline]
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Take the cycle apart.
    pub fn release(self) -> (MotorRegistry, L, T) {
        (self.motors, self.lines, self.timer)
    }

    /// Register a motor.
    ///
    /// # Errors
    ///
    /// Returns `CycleError::Busy` while running, or a registry error.
    pub fn add_motor(&mut self, motor: Stepper) -> Result<MotorId> {
        self.ensure_stopped()?;
        self.motors.add(motor)
    }

    /// Attach limit sensors and bounds to a motor.
    ///
    /// # Errors
    ///
    /// Returns `CycleError::Busy` while running, `MotorError::NotFound` for an
    /// unknown id and `ConfigError::InvalidBounds` for inverted CONST bounds.
    #[allow(clippy::too_many_arguments)]
    pub fn set_bounds(
        &mut self,
        id: MotorId,
        min_sensor: Option<LineId>,
        max_sensor: Option<LineId>,
        min_strategy: EndStrategy,
        max_strategy: EndStrategy,
        min_pos: Micrometers,
        max_pos: Micrometers,
    ) -> Result<()> {
        self.ensure_stopped()?;
        self.motors.require_mut(id)?.set_bounds(
            min_sensor,
            max_sensor,
            min_strategy,
            max_strategy,
            min_pos,
            max_pos,
        )
    }

    /// Overwrite a motor's coordinate.
    ///
    /// # Errors
    ///
    /// Returns `CycleError::Busy` while running or `MotorError::NotFound`.
    pub fn set_position(&mut self, id: MotorId, position: Micrometers) -> Result<()> {
        self.ensure_stopped()?;
        self.motors.require_mut(id)?.set_position(position);
        Ok(())
    }

    /// Attach a program to a motor, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `CycleError::Busy` while running or `MotorError::NotFound`.
    pub fn attach(&mut self, id: MotorId, program: StepProgram) -> Result<()> {
        self.ensure_stopped()?;
        let motor = self.motors.require_mut(id)?;
        let min_delay = motor.min_delay().0;
        if motor.drive.attach(program, min_delay) {
            warn!("motor {} program replaced", motor.name());
        } else {
            debug!("motor {} program attached", motor.name());
        }
        Ok(())
    }

    /// Attach a burst of `steps` steps (sign selects direction) at `delay` µs.
    ///
    /// # Errors
    ///
    /// See [`attach`](Cycle::attach).
    pub fn prepare_steps(&mut self, id: MotorId, steps: i32, delay: u32) -> Result<()> {
        self.attach(id, StepProgram::steps(steps, delay))
    }

    /// Attach a whirl.
    ///
    /// # Errors
    ///
    /// See [`attach`](Cycle::attach).
    pub fn prepare_whirl(
        &mut self,
        id: MotorId,
        direction: Direction,
        delay: u32,
        calibrate: CalibrateMode,
    ) -> Result<()> {
        self.attach(id, StepProgram::whirl(direction, delay, calibrate))
    }

    /// Attach a buffered program.
    ///
    /// # Errors
    ///
    /// Returns the program validation error, or see [`attach`](Cycle::attach).
    pub fn prepare_buffered(
        &mut self,
        id: MotorId,
        steps: i32,
        delays: &[u32],
        scale: u16,
    ) -> Result<()> {
        let program = StepProgram::buffered(steps, delays, scale)?;
        self.attach(id, program)
    }

    /// Attach a curve-driven program.
    ///
    /// # Errors
    ///
    /// See [`attach`](Cycle::attach).
    pub fn prepare_curved(
        &mut self,
        id: MotorId,
        steps: i32,
        func: CurveFn,
        context: CurveContext,
    ) -> Result<()> {
        self.attach(id, StepProgram::curved(steps, func, context))
    }

    /// Arm every motor holding a program, enable it and start the timer.
    ///
    /// # Errors
    ///
    /// Returns `CycleError::AlreadyRunning` if a cycle is running,
    /// `CycleError::NoPrograms` if no motor holds a program and
    /// `CycleError::TickTooCoarse` if the configured tick is longer than the
    /// minimum delay of a motor about to be armed.
    pub fn start(&mut self) -> Result<()> {
        if self.running {
            return Err(CycleError::AlreadyRunning.into());
        }

        let mut armed = 0usize;
        let mut fastest = u32::MAX;
        for (_, motor) in self.motors.iter() {
            if motor.program().is_some() {
                armed += 1;
                fastest = fastest.min(motor.min_delay().0);
            }
        }
        if armed == 0 {
            return Err(CycleError::NoPrograms.into());
        }

        let period = match self.config.tick {
            // A zero minimum delay sets no bound on the tick
            Some(tick) if fastest > 0 && tick.0 > fastest => {
                return Err(CycleError::TickTooCoarse {
                    tick: tick.0,
                    min_delay: fastest,
                }
                .into());
            }
            Some(tick) => tick,
            None => Microseconds(fastest.max(1)),
        };

        for motor in self.motors.iter_mut() {
            if motor.drive.arm() {
                self.lines.set_line(motor.enable_line(), Level::Low);
            }
        }

        self.period = period;
        self.running = true;
        self.timer.arm(self.period);

        info!("cycle started: {} motors, tick {} us", armed, self.period.0);
        Ok(())
    }

    /// Tick handler: advance every motor by one period.
    ///
    /// Finishes the cycle once no motor is armed or pulsing.
    pub fn on_tick(&mut self) {
        if !self.running {
            return;
        }

        let period = self.period.0;
        let mut active = false;
        for motor in self.motors.iter_mut() {
            motor.on_tick(&mut self.lines, period);
            active |= motor.state().is_active();
        }

        if !active {
            self.finish();
        }
    }

    /// Stop one motor at its next tick.
    ///
    /// Takes effect immediately if the cycle is not running.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::NotFound` for an unknown id.
    pub fn stop_motor(&mut self, id: MotorId) -> Result<()> {
        let running = self.running;
        let motor = self.motors.require_mut(id)?;
        if running && motor.state().is_active() {
            motor.drive.pending_stop = true;
        } else {
            motor.drive.clear();
        }
        Ok(())
    }

    /// Disarm the timer and clear every program.
    ///
    /// Motors still in flight end as `Cancelled`.
    pub fn finish(&mut self) {
        if self.running {
            self.timer.disarm();
            self.running = false;
        }
        for motor in self.motors.iter_mut() {
            motor.drive.clear();
        }
        info!("cycle finished");
    }

    /// Check if the cycle is running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Tick period of the running or last cycle.
    #[inline]
    pub fn period(&self) -> Microseconds {
        self.period
    }

    /// Snapshot of the cycle and every motor.
    pub fn status(&self) -> CycleStatus {
        let mut motors = heapless::Vec::new();
        for (_, motor) in self.motors.iter() {
            // Same capacity as the registry
            let _ = motors.push(MotorStatus {
                name: motor.name(),
                state: motor.state(),
                remaining: motor.remaining(),
                stop_reason: motor.stop_reason(),
                position: motor.position(),
            });
        }
        CycleStatus {
            running: self.running,
            period: self.period,
            motors,
        }
    }

    /// Start the cycle if needed and drive ticks with `delay` until it finishes.
    ///
    /// For hosts and bring-up without a timer interrupt. Whirls only end
    /// through a sensor or a bound.
    ///
    /// # Errors
    ///
    /// Returns `CycleError::NoPrograms` if nothing is attached.
    pub fn run_blocking<D: DelayNs>(&mut self, delay: &mut D) -> Result<CycleStatus> {
        if !self.running {
            self.start()?;
        }
        while self.running {
            delay.delay_us(self.period.0);
            self.on_tick();
        }
        Ok(self.status())
    }

    fn ensure_stopped(&self) -> Result<()> {
        if self.running {
            return Err(CycleError::Busy.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::PolledTicks;
    use crate::error::Error;
    use crate::motor::{MotorState, StopReason};

    /// Counts pulses per step line and serves sensor levels.
    #[derive(Default)]
    struct FakeLines {
        pulses: [u32; 16],
        levels: [Option<Level>; 16],
        tripped: Option<LineId>,
    }

    impl Lines for FakeLines {
        fn set_line(&mut self, line: LineId, level: Level) {
            let i = usize::from(line.0);
            if level == Level::High {
                self.pulses[i] += 1;
            }
            self.levels[i] = Some(level);
        }

        fn read_line(&mut self, line: LineId) -> Level {
            Level::from_high(self.tripped == Some(line))
        }
    }

    fn make_cycle() -> (Cycle<FakeLines, PolledTicks>, MotorId) {
        let mut registry = MotorRegistry::new();
        let x = registry
            .add(Stepper::new('X', LineId(0), LineId(1), LineId(2), 1, 100, 10.0).unwrap())
            .unwrap();
        (Cycle::new(registry, FakeLines::default(), PolledTicks::new()), x)
    }

    #[test]
    fn test_start_without_programs() {
        let (mut cycle, _) = make_cycle();
        assert_eq!(cycle.start(), Err(Error::Cycle(CycleError::NoPrograms)));
        assert!(!cycle.is_running());
    }

    #[test]
    fn test_start_twice_and_attach_while_running() {
        let (mut cycle, x) = make_cycle();
        cycle.prepare_steps(x, 10, 0).unwrap();
        cycle.start().unwrap();

        assert_eq!(cycle.timer().armed(), Some(Microseconds(100)));
        assert_eq!(cycle.start(), Err(Error::Cycle(CycleError::AlreadyRunning)));
        assert_eq!(
            cycle.prepare_steps(x, 5, 0),
            Err(Error::Cycle(CycleError::Busy))
        );
        // enable line driven low
        assert_eq!(cycle.lines().levels[2], Some(Level::Low));
    }

    #[test]
    fn test_tick_longer_than_min_delay_rejected() {
        let (cycle, x) = make_cycle();
        let mut cycle = cycle.with_config(CycleConfig {
            tick: Some(Microseconds(150)),
        });
        cycle.prepare_steps(x, 10, 100).unwrap();

        assert_eq!(
            cycle.start(),
            Err(Error::Cycle(CycleError::TickTooCoarse {
                tick: 150,
                min_delay: 100,
            }))
        );
        assert!(!cycle.is_running());
        assert!(cycle.timer().armed().is_none());
        assert_eq!(cycle.motor(x).map(Stepper::state), Some(MotorState::Idle));
        assert_eq!(cycle.lines().levels[2], None);

        // A finer tick keeps the programmed timing
        cycle = cycle.with_config(CycleConfig {
            tick: Some(Microseconds(50)),
        });
        cycle.start().unwrap();
        let mut ticks = 0;
        while cycle.is_running() {
            cycle.on_tick();
            ticks += 1;
        }
        assert_eq!(ticks, 20);
        assert_eq!(cycle.lines().pulses[0], 10);
    }

    #[test]
    fn test_burst_runs_and_auto_finishes() {
        let (mut cycle, x) = make_cycle();
        cycle.prepare_steps(x, -10, 300).unwrap();
        cycle.start().unwrap();

        let mut ticks = 0;
        while cycle.is_running() {
            cycle.on_tick();
            ticks += 1;
        }

        assert_eq!(ticks, 30);
        assert_eq!(cycle.lines().pulses[0], 10);
        // backward with dir_inv +1 drives the direction line low
        assert_eq!(cycle.lines().levels[1], Some(Level::Low));
        let motor = cycle.motor(x).unwrap();
        assert_eq!(motor.position(), Micrometers(-100.0));
        assert_eq!(motor.state(), MotorState::Done);
        assert_eq!(motor.stop_reason(), Some(StopReason::Completed));
        assert!(cycle.timer().armed().is_none());
    }

    #[test]
    fn test_zero_length_program_done_on_first_tick() {
        let (mut cycle, x) = make_cycle();
        cycle.prepare_steps(x, 0, 0).unwrap();
        cycle.start().unwrap();
        cycle.on_tick();

        assert!(!cycle.is_running());
        assert_eq!(cycle.lines().pulses[0], 0);
        assert_eq!(cycle.motor(x).map(Stepper::state), Some(MotorState::Done));
    }

    #[test]
    fn test_stop_motor_cancels_whirl() {
        let (mut cycle, x) = make_cycle();
        cycle
            .prepare_whirl(x, Direction::Forward, 0, CalibrateMode::Off)
            .unwrap();
        cycle.start().unwrap();
        for _ in 0..50 {
            cycle.on_tick();
        }
        assert!(cycle.is_running());

        cycle.stop_motor(x).unwrap();
        cycle.on_tick();

        assert!(!cycle.is_running());
        let status = cycle.status();
        let motor = status.motor('X').unwrap();
        assert_eq!(motor.state, MotorState::Stopped);
        assert_eq!(motor.stop_reason, Some(StopReason::Cancelled));
        assert_eq!(motor.position, Micrometers(500.0));
    }

    #[test]
    fn test_sensor_trip_stops_motor() {
        let (mut cycle, x) = make_cycle();
        cycle
            .set_bounds(
                x,
                None,
                Some(LineId(9)),
                EndStrategy::Inf,
                EndStrategy::Inf,
                Micrometers(0.0),
                Micrometers(0.0),
            )
            .unwrap();
        cycle
            .prepare_whirl(x, Direction::Forward, 0, CalibrateMode::Off)
            .unwrap();
        cycle.start().unwrap();
        for _ in 0..5 {
            cycle.on_tick();
        }
        cycle.lines_mut().tripped = Some(LineId(9));
        cycle.on_tick();

        assert!(!cycle.is_running());
        let motor = cycle.motor(x).unwrap();
        assert_eq!(
            motor.stop_reason(),
            Some(StopReason::LimitSensor(crate::config::End::Max))
        );
        assert_eq!(motor.position(), Micrometers(50.0));
    }

    #[test]
    fn test_finish_cancels_in_flight_motors() {
        let (mut cycle, x) = make_cycle();
        cycle.prepare_steps(x, 100, 0).unwrap();
        cycle.start().unwrap();
        cycle.on_tick();
        cycle.finish();

        let motor = cycle.motor(x).unwrap();
        assert_eq!(motor.state(), MotorState::Stopped);
        assert_eq!(motor.stop_reason(), Some(StopReason::Cancelled));
        assert!(motor.program().is_none());
    }
}
