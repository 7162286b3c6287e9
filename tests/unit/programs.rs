//! Unit tests for step programs run through a cycle.

use proptest::prelude::*;
use stepper_cycle::error::{CycleError, ProgramError};
use stepper_cycle::program::ProgramCursor;
use stepper_cycle::{
    CalibrateMode, CurveContext, Direction, Error, Micrometers, MotorState, StepProgram,
    StopReason,
};

use crate::{cycle_with, motor, run, tick_n};

/// Run a buffered program on a fresh single-motor cycle, returning pulse ticks.
fn buffered_pulse_ticks(steps: i32, delays: &[u32], scale: u16) -> Vec<u32> {
    let (mut cycle, ids) = cycle_with(vec![motor('X', 0, 100, 10.0)]);
    cycle.prepare_buffered(ids[0], steps, delays, scale).unwrap();
    run(&mut cycle);
    cycle.lines().pulse_ticks(0)
}

proptest! {
    /// Scaling a buffer behaves like repeating each slot `scale` times.
    #[test]
    fn scaled_buffer_matches_expanded(
        delays in prop::collection::vec(100u32..3000, 1..=8),
        scale in 1u16..=8,
        backward in any::<bool>(),
    ) {
        let sign = if backward { -1 } else { 1 };
        let k = delays.len();
        let expanded: Vec<u32> = delays
            .iter()
            .flat_map(|&d| std::iter::repeat(d).take(usize::from(scale)))
            .collect();

        let scaled = buffered_pulse_ticks(sign * k as i32, &delays, scale);
        let reference = buffered_pulse_ticks(sign * expanded.len() as i32, &expanded, 1);

        prop_assert_eq!(scaled.len(), k * usize::from(scale));
        prop_assert_eq!(scaled, reference);
    }
}

/// Halves the delay every step down to `ints[1]`.
fn halving(index: u32, ctx: &CurveContext) -> u32 {
    (ctx.ints[0] >> index.min(31)).max(ctx.ints[1])
}

/// Test that curve delays drive pulse timing and are clamped to the minimum.
#[test]
fn test_curved_program_timing() {
    let (mut cycle, ids) = cycle_with(vec![motor('X', 0, 100, 10.0)]);
    cycle
        .prepare_curved(ids[0], 5, halving, CurveContext::with_ints([800, 0, 0, 0]))
        .unwrap();
    run(&mut cycle);

    // 800, 400, 200, 100, 50 -> 100
    assert_eq!(cycle.lines().pulse_ticks(0), vec![8, 12, 14, 15, 16]);
    assert_eq!(cycle.motor(ids[0]).unwrap().position(), Micrometers(50.0));
}

/// Test that a zero-length program completes without pulsing.
#[test]
fn test_zero_length_program_completes() {
    let (mut cycle, ids) = cycle_with(vec![motor('X', 0, 100, 10.0)]);
    cycle.prepare_steps(ids[0], 0, 500).unwrap();

    assert_eq!(crate::run(&mut cycle), 1);
    assert_eq!(cycle.lines().pulse_count(0), 0);
    let status = cycle.status();
    assert!(status.motor('X').unwrap().finished_naturally());
}

/// Test stopping a whirl from outside the tick handler.
#[test]
fn test_stop_motor_cancels_whirl() {
    let (mut cycle, ids) = cycle_with(vec![motor('X', 0, 100, 10.0), motor('Y', 3, 100, 10.0)]);
    let (x, y) = (ids[0], ids[1]);
    cycle
        .prepare_whirl(x, Direction::Forward, 0, CalibrateMode::Off)
        .unwrap();
    cycle.prepare_steps(y, 100, 0).unwrap();
    cycle.start().unwrap();

    tick_n(&mut cycle, 25);
    cycle.stop_motor(x).unwrap();
    assert_eq!(cycle.motor(x).unwrap().state(), MotorState::Pulsing);

    tick_n(&mut cycle, 1);
    let motor = cycle.motor(x).unwrap();
    assert_eq!(motor.state(), MotorState::Stopped);
    assert_eq!(motor.stop_reason(), Some(StopReason::Cancelled));
    assert_eq!(motor.position(), Micrometers(250.0));

    // The sibling keeps going
    assert!(cycle.is_running());
    assert_eq!(cycle.motor(y).unwrap().remaining(), Some(74));
}

/// Test that programs cannot change while a cycle runs.
#[test]
fn test_busy_while_running() {
    let (mut cycle, ids) = cycle_with(vec![motor('X', 0, 100, 10.0)]);
    let x = ids[0];
    cycle.prepare_steps(x, 10, 0).unwrap();
    cycle.start().unwrap();

    assert!(matches!(
        cycle.prepare_steps(x, 5, 0),
        Err(Error::Cycle(CycleError::Busy))
    ));
    assert!(matches!(
        cycle.set_position(x, Micrometers(0.0)),
        Err(Error::Cycle(CycleError::Busy))
    ));
    assert!(matches!(cycle.start(), Err(Error::Cycle(CycleError::AlreadyRunning))));

    cycle.finish();
    assert!(!cycle.is_running());
    assert_eq!(cycle.motor(x).unwrap().stop_reason(), Some(StopReason::Cancelled));
    assert!(cycle.prepare_steps(x, 5, 0).is_ok());
}

/// Test that attaching twice keeps only the latest program.
#[test]
fn test_attach_replaces_program() {
    let (mut cycle, ids) = cycle_with(vec![motor('X', 0, 100, 10.0)]);
    cycle.prepare_steps(ids[0], 10, 0).unwrap();
    cycle.prepare_steps(ids[0], -4, 0).unwrap();
    run(&mut cycle);

    assert_eq!(cycle.lines().pulse_count(0), 4);
    assert_eq!(cycle.motor(ids[0]).unwrap().position(), Micrometers(-40.0));
}

/// Test buffered program validation.
#[test]
fn test_buffered_validation() {
    assert!(matches!(
        StepProgram::buffered(2, &[100, 200], 0),
        Err(ProgramError::InvalidScale(0))
    ));
    assert!(matches!(
        StepProgram::buffered(3, &[], 1),
        Err(ProgramError::EmptyBuffer)
    ));
    assert!(matches!(
        StepProgram::buffered(3, &[100, 200], 1),
        Err(ProgramError::BufferLengthMismatch { steps: 3, len: 2 })
    ));
    let long = vec![100u32; 300];
    assert!(matches!(
        StepProgram::buffered(300, &long, 1),
        Err(ProgramError::BufferTooLong { len: 300, .. })
    ));
}

/// Test walking a buffered program with a cursor.
#[test]
fn test_cursor_over_buffered_program() {
    let program = StepProgram::buffered(-2, &[50, 300], 2).unwrap();
    assert_eq!(program.direction(), Direction::Backward);
    assert_eq!(program.total_steps(), Some(4));

    let mut cursor = ProgramCursor::new(program, 100);
    let mut delays = vec![cursor.next_delay()];
    while cursor.advance() {
        delays.push(cursor.next_delay());
    }

    assert_eq!(delays, vec![100, 100, 300, 300]);
    assert!(cursor.is_exhausted());
    assert_eq!(cursor.steps_taken(), 4);
}

/// Test that a whirl reports no remaining count.
#[test]
fn test_whirl_has_no_budget() {
    let program = StepProgram::whirl(Direction::Backward, 200, CalibrateMode::StartMinPos);
    assert!(program.is_whirl());
    assert_eq!(program.total_steps(), None);
    assert_eq!(program.calibrate(), CalibrateMode::StartMinPos);

    let mut cursor = ProgramCursor::new(program, 100);
    for _ in 0..1000 {
        assert!(cursor.advance());
    }
    assert_eq!(cursor.remaining(), None);
}
