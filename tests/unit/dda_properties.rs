//! Property tests for the two-axis step distribution.

use proptest::prelude::*;
use stepper_cycle::planner::{dda_curve, dda_tick, secondary_program, Bresenham};
use stepper_cycle::{CurveContext, StepProgram};

proptest! {
    /// The secondary axis takes exactly `b` steps spread over `a`.
    #[test]
    fn gaps_sum_to_reference(a in 1u32..2000, ratio in 0.0f64..=1.0) {
        let b = ((a as f64) * ratio) as u32;
        let gaps: Vec<u32> = Bresenham::new(a, b).collect();

        prop_assert_eq!(gaps.len() as u32, b);
        prop_assert!(gaps.iter().sum::<u32>() <= a);
        if b > 0 {
            // The last secondary step lands on the last reference step
            prop_assert_eq!(gaps.iter().sum::<u32>(), a);
            let widest = (a + b - 1) / b;
            prop_assert!(gaps.iter().all(|&g| g >= a / b && g <= widest));
        }
    }

    /// Step `n` of the iterator fires on reference step `dda_tick(n)`.
    #[test]
    fn iterator_matches_closed_form(a in 1u32..1000, b in 1u32..1000) {
        let b = b.min(a);
        let mut at = 0u64;
        for (n, gap) in Bresenham::new(a, b).enumerate() {
            at += u64::from(gap);
            prop_assert_eq!(at, dda_tick(n as u32 + 1, a, b));
        }
    }

    /// The curve fallback yields the same delays as the buffer.
    #[test]
    fn curve_matches_buffer(a in 1u32..600, b in 1u32..256, delay in 1u32..5000) {
        let b = b.min(a);
        let program = secondary_program(b as i32, a, delay).unwrap();
        let context = CurveContext::with_ints([a, b, delay, 0]);

        prop_assert_eq!(program.total_steps(), Some(b));
        for i in 0..b {
            prop_assert_eq!(program.delay_at(i), dda_curve(i, &context));
        }
    }
}

#[test]
fn test_long_secondary_uses_curve() {
    let program = secondary_program(-300, 1000, 120).unwrap();
    assert!(matches!(program, StepProgram::Curved { .. }));
    assert_eq!(program.total_steps(), Some(300));
}

#[test]
fn test_secondary_cannot_outrun_reference() {
    assert!(secondary_program(11, 10, 100).is_err());
}

#[test]
fn test_known_distribution() {
    let gaps: Vec<u32> = Bresenham::new(10, 3).collect();
    assert_eq!(gaps, vec![4, 3, 3]);
}
