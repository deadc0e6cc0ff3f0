//! Timing post-processors applied to an already generated movement.
//!
//! Both take the movement by `&mut` and rewrite `timing` in place; points and
//! control points are never touched.

use rand::Rng;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::interpolation::lerp;
use crate::types::{EffectKind, Movement};

/// Insert random pauses at interior samples
///
/// Each interior sample independently pauses with `probability` (clamped to
/// 0.0..=1.0) for a uniform random time below `max_pause`. A pause delays
/// that sample and every later one, so timing never decreases and stays
/// non-decreasing. Returns the total pause added.
///
/// Timing saturates at `Duration::MAX`, so oversized pauses clamp instead
/// of overflowing.
///
/// # Panics
/// If the movement has fewer than 2 timing entries.
pub fn apply_hesitation<R: Rng + ?Sized>(
    movement: &mut Movement,
    probability: f64,
    max_pause: Duration,
    rng: &mut R,
) -> Duration {
    let len = movement.timing.len();
    assert!(len >= 2, "hesitation needs a generated movement (got {} samples)", len);

    let probability = if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    };
    let max_pause_secs = max_pause.as_secs_f64();

    let mut shift = Duration::ZERO;
    let mut pauses = 0usize;
    for i in 1..len {
        if i < len - 1 && rng.gen_bool(probability) {
            let pause = if max_pause_secs > 0.0 {
                Duration::try_from_secs_f64(rng.gen_range(0.0..max_pause_secs))
                    .map_or(max_pause, |pause| pause.min(max_pause))
            } else {
                Duration::ZERO
            };
            shift = shift.saturating_add(pause);
            pauses += 1;
        }
        movement.timing[i] = movement.timing[i].saturating_add(shift);
    }

    movement.effects.push(EffectKind::Hesitate);
    debug!(
        effect = %EffectKind::Hesitate,
        pauses,
        added = ?shift,
        "Applied hesitation"
    );
    shift
}

/// Reshape timing with a speed factor interpolated from start to end
///
/// For sample `i`, `factor = lerp(start_factor, end_factor, i / (len - 1))`
/// and the sample's elapsed time becomes `timing[i] * factor`. Each entry is
/// rewritten independently, so the result is only guaranteed non-decreasing
/// when `end_factor >= start_factor`.
///
/// # Panics
/// If the movement has fewer than 2 timing entries.
pub fn apply_acceleration(
    movement: &mut Movement,
    start_factor: f64,
    end_factor: f64,
) -> Result<()> {
    let len = movement.timing.len();
    assert!(len >= 2, "acceleration needs a generated movement (got {} samples)", len);

    for factor in [start_factor, end_factor] {
        if !factor.is_finite() || factor < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "speed factors must be finite and non-negative, got {}",
                factor
            )));
        }
    }

    let last = (len - 1) as f64;
    for (i, t) in movement.timing.iter_mut().enumerate() {
        let factor = lerp(start_factor, end_factor, i as f64 / last);
        // Scale whole nanoseconds so a factor of 1.0 round-trips exactly
        *t = Duration::from_nanos((t.as_nanos() as f64 * factor).round() as u64);
    }

    if end_factor < start_factor {
        warn!(
            start_factor,
            end_factor, "Decelerating factors may reorder sample timing"
        );
    }

    movement.effects.push(EffectKind::Accelerate);
    debug!(
        effect = %EffectKind::Accelerate,
        start_factor,
        end_factor,
        total = ?movement.total_duration(),
        "Applied acceleration"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn linear_movement(n: usize) -> Movement {
        let points: Vec<Point> = (0..n).map(|i| Point::new(i as f64, 0.0)).collect();
        let timing = (0..n).map(|i| Duration::from_millis(10 * i as u64)).collect();
        Movement::new(points, timing, vec![Point::ZERO, Point::new(n as f64, 0.0)])
    }

    #[test]
    fn hesitation_never_decreases() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let original = linear_movement(200);
        let mut movement = original.clone();
        apply_hesitation(&mut movement, 0.3, Duration::from_millis(100), &mut rng);

        for (before, after) in original.timing.iter().zip(&movement.timing) {
            assert!(after >= before);
        }
        assert!(movement.timing.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(movement.effects, vec![EffectKind::Hesitate]);
    }

    #[test]
    fn hesitation_shift_is_cumulative() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let original = linear_movement(50);
        let mut movement = original.clone();
        let added = apply_hesitation(&mut movement, 1.0, Duration::from_millis(20), &mut rng);

        assert_eq!(movement.timing[0], original.timing[0]);
        assert_eq!(
            *movement.timing.last().unwrap(),
            *original.timing.last().unwrap() + added
        );
        // Every interior sample paused, so the shift never shrinks
        let shifts: Vec<Duration> = original
            .timing
            .iter()
            .zip(&movement.timing)
            .map(|(b, a)| *a - *b)
            .collect();
        assert!(shifts.windows(2).all(|w| w[0] <= w[1]));
        assert!(added <= Duration::from_millis(20 * 48));
    }

    #[test]
    fn hesitation_zero_probability_is_noop() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let original = linear_movement(30);
        let mut movement = original.clone();
        let added = apply_hesitation(&mut movement, 0.0, Duration::from_secs(1), &mut rng);
        assert_eq!(added, Duration::ZERO);
        assert_eq!(movement.timing, original.timing);
    }

    #[test]
    fn hesitation_skips_endpoints() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let original = linear_movement(2);
        let mut movement = original.clone();
        let added = apply_hesitation(&mut movement, 1.0, Duration::from_secs(1), &mut rng);
        assert_eq!(added, Duration::ZERO);
        assert_eq!(movement.timing, original.timing);
    }

    #[test]
    fn hesitation_saturates_huge_pauses() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let original = linear_movement(20);
        let mut movement = original.clone();
        let added = apply_hesitation(&mut movement, 1.0, Duration::MAX, &mut rng);

        assert!(added > Duration::ZERO);
        assert_eq!(movement.timing[0], original.timing[0]);
        assert!(movement.timing.windows(2).all(|w| w[0] <= w[1]));
        for (before, after) in original.timing.iter().zip(&movement.timing) {
            assert!(after >= before);
        }
        assert_eq!(*movement.timing.last().unwrap(), Duration::MAX);
    }

    #[test]
    #[should_panic(expected = "hesitation needs a generated movement")]
    fn hesitation_requires_two_samples() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut movement = Movement::new(vec![Point::ZERO], vec![Duration::ZERO], vec![]);
        apply_hesitation(&mut movement, 0.5, Duration::from_millis(10), &mut rng);
    }

    #[test]
    fn acceleration_identity() {
        let original = linear_movement(40);
        let mut movement = original.clone();
        apply_acceleration(&mut movement, 1.0, 1.0).unwrap();
        assert_eq!(movement.timing, original.timing);
        assert_eq!(movement.effects, vec![EffectKind::Accelerate]);
    }

    #[test]
    fn acceleration_scales_by_interpolated_factor() {
        let original = linear_movement(11);
        let mut movement = original.clone();
        apply_acceleration(&mut movement, 0.8, 1.2).unwrap();

        for (i, (before, after)) in original.timing.iter().zip(&movement.timing).enumerate() {
            let factor = 0.8 + 0.4 * i as f64 / 10.0;
            let expected = before.as_secs_f64() * factor;
            assert!((after.as_secs_f64() - expected).abs() < 1e-9);
        }
        assert!(movement.timing.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn strong_deceleration_can_reorder() {
        let mut movement = linear_movement(11);
        apply_acceleration(&mut movement, 2.0, 0.0).unwrap();
        assert_eq!(*movement.timing.last().unwrap(), Duration::ZERO);
        assert!(movement.timing.windows(2).any(|w| w[0] > w[1]));
    }

    #[test]
    fn acceleration_rejects_bad_factors() {
        let mut movement = linear_movement(5);
        for (s, e) in [(-1.0, 1.0), (1.0, f64::NAN), (f64::INFINITY, 1.0)] {
            assert!(matches!(
                apply_acceleration(&mut movement, s, e),
                Err(Error::InvalidConfiguration(_))
            ));
        }
        assert!(movement.effects.is_empty());
    }

    #[test]
    #[should_panic(expected = "acceleration needs a generated movement")]
    fn acceleration_requires_two_samples() {
        let mut movement = Movement::new(vec![], vec![], vec![]);
        let _ = apply_acceleration(&mut movement, 1.0, 1.0);
    }
}
