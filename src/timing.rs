//! Converts sampled geometry into elapsed time.

use rand::Rng;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::interpolation::polyline_length;
use crate::types::{MovementOptions, Point};

/// Nominal sampling rate at the configured speed
pub const SAMPLES_PER_SECOND: f64 = 60.0;

/// Hard cap on samples per movement
pub const MAX_SAMPLES: usize = 1 << 20;

/// Number of samples for a path through `control_points` at `speed` px/s
///
/// `floor(length / speed * 60) + 1`, at least 2. The control polygon length
/// stands in for the (unknown) curve length.
///
/// # Arguments
/// * `control_points` - Control polygon of the path
/// * `speed` - Pointer speed in pixels per second, must be positive
///
/// # Returns
/// Sample count, or `InvalidConfiguration` for a bad speed or more than
/// [`MAX_SAMPLES`] samples
pub fn sample_count(control_points: &[Point], speed: f64) -> Result<usize> {
    if !speed.is_finite() || speed <= 0.0 {
        return Err(Error::InvalidConfiguration(format!(
            "speed must be positive, got {}",
            speed
        )));
    }
    let total_distance = polyline_length(control_points);
    let estimate = (total_distance / speed * SAMPLES_PER_SECOND).floor() + 1.0;
    if !estimate.is_finite() || estimate > MAX_SAMPLES as f64 {
        return Err(Error::InvalidConfiguration(format!(
            "path of {:.1}px at {} px/s needs more than {} samples",
            total_distance, speed, MAX_SAMPLES
        )));
    }
    Ok((estimate as usize).max(2))
}

/// Cumulative elapsed time at which each point is reached
///
/// Each segment (from the previous point, or the start point for the first
/// sample) takes `distance / speed` seconds, inflated by a random factor in
/// `[0, timing_jitter)`. Jitter draws happen in sample order.
///
/// # Arguments
/// * `points` - Sampled positions, in path order
/// * `opts` - Normalized options; supplies `start_point`, `speed` and `timing_jitter`
/// * `rng` - Source of the per-segment jitter
///
/// # Returns
/// One elapsed time per point, non-decreasing
pub fn assign_timing<R: Rng + ?Sized>(
    points: &[Point],
    opts: &MovementOptions,
    rng: &mut R,
) -> Vec<Duration> {
    let mut elapsed = 0.0;
    let mut prev = opts.start_point;

    points
        .iter()
        .map(|&point| {
            let base = prev.distance(point) / opts.speed;
            let jitter = if opts.timing_jitter > 0.0 {
                rng.gen_range(0.0..opts.timing_jitter)
            } else {
                0.0
            };
            elapsed += base * (1.0 + jitter);
            prev = point;
            Duration::from_secs_f64(elapsed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn sample_count_from_length() {
        let cps = [Point::new(0.0, 0.0), Point::new(1000.0, 0.0)];
        // 1000px at 1000px/s = 1s -> 60 samples + 1
        assert_eq!(sample_count(&cps, 1000.0).unwrap(), 61);
        assert_eq!(sample_count(&cps, 2000.0).unwrap(), 31);
    }

    #[test]
    fn sample_count_minimum() {
        let cps = [Point::new(5.0, 5.0), Point::new(5.0, 5.0)];
        assert_eq!(sample_count(&cps, 1000.0).unwrap(), 2);
    }

    #[test]
    fn sample_count_rejects_bad_speed() {
        let cps = [Point::ZERO, Point::new(10.0, 0.0)];
        assert!(matches!(sample_count(&cps, 0.0), Err(Error::InvalidConfiguration(_))));
        assert!(matches!(sample_count(&cps, -1.0), Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn sample_count_caps_allocation() {
        let cps = [Point::ZERO, Point::new(1e9, 0.0)];
        assert!(matches!(sample_count(&cps, 1e-3), Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn timing_without_jitter_is_distance_over_speed() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let opts = MovementOptions::new(Point::ZERO, Point::new(300.0, 400.0))
            .with_speed(500.0)
            .with_timing_jitter(0.0);
        let points = [Point::new(30.0, 40.0), Point::new(300.0, 400.0)];
        let timing = assign_timing(&points, &opts, &mut rng);
        assert!((timing[0].as_secs_f64() - 0.1).abs() < 1e-9);
        assert!((timing[1].as_secs_f64() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn timing_jitter_only_inflates() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let opts = MovementOptions::new(Point::ZERO, Point::new(1000.0, 0.0))
            .with_speed(1000.0)
            .with_timing_jitter(0.1);
        let points: Vec<Point> = (1..=100).map(|i| Point::new(i as f64 * 10.0, 0.0)).collect();
        let timing = assign_timing(&points, &opts, &mut rng);

        assert!(timing.windows(2).all(|w| w[0] <= w[1]));
        let total = timing.last().unwrap().as_secs_f64();
        assert!(total >= 1.0 - 1e-9);
        assert!(total <= 1.1 + 1e-9);
    }

    #[test]
    fn first_sample_measured_from_start() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let opts = MovementOptions::new(Point::ZERO, Point::new(10.0, 0.0)).with_timing_jitter(0.0);
        let timing = assign_timing(&[Point::ZERO, Point::new(10.0, 0.0)], &opts, &mut rng);
        assert_eq!(timing[0], Duration::ZERO);
        assert!(timing[1] > Duration::ZERO);
    }
}
