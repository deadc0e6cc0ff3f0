//! Explicit Bernstein-basis Bezier trajectories.

use rand::Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};
use crate::timing;
use crate::types::{Movement, MovementOptions, Point};

/// Below this degree the per-term fan-out costs more than it saves
const PARALLEL_MIN_DEGREE: usize = 4;

/// Control point limit for Bezier curves; every coefficient stays exact in `u128`
pub const MAX_CONTROL_POINTS: usize = 128;

/// Micro-jitter added to every sampled point, relative to the noise level
const MICRO_NOISE: f64 = 0.1;

/// Row `n` of Pascal's triangle, built with the additive recurrence
///
/// Returns `None` if a coefficient does not fit in a `u128` (degree > 130 or so).
pub fn binomial_row(n: usize) -> Option<Vec<u128>> {
    let mut row: Vec<u128> = Vec::with_capacity(n + 1);
    row.push(1);
    for _ in 0..n {
        let mut next = Vec::with_capacity(row.len() + 1);
        next.push(1);
        for pair in row.windows(2) {
            next.push(pair[0].checked_add(pair[1])?);
        }
        next.push(1);
        row = next;
    }
    Some(row)
}

/// Binomial coefficient C(n, k); zero when `k > n`
pub fn binomial(n: usize, k: usize) -> Option<u128> {
    if k > n {
        return Some(0);
    }
    binomial_row(n).map(|row| row[k])
}

/// A Bezier curve with its binomial coefficients computed once
#[derive(Debug, Clone)]
pub struct BezierCurve {
    control_points: Vec<Point>,
    /// C(n, i) for i in 0..=n, as f64 for the basis products
    coefficients: Vec<f64>,
}

impl BezierCurve {
    pub fn new(control_points: Vec<Point>) -> Result<Self> {
        if control_points.len() < 2 {
            return Err(Error::EmptyTrajectory);
        }
        let degree = control_points.len() - 1;
        let row = binomial_row(degree).ok_or_else(|| {
            Error::InvalidConfiguration(format!(
                "{} control points exceed exact binomial coefficient range",
                control_points.len()
            ))
        })?;
        let coefficients = row.into_iter().map(|c| c as f64).collect();
        Ok(Self {
            control_points,
            coefficients,
        })
    }

    pub fn degree(&self) -> usize {
        self.control_points.len() - 1
    }

    pub fn control_points(&self) -> &[Point] {
        &self.control_points
    }

    pub fn into_control_points(self) -> Vec<Point> {
        self.control_points
    }

    /// Point on the curve at `t` in 0.0..=1.0
    ///
    /// Dispatches to the parallel evaluator for degree 4 and above.
    pub fn evaluate(&self, t: f64) -> Point {
        if self.degree() < PARALLEL_MIN_DEGREE {
            self.evaluate_sequential(t)
        } else {
            self.evaluate_parallel(t)
        }
    }

    /// Sum the Bernstein terms in index order
    pub fn evaluate_sequential(&self, t: f64) -> Point {
        let n = self.degree() as i32;
        let mut x = 0.0;
        let mut y = 0.0;
        for (i, (p, coeff)) in self.control_points.iter().zip(&self.coefficients).enumerate() {
            let i = i as i32;
            let basis = coeff * t.powi(i) * (1.0 - t).powi(n - i);
            x += p.x * basis;
            y += p.y * basis;
        }
        Point::new(x, y)
    }

    /// Compute each Bernstein term independently and reduce by summation
    ///
    /// Power tables are built once up front. Terms are computed in parallel,
    /// collected in index order and folded after the join, so the sum does
    /// not depend on how rayon split the work.
    pub fn evaluate_parallel(&self, t: f64) -> Point {
        let n = self.degree();
        let mut t_pow = vec![1.0; n + 1];
        let mut one_minus_t_pow = vec![1.0; n + 1];
        for i in 1..=n {
            t_pow[i] = t_pow[i - 1] * t;
            one_minus_t_pow[i] = one_minus_t_pow[i - 1] * (1.0 - t);
        }

        self.control_points
            .par_iter()
            .zip(self.coefficients.par_iter())
            .enumerate()
            .map(|(i, (p, coeff))| *p * (coeff * t_pow[i] * one_minus_t_pow[n - i]))
            .collect::<Vec<Point>>()
            .into_iter()
            .fold(Point::ZERO, |acc, term| acc + term)
    }
}

/// Evaluate the Bezier curve through `control_points` at `t`
pub fn evaluate(t: f64, control_points: &[Point]) -> Result<Point> {
    Ok(BezierCurve::new(control_points.to_vec())?.evaluate(t))
}

/// Control points on the start/end line, displaced by uniform random jitter
///
/// Offsets are drawn from `rng` in index order before the points are placed,
/// so the result depends only on the random source, not on thread scheduling.
/// Counts above [`MAX_CONTROL_POINTS`] are rejected before anything is drawn.
pub fn generate_control_points<R: Rng + ?Sized>(
    opts: &MovementOptions,
    rng: &mut R,
) -> Result<Vec<Point>> {
    let n = opts.control_points.max(2);
    if n > MAX_CONTROL_POINTS {
        return Err(Error::InvalidConfiguration(format!(
            "Bezier curves support at most {} control points, got {}",
            MAX_CONTROL_POINTS, n
        )));
    }
    let max_offset = opts.jitter_scale();

    let offsets: Vec<Point> = (1..n - 1)
        .map(|_| {
            if max_offset > 0.0 {
                Point::new(
                    rng.gen_range(-max_offset..=max_offset),
                    rng.gen_range(-max_offset..=max_offset),
                )
            } else {
                Point::ZERO
            }
        })
        .collect();

    let start = opts.start_point;
    let end = opts.end_point;
    let interior = offsets.into_par_iter().enumerate().map(|(k, offset)| {
        let progress = (k + 1) as f64 / (n - 1) as f64;
        start.lerp(end, progress) + offset
    });

    let mut points = Vec::with_capacity(n);
    points.push(start);
    points.par_extend(interior);
    points.push(end);
    Ok(points)
}

/// Synthesize a Bezier movement
pub fn generate_movement<R: Rng + ?Sized>(opts: &MovementOptions, rng: &mut R) -> Result<Movement> {
    let opts = opts.normalized()?;

    let curve = BezierCurve::new(generate_control_points(&opts, rng)?)?;
    let num_points = timing::sample_count(curve.control_points(), opts.speed)?;

    debug!(
        control_points = curve.control_points().len(),
        num_points,
        parallel = curve.degree() >= PARALLEL_MIN_DEGREE,
        "Sampling Bezier curve"
    );

    let samples: Vec<Point> = (0..num_points)
        .into_par_iter()
        .map(|i| curve.evaluate(i as f64 / (num_points - 1) as f64))
        .collect();

    let micro_noise = opts.noise_level * MICRO_NOISE;
    let points: Vec<Point> = if micro_noise > 0.0 {
        samples
            .into_iter()
            .map(|p| {
                p + Point::new(
                    rng.gen_range(-micro_noise..=micro_noise),
                    rng.gen_range(-micro_noise..=micro_noise),
                )
            })
            .collect()
    } else {
        samples
    };

    let timing = timing::assign_timing(&points, &opts, rng);
    Ok(Movement::new(points, timing, curve.into_control_points()))
}
