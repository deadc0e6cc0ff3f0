//! Perlin-noise trajectories: noise-displaced control points joined by a
//! lightly perturbed polyline.

use rand::Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};
use crate::interpolation::polyline_position;
use crate::noise::NoiseTable;
use crate::timing;
use crate::types::{Movement, MovementOptions, Point, MAX_CONTROL_POINTS};

/// Noise-field coordinate span covered by the control points
const CONTROL_FREQUENCY: f64 = 4.0;

/// Noise-field step between consecutive samples
const SAMPLE_FREQUENCY: f64 = 0.1;

/// Secondary perturbation relative to the noise level passed to `interpolate_points`
const SAMPLE_NOISE_SCALE: f64 = 0.1;

/// Amplification of the configured noise level before sample perturbation
const SAMPLE_NOISE_GAIN: f64 = 5.0;

/// Perlin trajectory synthesizer owning its immutable noise table
#[derive(Debug, Clone)]
pub struct PerlinSynthesizer {
    table: NoiseTable,
}

impl PerlinSynthesizer {
    pub fn new(table: NoiseTable) -> Self {
        Self { table }
    }

    /// Build the noise table from `rng`
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(NoiseTable::new(rng))
    }

    pub fn table(&self) -> &NoiseTable {
        &self.table
    }

    /// Control points displaced by the noise field along the start/end line
    ///
    /// Fails with `InvalidConfiguration` above [`MAX_CONTROL_POINTS`].
    pub fn generate_control_points(&self, opts: &MovementOptions) -> Result<Vec<Point>> {
        let n = opts.control_points.max(2);
        if n > MAX_CONTROL_POINTS {
            return Err(Error::InvalidConfiguration(format!(
                "at most {} control points are supported, got {}",
                MAX_CONTROL_POINTS, n
            )));
        }
        let scale = opts.jitter_scale();
        let start = opts.start_point;
        let end = opts.end_point;

        let interior = (1..n - 1).into_par_iter().map(|i| {
            let progress = i as f64 / (n - 1) as f64;
            let t = progress * CONTROL_FREQUENCY;
            let offset = Point::new(self.table.noise2d(t, 0.0), self.table.noise2d(t, 1.0)) * scale;
            start.lerp(end, progress) + offset
        });

        let mut points = Vec::with_capacity(n);
        points.push(start);
        points.par_extend(interior);
        points.push(end);
        Ok(points)
    }

    /// Sample `num_points` positions along the control polyline
    ///
    /// Each sample is the linear interpolation between its bracketing control
    /// points plus `noise2d(i * 0.1, axis) * noise_level * 0.1`, which keeps
    /// the path from looking piecewise-straight.
    ///
    /// # Arguments
    /// * `control_points` - Polyline vertices, at least 2
    /// * `num_points` - Number of samples to produce, at least 2
    /// * `noise_level` - Perturbation strength; 0.0 follows the polyline exactly
    ///
    /// # Returns
    /// Exactly `num_points` positions, or `EmptyTrajectory` when either count is below 2
    pub fn interpolate_points(
        &self,
        control_points: &[Point],
        num_points: usize,
        noise_level: f64,
    ) -> Result<Vec<Point>> {
        if control_points.len() < 2 || num_points < 2 {
            return Err(Error::EmptyTrajectory);
        }

        let segment_size = (control_points.len() - 1) as f64 / (num_points - 1) as f64;
        let noise_scale = noise_level * SAMPLE_NOISE_SCALE;

        Ok((0..num_points)
            .into_par_iter()
            .map(|i| {
                let base = polyline_position(control_points, i as f64 * segment_size);
                let s = i as f64 * SAMPLE_FREQUENCY;
                let noise = Point::new(self.table.noise2d(s, 0.0), self.table.noise2d(s, 1.0));
                base + noise * noise_scale
            })
            .collect())
    }

    /// Synthesize a Perlin movement
    pub fn generate_movement<R: Rng + ?Sized>(
        &self,
        opts: &MovementOptions,
        rng: &mut R,
    ) -> Result<Movement> {
        let opts = opts.normalized()?;

        let control_points = self.generate_control_points(&opts)?;
        let num_points = timing::sample_count(&control_points, opts.speed)?;

        debug!(
            control_points = control_points.len(),
            num_points,
            "Interpolating Perlin path"
        );

        let points = self.interpolate_points(
            &control_points,
            num_points,
            opts.noise_level * SAMPLE_NOISE_GAIN,
        )?;
        let timing = timing::assign_timing(&points, &opts, rng);
        Ok(Movement::new(points, timing, control_points))
    }
}
