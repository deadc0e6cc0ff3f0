//! mimic: human-like pointer trajectory synthesis
//!
//! Generates a time-stamped path between two screen points that looks like a
//! hand-driven pointer drag rather than a straight robotic line:
//! - Bezier curves through randomly jittered control points
//! - Perlin-noise displaced polylines
//! - Distance-based timing with random inflation
//! - Hesitation and acceleration post-processing
//!
//! # Example
//! ```
//! use mimic::{Algorithm, MovementOptions, Point, TrajectoryGenerator};
//! use std::time::Duration;
//!
//! let mut generator = TrajectoryGenerator::with_seed(Algorithm::Bezier, 7);
//! let opts = MovementOptions::new(Point::new(0.0, 0.0), Point::new(1920.0, 1080.0))
//!     .with_noise_level(0.3)
//!     .with_control_points(6);
//!
//! generator.generate_movement(&opts).unwrap();
//! generator.add_hesitation(0.1, Duration::from_millis(100)).unwrap();
//! let movement = generator.add_acceleration(0.8, 1.2).unwrap();
//! assert_eq!(movement.points.len(), movement.timing.len());
//! ```

pub mod bezier;
pub mod effects;
pub mod error;
mod interpolation;
pub mod noise;
pub mod perlin;
pub mod timing;
pub mod types;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub use bezier::BezierCurve;
pub use error::{Error, Result};
pub use interpolation::{fade, lerp, polyline_length};
pub use noise::NoiseTable;
pub use perlin::PerlinSynthesizer;
pub use types::{EffectKind, Movement, MovementOptions, Point};

/// Trajectory algorithm selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Bezier curve through uniformly jittered control points
    Bezier,
    /// Polyline through noise-displaced control points
    Perlin,
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "bezier" | "bézier" => Ok(Algorithm::Bezier),
            "perlin" => Ok(Algorithm::Perlin),
            _ => Err(Error::UnsupportedAlgorithm(name.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Bezier => write!(f, "bezier"),
            Algorithm::Perlin => write!(f, "perlin"),
        }
    }
}

/// Per-algorithm synthesis state, fixed at construction
#[derive(Debug, Clone)]
enum Synthesizer {
    Bezier,
    Perlin(PerlinSynthesizer),
}

/// Generates movements with one algorithm and post-processes the latest one
///
/// All randomness comes from a single ChaCha8 stream owned by the generator,
/// so two generators built with the same algorithm and seed produce identical
/// movements for identical calls.
#[derive(Debug, Clone)]
pub struct TrajectoryGenerator {
    synthesizer: Synthesizer,
    rng: ChaCha8Rng,
    movement: Option<Movement>,
}

impl TrajectoryGenerator {
    /// Create a generator seeded from system entropy
    pub fn new(algorithm: Algorithm) -> Self {
        Self::with_rng(algorithm, ChaCha8Rng::from_entropy())
    }

    /// Create a reproducible generator
    pub fn with_seed(algorithm: Algorithm, seed: u64) -> Self {
        Self::with_rng(algorithm, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Create a generator from an algorithm name such as `"bezier"` or `"perlin"`
    pub fn from_name(name: &str) -> Result<Self> {
        Ok(Self::new(name.parse()?))
    }

    fn with_rng(algorithm: Algorithm, mut rng: ChaCha8Rng) -> Self {
        // Perlin's noise table is the first thing drawn from the stream
        let synthesizer = match algorithm {
            Algorithm::Bezier => Synthesizer::Bezier,
            Algorithm::Perlin => Synthesizer::Perlin(PerlinSynthesizer::from_rng(&mut rng)),
        };
        Self {
            synthesizer,
            rng,
            movement: None,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self.synthesizer {
            Synthesizer::Bezier => Algorithm::Bezier,
            Synthesizer::Perlin(_) => Algorithm::Perlin,
        }
    }

    /// Noise table used by the Perlin algorithm (`None` for Bezier)
    pub fn noise_table(&self) -> Option<&NoiseTable> {
        match &self.synthesizer {
            Synthesizer::Bezier => None,
            Synthesizer::Perlin(perlin) => Some(perlin.table()),
        }
    }

    /// Synthesize a new movement, replacing the previous one
    pub fn generate_movement(&mut self, opts: &MovementOptions) -> Result<&Movement> {
        let movement = match &self.synthesizer {
            Synthesizer::Bezier => bezier::generate_movement(opts, &mut self.rng)?,
            Synthesizer::Perlin(perlin) => perlin.generate_movement(opts, &mut self.rng)?,
        };
        debug!(
            algorithm = %self.algorithm(),
            points = movement.len(),
            duration = ?movement.total_duration(),
            "Generated movement"
        );
        Ok(&*self.movement.insert(movement))
    }

    /// Add random pauses to the latest movement
    ///
    /// Oversized pauses saturate at `Duration::MAX`. See
    /// [`effects::apply_hesitation`]. Fails with
    /// [`Error::EmptyTrajectory`] if nothing has been generated yet.
    pub fn add_hesitation(&mut self, probability: f64, max_pause: Duration) -> Result<&Movement> {
        let movement = self.movement.as_mut().ok_or(Error::EmptyTrajectory)?;
        effects::apply_hesitation(movement, probability, max_pause, &mut self.rng);
        Ok(&*movement)
    }

    /// Reshape the latest movement's timing from `start_factor` to `end_factor`
    ///
    /// The factors are relative: each entry is multiplied by its own
    /// interpolated factor, so `(1.0, 1.0)` leaves timing unchanged and
    /// `(2.0, 2.0)` doubles every entry. They are not multiples of the total
    /// duration.
    ///
    /// See [`effects::apply_acceleration`]. Fails with
    /// [`Error::EmptyTrajectory`] if nothing has been generated yet.
    pub fn add_acceleration(&mut self, start_factor: f64, end_factor: f64) -> Result<&Movement> {
        let movement = self.movement.as_mut().ok_or(Error::EmptyTrajectory)?;
        effects::apply_acceleration(movement, start_factor, end_factor)?;
        Ok(&*movement)
    }

    /// The latest generated movement
    pub fn movement(&self) -> Option<&Movement> {
        self.movement.as_ref()
    }

    /// Take ownership of the latest movement, leaving the generator empty
    pub fn take_movement(&mut self) -> Option<Movement> {
        self.movement.take()
    }
}
