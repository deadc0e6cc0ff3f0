//! Core value types shared by every trajectory algorithm.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};
use std::time::Duration;

use crate::error::{Error, Result};

/// Upper bound on `MovementOptions::control_points` for any algorithm
///
/// Bezier curves have a tighter limit, see [`crate::bezier::MAX_CONTROL_POINTS`].
pub const MAX_CONTROL_POINTS: usize = 4096;

/// A position in screen space (pixels)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation towards `other` (`t = 0` is `self`, `t = 1` is `other`)
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
        }
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Post-processing effect applied to a movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Hesitate,
    Accelerate,
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectKind::Hesitate => write!(f, "hesitate"),
            EffectKind::Accelerate => write!(f, "accelerate"),
        }
    }
}

/// Parameters for a single synthesized movement
///
/// Every field has a default, so a partial document (e.g. TOML with only
/// `start_point` and `end_point`) deserializes into a usable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementOptions {
    #[serde(default)]
    pub start_point: Point,
    #[serde(default)]
    pub end_point: Point,
    /// Amount of randomness, clamped to 0.0..=1.0
    #[serde(default = "default_noise_level")]
    pub noise_level: f64,
    /// Screen bounds; only used to scale the control point jitter
    #[serde(default = "default_resolution")]
    pub resolution: Point,
    /// Number of control points including both endpoints (min 2)
    #[serde(default = "default_control_points")]
    pub control_points: usize,
    /// Movement speed in pixels per second
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Upper bound of the random per-segment timing inflation (0.1 = up to +10%)
    #[serde(default = "default_timing_jitter")]
    pub timing_jitter: f64,
}

fn default_noise_level() -> f64 {
    0.1
}

fn default_resolution() -> Point {
    Point::new(1920.0, 1080.0)
}

fn default_control_points() -> usize {
    4
}

fn default_speed() -> f64 {
    1000.0
}

fn default_timing_jitter() -> f64 {
    0.1
}

impl Default for MovementOptions {
    fn default() -> Self {
        Self {
            start_point: Point::ZERO,
            end_point: Point::ZERO,
            noise_level: default_noise_level(),
            resolution: default_resolution(),
            control_points: default_control_points(),
            speed: default_speed(),
            timing_jitter: default_timing_jitter(),
        }
    }
}

impl MovementOptions {
    /// Options for a movement from `start` to `end` with default tuning
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start_point: start,
            end_point: end,
            ..Self::default()
        }
    }

    pub fn with_noise_level(mut self, noise_level: f64) -> Self {
        self.noise_level = noise_level;
        self
    }

    pub fn with_resolution(mut self, width: f64, height: f64) -> Self {
        self.resolution = Point::new(width, height);
        self
    }

    pub fn with_control_points(mut self, control_points: usize) -> Self {
        self.control_points = control_points;
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_timing_jitter(mut self, timing_jitter: f64) -> Self {
        self.timing_jitter = timing_jitter;
        self
    }

    /// Reject options that cannot produce a meaningful trajectory
    pub fn validate(&self) -> Result<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "speed must be a positive number of pixels per second, got {}",
                self.speed
            )));
        }
        if !self.resolution.is_finite() || self.resolution.x < 0.0 || self.resolution.y < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "resolution must be non-negative, got {}",
                self.resolution
            )));
        }
        if !self.start_point.is_finite() || !self.end_point.is_finite() {
            return Err(Error::InvalidConfiguration(
                "start and end points must be finite".to_string(),
            ));
        }
        if self.control_points > MAX_CONTROL_POINTS {
            return Err(Error::InvalidConfiguration(format!(
                "at most {} control points are supported, got {}",
                MAX_CONTROL_POINTS, self.control_points
            )));
        }
        if self.noise_level.is_nan() || self.timing_jitter.is_nan() {
            return Err(Error::InvalidConfiguration(
                "noise_level and timing_jitter must be numbers".to_string(),
            ));
        }
        Ok(())
    }

    /// Validated copy with `control_points >= 2` and noise/jitter clamped to 0.0..=1.0
    pub fn normalized(&self) -> Result<Self> {
        self.validate()?;
        Ok(Self {
            control_points: self.control_points.max(2),
            noise_level: self.noise_level.clamp(0.0, 1.0),
            timing_jitter: self.timing_jitter.clamp(0.0, 1.0),
            ..self.clone()
        })
    }

    /// Magnitude of the control point jitter in pixels
    pub(crate) fn jitter_scale(&self) -> f64 {
        self.resolution.x.min(self.resolution.y) * self.noise_level
    }
}

/// A synthesized trajectory
///
/// `timing[i]` is the elapsed time since the start of the movement at which
/// `points[i]` is reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub points: Vec<Point>,
    pub timing: Vec<Duration>,
    pub control_points: Vec<Point>,
    /// Post-processing effects applied so far, in order
    #[serde(default)]
    pub effects: Vec<EffectKind>,
}

impl Movement {
    pub(crate) fn new(points: Vec<Point>, timing: Vec<Duration>, control_points: Vec<Point>) -> Self {
        debug_assert_eq!(points.len(), timing.len());
        Self {
            points,
            timing,
            control_points,
            effects: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Elapsed time at the final sample
    pub fn total_duration(&self) -> Duration {
        self.timing.last().copied().unwrap_or_default()
    }

    /// Time spent reaching each point from the previous one
    ///
    /// The first entry is the time from the start point to `points[0]`.
    /// Entries saturate at zero if the timing was reshaped into a
    /// non-monotonic sequence.
    pub fn segment_durations(&self) -> Vec<Duration> {
        let mut prev = Duration::ZERO;
        self.timing
            .iter()
            .map(|&t| {
                let delta = t.saturating_sub(prev);
                prev = t;
                delta
            })
            .collect()
    }

    /// Iterate over `(point, elapsed)` pairs
    pub fn samples(&self) -> impl Iterator<Item = (Point, Duration)> + '_ {
        self.points.iter().copied().zip(self.timing.iter().copied())
    }
}
