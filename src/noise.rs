//! Gradient noise lattice used by the Perlin trajectory algorithm.
//!
//! The table is built once from a random source and is immutable afterwards,
//! so it can be shared by reference across rayon workers without locking.

use rand::Rng;
use std::f64::consts::TAU;

use crate::interpolation::{fade, lerp};
use crate::types::Point;

const TABLE_SIZE: usize = 256;
const MASK: i64 = 255;

/// Permutation and gradient tables for 2-D Perlin noise
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseTable {
    /// 0..256 shuffled, then repeated once so `perm[a + b]` never needs wrapping
    perm: [usize; TABLE_SIZE * 2],
    /// Unit vectors at random angles
    gradients: [Point; TABLE_SIZE],
}

impl NoiseTable {
    /// Build a table from the given random source
    ///
    /// The permutation is shuffled first, then the gradient angles are drawn,
    /// so identical seeds produce identical tables.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut perm = [0usize; TABLE_SIZE * 2];
        for (i, slot) in perm.iter_mut().take(TABLE_SIZE).enumerate() {
            *slot = i;
        }

        // Fisher-Yates
        for i in (1..TABLE_SIZE).rev() {
            let j = rng.gen_range(0..=i);
            perm.swap(i, j);
        }

        for i in 0..TABLE_SIZE {
            perm[TABLE_SIZE + i] = perm[i];
        }

        let mut gradients = [Point::ZERO; TABLE_SIZE];
        for gradient in gradients.iter_mut() {
            let angle = rng.gen_range(0.0..TAU);
            *gradient = Point::new(angle.cos(), angle.sin());
        }

        Self { perm, gradients }
    }

    pub fn permutation(&self) -> &[usize] {
        &self.perm
    }

    pub fn gradients(&self) -> &[Point] {
        &self.gradients
    }

    /// Lattice hash: `perm[perm[x & 255] + (y & 255)]`
    ///
    /// The inner sum reaches at most 510, which lands in the duplicated half.
    fn hash(&self, x: i64, y: i64) -> usize {
        let xi = (x & MASK) as usize;
        let yi = (y & MASK) as usize;
        self.perm[self.perm[xi] + yi]
    }

    /// Dot product of the corner gradient with the offset from that corner
    fn corner(&self, x: i64, y: i64, dx: f64, dy: f64) -> f64 {
        let g = self.gradients[self.hash(x, y) % TABLE_SIZE];
        g.x * dx + g.y * dy
    }

    /// Sample 2-D gradient noise at `(x, y)`
    ///
    /// Values are zero at every lattice point and stay roughly within ±0.71.
    /// The lattice repeats every 256 cells on both axes.
    ///
    /// # Arguments
    /// * `x` - Horizontal noise-field coordinate
    /// * `y` - Vertical noise-field coordinate
    ///
    /// # Returns
    /// Noise value, C1-continuous in both coordinates
    pub fn noise2d(&self, x: f64, y: f64) -> f64 {
        let x0f = x.floor();
        let y0f = y.floor();
        // Wrap to the table before stepping to the next corner
        let x0 = (x0f as i64) & MASK;
        let y0 = (y0f as i64) & MASK;

        let xf = x - x0f;
        let yf = y - y0f;

        let u = fade(xf);
        let v = fade(yf);

        let d00 = self.corner(x0, y0, xf, yf);
        let d10 = self.corner(x0 + 1, y0, xf - 1.0, yf);
        let d01 = self.corner(x0, y0 + 1, xf, yf - 1.0);
        let d11 = self.corner(x0 + 1, y0 + 1, xf - 1.0, yf - 1.0);

        lerp(lerp(d00, d10, u), lerp(d01, d11, u), v)
    }
}
