use crate::types::Point;

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Quintic smoothstep (6t⁵ - 15t⁴ + 10t³)
///
/// First and second derivatives are zero at `t = 0` and `t = 1`, which is
/// what keeps gradient noise C1/C2-continuous across lattice cells.
#[inline]
pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Total length of the polyline through `points`
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Position at fractional segment index `pos` along a polyline
///
/// `pos = 0.0` is the first vertex and `pos = len - 1` the last. The segment
/// index is clamped so `pos` at (or past) the end stays on the final segment.
/// Callers must pass at least two points.
pub(crate) fn polyline_position(points: &[Point], pos: f64) -> Point {
    let last_segment = points.len() - 2;
    let segment = (pos.max(0.0) as usize).min(last_segment);
    let local_t = pos - segment as f64;
    points[segment].lerp(points[segment + 1], local_t)
}
