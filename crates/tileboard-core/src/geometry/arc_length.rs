//! Arc-length reparameterization for cubic Bézier curves.
//!
//! Text laid along a curve needs glyphs spaced evenly by distance travelled,
//! not by the curve parameter. These maps precompute a sampled cumulative-length
//! table so length/parameter conversion is a binary search plus a lerp.

use kurbo::{CubicBez, ParamCurve, ParamCurveDeriv, Point, Vec2};

/// Number of polyline samples used to approximate a segment's length.
pub const ARC_SAMPLES: usize = 40;

/// Cumulative arc-length table for a single cubic Bézier segment.
///
/// Invariant: the length table is monotonic non-decreasing.
#[derive(Debug, Clone)]
pub struct ArcLengthMap {
    curve: CubicBez,
    /// `lengths[i]` is the approximate arc length from t=0 to t=i/samples.
    lengths: Vec<f64>,
}

impl ArcLengthMap {
    /// Build a map with the default sample density.
    pub fn new(curve: CubicBez) -> Self {
        Self::with_samples(curve, ARC_SAMPLES)
    }

    /// Build a map with an explicit sample count (minimum one).
    pub fn with_samples(curve: CubicBez, samples: usize) -> Self {
        let samples = samples.max(1);
        let mut lengths = Vec::with_capacity(samples + 1);
        lengths.push(0.0);
        let mut total = 0.0;
        let mut prev = curve.eval(0.0);
        for i in 1..=samples {
            let t = i as f64 / samples as f64;
            let p = curve.eval(t);
            total += prev.distance(p);
            lengths.push(total);
            prev = p;
        }
        Self { curve, lengths }
    }

    /// Total approximated arc length of the segment.
    pub fn total_length(&self) -> f64 {
        *self.lengths.last().unwrap_or(&0.0)
    }

    /// Arc length from the start of the curve to parameter `t`.
    pub fn length_at(&self, t: f64) -> f64 {
        let samples = self.lengths.len() - 1;
        let scaled = t.clamp(0.0, 1.0) * samples as f64;
        let idx = (scaled.floor() as usize).min(samples - 1);
        let frac = scaled - idx as f64;
        self.lengths[idx] + (self.lengths[idx + 1] - self.lengths[idx]) * frac
    }

    /// Curve parameter at which the given arc length is reached.
    pub fn param_at_length(&self, length: f64) -> f64 {
        if length <= 0.0 {
            return 0.0;
        }
        if length >= self.total_length() {
            return 1.0;
        }
        let samples = self.lengths.len() - 1;
        // The table is monotonic, so the first sample past the target bounds
        // the interpolation interval.
        let hi = self.lengths.partition_point(|&l| l < length).max(1);
        let lo = hi - 1;
        let span = self.lengths[hi] - self.lengths[lo];
        let frac = if span > f64::EPSILON {
            (length - self.lengths[lo]) / span
        } else {
            0.0
        };
        (lo as f64 + frac) / samples as f64
    }

    /// Point on the curve at parameter `t`.
    pub fn point_at(&self, t: f64) -> Point {
        self.curve.eval(t)
    }

    /// Tangent vector of the curve at parameter `t`.
    pub fn tangent_at(&self, t: f64) -> Vec2 {
        self.curve.deriv().eval(t).to_vec2()
    }

    #[cfg(test)]
    pub(crate) fn lengths(&self) -> &[f64] {
        &self.lengths
    }
}

/// Cumulative arc-length table over an ordered sequence of Bézier segments.
#[derive(Debug, Clone)]
pub struct SplineArcLengthMap {
    segments: Vec<ArcLengthMap>,
    /// `offsets[i]` is the arc length from the spline start to segment i.
    offsets: Vec<f64>,
    total: f64,
}

impl SplineArcLengthMap {
    pub fn new(curves: &[CubicBez]) -> Self {
        let segments: Vec<ArcLengthMap> = curves.iter().map(|&c| ArcLengthMap::new(c)).collect();
        let mut offsets = Vec::with_capacity(segments.len());
        let mut total = 0.0;
        for segment in &segments {
            offsets.push(total);
            total += segment.total_length();
        }
        Self {
            segments,
            offsets,
            total,
        }
    }

    pub fn total_length(&self) -> f64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Resolve a global arc length to a segment index and local parameter.
    pub fn param_at_length(&self, length: f64) -> Option<(usize, f64)> {
        if self.segments.is_empty() {
            return None;
        }
        let length = length.clamp(0.0, self.total);
        let idx = self
            .offsets
            .partition_point(|&o| o <= length)
            .saturating_sub(1)
            .min(self.segments.len() - 1);
        let local = length - self.offsets[idx];
        Some((idx, self.segments[idx].param_at_length(local)))
    }

    /// Point on the spline at the given global arc length.
    pub fn point_at_length(&self, length: f64) -> Option<Point> {
        self.param_at_length(length)
            .map(|(i, t)| self.segments[i].point_at(t))
    }

    /// Tangent of the spline at the given global arc length.
    pub fn tangent_at_length(&self, length: f64) -> Option<Vec2> {
        self.param_at_length(length)
            .map(|(i, t)| self.segments[i].tangent_at(t))
    }
}

/// Placement of one glyph along a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    /// Glyph anchor position on the curve.
    pub position: Point,
    /// Baseline angle in radians (curve tangent direction).
    pub angle: f64,
}

/// Place `count` glyphs at even arc-length intervals along the spline.
///
/// The first glyph sits at the curve start and the last at the curve end; a
/// single glyph is centered.
pub fn place_along(map: &SplineArcLengthMap, count: usize) -> Vec<GlyphPlacement> {
    if count == 0 || map.is_empty() {
        return Vec::new();
    }
    let total = map.total_length();
    (0..count)
        .filter_map(|i| {
            let length = if count == 1 {
                total / 2.0
            } else {
                total * i as f64 / (count - 1) as f64
            };
            let position = map.point_at_length(length)?;
            let tangent = map.tangent_at_length(length)?;
            Some(GlyphPlacement {
                position,
                angle: tangent.y.atan2(tangent.x),
            })
        })
        .collect()
}
