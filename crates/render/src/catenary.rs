//! Catenary sampling with arc-length stepping.
//!
//! Curves live in a local frame: the near anchor sits at the origin, +X points
//! horizontally toward the far anchor, +Y is up and Z is always zero. Use
//! [`crate::SpanFrame`] to rotate local points back onto the original span.

use glam::Vec3;
use tracing::warn;

/// Hard ceiling on segments per curve, independent of quality.
pub const MAX_SEGMENTS: usize = 2048;

/// Default catenary parameter `a`. Larger values hang tauter.
pub const DEFAULT_HANG_AMOUNT: f32 = 9.0;

/// Fraction of a segment within which a step snaps onto the far anchor, so the
/// final sample never lands on top of the one before it.
const SNAP_FRACTION: f64 = 1e-4;

/// One step along a sampled curve, in local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSegment {
    /// Point where the segment starts.
    pub start: Vec3,
    /// Point where the segment ends.
    pub end: Vec3,
    /// Slope `dy/dx` of the height function at `end` (zero on vertical spans).
    pub gradient: f32,
}

impl CurveSegment {
    /// Straight-line length of the segment.
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Unit direction from `start` to `end`.
    pub fn direction(&self) -> Vec3 {
        (self.end - self.start).normalize_or_zero()
    }
}

/// How a span is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveShape {
    /// Anchors coincide (or the span is not finite): nothing to sample.
    Empty,
    /// No horizontal separation: the chain is a straight vertical line.
    Vertical,
    /// General hanging chain.
    Hanging,
}

/// Hanging-chain curve between the origin and a span vector.
#[derive(Debug, Clone, Copy)]
pub struct Catenary {
    shape: CurveShape,
    distance: f64,
    distance_xz: f64,
    drop: f64,
    hang_amount: f64,
    p1: f64,
    wrong_distance_factor: f64,
}

impl Catenary {
    /// Prepare a curve for `span` with catenary parameter `hang_amount`.
    pub fn new(span: Vec3, hang_amount: f32) -> Self {
        let hang_amount = if hang_amount.is_finite() && hang_amount > 0.0 {
            hang_amount as f64
        } else {
            warn!(hang_amount, "invalid hang amount, using default");
            DEFAULT_HANG_AMOUNT as f64
        };

        let (x, y, z) = (span.x as f64, span.y as f64, span.z as f64);
        let distance = (x * x + y * y + z * z).sqrt();
        let distance_xz = (x * x + z * z).sqrt();

        let shape = if !span.is_finite() {
            warn!(?span, "non-finite chain span");
            CurveShape::Empty
        } else if distance == 0.0 {
            CurveShape::Empty
        } else if span.x == 0.0 && span.z == 0.0 {
            CurveShape::Vertical
        } else {
            CurveShape::Hanging
        };

        let (p1, wrong_distance_factor) = match shape {
            CurveShape::Hanging => {
                let a = hang_amount;
                let p1 = a * (y / (2.0 * a) * (1.0 / (distance / (2.0 * a)).sinh())).asinh();
                // The height function is parameterised by the total distance
                // rather than the horizontal one. Scaling x by this factor keeps
                // that stretch, which gives steep chains a deeper sag.
                (p1, distance / distance_xz)
            }
            _ => (0.0, 1.0),
        };

        Self {
            shape,
            distance,
            distance_xz,
            drop: y,
            hang_amount,
            p1,
            wrong_distance_factor,
        }
    }

    /// Sampling strategy chosen for this span.
    pub fn shape(&self) -> CurveShape {
        self.shape
    }

    /// Straight-line distance between the anchors.
    pub fn distance(&self) -> f32 {
        self.distance as f32
    }

    /// Horizontal (XZ-plane) distance between the anchors.
    pub fn distance_xz(&self) -> f32 {
        self.distance_xz as f32
    }

    /// Vertical offset of the far anchor.
    pub fn drop(&self) -> f32 {
        self.drop as f32
    }

    /// Ratio of horizontal to total distance; the upward component of the
    /// unrotated cross-section normal.
    pub fn horizontal_ratio(&self) -> f32 {
        if self.distance == 0.0 {
            0.0
        } else {
            (self.distance_xz / self.distance).abs() as f32
        }
    }

    /// Far anchor in local coordinates.
    pub fn end_point(&self) -> Vec3 {
        match self.shape {
            CurveShape::Empty => Vec3::ZERO,
            CurveShape::Vertical => Vec3::new(0.0, self.drop as f32, 0.0),
            CurveShape::Hanging => Vec3::new(self.distance_xz as f32, self.drop as f32, 0.0),
        }
    }

    /// Height of the curve at horizontal position `x` (local frame).
    pub fn height(&self, x: f32) -> f32 {
        self.drip(x as f64 * self.wrong_distance_factor) as f32
    }

    /// Slope of the curve at horizontal position `x` (local frame).
    pub fn gradient(&self, x: f32) -> f32 {
        self.drip_prime(x as f64 * self.wrong_distance_factor) as f32
    }

    fn drip(&self, x: f64) -> f64 {
        if self.shape != CurveShape::Hanging {
            return 0.0;
        }
        let a = self.hang_amount;
        let d = self.distance;
        let p2 = -a * ((2.0 * self.p1 - d) / (2.0 * a)).cosh();
        p2 + a * ((2.0 * x + 2.0 * self.p1 - d) / (2.0 * a)).cosh()
    }

    fn drip_prime(&self, x: f64) -> f64 {
        if self.shape != CurveShape::Hanging {
            return 0.0;
        }
        let a = self.hang_amount;
        ((2.0 * x + 2.0 * self.p1 - self.distance) / (2.0 * a)).sinh()
    }

    /// Rough number of segments needed at `segment_length`, for preallocation.
    pub fn segment_count_hint(&self, segment_length: f32) -> usize {
        if self.shape == CurveShape::Empty || segment_length.is_nan() || segment_length <= 0.0 {
            return 0;
        }
        let estimate = (2.0 * self.distance / segment_length as f64).ceil();
        (estimate as usize).min(MAX_SEGMENTS)
    }

    /// Lazily sample the curve in steps of roughly `segment_length`.
    ///
    /// Calling this again restarts from the near anchor.
    pub fn segments(&self, segment_length: f32) -> CatenarySegments {
        let valid = segment_length.is_finite() && segment_length > 0.0;
        if !valid {
            warn!(segment_length, "invalid chain segment length");
        }
        // Uncapped: the iterator stops at MAX_SEGMENTS itself, and only a run
        // that reaches this count is clamped onto the far anchor.
        let vertical_count = if self.shape == CurveShape::Vertical && valid {
            (self.drop.abs() / segment_length as f64).ceil() as usize
        } else {
            0
        };
        CatenarySegments {
            curve: *self,
            segment_length: segment_length as f64,
            vertical_count,
            x: 0.0,
            point: Vec3::ZERO,
            gradient: self.drip_prime(0.0),
            emitted: 0,
            done: !valid || self.shape == CurveShape::Empty,
        }
    }
}

/// Estimate Δx that advances the curve by `s` along its length given slope `k`.
///
/// With tangent `T = (1, k)`, stepping `s` along `T / |T|` moves x by
/// `s / sqrt(1 + k²)`.
fn estimate_delta_x(s: f64, k: f64) -> f64 {
    s / (1.0 + k * k).sqrt()
}

/// Iterator over the segments of a [`Catenary`].
#[derive(Debug, Clone)]
pub struct CatenarySegments {
    curve: Catenary,
    segment_length: f64,
    vertical_count: usize,
    x: f64,
    point: Vec3,
    gradient: f64,
    emitted: usize,
    done: bool,
}

impl CatenarySegments {
    /// Number of segments yielded so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    fn next_vertical(&mut self) -> Option<CurveSegment> {
        if self.emitted >= self.vertical_count {
            self.done = true;
            return None;
        }
        let index = self.emitted + 1;
        let last = index == self.vertical_count;
        let y = if last {
            self.curve.drop
        } else {
            self.curve.drop.signum() * self.segment_length * index as f64
        };
        let end = Vec3::new(0.0, y as f32, 0.0);
        Some(self.advance(end, 0.0, last))
    }

    fn next_hanging(&mut self) -> Option<CurveSegment> {
        let curve = &self.curve;
        self.x += estimate_delta_x(self.segment_length, self.gradient);
        let last = self.x + self.segment_length * SNAP_FRACTION >= curve.distance_xz;
        let end = if last {
            self.x = curve.distance_xz;
            curve.end_point()
        } else {
            let y = curve.drip(self.x * curve.wrong_distance_factor);
            Vec3::new(self.x as f32, y as f32, 0.0)
        };
        let gradient = curve.drip_prime(self.x * curve.wrong_distance_factor);
        Some(self.advance(end, gradient, last))
    }

    fn advance(&mut self, end: Vec3, gradient: f64, last: bool) -> CurveSegment {
        let segment = CurveSegment {
            start: self.point,
            end,
            gradient: gradient as f32,
        };
        self.point = end;
        self.gradient = gradient;
        self.emitted += 1;
        self.done = last;
        segment
    }
}

impl Iterator for CatenarySegments {
    type Item = CurveSegment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.emitted >= MAX_SEGMENTS {
            return None;
        }
        match self.curve.shape {
            CurveShape::Empty => None,
            CurveShape::Vertical => self.next_vertical(),
            CurveShape::Hanging => self.next_hanging(),
        }
    }
}

impl std::iter::FusedIterator for CatenarySegments {}
