//! Edge segments: the linear / quadratic / cubic primitives a contour is made
//! of, the channel mask each one carries, and the distance queries the
//! generator runs against them.
//!
//! Sign convention (shared with [`crate::contour::Contour::winding`]): the
//! signed distance is `cross(tangent, p - curve_point)`, i.e. positive on the
//! left of the direction of travel.  With Y pointing up a counter-clockwise
//! contour therefore reports positive distances for points inside it.

use std::ops::{BitAnd, BitOr, BitXor};

use glam::DVec2;

use crate::geometry::{cross, mix, non_zero_sign, orthonormal, solve_cubic, solve_quadratic, Point};

// ─── EdgeColor ─────────────────────────────────────────────────────────────

/// Channel mask of an edge.  Bit 0 = red, bit 1 = green, bit 2 = blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeColor(u8);

impl EdgeColor {
    pub const BLACK: Self = Self(0);
    pub const RED: Self = Self(1);
    pub const GREEN: Self = Self(2);
    pub const YELLOW: Self = Self(3);
    pub const BLUE: Self = Self(4);
    pub const MAGENTA: Self = Self(5);
    pub const CYAN: Self = Self(6);
    pub const WHITE: Self = Self(7);

    /// Build from raw bits; anything above the three channel bits is dropped.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 7)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn has_red(self) -> bool {
        self.0 & 1 != 0
    }

    #[inline]
    pub const fn has_green(self) -> bool {
        self.0 & 2 != 0
    }

    #[inline]
    pub const fn has_blue(self) -> bool {
        self.0 & 4 != 0
    }

    /// True if every channel of `other` is also set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Number of active channels (0–3).
    #[inline]
    pub const fn channel_count(self) -> u32 {
        self.0.count_ones()
    }

    /// Cyan, magenta or yellow.
    #[inline]
    pub const fn is_two_channel(self) -> bool {
        self.channel_count() == 2
    }
}

impl Default for EdgeColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl BitAnd for EdgeColor {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for EdgeColor {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitXor for EdgeColor {
    type Output = Self;
    fn bitxor(self, rhs: Self) -> Self {
        Self((self.0 ^ rhs.0) & 7)
    }
}

// ─── SignedDistance ────────────────────────────────────────────────────────

/// Distance candidate used while searching for the nearest edge.
///
/// `orthogonality` is `|cos|` of the angle between the edge tangent and the
/// direction to the query point when the nearest point is an endpoint, and
/// `0` when the projection lands inside the segment.  Among candidates with
/// the same `|distance|` the smaller value wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignedDistance {
    pub distance: f64,
    pub orthogonality: f64,
}

impl SignedDistance {
    /// Sentinel that loses against every real candidate.  Kept finite so
    /// that `median()` and `abs()` never see an infinity or a NaN.
    pub const INFINITE: Self = Self {
        distance: -1e240,
        orthogonality: 1.0,
    };

    #[inline]
    pub const fn new(distance: f64, orthogonality: f64) -> Self {
        Self {
            distance,
            orthogonality,
        }
    }

    /// Nearest-edge ordering: smaller `|distance|`, then smaller
    /// orthogonality.
    #[inline]
    pub fn is_closer_than(&self, other: &Self) -> bool {
        let a = self.distance.abs();
        let b = other.distance.abs();
        a < b || (a == b && self.orthogonality < other.orthogonality)
    }
}

impl Default for SignedDistance {
    fn default() -> Self {
        Self::INFINITE
    }
}

// ─── Aabb / Crossing ───────────────────────────────────────────────────────

/// Axis-aligned bounding box in shape space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    /// Inverted box; including any point makes it valid.
    pub const EMPTY: Self = Self {
        min: DVec2::splat(f64::INFINITY),
        max: DVec2::splat(f64::NEG_INFINITY),
    };

    pub fn include(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn size(&self) -> DVec2 {
        if self.is_empty() {
            DVec2::ZERO
        } else {
            self.max - self.min
        }
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// One intersection between an edge and a horizontal scanline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub x: f64,
    /// Sign of dY/dt at the crossing: `1` going up, `-1` going down.
    pub direction: i32,
}

// ─── EdgeSegment ───────────────────────────────────────────────────────────

/// A single curve primitive of a contour.
///
/// Control points are stored inline, so a `Vec<EdgeSegment>` is one flat
/// allocation.  All parametric queries take `t ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeSegment {
    Linear {
        p0: Point,
        p1: Point,
        color: EdgeColor,
    },
    Quadratic {
        p0: Point,
        ctrl: Point,
        p1: Point,
        color: EdgeColor,
    },
    Cubic {
        p0: Point,
        ctrl0: Point,
        ctrl1: Point,
        p1: Point,
        color: EdgeColor,
    },
}

const CUBIC_SEARCH_STARTS: usize = 4;
const CUBIC_SEARCH_STEPS: usize = 4;

impl EdgeSegment {
    // ── Constructors ────────────────────────────────────────────────────────

    pub fn linear(p0: Point, p1: Point) -> Self {
        Self::Linear {
            p0,
            p1,
            color: EdgeColor::WHITE,
        }
    }

    /// A control point coinciding with an endpoint would give a zero tangent
    /// there; it is moved to the chord midpoint, which traces the same line.
    pub fn quadratic(p0: Point, ctrl: Point, p1: Point) -> Self {
        let ctrl = if ctrl == p0 || ctrl == p1 {
            (p0 + p1) * 0.5
        } else {
            ctrl
        };
        Self::Quadratic {
            p0,
            ctrl,
            p1,
            color: EdgeColor::WHITE,
        }
    }

    pub fn cubic(p0: Point, ctrl0: Point, ctrl1: Point, p1: Point) -> Self {
        let (ctrl0, ctrl1) = if (ctrl0 == p0 || ctrl0 == p1) && (ctrl1 == p0 || ctrl1 == p1) {
            (mix(p0, p1, 1.0 / 3.0), mix(p0, p1, 2.0 / 3.0))
        } else {
            (ctrl0, ctrl1)
        };
        Self::Cubic {
            p0,
            ctrl0,
            ctrl1,
            p1,
            color: EdgeColor::WHITE,
        }
    }

    pub fn with_color(mut self, color: EdgeColor) -> Self {
        self.set_color(color);
        self
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn color(&self) -> EdgeColor {
        match *self {
            Self::Linear { color, .. } | Self::Quadratic { color, .. } | Self::Cubic { color, .. } => {
                color
            }
        }
    }

    pub fn set_color(&mut self, new: EdgeColor) {
        match self {
            Self::Linear { color, .. } | Self::Quadratic { color, .. } | Self::Cubic { color, .. } => {
                *color = new
            }
        }
    }

    pub fn start(&self) -> Point {
        match *self {
            Self::Linear { p0, .. } | Self::Quadratic { p0, .. } | Self::Cubic { p0, .. } => p0,
        }
    }

    pub fn end(&self) -> Point {
        match *self {
            Self::Linear { p1, .. } | Self::Quadratic { p1, .. } | Self::Cubic { p1, .. } => p1,
        }
    }

    /// True when every control point coincides, i.e. the edge has no length.
    pub fn is_degenerate(&self) -> bool {
        match *self {
            Self::Linear { p0, p1, .. } => p0 == p1,
            Self::Quadratic { p0, ctrl, p1, .. } => p0 == p1 && p0 == ctrl,
            Self::Cubic {
                p0, ctrl0, ctrl1, p1, ..
            } => p0 == p1 && p0 == ctrl0 && p0 == ctrl1,
        }
    }

    // ── Evaluation ──────────────────────────────────────────────────────────

    /// Point on the curve.  Bernstein form, so `t = 0` / `t = 1` return the
    /// stored endpoints bit-exactly.
    pub fn point_at(&self, t: f64) -> Point {
        match *self {
            Self::Linear { p0, p1, .. } => mix(p0, p1, t),
            Self::Quadratic { p0, ctrl, p1, .. } => {
                let mt = 1.0 - t;
                p0 * (mt * mt) + ctrl * (2.0 * mt * t) + p1 * (t * t)
            }
            Self::Cubic {
                p0, ctrl0, ctrl1, p1, ..
            } => {
                let mt = 1.0 - t;
                p0 * (mt * mt * mt)
                    + ctrl0 * (3.0 * mt * mt * t)
                    + ctrl1 * (3.0 * mt * t * t)
                    + p1 * (t * t * t)
            }
        }
    }

    /// Tangent at `t`, not normalised.  Degenerate tangents at the ends of
    /// curved segments fall back to the direction of the neighbouring
    /// control point so that the result is never zero for a valid edge.
    pub fn direction_at(&self, t: f64) -> DVec2 {
        match *self {
            Self::Linear { p0, p1, .. } => p1 - p0,
            Self::Quadratic { p0, ctrl, p1, .. } => {
                let tangent = mix(ctrl - p0, p1 - ctrl, t);
                if tangent == DVec2::ZERO {
                    p1 - p0
                } else {
                    tangent
                }
            }
            Self::Cubic {
                p0, ctrl0, ctrl1, p1, ..
            } => {
                let tangent = mix(
                    mix(ctrl0 - p0, ctrl1 - ctrl0, t),
                    mix(ctrl1 - ctrl0, p1 - ctrl1, t),
                    t,
                );
                if tangent == DVec2::ZERO {
                    if t == 0.0 {
                        return ctrl1 - p0;
                    }
                    if t == 1.0 {
                        return p1 - ctrl0;
                    }
                }
                tangent
            }
        }
    }

    /// `∫ cross(P(t), P'(t)) dt` over `[0, 1]`: twice the signed area swept
    /// from the origin.  Summed over a closed contour it is twice the
    /// enclosed area.  The integrand is a polynomial of degree at most 5, so
    /// three-point Gauss–Legendre quadrature is exact.
    pub fn area_term(&self) -> f64 {
        if let Self::Linear { p0, p1, .. } = *self {
            return cross(p0, p1);
        }
        let h = 0.5 * (0.6f64).sqrt();
        [(0.5 - h, 5.0), (0.5, 8.0), (0.5 + h, 5.0)]
            .iter()
            .map(|&(t, w)| w * cross(self.point_at(t), self.derivative_at(t)))
            .sum::<f64>()
            / 18.0
    }

    /// Exact first derivative, without the degenerate-tangent fallback of
    /// [`Self::direction_at`].
    fn derivative_at(&self, t: f64) -> DVec2 {
        match *self {
            Self::Linear { p0, p1, .. } => p1 - p0,
            Self::Quadratic { p0, ctrl, p1, .. } => 2.0 * mix(ctrl - p0, p1 - ctrl, t),
            Self::Cubic {
                p0, ctrl0, ctrl1, p1, ..
            } => 3.0 * mix(mix(ctrl0 - p0, ctrl1 - ctrl0, t), mix(ctrl1 - ctrl0, p1 - ctrl1, t), t),
        }
    }

    // ── Distance ────────────────────────────────────────────────────────────

    /// True signed distance from `origin` to the segment, together with the
    /// curve parameter of the nearest point.  The parameter may fall outside
    /// `[0, 1]` when an endpoint is nearest; it then tells
    /// [`Self::distance_to_pseudo_distance`] which end to extend.
    pub fn signed_distance(&self, origin: Point) -> (SignedDistance, f64) {
        match *self {
            Self::Linear { p0, p1, .. } => linear_distance(p0, p1, origin),
            Self::Quadratic { p0, ctrl, p1, .. } => self.quadratic_distance(p0, ctrl, p1, origin),
            Self::Cubic {
                p0, ctrl0, ctrl1, p1, ..
            } => self.cubic_distance(p0, ctrl0, ctrl1, p1, origin),
        }
    }

    /// Replace an endpoint distance by the distance to the tangent ray
    /// extending the segment past that endpoint, when the ray is closer.
    pub fn distance_to_pseudo_distance(&self, distance: &mut SignedDistance, origin: Point, param: f64) {
        if param < 0.0 {
            let dir = self.direction_at(0.0).normalize_or_zero();
            let aq = origin - self.start();
            if aq.dot(dir) < 0.0 {
                let pseudo = cross(dir, aq);
                if pseudo.abs() <= distance.distance.abs() {
                    *distance = SignedDistance::new(pseudo, 0.0);
                }
            }
        } else if param > 1.0 {
            let dir = self.direction_at(1.0).normalize_or_zero();
            let bq = origin - self.end();
            if bq.dot(dir) > 0.0 {
                let pseudo = cross(dir, bq);
                if pseudo.abs() <= distance.distance.abs() {
                    *distance = SignedDistance::new(pseudo, 0.0);
                }
            }
        }
    }

    /// Signed distance to the segment extended as rays along its endpoint
    /// tangents.  Adjacent edges of a contour agree on this value at their
    /// shared vertex, which is what keeps the field free of seams.
    pub fn signed_pseudo_distance(&self, origin: Point) -> SignedDistance {
        let (mut distance, param) = self.signed_distance(origin);
        self.distance_to_pseudo_distance(&mut distance, origin, param);
        distance
    }

    fn quadratic_distance(&self, p0: Point, ctrl: Point, p1: Point, origin: Point) -> (SignedDistance, f64) {
        let qa = p0 - origin;
        let ab = ctrl - p0;
        let br = p1 - ctrl - ab;
        let a = br.dot(br);
        let b = 3.0 * ab.dot(br);
        let c = 2.0 * ab.dot(ab) + qa.dot(br);
        let d = qa.dot(ab);
        let roots = solve_cubic(a, b, c, d);

        let dir0 = self.direction_at(0.0);
        let mut min_distance = non_zero_sign(cross(qa, dir0)) * qa.length();
        let mut param = -qa.dot(dir0) / dir0.dot(dir0);
        {
            let dir1 = self.direction_at(1.0);
            let bq = p1 - origin;
            let distance = bq.length();
            if distance < min_distance.abs() {
                min_distance = non_zero_sign(cross(bq, dir1)) * distance;
                param = 1.0 + (origin - p1).dot(dir1) / dir1.dot(dir1);
            }
        }
        for t in roots.iter() {
            if t > 0.0 && t < 1.0 {
                let qe = qa + ab * (2.0 * t) + br * (t * t);
                let distance = qe.length();
                if distance <= min_distance.abs() {
                    min_distance = non_zero_sign(cross(qe, ab + br * t)) * distance;
                    param = t;
                }
            }
        }
        (
            self.finish_distance(min_distance, param, qa, p1 - origin),
            param,
        )
    }

    fn cubic_distance(
        &self,
        p0: Point,
        ctrl0: Point,
        ctrl1: Point,
        p1: Point,
        origin: Point,
    ) -> (SignedDistance, f64) {
        let qa = p0 - origin;
        let ab = ctrl0 - p0;
        let br = ctrl1 - ctrl0 - ab;
        let as_ = (p1 - ctrl1) - (ctrl1 - ctrl0) - br;

        let dir0 = self.direction_at(0.0);
        let mut min_distance = non_zero_sign(cross(qa, dir0)) * qa.length();
        let mut param = -qa.dot(dir0) / dir0.dot(dir0);
        {
            let dir1 = self.direction_at(1.0);
            let bq = p1 - origin;
            let distance = bq.length();
            if distance < min_distance.abs() {
                min_distance = non_zero_sign(cross(bq, dir1)) * distance;
                param = 1.0 + (origin - p1).dot(dir1) / dir1.dot(dir1);
            }
        }
        // Newton iterations from evenly spaced starts; the closed form would
        // need a quintic.
        for i in 0..=CUBIC_SEARCH_STARTS {
            let mut t = i as f64 / CUBIC_SEARCH_STARTS as f64;
            let mut qe = qa + ab * (3.0 * t) + br * (3.0 * t * t) + as_ * (t * t * t);
            for _ in 0..CUBIC_SEARCH_STEPS {
                let d1 = ab * 3.0 + br * (6.0 * t) + as_ * (3.0 * t * t);
                let d2 = br * 6.0 + as_ * (6.0 * t);
                t -= qe.dot(d1) / (d1.dot(d1) + qe.dot(d2));
                if t <= 0.0 || t >= 1.0 {
                    break;
                }
                qe = qa + ab * (3.0 * t) + br * (3.0 * t * t) + as_ * (t * t * t);
                let distance = qe.length();
                if distance < min_distance.abs() {
                    min_distance = non_zero_sign(cross(qe, d1)) * distance;
                    param = t;
                }
            }
        }
        (
            self.finish_distance(min_distance, param, qa, p1 - origin),
            param,
        )
    }

    /// Attach the orthogonality term to a curved-segment distance.
    fn finish_distance(&self, distance: f64, param: f64, qa: DVec2, bq: DVec2) -> SignedDistance {
        if (0.0..=1.0).contains(&param) {
            return SignedDistance::new(distance, 0.0);
        }
        let orthogonality = if param < 0.5 {
            self.direction_at(0.0)
                .normalize_or_zero()
                .dot(qa.normalize_or_zero())
                .abs()
        } else {
            self.direction_at(1.0)
                .normalize_or_zero()
                .dot(bq.normalize_or_zero())
                .abs()
        };
        SignedDistance::new(distance, orthogonality)
    }

    // ── Scanline ────────────────────────────────────────────────────────────

    /// Intersections with the horizontal line at height `y`.
    ///
    /// Endpoints lying exactly on the scanline are counted half-open in y: a
    /// start point counts when the edge leaves it upwards, an end point
    /// counts when the edge arrives at it downwards.  Two edges sharing a
    /// vertex on the scanline therefore never double count it.  Interior
    /// tangential touches are ignored.
    pub fn scanline_crossings(&self, y: f64) -> Vec<Crossing> {
        const ENDPOINT_EPSILON: f64 = 1e-9;
        let mut crossings = Vec::with_capacity(3);
        let start = self.start();
        let end = self.end();
        let start_on_line = start.y == y;
        let end_on_line = end.y == y;

        if start_on_line && self.leaving_slope() > 0.0 {
            crossings.push(Crossing {
                x: start.x,
                direction: 1,
            });
        }
        for t in self.y_roots(y).iter() {
            if t <= 0.0 || t >= 1.0 {
                continue;
            }
            if (start_on_line && t < ENDPOINT_EPSILON) || (end_on_line && t > 1.0 - ENDPOINT_EPSILON) {
                continue;
            }
            let dy = self.direction_at(t).y;
            if dy.abs() < 1e-12 {
                continue;
            }
            crossings.push(Crossing {
                x: self.point_at(t).x,
                direction: if dy > 0.0 { 1 } else { -1 },
            });
        }
        if end_on_line && self.arriving_slope() < 0.0 {
            crossings.push(Crossing {
                x: end.x,
                direction: -1,
            });
        }
        crossings
    }

    /// Parameters where Y(t) = y, unfiltered.
    fn y_roots(&self, y: f64) -> crate::geometry::Roots {
        match *self {
            Self::Linear { p0, p1, .. } => solve_quadratic(0.0, p1.y - p0.y, p0.y - y),
            Self::Quadratic { p0, ctrl, p1, .. } => solve_quadratic(
                p0.y - 2.0 * ctrl.y + p1.y,
                2.0 * (ctrl.y - p0.y),
                p0.y - y,
            ),
            Self::Cubic {
                p0, ctrl0, ctrl1, p1, ..
            } => solve_cubic(
                -p0.y + 3.0 * ctrl0.y - 3.0 * ctrl1.y + p1.y,
                3.0 * p0.y - 6.0 * ctrl0.y + 3.0 * ctrl1.y,
                3.0 * (ctrl0.y - p0.y),
                p0.y - y,
            ),
        }
    }

    /// Vertical tendency right after the start point: the first non-zero
    /// `control.y - p0.y` in control point order.
    fn leaving_slope(&self) -> f64 {
        let points = self.control_points();
        let p0 = points[0].y;
        points[1..]
            .iter()
            .map(|p| p.y - p0)
            .find(|d| *d != 0.0)
            .unwrap_or(0.0)
    }

    /// Vertical tendency right before the end point.
    fn arriving_slope(&self) -> f64 {
        let points = self.control_points();
        let last = points.len() - 1;
        let p1 = points[last].y;
        points[..last]
            .iter()
            .rev()
            .map(|p| p1 - p.y)
            .find(|d| *d != 0.0)
            .unwrap_or(0.0)
    }

    fn control_points(&self) -> Vec<Point> {
        match *self {
            Self::Linear { p0, p1, .. } => vec![p0, p1],
            Self::Quadratic { p0, ctrl, p1, .. } => vec![p0, ctrl, p1],
            Self::Cubic {
                p0, ctrl0, ctrl1, p1, ..
            } => vec![p0, ctrl0, ctrl1, p1],
        }
    }

    // ── Bounds ──────────────────────────────────────────────────────────────

    /// Tight bounding box (curve extrema, not the control polygon).
    pub fn bounds(&self) -> Aabb {
        let mut aabb = Aabb::EMPTY;
        aabb.include(self.start());
        aabb.include(self.end());
        match *self {
            Self::Linear { .. } => {}
            Self::Quadratic { p0, ctrl, p1, .. } => {
                let bot = (ctrl - p0) - (p1 - ctrl);
                for axis in 0..2 {
                    if bot[axis] != 0.0 {
                        let t = (ctrl[axis] - p0[axis]) / bot[axis];
                        if t > 0.0 && t < 1.0 {
                            aabb.include(self.point_at(t));
                        }
                    }
                }
            }
            Self::Cubic {
                p0, ctrl0, ctrl1, p1, ..
            } => {
                let a0 = ctrl0 - p0;
                let a1 = (ctrl1 - ctrl0 - a0) * 2.0;
                let a2 = p1 - ctrl1 * 3.0 + ctrl0 * 3.0 - p0;
                for axis in 0..2 {
                    for t in solve_quadratic(a2[axis], a1[axis], a0[axis]).iter() {
                        if t > 0.0 && t < 1.0 {
                            aabb.include(self.point_at(t));
                        }
                    }
                }
            }
        }
        aabb
    }

    // ── Subdivision ─────────────────────────────────────────────────────────

    /// The piece of this curve between `t0` and `t1`, same color.
    ///
    /// Endpoints come from [`Self::point_at`] and inner control points from
    /// the polar form, so adjacent pieces share their joint bit-exactly.
    pub fn sub_segment(&self, t0: f64, t1: f64) -> Self {
        let a = self.point_at(t0);
        let b = self.point_at(t1);
        match *self {
            Self::Linear { color, .. } => Self::Linear { p0: a, p1: b, color },
            Self::Quadratic { p0, ctrl, p1, color } => {
                let blossom = mix(mix(p0, ctrl, t0), mix(ctrl, p1, t0), t1);
                Self::Quadratic {
                    p0: a,
                    ctrl: blossom,
                    p1: b,
                    color,
                }
            }
            Self::Cubic {
                p0,
                ctrl0,
                ctrl1,
                p1,
                color,
            } => {
                let blossom = |u: f64, v: f64, w: f64| {
                    let q0 = mix(p0, ctrl0, u);
                    let q1 = mix(ctrl0, ctrl1, u);
                    let q2 = mix(ctrl1, p1, u);
                    mix(mix(q0, q1, v), mix(q1, q2, v), w)
                };
                Self::Cubic {
                    p0: a,
                    ctrl0: blossom(t0, t0, t1),
                    ctrl1: blossom(t0, t1, t1),
                    p1: b,
                    color,
                }
            }
        }
    }

    /// Cut the segment at `t1` and `t2`.  Cuts outside `(0, 1)` or equal to
    /// a neighbouring cut are ignored, so the result holds 1–3 pieces whose
    /// concatenation traces the original curve.
    pub fn split(&self, t1: f64, t2: f64) -> Vec<Self> {
        let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        let mut cuts = vec![0.0];
        for t in [lo, hi] {
            if t > 0.0 && t < 1.0 && cuts.last().is_some_and(|last| t > *last) {
                cuts.push(t);
            }
        }
        cuts.push(1.0);
        cuts.windows(2)
            .map(|w| {
                if w[0] == 0.0 && w[1] == 1.0 {
                    *self
                } else {
                    self.sub_segment(w[0], w[1])
                }
            })
            .collect()
    }

    /// [`Self::split`] at `1/3` and `2/3`.
    pub fn split_in_thirds(&self) -> Vec<Self> {
        self.split(1.0 / 3.0, 2.0 / 3.0)
    }

    /// Flip the direction of travel.
    pub fn reverse(&mut self) {
        match self {
            Self::Linear { p0, p1, .. } | Self::Quadratic { p0, p1, .. } => std::mem::swap(p0, p1),
            Self::Cubic {
                p0, ctrl0, ctrl1, p1, ..
            } => {
                std::mem::swap(p0, p1);
                std::mem::swap(ctrl0, ctrl1);
            }
        }
    }
}

fn linear_distance(p0: Point, p1: Point, origin: Point) -> (SignedDistance, f64) {
    let aq = origin - p0;
    let ab = p1 - p0;
    let len_sq = ab.dot(ab);
    let param = if len_sq > 0.0 { aq.dot(ab) / len_sq } else { 0.0 };
    let eq = if param > 0.5 { p1 } else { p0 } - origin;
    let endpoint_distance = eq.length();
    if param > 0.0 && param < 1.0 {
        let ortho_distance = orthonormal(ab, true).dot(aq);
        if ortho_distance.abs() < endpoint_distance {
            return (SignedDistance::new(ortho_distance, 0.0), param);
        }
    }
    (
        SignedDistance::new(
            non_zero_sign(cross(ab, aq)) * endpoint_distance,
            ab.normalize_or_zero().dot(eq.normalize_or_zero()).abs(),
        ),
        param,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        DVec2::new(x, y)
    }

    fn sample_edges() -> Vec<EdgeSegment> {
        vec![
            EdgeSegment::linear(p(0.0, 0.0), p(2.0, 1.0)),
            EdgeSegment::quadratic(p(0.0, 0.0), p(1.0, 2.0), p(2.0, 0.0)),
            EdgeSegment::cubic(p(0.0, 0.0), p(0.5, 2.0), p(1.5, -2.0), p(2.0, 0.0)),
        ]
    }

    #[test]
    fn endpoints_are_exact() {
        for e in sample_edges() {
            assert_eq!(e.point_at(0.0), e.start());
            assert_eq!(e.point_at(1.0), e.end());
        }
    }

    #[test]
    fn color_flags() {
        assert!(EdgeColor::CYAN.has_green() && EdgeColor::CYAN.has_blue());
        assert!(!EdgeColor::CYAN.has_red());
        assert_eq!(EdgeColor::MAGENTA & EdgeColor::YELLOW, EdgeColor::RED);
        assert_eq!(EdgeColor::RED ^ EdgeColor::WHITE, EdgeColor::CYAN);
        assert!(EdgeColor::WHITE.contains(EdgeColor::MAGENTA));
        assert!(EdgeColor::YELLOW.is_two_channel());
        assert_eq!(EdgeSegment::linear(p(0.0, 0.0), p(1.0, 0.0)).color(), EdgeColor::WHITE);
    }

    #[test]
    fn linear_distance_sign_and_magnitude() {
        // travelling +x, the left side (+y) is positive
        let e = EdgeSegment::linear(p(0.0, 0.0), p(2.0, 0.0));
        let (d, t) = e.signed_distance(p(1.0, 0.5));
        assert!((d.distance - 0.5).abs() < 1e-12);
        assert!((t - 0.5).abs() < 1e-12);
        assert_eq!(d.orthogonality, 0.0);
        let (d, _) = e.signed_distance(p(1.0, -0.25));
        assert!((d.distance + 0.25).abs() < 1e-12);
    }

    #[test]
    fn pseudo_distance_extends_past_endpoints() {
        let e = EdgeSegment::linear(p(0.0, 0.0), p(1.0, 0.0));
        let origin = p(3.0, 0.5);
        let (true_distance, param) = e.signed_distance(origin);
        assert!(param > 1.0);
        assert!((true_distance.distance.abs() - (4.0f64 + 0.25).sqrt()).abs() < 1e-12);
        assert!(true_distance.orthogonality > 0.0);
        let pseudo = e.signed_pseudo_distance(origin);
        assert!((pseudo.distance - 0.5).abs() < 1e-12);
    }

    #[test]
    fn quadratic_distance_to_apex() {
        // apex of this parabola is (1, 1)
        let e = EdgeSegment::quadratic(p(0.0, 0.0), p(1.0, 2.0), p(2.0, 0.0));
        let (d, t) = e.signed_distance(p(1.0, 1.5));
        assert!((d.distance.abs() - 0.5).abs() < 1e-9);
        assert!((t - 0.5).abs() < 1e-9);
        // travelling +x with the apex above: the point above is on the left
        assert!(d.distance > 0.0);
    }

    #[test]
    fn cubic_distance_matches_sampling() {
        let e = sample_edges()[2];
        let origin = p(0.7, 0.2);
        let (d, _) = e.signed_distance(origin);
        let sampled = (0..=2000)
            .map(|i| (e.point_at(i as f64 / 2000.0) - origin).length())
            .fold(f64::MAX, f64::min);
        assert!((d.distance.abs() - sampled).abs() < 1e-3);
    }

    #[test]
    fn closer_ordering_breaks_ties_on_orthogonality() {
        let a = SignedDistance::new(-1.0, 0.2);
        let b = SignedDistance::new(1.0, 0.7);
        assert!(a.is_closer_than(&b));
        assert!(!b.is_closer_than(&a));
        assert!(SignedDistance::new(0.5, 1.0).is_closer_than(&SignedDistance::INFINITE));
    }

    #[test]
    fn split_reproduces_curve() {
        for e in sample_edges() {
            let parts = e.split(0.25, 0.6);
            assert_eq!(parts.len(), 3);
            assert_eq!(parts[0].start(), e.start());
            assert_eq!(parts[0].end(), parts[1].start());
            assert_eq!(parts[1].end(), parts[2].start());
            assert_eq!(parts[2].end(), e.end());
            let ranges = [(0.0, 0.25), (0.25, 0.6), (0.6, 1.0)];
            for (part, (a, b)) in parts.iter().zip(ranges) {
                for i in 0..=10 {
                    let s = i as f64 / 10.0;
                    let q = part.point_at(s);
                    let r = e.point_at(a + (b - a) * s);
                    assert!((q - r).length() < 1e-9, "{q:?} vs {r:?}");
                }
            }
        }
    }

    #[test]
    fn split_ignores_out_of_range_cuts() {
        let e = sample_edges()[1];
        assert_eq!(e.split(0.0, 1.0).len(), 1);
        assert_eq!(e.split(0.5, 0.5).len(), 2);
        assert_eq!(e.split(-1.0, 0.3).len(), 2);
    }

    #[test]
    fn thirds_share_endpoints_and_color() {
        for e in sample_edges() {
            let e = e.with_color(EdgeColor::MAGENTA);
            let parts = e.split_in_thirds();
            assert_eq!(parts.len(), 3);
            assert_eq!(parts[0].start(), e.start());
            assert_eq!(parts[0].end(), parts[1].start());
            assert_eq!(parts[1].end(), parts[2].start());
            assert_eq!(parts[2].end(), e.end());
            assert!(parts.iter().all(|part| part.color() == EdgeColor::MAGENTA));
            assert_eq!(parts, e.split(1.0 / 3.0, 2.0 / 3.0));
        }
    }

    #[test]
    fn area_term_matches_fine_polyline() {
        for e in sample_edges() {
            let n = 4096;
            let polyline: f64 = (0..n)
                .map(|i| {
                    let a = e.point_at(i as f64 / n as f64);
                    let b = e.point_at((i + 1) as f64 / n as f64);
                    cross(a, b)
                })
                .sum();
            assert!((e.area_term() - polyline).abs() < 1e-5, "{e:?}");
        }
    }

    #[test]
    fn reverse_swaps_direction() {
        let mut e = sample_edges()[2];
        let mid = e.point_at(0.3);
        e.reverse();
        assert!((e.point_at(0.7) - mid).length() < 1e-12);
    }

    #[test]
    fn quadratic_bounds_include_apex() {
        let e = sample_edges()[1];
        let b = e.bounds();
        assert!((b.max.y - 1.0).abs() < 1e-12);
        assert_eq!(b.min, p(0.0, 0.0));
        assert!((b.max.x - 2.0).abs() < 1e-12);
    }

    #[test]
    fn scanline_line_and_curve() {
        let up = EdgeSegment::linear(p(1.0, 0.0), p(1.0, 2.0));
        assert_eq!(up.scanline_crossings(1.0), vec![Crossing { x: 1.0, direction: 1 }]);
        // lower endpoint counted, upper endpoint not
        assert_eq!(up.scanline_crossings(0.0).len(), 1);
        assert!(up.scanline_crossings(2.0).is_empty());

        let arch = EdgeSegment::quadratic(p(0.0, 0.0), p(1.0, 2.0), p(2.0, 0.0));
        let c = arch.scanline_crossings(0.5);
        assert_eq!(c.len(), 2);
        assert_eq!(c.iter().map(|c| c.direction).sum::<i32>(), 0);
        // tangent touch at the apex is not a crossing
        assert!(arch.scanline_crossings(1.0).is_empty());
    }
}
