//! Geometry kernel: 2D vector helpers and closed-form polynomial solvers.
//!
//! Everything here is a pure function over `f64`.  The distance queries in
//! [`crate::edge`] are sensitive to cancellation near the boundary, which is
//! why the whole generator works in double precision and only narrows to
//! `f32` when a pixel sample is written.

use glam::DVec2;

/// A coordinate in shape space.
pub type Point = DVec2;

/// 2D cross product (`a.x * b.y - a.y * b.x`).
#[inline]
pub fn cross(a: DVec2, b: DVec2) -> f64 {
    a.perp_dot(b)
}

/// Unit vector perpendicular to `v`.
///
/// `polarity = true` rotates counter-clockwise (`(-y, x)`), `false` rotates
/// clockwise.  A zero-length input yields `DVec2::ZERO`.
pub fn orthonormal(v: DVec2, polarity: bool) -> DVec2 {
    let len = v.length();
    if len == 0.0 {
        return DVec2::ZERO;
    }
    if polarity {
        DVec2::new(-v.y / len, v.x / len)
    } else {
        DVec2::new(v.y / len, -v.x / len)
    }
}

/// Linear interpolation written as `(1 - t) * a + t * b` so that `t = 0` and
/// `t = 1` reproduce the endpoints bit-exactly.
#[inline]
pub fn mix(a: DVec2, b: DVec2, t: f64) -> DVec2 {
    a * (1.0 - t) + b * t
}

/// `-1` for negative input, `+1` otherwise (zero counts as positive).
#[inline]
pub fn non_zero_sign(n: f64) -> f64 {
    if n < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Median of three values.
#[inline]
pub fn median<T: PartialOrd + Copy>(a: T, b: T, c: T) -> T {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    if c < lo {
        lo
    } else if c > hi {
        hi
    } else {
        c
    }
}

// ─── Polynomial roots ──────────────────────────────────────────────────────

/// Up to three real roots of a polynomial, stored inline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roots {
    values: [f64; 3],
    len: usize,
}

impl Roots {
    const NONE: Self = Self {
        values: [0.0; 3],
        len: 0,
    };

    fn one(a: f64) -> Self {
        Self {
            values: [a, 0.0, 0.0],
            len: 1,
        }
    }

    fn two(a: f64, b: f64) -> Self {
        Self {
            values: [a, b, 0.0],
            len: 2,
        }
    }

    fn three(a: f64, b: f64, c: f64) -> Self {
        Self {
            values: [a, b, c],
            len: 3,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.as_slice().iter().copied()
    }
}

/// Real roots of `a·x² + b·x + c = 0`.
///
/// Falls back to the linear equation when `a` is zero or negligible against
/// `b`.  The degenerate identity `0 = 0` has no isolated roots and returns
/// an empty set.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Roots {
    if a == 0.0 || b.abs() > 1e12 * a.abs() {
        if b == 0.0 {
            return Roots::NONE;
        }
        return Roots::one(-c / b);
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant > 0.0 {
        let s = discriminant.sqrt();
        Roots::two((-b + s) / (2.0 * a), (-b - s) / (2.0 * a))
    } else if discriminant == 0.0 {
        Roots::one(-b / (2.0 * a))
    } else {
        Roots::NONE
    }
}

/// Roots of the monic cubic `x³ + a·x² + b·x + c` (Cardano / trigonometric).
fn solve_cubic_normed(a: f64, b: f64, c: f64) -> Roots {
    let a2 = a * a;
    let mut q = (a2 - 3.0 * b) / 9.0;
    let r = (a * (2.0 * a2 - 9.0 * b) + 27.0 * c) / 54.0;
    let r2 = r * r;
    let q3 = q * q * q;
    let a = a / 3.0;
    if r2 < q3 {
        let t = (r / q3.sqrt()).clamp(-1.0, 1.0).acos();
        q = -2.0 * q.sqrt();
        let tau = std::f64::consts::TAU;
        Roots::three(
            q * (t / 3.0).cos() - a,
            q * ((t + tau) / 3.0).cos() - a,
            q * ((t - tau) / 3.0).cos() - a,
        )
    } else {
        let sign = if r < 0.0 { 1.0 } else { -1.0 };
        let u = sign * (r.abs() + (r2 - q3).sqrt()).cbrt();
        let v = if u == 0.0 { 0.0 } else { q / u };
        let x0 = (u + v) - a;
        if u == v || (u - v).abs() < 1e-12 * (u + v).abs() {
            return Roots::two(x0, -0.5 * (u + v) - a);
        }
        Roots::one(x0)
    }
}

/// Real roots of `a·x³ + b·x² + c·x + d = 0`.
///
/// When the leading coefficient is tiny relative to `b` the equation is
/// solved as a quadratic; past that ratio the quadratic is numerically
/// closer to the truth than the normalised cubic.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Roots {
    if a != 0.0 {
        let bn = b / a;
        if bn.abs() < 1e6 {
            return solve_cubic_normed(bn, c / a, d / a);
        }
    }
    solve_quadratic(b, c, d)
}
