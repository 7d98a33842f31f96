//! `Shape`: the contour collection handed to the generator, plus the
//! clean-up passes that must run on it first.
//!
//! Pipeline order is fixed: [`Shape::validate`] → [`Shape::normalize`] →
//! [`Shape::orient_contours`] → [`Shape::color_edges`].  Each pass records a
//! flag so callers (and the generator's debug logging) can tell what has
//! been applied.

use std::cmp::Ordering;

use crate::coloring::color_contour;
use crate::contour::Contour;
use crate::edge::{Aabb, EdgeSegment};
use crate::geometry::Point;

/// What [`Shape::validate`] removed or patched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub dropped_edges: usize,
    pub dropped_contours: usize,
    /// Linear edges inserted to bridge gaps between consecutive edges.
    pub bridged_gaps: usize,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub contours: Vec<Contour>,
    validated: bool,
    normalized: bool,
    oriented: bool,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_contours(contours: Vec<Contour>) -> Self {
        Self {
            contours,
            ..Self::default()
        }
    }

    pub fn add_contour(&mut self, contour: Contour) {
        self.contours.push(contour);
        self.validated = false;
        self.normalized = false;
        self.oriented = false;
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    pub fn is_oriented(&self) -> bool {
        self.oriented
    }

    pub fn is_empty(&self) -> bool {
        self.contours.iter().all(Contour::is_empty)
    }

    pub fn edge_count(&self) -> usize {
        self.contours.iter().map(Contour::len).sum()
    }

    pub fn bounds(&self) -> Aabb {
        self.contours
            .iter()
            .fold(Aabb::EMPTY, |acc, c| acc.union(c.bounds()))
    }

    // ── Passes ──────────────────────────────────────────────────────────────

    /// Drop zero-length edges and contours left without edges, and bridge
    /// any gap between consecutive edges with a straight edge.  Never fails:
    /// whatever cannot be used is ignored.
    pub fn validate(&mut self) -> ValidationReport {
        let mut report = ValidationReport::default();
        for contour in &mut self.contours {
            let before = contour.edges.len();
            contour.edges.retain(|e| !e.is_degenerate());
            report.dropped_edges += before - contour.edges.len();

            let n = contour.edges.len();
            if n == 0 {
                continue;
            }
            let mut edges = Vec::with_capacity(n);
            for i in 0..n {
                let edge = contour.edges[i];
                let next_start = contour.edges[(i + 1) % n].start();
                edges.push(edge);
                if edge.end() != next_start {
                    edges.push(EdgeSegment::linear(edge.end(), next_start).with_color(edge.color()));
                    report.bridged_gaps += 1;
                }
            }
            contour.edges = edges;
        }
        let before = self.contours.len();
        self.contours.retain(|c| !c.is_empty());
        report.dropped_contours = before - self.contours.len();

        if !report.is_clean() {
            log::debug!(
                "shape validation: dropped {} edges / {} contours, bridged {} gaps",
                report.dropped_edges,
                report.dropped_contours,
                report.bridged_gaps
            );
        }
        self.validated = true;
        report
    }

    /// Give every contour at least three edges by cutting the edges of
    /// one- and two-edge contours in thirds.  Edge coloring needs three
    /// distinct edges to colour a teardrop unambiguously.
    pub fn normalize(&mut self) {
        for contour in &mut self.contours {
            if contour.edges.len() == 1 || contour.edges.len() == 2 {
                contour.edges = contour
                    .edges
                    .iter()
                    .flat_map(|e| e.split_in_thirds())
                    .collect();
            }
        }
        self.normalized = true;
    }

    /// Make every contour's winding agree with its nesting depth: outer
    /// boundaries counter-clockwise (positive), holes clockwise, islands in
    /// holes counter-clockwise again, and so on.
    ///
    /// For each contour a horizontal scanline is cast through a point on
    /// it.  The crossings with *all* contours, sorted by x, alternate
    /// between entering and leaving the filled area; each crossing votes on
    /// whether its contour runs the expected way.  Contours that lose the
    /// vote are reversed.
    pub fn orient_contours(&mut self) {
        // irrational, so the scanline is unlikely to hit a vertex
        let ratio = 0.5 * (5.0f64.sqrt() - 1.0);

        struct Intersection {
            x: f64,
            direction: i32,
            contour: usize,
        }

        let mut orientations = vec![0i32; self.contours.len()];
        let mut intersections: Vec<Intersection> = Vec::new();
        for i in 0..self.contours.len() {
            if orientations[i] != 0 || self.contours[i].is_empty() {
                continue;
            }
            let Some(y) = scanline_height(&self.contours[i], ratio) else {
                continue;
            };
            for (j, contour) in self.contours.iter().enumerate() {
                for edge in &contour.edges {
                    intersections.extend(edge.scanline_crossings(y).into_iter().map(|c| Intersection {
                        x: c.x,
                        direction: c.direction,
                        contour: j,
                    }));
                }
            }
            if intersections.is_empty() {
                continue;
            }
            intersections.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
            // coincident crossings cannot be attributed reliably
            for k in 1..intersections.len() {
                if intersections[k].x == intersections[k - 1].x {
                    intersections[k].direction = 0;
                    intersections[k - 1].direction = 0;
                }
            }
            // even crossings enter the fill, which for a positive contour
            // means travelling downwards on its left flank
            for (k, hit) in intersections.iter().enumerate() {
                if hit.direction != 0 {
                    let leaving = k & 1 == 1;
                    orientations[hit.contour] += if leaving == (hit.direction > 0) { 1 } else { -1 };
                }
            }
            intersections.clear();
        }

        let mut reversed = 0;
        for (contour, orientation) in self.contours.iter_mut().zip(&orientations) {
            if *orientation < 0 {
                contour.reverse();
                reversed += 1;
            }
        }
        if reversed > 0 {
            log::debug!("orient_contours: reversed {reversed} of {} contours", self.contours.len());
        }
        self.oriented = true;
    }

    /// Assign channel colors to every edge.  One seed value is threaded
    /// through the contours in order, so the result depends only on the
    /// geometry and the caller's seed.
    pub fn color_edges(&mut self, angle_threshold: f64, seed: u64) {
        let mut seed = seed;
        for contour in &mut self.contours {
            color_contour(contour, angle_threshold, &mut seed);
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    /// Non-zero winding number of `p` with respect to the whole shape,
    /// counted along a ray towards +x.
    pub fn winding_number(&self, p: Point) -> i32 {
        self.contours
            .iter()
            .flat_map(|c| c.edges.iter())
            .flat_map(|e| e.scanline_crossings(p.y))
            .filter(|c| c.x > p.x)
            .map(|c| c.direction)
            .sum()
    }

    /// Point-in-shape test (non-zero rule).
    pub fn contains(&self, p: Point) -> bool {
        self.winding_number(p) != 0
    }
}

/// A y value crossed by `contour`, picked between two distinct y values
/// found on it.  `None` for contours flattened onto a horizontal line.
fn scanline_height(contour: &Contour, ratio: f64) -> Option<f64> {
    let y0 = contour.edges.first()?.start().y;
    let mut y1 = y0;
    for edge in &contour.edges {
        if y0 != y1 {
            break;
        }
        y1 = edge.end().y;
    }
    // all endpoints on one horizontal line: try inside the curves
    for edge in &contour.edges {
        if y0 != y1 {
            break;
        }
        y1 = edge.point_at(ratio).y;
    }
    if y0 == y1 {
        return None;
    }
    Some(y0 + (y1 - y0) * ratio)
}
