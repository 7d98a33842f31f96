//! Closed loops of edge segments.

use crate::edge::{Aabb, EdgeSegment};
use crate::geometry::Point;

/// A closed sequence of edges: each edge ends where the next one starts and
/// the last edge ends at the start of the first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    pub edges: Vec<EdgeSegment>,
}

impl Contour {
    pub fn new() -> Self {
        Self { edges: Vec::new() }
    }

    pub fn from_edges(edges: Vec<EdgeSegment>) -> Self {
        Self { edges }
    }

    /// Closed polygon through `points` (the closing edge is added).
    pub fn polygon(points: &[Point]) -> Self {
        let n = points.len();
        let edges = (0..n)
            .map(|i| EdgeSegment::linear(points[i], points[(i + 1) % n]))
            .collect();
        Self { edges }
    }

    pub fn push(&mut self, edge: EdgeSegment) {
        self.edges.push(edge);
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Union of the per-edge bounding boxes.
    pub fn bounds(&self) -> Aabb {
        self.edges
            .iter()
            .fold(Aabb::EMPTY, |acc, e| acc.union(e.bounds()))
    }

    /// Orientation of the loop: `1` counter-clockwise (with Y up), `-1`
    /// clockwise, `0` for empty or zero-area loops.
    ///
    /// Sign of the enclosed area, integrated exactly along every edge.  Edge
    /// endpoints alone are not enough: curved edges between collinear
    /// vertices still enclose area.
    pub fn winding(&self) -> i32 {
        let total: f64 = self.edges.iter().map(EdgeSegment::area_term).sum();
        if total > 0.0 {
            1
        } else if total < 0.0 {
            -1
        } else {
            0
        }
    }

    /// Reverse the direction of travel: edge order and every edge.
    pub fn reverse(&mut self) {
        self.edges.reverse();
        for edge in &mut self.edges {
            edge.reverse();
        }
    }

    /// True if consecutive edges share their endpoints (within `tolerance`).
    pub fn is_closed(&self, tolerance: f64) -> bool {
        let n = self.edges.len();
        (0..n).all(|i| {
            let a = self.edges[i].end();
            let b = self.edges[(i + 1) % n].start();
            (a - b).length() <= tolerance
        })
    }
}
