//! Outline inputs: glyph drawing commands and sprite anchor loops.

use glam::DVec2;

use crate::contour::Contour;
use crate::edge::EdgeSegment;
use crate::geometry::Point;
use crate::shape::Shape;

/// A simplified representation of drawing commands for a glyph.  Coordinates
/// are normalized (divide by units per em) and y increases upward.
#[derive(Debug, PartialEq, Clone)]
pub enum GlyphCommand {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    QuadTo {
        ctrl_x: f32,
        ctrl_y: f32,
        to_x: f32,
        to_y: f32,
    },
    CubicTo {
        ctrl0_x: f32,
        ctrl0_y: f32,
        ctrl1_x: f32,
        ctrl1_y: f32,
        to_x: f32,
        to_y: f32,
    },
    Close,
}

/// A glyph outline is just a sequence of path commands.
pub type GlyphOutline = Vec<GlyphCommand>;

fn pt(x: f32, y: f32) -> Point {
    DVec2::new(f64::from(x), f64::from(y))
}

/// Accumulates edges of the sub-path being drawn.
#[derive(Default)]
struct PathBuilder {
    contours: Vec<Contour>,
    current: Contour,
    start: Point,
    cursor: Point,
}

impl PathBuilder {
    fn move_to(&mut self, p: Point) {
        self.close();
        self.start = p;
        self.cursor = p;
    }

    fn push(&mut self, edge: EdgeSegment) {
        self.cursor = edge.end();
        self.current.push(edge);
    }

    /// Finish the current sub-path, adding a straight closing edge when the
    /// outline stopped short of its start.
    fn close(&mut self) {
        if self.current.is_empty() {
            return;
        }
        if self.cursor != self.start {
            self.current.push(EdgeSegment::linear(self.cursor, self.start));
        }
        self.contours.push(std::mem::take(&mut self.current));
        self.cursor = self.start;
    }

    fn finish(mut self) -> Shape {
        self.close();
        Shape::from_contours(self.contours)
    }
}

impl Shape {
    /// Build a shape from a glyph outline.  Every `MoveTo` starts a new
    /// contour; sub-paths left open are closed with a line.
    pub fn from_glyph_commands(commands: &[GlyphCommand]) -> Self {
        let mut builder = PathBuilder::default();
        for command in commands {
            match *command {
                GlyphCommand::MoveTo(x, y) => builder.move_to(pt(x, y)),
                GlyphCommand::LineTo(x, y) => {
                    let to = pt(x, y);
                    if to != builder.cursor {
                        builder.push(EdgeSegment::linear(builder.cursor, to));
                    }
                }
                GlyphCommand::QuadTo {
                    ctrl_x,
                    ctrl_y,
                    to_x,
                    to_y,
                } => builder.push(EdgeSegment::quadratic(
                    builder.cursor,
                    pt(ctrl_x, ctrl_y),
                    pt(to_x, to_y),
                )),
                GlyphCommand::CubicTo {
                    ctrl0_x,
                    ctrl0_y,
                    ctrl1_x,
                    ctrl1_y,
                    to_x,
                    to_y,
                } => builder.push(EdgeSegment::cubic(
                    builder.cursor,
                    pt(ctrl0_x, ctrl0_y),
                    pt(ctrl1_x, ctrl1_y),
                    pt(to_x, to_y),
                )),
                GlyphCommand::Close => builder.close(),
            }
        }
        builder.finish()
    }

    /// One contour per anchor loop.
    pub fn from_anchor_loops<L: AsRef<[Anchor]>>(loops: &[L]) -> Self {
        Shape::from_contours(
            loops
                .iter()
                .map(|l| Contour::from_anchors(l.as_ref()))
                .filter(|c| !c.is_empty())
                .collect(),
        )
    }
}

// ── Sprite anchors ──────────────────────────────────────────────────────────

/// Vertex of a sprite outline.  `tension` bends the segment that leaves this
/// anchor: `0` draws a straight line, positive values bulge to the left of
/// the direction of travel, negative values to the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub position: Point,
    pub tension: f64,
}

impl Anchor {
    pub fn new(x: f64, y: f64, tension: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
            tension,
        }
    }

    pub fn corner(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0)
    }
}

impl Contour {
    /// Closed loop through `anchors`.  A curved segment is a quadratic whose
    /// control point sits on the chord's perpendicular bisector,
    /// `tension × chord length` away from the chord.
    pub fn from_anchors(anchors: &[Anchor]) -> Self {
        let n = anchors.len();
        if n < 2 {
            return Contour::new();
        }
        let mut contour = Contour::new();
        for (i, a) in anchors.iter().enumerate() {
            let b = anchors[(i + 1) % n];
            let chord = b.position - a.position;
            if a.tension == 0.0 || chord == DVec2::ZERO {
                contour.push(EdgeSegment::linear(a.position, b.position));
            } else {
                let mid = (a.position + b.position) * 0.5;
                let ctrl = mid + chord.perp() * a.tension;
                contour.push(EdgeSegment::quadratic(a.position, ctrl, b.position));
            }
        }
        contour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_commands_build_contours() {
        let commands = vec![
            GlyphCommand::MoveTo(0.0, 0.0),
            GlyphCommand::LineTo(1.0, 0.0),
            GlyphCommand::LineTo(1.0, 1.0),
            GlyphCommand::LineTo(0.0, 1.0),
            GlyphCommand::Close,
            GlyphCommand::MoveTo(0.25, 0.25),
            GlyphCommand::QuadTo {
                ctrl_x: 0.5,
                ctrl_y: 0.0,
                to_x: 0.75,
                to_y: 0.25,
            },
            GlyphCommand::CubicTo {
                ctrl0_x: 0.75,
                ctrl0_y: 0.5,
                ctrl1_x: 0.5,
                ctrl1_y: 0.75,
                to_x: 0.25,
                to_y: 0.75,
            },
            // left open: closed with a line back to (0.25, 0.25)
        ];
        let shape = Shape::from_glyph_commands(&commands);
        assert_eq!(shape.contours.len(), 2);
        assert_eq!(shape.contours[0].len(), 4);
        assert_eq!(shape.contours[1].len(), 3);
        assert!(shape.contours.iter().all(|c| c.is_closed(0.0)));
        assert!(matches!(shape.contours[1].edges[0], EdgeSegment::Quadratic { .. }));
        assert!(matches!(shape.contours[1].edges[1], EdgeSegment::Cubic { .. }));
    }

    #[test]
    fn stray_move_to_adds_nothing() {
        let shape = Shape::from_glyph_commands(&[
            GlyphCommand::MoveTo(0.0, 0.0),
            GlyphCommand::MoveTo(1.0, 1.0),
            GlyphCommand::LineTo(1.0, 1.0),
        ]);
        assert!(shape.contours.is_empty());
    }

    #[test]
    fn anchors_with_tension() {
        let c = Contour::from_anchors(&[
            Anchor::corner(0.0, 0.0),
            Anchor::new(2.0, 0.0, 0.25),
            Anchor::corner(2.0, 2.0),
        ]);
        assert_eq!(c.len(), 3);
        assert!(matches!(c.edges[0], EdgeSegment::Linear { .. }));
        match c.edges[1] {
            EdgeSegment::Quadratic { ctrl, .. } => {
                // chord (0, 2), left normal (-2, 0) scaled by 0.25
                assert!((ctrl - DVec2::new(1.5, 1.0)).length() < 1e-12);
            }
            ref other => panic!("expected a quadratic, got {other:?}"),
        }
        assert!(c.is_closed(0.0));
        assert!(Contour::from_anchors(&[Anchor::corner(1.0, 1.0)]).is_empty());
    }
}
