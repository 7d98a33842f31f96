//! End-to-end checks through the public API.

use ferrous_msdf::{
    composite, Anchor, Bitmap, Contour, EdgeColor, EdgeSegment, ErrorCorrection, MsdfConfig,
    MsdfGenerator, Projection, Shape, DEFAULT_ANGLE_THRESHOLD,
};
use glam::DVec2;
use std::collections::HashSet;

fn unit_square() -> Shape {
    Shape::from_anchor_loops(&[[
        Anchor::corner(-0.5, -0.5),
        Anchor::corner(0.5, -0.5),
        Anchor::corner(0.5, 0.5),
        Anchor::corner(-0.5, 0.5),
    ]])
}

/// 8×8 pixels, 4 px per unit, square centred on pixel (3.5, 3.5).
fn square_projection() -> Projection {
    Projection::from_dpi(4.0, DVec2::splat(3.5))
}

fn render(shape: &mut Shape, seed: u64) -> Bitmap {
    MsdfGenerator::default().render(shape, seed, 8, 8, &square_projection())
}

#[test]
fn nested_contours_get_opposite_windings() {
    for (outer_ccw, inner_ccw) in [(true, true), (true, false), (false, true), (false, false)] {
        let mut outer = Contour::from_anchors(&[
            Anchor::corner(0.0, 0.0),
            Anchor::corner(4.0, 0.0),
            Anchor::new(4.0, 4.0, 0.1),
            Anchor::corner(0.0, 4.0),
        ]);
        let mut inner = Contour::from_anchors(&[
            Anchor::corner(1.0, 1.0),
            Anchor::corner(3.0, 1.0),
            Anchor::corner(2.0, 3.0),
        ]);
        if !outer_ccw {
            outer.reverse();
        }
        if !inner_ccw {
            inner.reverse();
        }
        let mut shape = Shape::from_contours(vec![outer, inner]);
        shape.orient_contours();
        let w: Vec<i32> = shape.contours.iter().map(Contour::winding).collect();
        assert_eq!(w, vec![1, -1], "input ({outer_ccw}, {inner_ccw})");
    }
}

#[test]
fn normalize_splits_short_contours_along_the_same_path() {
    let lens = EdgeSegment::quadratic(DVec2::new(0.0, 0.0), DVec2::new(1.0, 1.0), DVec2::new(2.0, 0.0));
    let back = EdgeSegment::linear(DVec2::new(2.0, 0.0), DVec2::new(0.0, 0.0));
    let mut shape = Shape::from_contours(vec![Contour::from_edges(vec![lens, back])]);
    shape.normalize();
    let contour = &shape.contours[0];
    assert!(contour.len() >= 3);
    for (i, part) in contour.edges[..3].iter().enumerate() {
        for k in 0..=4 {
            let s = k as f64 / 4.0;
            let t = (i as f64 + s) / 3.0;
            let d = (part.point_at(s) - lens.point_at(t)).length();
            assert!(d < 1e-9, "part {i} at {s}: off by {d}");
        }
    }
}

#[test]
fn teardrop_and_smooth_colorings() {
    // one 90° corner at the origin, smooth elsewhere
    let p = DVec2::new;
    let teardrop = Contour::from_edges(vec![
        EdgeSegment::linear(p(0.0, 0.0), p(1.0, 0.0)),
        EdgeSegment::quadratic(p(1.0, 0.0), p(2.0, 0.0), p(2.0, 1.0)),
        EdgeSegment::quadratic(p(2.0, 1.0), p(2.0, 2.0), p(1.0, 2.0)),
        EdgeSegment::quadratic(p(1.0, 2.0), p(0.0, 2.0), p(0.0, 0.0)),
    ]);
    let mut shape = Shape::from_contours(vec![teardrop]);
    shape.color_edges(DEFAULT_ANGLE_THRESHOLD, 11);
    let colors: HashSet<EdgeColor> = shape.contours[0].edges.iter().map(|e| e.color()).collect();
    assert_eq!(colors.len(), 3);
    assert!(colors.iter().all(|c| c.is_two_channel()));

    // four tangent-continuous arcs
    let k = 0.552_284_749_8;
    let mut smooth = Shape::from_contours(vec![Contour::from_edges(vec![
        EdgeSegment::cubic(p(1.0, 0.0), p(1.0, k), p(k, 1.0), p(0.0, 1.0)),
        EdgeSegment::cubic(p(0.0, 1.0), p(-k, 1.0), p(-1.0, k), p(-1.0, 0.0)),
        EdgeSegment::cubic(p(-1.0, 0.0), p(-1.0, -k), p(-k, -1.0), p(0.0, -1.0)),
        EdgeSegment::cubic(p(0.0, -1.0), p(k, -1.0), p(1.0, -k), p(1.0, 0.0)),
    ])]);
    smooth.color_edges(DEFAULT_ANGLE_THRESHOLD, 11);
    let colors: HashSet<EdgeColor> = smooth.contours[0].edges.iter().map(|e| e.color()).collect();
    assert_eq!(colors.len(), 1);
}

#[test]
fn unit_square_boundary_values() {
    let b = render(&mut unit_square(), 0);
    // (1, 3) samples (-0.5, 0): on the left side
    assert!((b.median_at(1, 3) - 0.5).abs() < 0.05);
    // (3, 3) samples the centre
    assert!((b.median_at(3, 3) - 1.0).abs() < 0.05);
    // (7, 7) samples (1, 1): well outside
    assert!(b.median_at(7, 7).abs() < 0.05);
}

#[test]
fn identical_subtract_shape_leaves_nothing_covered() {
    let add = render(&mut unit_square(), 5);
    let sub = render(&mut unit_square(), 5);
    let out = composite(&add, Some(&sub)).unwrap();
    let proj = square_projection();
    for y in 0..8 {
        for x in 0..8 {
            let m = out.median_at(x, y);
            assert!(m <= 0.5 + 1e-6, "({x}, {y}) = {m}");
            // away from the boundary band the field is pure background
            let p = proj.unproject(x, y);
            let to_edge = (p.x.abs() - 0.5).abs().min((p.y.abs() - 0.5).abs());
            if to_edge > 0.375 {
                assert!(m.abs() < 1e-6, "({x}, {y}) = {m}");
            }
        }
    }
}

#[test]
fn runs_are_bit_identical() {
    let config = MsdfConfig::default().with_error_correction(ErrorCorrection::ClashMedian {
        edge_threshold: 1.001,
    });
    let generator = MsdfGenerator::new(config);
    let run = || {
        let mut shape = Shape::from_anchor_loops(&[vec![
            Anchor::new(-0.5, -0.5, 0.2),
            Anchor::corner(0.5, -0.5),
            Anchor::new(0.5, 0.5, -0.1),
            Anchor::corner(-0.5, 0.5),
        ]]);
        generator.render(&mut shape, 42, 8, 8, &square_projection())
    };
    let a = run();
    let b = run();
    assert_eq!(a.pixels(), b.pixels());
    assert_eq!(a.to_rgba8(255), b.to_rgba8(255));
}

#[test]
fn projection_fit_frames_the_shape() {
    let mut shape = unit_square();
    let proj = Projection::fit(shape.bounds(), 16, 16, 2.0).unwrap();
    let b = MsdfGenerator::default().render(&mut shape, 0, 16, 16, &proj);
    assert!(b.median_at(8, 8) > 0.9);
    assert!(b.median_at(0, 0) < 0.1);
}
