//! Corner-aware channel assignment ("simple" edge coloring).
//!
//! Each edge gets a two-channel color.  Wherever two edges meet at a sharp
//! corner they must share exactly one channel, so that the median of the
//! three channels keeps the corner sharp after bilinear filtering.

use glam::DVec2;

use crate::contour::Contour;
use crate::edge::EdgeColor;
use crate::geometry::cross;

/// Default corner angle threshold, in radians.
///
/// Empirically tuned: the comparison uses `sin(3.0) ≈ 0.141`, so any
/// direction change of more than about 8° (or any turn of 90° and above)
/// counts as a corner.
pub const DEFAULT_ANGLE_THRESHOLD: f64 = 3.0;

/// Colors of the three regions of a one-corner contour, starting at the
/// corner.
const TEARDROP_COLORS: [EdgeColor; 3] = [EdgeColor::MAGENTA, EdgeColor::YELLOW, EdgeColor::CYAN];

fn is_corner(a: DVec2, b: DVec2, cross_threshold: f64) -> bool {
    a.dot(b) <= 0.0 || cross(a, b).abs() > cross_threshold
}

/// Move `color` to another two-channel color, consuming entropy from `seed`.
///
/// If `color & banned` is a single channel the result is its complement,
/// which differs from both `color` and `banned`.  Black and white start the
/// sequence at a seeded pick among cyan, magenta and yellow.
fn switch_color(color: &mut EdgeColor, seed: &mut u64, banned: EdgeColor) {
    let combined = *color & banned;
    if combined == EdgeColor::RED || combined == EdgeColor::GREEN || combined == EdgeColor::BLUE {
        *color = combined ^ EdgeColor::WHITE;
        return;
    }
    if *color == EdgeColor::BLACK || *color == EdgeColor::WHITE {
        const START: [EdgeColor; 3] = [EdgeColor::CYAN, EdgeColor::MAGENTA, EdgeColor::YELLOW];
        *color = START[(*seed % 3) as usize];
        *seed /= 3;
        return;
    }
    let shifted = u32::from(color.bits()) << (1 + (*seed & 1));
    *color = EdgeColor::from_bits(((shifted | (shifted >> 3)) & 7) as u8);
    *seed >>= 1;
}

/// Indices of edges whose start vertex is a corner.
pub fn find_corners(contour: &Contour, angle_threshold: f64) -> Vec<usize> {
    let cross_threshold = angle_threshold.sin();
    let Some(last) = contour.edges.last() else {
        return Vec::new();
    };
    let mut corners = Vec::new();
    let mut prev_direction = last.direction_at(1.0);
    for (index, edge) in contour.edges.iter().enumerate() {
        if is_corner(
            prev_direction.normalize_or_zero(),
            edge.direction_at(0.0).normalize_or_zero(),
            cross_threshold,
        ) {
            corners.push(index);
        }
        prev_direction = edge.direction_at(1.0);
    }
    corners
}

/// Color one contour in place.
///
/// * no corners: one seeded two-channel color everywhere;
/// * one corner (teardrop): magenta, yellow and cyan regions starting at the
///   corner, splitting edges in thirds if there are fewer than three;
/// * several corners: the color switches at every corner, and the last run
///   is forced to differ from the first so the seam where the loop closes
///   is a proper corner too.
///
/// `seed` is advanced as colors are drawn; the result is a pure function of
/// the contour and the incoming seed.
pub fn color_contour(contour: &mut Contour, angle_threshold: f64, seed: &mut u64) {
    let corners = find_corners(contour, angle_threshold);
    match corners.len() {
        0 if contour.is_empty() => {}
        0 => {
            let mut color = EdgeColor::WHITE;
            switch_color(&mut color, seed, EdgeColor::BLACK);
            for edge in &mut contour.edges {
                edge.set_color(color);
            }
        }
        1 => color_teardrop(contour, corners[0]),
        _ => color_splines(contour, &corners, seed),
    }
}

fn color_teardrop(contour: &mut Contour, corner: usize) {
    let m = contour.edges.len();
    if m >= 3 {
        for i in 0..m {
            // symmetric trichotomy of the loop starting at the corner
            let region = (3.0 + 2.875 * i as f64 / (m - 1) as f64 - 1.4375 + 0.5) as usize - 2;
            contour.edges[(corner + i) % m].set_color(TEARDROP_COLORS[region.min(2)]);
        }
        return;
    }

    // Fewer edges than colors: cut every edge in thirds, starting at the one
    // that follows the corner.
    let [c0, c1, c2] = TEARDROP_COLORS;
    let mut parts = Vec::with_capacity(6);
    for k in 0..m {
        parts.extend(contour.edges[(corner + k) % m].split_in_thirds());
    }
    let colors: &[EdgeColor] = if m == 1 {
        &[c0, c1, c2]
    } else {
        &[c0, c0, c1, c1, c2, c2]
    };
    for (part, color) in parts.iter_mut().zip(colors) {
        part.set_color(*color);
    }
    contour.edges = parts;
}

fn color_splines(contour: &mut Contour, corners: &[usize], seed: &mut u64) {
    let corner_count = corners.len();
    let m = contour.edges.len();
    let start = corners[0];
    let mut spline = 0;
    let mut color = EdgeColor::WHITE;
    switch_color(&mut color, seed, EdgeColor::BLACK);
    let initial = color;
    for i in 0..m {
        let index = (start + i) % m;
        if spline + 1 < corner_count && corners[spline + 1] == index {
            spline += 1;
            let banned = if spline == corner_count - 1 {
                initial
            } else {
                EdgeColor::BLACK
            };
            switch_color(&mut color, seed, banned);
        }
        contour.edges[index].set_color(color);
    }
}
