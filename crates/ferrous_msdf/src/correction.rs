//! Optional clash correction pass.
//!
//! Bilinear filtering between two texels whose channels disagree about which
//! edge is nearest can make the reconstructed median cross 0.5 where there is
//! no edge.  The clash pass finds such neighbour pairs and flattens the texel
//! farther from the edge to its median.  That removes the artefact but also
//! rounds the corner it belonged to, so the pass stays off unless a job asks
//! for it.

use glam::DVec2;
use serde::Deserialize;

use crate::bitmap::{Bitmap, PixelSample};
use crate::projection::Projection;

/// Default clash threshold, in texels.
pub const DEFAULT_EDGE_THRESHOLD: f64 = 1.001;

fn default_edge_threshold() -> f64 {
    DEFAULT_EDGE_THRESHOLD
}

/// Post-processing applied to a finished bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ErrorCorrection {
    #[default]
    Disabled,
    ClashMedian {
        #[serde(default = "default_edge_threshold")]
        edge_threshold: f64,
    },
}

impl ErrorCorrection {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Run the pass.  Returns the number of texels that were rewritten.
    pub fn apply(&self, bitmap: &mut Bitmap, projection: &Projection, range: f64) -> usize {
        match *self {
            Self::Disabled => 0,
            Self::ClashMedian { edge_threshold } => {
                let range_units = projection.range_in_shape_units(range);
                let threshold = DVec2::splat(edge_threshold) / (projection.scale * range_units);
                let corrected = correct_clashes(bitmap, threshold);
                if corrected > 0 {
                    log::debug!("clash correction rewrote {corrected} texels");
                }
                corrected
            }
        }
    }
}

/// Two-pass clash removal: direct neighbours first (with per-axis
/// thresholds), then diagonals (with their sum).
pub fn correct_clashes(bitmap: &mut Bitmap, threshold: DVec2) -> usize {
    let (tx, ty) = (threshold.x as f32, threshold.y as f32);
    let direct: [(i64, i64, f32); 4] = [(-1, 0, tx), (1, 0, tx), (0, -1, ty), (0, 1, ty)];
    let diagonal = [(-1, -1), (1, -1), (-1, 1), (1, 1)].map(|(dx, dy)| (dx, dy, tx + ty));

    let mut total = 0;
    for offsets in [direct, diagonal] {
        let clashes = find_clashes(bitmap, &offsets);
        total += clashes.len();
        for (x, y) in clashes {
            let m = bitmap.median_at(x, y);
            bitmap.set(x, y, [m; 3]);
        }
    }
    total
}

fn find_clashes(bitmap: &Bitmap, offsets: &[(i64, i64, f32)]) -> Vec<(u32, u32)> {
    let (w, h) = (i64::from(bitmap.width()), i64::from(bitmap.height()));
    let mut clashes = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let here = bitmap.get(x as u32, y as u32);
            let clash = offsets.iter().any(|&(dx, dy, threshold)| {
                let (nx, ny) = (x + dx, y + dy);
                (0..w).contains(&nx)
                    && (0..h).contains(&ny)
                    && detect_clash(here, bitmap.get(nx as u32, ny as u32), threshold)
            });
            if clash {
                clashes.push((x as u32, y as u32));
            }
        }
    }
    clashes
}

/// Does texel `a` clash with its neighbour `b`?
///
/// Channels are paired and ordered by decreasing `|b - a|`; a clash needs the
/// second largest difference to reach `threshold`.  Only the texel farther
/// from the edge is flagged, and a neighbour already flattened to grey is
/// left alone.
fn detect_clash(a: PixelSample, b: PixelSample, threshold: f32) -> bool {
    let mut pairs = [(a[0], b[0]), (a[1], b[1]), (a[2], b[2])];
    pairs.sort_by(|p, q| (q.1 - q.0).abs().total_cmp(&(p.1 - p.0).abs()));
    let [(_, b0), (a1, b1), (a2, b2)] = pairs;
    (b1 - a1).abs() >= threshold
        && !(b0 == b1 && b0 == b2)
        && (a2 - 0.5).abs() >= (b2 - 0.5).abs()
}
