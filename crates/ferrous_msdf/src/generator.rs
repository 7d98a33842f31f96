//! Multi-channel signed distance field generation.
//!
//! For every output pixel the generator finds, per contour and per channel,
//! the nearest edge carrying that channel, then combines the per-contour
//! results so that overlapping and nested contours produce a single
//! consistent field (the *overlapping contour combiner*).  The winning
//! triple is written as-is, never recomposed channel by channel, so the
//! three channels always describe the same edge corner.

use crate::bitmap::{Bitmap, PixelSample};
use crate::config::MsdfConfig;
use crate::contour::Contour;
use crate::edge::{EdgeSegment, SignedDistance};
use crate::geometry::{median, Point};
use crate::projection::Projection;
use crate::shape::{Shape, ValidationReport};

// ── Pipeline ────────────────────────────────────────────────────────────────

/// Validate, normalize, orient and color `shape` so it is ready for
/// [`generate_msdf`].
pub fn prepare_shape(shape: &mut Shape, seed: u64, angle_threshold: f64) -> ValidationReport {
    let report = shape.validate();
    shape.normalize();
    shape.orient_contours();
    shape.color_edges(angle_threshold, seed);
    report
}

/// Bundles an [`MsdfConfig`] with the pipeline stages.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MsdfGenerator {
    config: MsdfConfig,
}

impl MsdfGenerator {
    pub fn new(config: MsdfConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MsdfConfig {
        &self.config
    }

    pub fn prepare(&self, shape: &mut Shape, seed: u64) -> ValidationReport {
        prepare_shape(shape, seed, self.config.angle_threshold)
    }

    /// Generate a bitmap for an already prepared shape and run the
    /// configured error correction over it.
    pub fn generate(&self, shape: &Shape, width: u32, height: u32, projection: &Projection) -> Bitmap {
        let mut bitmap = generate_msdf(shape, width, height, projection, self.config.range);
        self.config
            .error_correction
            .apply(&mut bitmap, projection, self.config.range);
        bitmap
    }

    /// [`Self::prepare`] followed by [`Self::generate`].
    pub fn render(
        &self,
        shape: &mut Shape,
        seed: u64,
        width: u32,
        height: u32,
        projection: &Projection,
    ) -> Bitmap {
        self.prepare(shape, seed);
        self.generate(shape, width, height, projection)
    }
}

// ── Generation ──────────────────────────────────────────────────────────────

/// Fill a `width × height` bitmap with the multi-channel distance field of
/// `shape`.
///
/// `range` is the width of the distance band in output pixels.  Distances
/// are mapped with `clamp(0.5 + d / range_in_shape_units, 0, 1)`.  A shape
/// without edges, or a degenerate projection, yields an all-background
/// bitmap.
pub fn generate_msdf(
    shape: &Shape,
    width: u32,
    height: u32,
    projection: &Projection,
    range: f64,
) -> Bitmap {
    let mut bitmap = Bitmap::new(width, height);
    if width == 0 || height == 0 || shape.is_empty() {
        return bitmap;
    }
    let range_units = projection.range_in_shape_units(range);
    if !(range_units.is_finite() && range_units > 0.0) {
        log::warn!("generate_msdf: unusable range {range} at dpi {}", projection.dpi);
        return bitmap;
    }

    if !shape.is_oriented() {
        log::debug!("generate_msdf: shape was not oriented, nested contours may render filled");
    }

    let windings: Vec<i32> = shape.contours.iter().map(Contour::winding).collect();
    let rows = RowContext {
        contours: &shape.contours,
        windings: &windings,
        projection,
        range_units,
    };

    #[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
    {
        use rayon::prelude::*;
        bitmap
            .pixels_mut()
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| rows.fill(row, y as u32));
    }
    #[cfg(not(all(feature = "parallel", not(target_arch = "wasm32"))))]
    for (y, row) in bitmap.pixels_mut().chunks_mut(width as usize).enumerate() {
        rows.fill(row, y as u32);
    }

    log::trace!(
        "generate_msdf: {width}x{height}, {} contours, {} edges",
        shape.contours.len(),
        shape.edge_count()
    );
    bitmap
}

/// Read-only state shared by every row.
struct RowContext<'a> {
    contours: &'a [Contour],
    windings: &'a [i32],
    projection: &'a Projection,
    range_units: f64,
}

impl RowContext<'_> {
    fn fill(&self, row: &mut [PixelSample], y: u32) {
        let mut scratch = Vec::with_capacity(self.contours.len());
        for (x, texel) in row.iter_mut().enumerate() {
            let p = self.projection.unproject(x as u32, y);
            let msd = pixel_distance(self.contours, self.windings, p, &mut scratch);
            *texel = [
                to_unit(msd.r, self.range_units),
                to_unit(msd.g, self.range_units),
                to_unit(msd.b, self.range_units),
            ];
        }
    }
}

fn to_unit(distance: f64, range_units: f64) -> f32 {
    let v = 0.5 + distance / range_units;
    if v.is_finite() {
        v.clamp(0.0, 1.0) as f32
    } else {
        0.0
    }
}

// ── Per-pixel distance ──────────────────────────────────────────────────────

/// Signed distances of one pixel in each channel, plus their median.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MultiDistance {
    r: f64,
    g: f64,
    b: f64,
    med: f64,
}

impl MultiDistance {
    const INFINITE: Self = Self {
        r: SignedDistance::INFINITE.distance,
        g: SignedDistance::INFINITE.distance,
        b: SignedDistance::INFINITE.distance,
        med: SignedDistance::INFINITE.distance,
    };

    fn new(r: f64, g: f64, b: f64) -> Self {
        Self {
            r,
            g,
            b,
            med: median(r, g, b),
        }
    }
}

/// Nearest edge seen so far for one channel.
#[derive(Clone, Copy)]
struct ChannelSelector<'a> {
    distance: SignedDistance,
    nearest: Option<(&'a EdgeSegment, f64)>,
}

impl<'a> ChannelSelector<'a> {
    const EMPTY: Self = Self {
        distance: SignedDistance::INFINITE,
        nearest: None,
    };

    fn consider(&mut self, edge: &'a EdgeSegment, distance: SignedDistance, param: f64) {
        if distance.distance.is_finite() && distance.is_closer_than(&self.distance) {
            self.distance = distance;
            self.nearest = Some((edge, param));
        }
    }

    fn merge(&mut self, other: &Self) {
        if other.distance.is_closer_than(&self.distance) {
            *self = *other;
        }
    }

    /// Pseudo-distance to the winning edge.
    fn resolve(&self, p: Point) -> f64 {
        match self.nearest {
            Some((edge, param)) => {
                let mut distance = self.distance;
                edge.distance_to_pseudo_distance(&mut distance, p, param);
                distance.distance
            }
            None => SignedDistance::INFINITE.distance,
        }
    }
}

#[derive(Clone, Copy)]
struct EdgeSelector<'a> {
    r: ChannelSelector<'a>,
    g: ChannelSelector<'a>,
    b: ChannelSelector<'a>,
}

impl<'a> EdgeSelector<'a> {
    const EMPTY: Self = Self {
        r: ChannelSelector::EMPTY,
        g: ChannelSelector::EMPTY,
        b: ChannelSelector::EMPTY,
    };

    fn add(&mut self, edge: &'a EdgeSegment, p: Point) {
        let color = edge.color();
        if color.channel_count() == 0 {
            return;
        }
        let (distance, param) = edge.signed_distance(p);
        if color.has_red() {
            self.r.consider(edge, distance, param);
        }
        if color.has_green() {
            self.g.consider(edge, distance, param);
        }
        if color.has_blue() {
            self.b.consider(edge, distance, param);
        }
    }

    fn merge(&mut self, other: &Self) {
        self.r.merge(&other.r);
        self.g.merge(&other.g);
        self.b.merge(&other.b);
    }

    fn distance(&self, p: Point) -> MultiDistance {
        MultiDistance::new(self.r.resolve(p), self.g.resolve(p), self.b.resolve(p))
    }
}

/// Distance triple of one pixel after combining every contour.
fn pixel_distance(
    contours: &[Contour],
    windings: &[i32],
    p: Point,
    scratch: &mut Vec<MultiDistance>,
) -> MultiDistance {
    scratch.clear();
    let mut whole = EdgeSelector::EMPTY;
    for contour in contours {
        let mut selector = EdgeSelector::EMPTY;
        for edge in &contour.edges {
            selector.add(edge, p);
        }
        whole.merge(&selector);
        scratch.push(selector.distance(p));
    }
    combine(scratch, windings, whole.distance(p))
}

/// Overlapping contour combiner.
///
/// `contour_sd[i]` is the distance triple of contour `i`, whose winding is
/// `windings[i]`; `shape_sd` is the triple obtained from the nearest edges
/// of the whole shape.
fn combine(contour_sd: &[MultiDistance], windings: &[i32], shape_sd: MultiDistance) -> MultiDistance {
    let mut inner = MultiDistance::INFINITE;
    let mut outer = MultiDistance::INFINITE;
    for (sd, &winding) in contour_sd.iter().zip(windings) {
        if winding > 0 && sd.med >= 0.0 && sd.med.abs() < inner.med.abs() {
            inner = *sd;
        }
        if winding < 0 && sd.med <= 0.0 && sd.med.abs() < outer.med.abs() {
            outer = *sd;
        }
    }

    let (mut msd, winding) = if inner.med >= 0.0 && inner.med.abs() <= outer.med.abs() {
        // inside some positive contour: keep the deepest overlap that is
        // still nearer than the nearest hole
        let mut msd = inner;
        for (sd, &w) in contour_sd.iter().zip(windings) {
            if w > 0 && sd.med.abs() < outer.med.abs() && sd.med > msd.med {
                msd = *sd;
            }
        }
        (msd, 1)
    } else if outer.med <= 0.0 && outer.med.abs() < inner.med.abs() {
        let mut msd = outer;
        for (sd, &w) in contour_sd.iter().zip(windings) {
            if w < 0 && sd.med.abs() < inner.med.abs() && sd.med < msd.med {
                msd = *sd;
            }
        }
        (msd, -1)
    } else {
        // no contour with a usable orientation claims the point
        (shape_sd, 0)
    };

    for (sd, &w) in contour_sd.iter().zip(windings) {
        if w != winding && sd.med.abs() < msd.med.abs() {
            msd = *sd;
        }
    }

    if shape_sd.med == msd.med {
        msd = shape_sd;
    }
    msd
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_RANGE;
    use crate::edge::EdgeSegment;
    use glam::DVec2;

    fn p(x: f64, y: f64) -> DVec2 {
        DVec2::new(x, y)
    }

    fn square(half: f64) -> Contour {
        Contour::polygon(&[p(-half, -half), p(half, -half), p(half, half), p(-half, half)])
    }

    fn unit_square_field(seed: u64) -> Bitmap {
        let mut shape = Shape::from_contours(vec![square(0.5)]);
        prepare_shape(&mut shape, seed, crate::coloring::DEFAULT_ANGLE_THRESHOLD);
        let proj = Projection::from_dpi(4.0, DVec2::splat(3.5));
        generate_msdf(&shape, 8, 8, &proj, DEFAULT_RANGE)
    }

    #[test]
    fn unit_square_boundary_centre_and_outside() {
        let b = unit_square_field(0);
        assert!((b.median_at(1, 3) - 0.5).abs() < 1e-4, "{:?}", b.get(1, 3));
        assert!((b.median_at(3, 3) - 1.0).abs() < 1e-4);
        assert!(b.median_at(7, 7).abs() < 1e-4);
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(unit_square_field(3), unit_square_field(3));
    }

    #[test]
    fn coverage_does_not_depend_on_seed() {
        let inside = |b: &Bitmap| -> Vec<bool> {
            (0..8)
                .flat_map(|y| (0..8).map(move |x| (x, y)))
                .map(|(x, y)| b.median_at(x, y) > 0.5)
                .collect()
        };
        let reference = inside(&unit_square_field(0));
        for seed in 1..6 {
            assert_eq!(inside(&unit_square_field(seed)), reference);
        }
    }

    #[test]
    fn empty_shape_is_background() {
        let proj = Projection::from_dpi(4.0, DVec2::ZERO);
        let b = generate_msdf(&Shape::new(), 4, 4, &proj, DEFAULT_RANGE);
        assert_eq!(b, Bitmap::new(4, 4));
    }

    #[test]
    fn hole_reads_as_outside() {
        // inner square given with the same orientation as the outer one;
        // orientation has to turn it into a hole
        let mut shape = Shape::from_contours(vec![square(1.0), square(0.5)]);
        let generator = MsdfGenerator::default();
        let proj = Projection::from_dpi(4.0, DVec2::splat(4.5));
        let b = generator.render(&mut shape, 0, 10, 10, &proj);

        assert!(b.median_at(4, 4) < 0.5, "hole centre {:?}", b.get(4, 4));
        assert!(b.median_at(7, 4) > 0.5, "ring {:?}", b.get(7, 4));
        assert!(b.median_at(9, 4) < 0.5, "outside {:?}", b.get(9, 4));
    }

    #[test]
    fn overlapping_contours_read_as_union() {
        // two overlapping squares, both positive
        let right = Contour::polygon(&[p(0.0, -0.5), p(1.0, -0.5), p(1.0, 0.5), p(0.0, 0.5)]);
        let mut shape = Shape::from_contours(vec![square(0.5), right]);
        let generator = MsdfGenerator::default();
        let proj = Projection::from_dpi(4.0, DVec2::new(4.5, 4.5));
        let b = generator.render(&mut shape, 0, 12, 10, &proj);

        // x = 0.25 lies inside both; the buried edges must not leak through
        assert!(b.median_at(5, 4) > 0.5, "{:?}", b.get(5, 4));
        assert!(b.median_at(6, 4) > 0.5, "{:?}", b.get(6, 4));
        assert!(b.median_at(10, 4) < 0.5);
    }

    #[test]
    fn curved_contour() {
        let k = 0.552_284_749_8;
        let circle = Contour::from_edges(vec![
            EdgeSegment::cubic(p(1.0, 0.0), p(1.0, k), p(k, 1.0), p(0.0, 1.0)),
            EdgeSegment::cubic(p(0.0, 1.0), p(-k, 1.0), p(-1.0, k), p(-1.0, 0.0)),
            EdgeSegment::cubic(p(-1.0, 0.0), p(-1.0, -k), p(-k, -1.0), p(0.0, -1.0)),
            EdgeSegment::cubic(p(0.0, -1.0), p(k, -1.0), p(1.0, -k), p(1.0, 0.0)),
        ]);
        let mut shape = Shape::from_contours(vec![circle]);
        let proj = Projection::from_dpi(4.0, DVec2::splat(6.5));
        let b = MsdfGenerator::default().render(&mut shape, 1, 13, 13, &proj);
        // pixel 6 maps to 0, pixel 10 to 1.0 (on the circle)
        assert!((b.median_at(6, 6) - 1.0).abs() < 1e-4);
        assert!((b.median_at(10, 6) - 0.5).abs() < 1e-3, "{:?}", b.get(10, 6));
        assert!(b.median_at(12, 12) < 1e-4);
    }

    #[test]
    fn combiner_prefers_the_hole_inside_a_hole() {
        let outer = MultiDistance::new(1.0, 1.0, 1.0);
        let hole = MultiDistance::new(-0.5, -0.5, -0.5);
        let msd = combine(&[outer, hole], &[1, -1], hole);
        assert_eq!(msd, hole);
    }

    #[test]
    fn combiner_falls_back_to_the_nearest_edge() {
        let flat = MultiDistance::new(0.3, 0.4, 0.5);
        assert_eq!(combine(&[flat], &[0], flat), flat);
    }

    #[test]
    fn bumps_on_a_flat_baseline_are_filled() {
        // every vertex sits on y = 0; only the curves enclose area
        let bumps = Contour::from_edges(vec![
            EdgeSegment::quadratic(p(2.0, 0.0), p(1.5, 2.0), p(1.0, 0.0)),
            EdgeSegment::quadratic(p(1.0, 0.0), p(0.5, 2.0), p(0.0, 0.0)),
            EdgeSegment::linear(p(0.0, 0.0), p(2.0, 0.0)),
        ]);
        let mut shape = Shape::from_contours(vec![bumps]);
        let proj = Projection::from_dpi(8.0, DVec2::splat(2.0));
        let b = MsdfGenerator::default().render(&mut shape, 0, 20, 12, &proj);

        let inside = proj.unproject(6, 4);
        assert!(shape.contains(inside));
        assert!(b.median_at(6, 4) > 0.5, "{:?}", b.get(6, 4));
        // above the valley between the bumps
        assert!(!shape.contains(proj.unproject(9, 10)));
        assert!(b.median_at(9, 10) < 0.5, "{:?}", b.get(9, 10));
    }

    #[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
    #[test]
    fn parallel_rows_match_a_serial_pass() {
        let mut shape = Shape::from_contours(vec![square(1.0), square(0.5)]);
        prepare_shape(&mut shape, 7, crate::coloring::DEFAULT_ANGLE_THRESHOLD);
        let proj = Projection::from_dpi(6.0, DVec2::splat(7.5));
        let (width, height) = (15, 17);
        let parallel = generate_msdf(&shape, width, height, &proj, DEFAULT_RANGE);

        let windings: Vec<i32> = shape.contours.iter().map(Contour::winding).collect();
        let rows = RowContext {
            contours: &shape.contours,
            windings: &windings,
            projection: &proj,
            range_units: proj.range_in_shape_units(DEFAULT_RANGE),
        };
        let mut serial = Bitmap::new(width, height);
        for (y, row) in serial.pixels_mut().chunks_mut(width as usize).enumerate() {
            rows.fill(row, y as u32);
        }
        assert_eq!(parallel.pixels(), serial.pixels());
    }
}
