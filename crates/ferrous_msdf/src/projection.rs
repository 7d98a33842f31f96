//! Pixel ↔ shape space mapping.

use glam::DVec2;

use crate::edge::Aabb;
use crate::geometry::Point;

/// Maps output pixels into shape space: `p = (pixel + 0.5) / scale - translate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub scale: DVec2,
    pub translate: DVec2,
    /// Output pixels per shape unit; also converts the pixel range into
    /// shape units.
    pub dpi: f64,
}

impl Projection {
    /// `scale = (dpi, dpi)` and `translate = source_offset / dpi`, where
    /// `source_offset` is given in output pixels.
    pub fn from_dpi(dpi: f64, source_offset: DVec2) -> Self {
        Self {
            scale: DVec2::splat(dpi),
            translate: source_offset / dpi,
            dpi,
        }
    }

    /// Largest uniform projection that centres `bounds` inside a
    /// `width × height` bitmap with `padding` pixels kept free on every side.
    /// `None` for empty bounds or when the padding eats the whole bitmap.
    pub fn fit(bounds: Aabb, width: u32, height: u32, padding: f64) -> Option<Self> {
        if bounds.is_empty() {
            return None;
        }
        let frame = DVec2::new(width as f64, height as f64) - DVec2::splat(2.0 * padding);
        if frame.x <= 0.0 || frame.y <= 0.0 {
            return None;
        }
        let size = bounds.size();
        let dpi = match (size.x > 0.0, size.y > 0.0) {
            (true, true) => (frame.x / size.x).min(frame.y / size.y),
            (true, false) => frame.x / size.x,
            (false, true) => frame.y / size.y,
            (false, false) => return None,
        };
        let centre = (bounds.min + bounds.max) * 0.5;
        let offset = DVec2::new(width as f64, height as f64) * 0.5 - centre * dpi;
        Some(Self::from_dpi(dpi, offset))
    }

    /// Shape-space position of the centre of pixel `(x, y)`.
    #[inline]
    pub fn unproject(&self, x: u32, y: u32) -> Point {
        (DVec2::new(x as f64, y as f64) + 0.5) / self.scale - self.translate
    }

    /// Inverse of [`Self::unproject`] (continuous, pixel centres at `.5`).
    pub fn project(&self, p: Point) -> DVec2 {
        (p + self.translate) * self.scale
    }

    /// Full width of the distance band in shape units for a range given in
    /// output pixels.
    #[inline]
    pub fn range_in_shape_units(&self, range: f64) -> f64 {
        range / self.dpi * 2.0
    }
}
