//! Float RGB output buffer and its conversion to the RGBA8 layout the atlas
//! textures use.

use crate::error::{MsdfError, Result};
use crate::geometry::median;

/// One output texel: signed distances mapped to `[0, 1]`, `0.5` on the
/// boundary, above `0.5` inside.
pub type PixelSample = [f32; 3];

/// Row-major `width × height` grid of [`PixelSample`]s.  Row 0 corresponds
/// to the smallest shape-space y.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<PixelSample>,
}

impl Bitmap {
    /// A bitmap filled with the background value (fully outside).
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0.0; 3])
    }

    pub fn filled(width: u32, height: u32, value: PixelSample) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn same_size(&self, other: &Bitmap) -> bool {
        self.width == other.width && self.height == other.height
    }

    pub fn pixels(&self) -> &[PixelSample] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [PixelSample] {
        &mut self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> PixelSample {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, value: PixelSample) {
        let i = self.index(x, y);
        self.pixels[i] = value;
    }

    /// `median(r, g, b)`: the value the shader reconstructs.
    pub fn median_at(&self, x: u32, y: u32) -> f32 {
        let [r, g, b] = self.get(x, y);
        median(r, g, b)
    }

    /// Pack into RGBA8 with a constant alpha.
    pub fn to_rgba8(&self, alpha: u8) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for [r, g, b] in &self.pixels {
            out.extend_from_slice(&[to_byte(*r), to_byte(*g), to_byte(*b), alpha]);
        }
        out
    }

    /// Write this bitmap as an RGBA8 region at `(x, y)` of a caller-owned
    /// buffer that is `dst_width` texels wide and `dst_height` rows tall.
    pub fn blit_rgba8(
        &self,
        dst: &mut [u8],
        dst_width: u32,
        dst_height: u32,
        x: u32,
        y: u32,
        alpha: u8,
    ) -> Result<()> {
        let expected = dst_width as usize * dst_height as usize * 4;
        if dst.len() != expected {
            return Err(MsdfError::BufferSize {
                expected,
                actual: dst.len(),
            });
        }
        let fits_x = x.checked_add(self.width).is_some_and(|end| end <= dst_width);
        let fits_y = y.checked_add(self.height).is_some_and(|end| end <= dst_height);
        if !(fits_x && fits_y) {
            return Err(MsdfError::RegionOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
                dst_width,
                dst_height,
            });
        }

        let row_bytes = self.width as usize * 4;
        let src = self.to_rgba8(alpha);
        for row in 0..self.height as usize {
            let d = ((y as usize + row) * dst_width as usize + x as usize) * 4;
            let s = row * row_bytes;
            dst[d..d + row_bytes].copy_from_slice(&src[s..s + row_bytes]);
        }
        Ok(())
    }
}

fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}
