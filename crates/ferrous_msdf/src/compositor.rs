//! Additive / subtractive merge of two distance fields.
//!
//! A sprite may be authored as a filled shape plus a "cut-out" shape.  Both
//! are generated independently at the same size and merged per channel with
//! `min(add, 1 - sub)`, i.e. the intersection of the additive field with the
//! complement of the subtractive one.

use crate::bitmap::Bitmap;
use crate::error::{MsdfError, Result};
use crate::generator::MsdfGenerator;
use crate::projection::Projection;
use crate::shape::Shape;

/// Merge `sub` out of `add`.  With no subtractive bitmap the additive one is
/// returned unchanged.
pub fn composite(add: &Bitmap, sub: Option<&Bitmap>) -> Result<Bitmap> {
    let mut out = add.clone();
    if let Some(sub) = sub {
        composite_in_place(&mut out, sub)?;
    }
    Ok(out)
}

/// In-place variant of [`composite`].
pub fn composite_in_place(add: &mut Bitmap, sub: &Bitmap) -> Result<()> {
    if !add.same_size(sub) {
        return Err(MsdfError::DimensionMismatch {
            left_width: add.width(),
            left_height: add.height(),
            right_width: sub.width(),
            right_height: sub.height(),
        });
    }
    for (a, s) in add.pixels_mut().iter_mut().zip(sub.pixels()) {
        for c in 0..3 {
            a[c] = a[c].min(1.0 - s[c]);
        }
    }
    Ok(())
}

impl MsdfGenerator {
    /// Run the whole pipeline on the additive shape and, if present, on the
    /// subtractive one, then composite.  Both shapes are prepared with the
    /// same seed and projection.
    pub fn generate_composite(
        &self,
        add: &mut Shape,
        sub: Option<&mut Shape>,
        seed: u64,
        width: u32,
        height: u32,
        projection: &Projection,
    ) -> Result<Bitmap> {
        let mut out = self.render(add, seed, width, height, projection);
        if let Some(sub) = sub {
            let cut = self.render(sub, seed, width, height, projection);
            composite_in_place(&mut out, &cut)?;
        }
        Ok(out)
    }
}
