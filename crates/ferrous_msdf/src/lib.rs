//! Multi-channel signed distance field (MSDF) generation for FerrousEngine.
//!
//! Converts closed vector outlines (sprite anchor loops or glyph contours)
//! into RGB distance fields whose per-texel median reconstructs a sharp
//! boundary at any scale.
//!
//! ```text
//! Shape ─ validate ─ normalize ─ orient_contours ─ color_edges
//!       └─ generate_msdf ─ (composite) ─ (error correction) ─ Bitmap
//! ```
//!
//! | module        | role                                             |
//! |---------------|--------------------------------------------------|
//! | `geometry`    | vector helpers and polynomial root solvers       |
//! | `edge`        | linear / quadratic / cubic segments, distances   |
//! | `contour`     | closed edge loops and their winding              |
//! | `shape`       | validation, normalization, orientation           |
//! | `coloring`    | corner-aware channel assignment                  |
//! | `generator`   | per-pixel distances, overlapping contour combiner|
//! | `compositor`  | additive / subtractive merge                     |
//! | `correction`  | optional clash removal pass                      |
//! | `path`        | glyph commands and sprite anchors → shapes       |
//!
//! The crate performs no I/O; `ferrous_msdf_bake` turns job files into PNGs.

pub mod bitmap;
pub mod coloring;
pub mod compositor;
pub mod config;
pub mod contour;
pub mod correction;
pub mod edge;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod path;
pub mod projection;
pub mod shape;

pub use bitmap::{Bitmap, PixelSample};
pub use coloring::{color_contour, DEFAULT_ANGLE_THRESHOLD};
pub use compositor::{composite, composite_in_place};
pub use config::{MsdfConfig, DEFAULT_RANGE};
pub use contour::Contour;
pub use correction::{ErrorCorrection, DEFAULT_EDGE_THRESHOLD};
pub use edge::{Aabb, EdgeColor, EdgeSegment, SignedDistance};
pub use error::{MsdfError, Result};
pub use generator::{generate_msdf, prepare_shape, MsdfGenerator};
pub use geometry::Point;
pub use path::{Anchor, GlyphCommand, GlyphOutline};
pub use projection::Projection;
pub use shape::{Shape, ValidationReport};
