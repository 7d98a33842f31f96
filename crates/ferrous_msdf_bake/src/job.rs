//! TOML description of a bake run.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use ferrous_msdf::{Aabb, Anchor, MsdfConfig, Projection, Shape};
use serde::Deserialize;

/// One `[x, y, tension]` triple per anchor.
pub type AnchorLoop = Vec<[f64; 3]>;

fn default_output_dir() -> PathBuf {
    PathBuf::from("assets/msdf")
}

fn default_padding() -> f64 {
    2.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BakeJob {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub generator: MsdfConfig,
    #[serde(default, rename = "sprite")]
    pub sprites: Vec<SpriteJob>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpriteJob {
    pub name: String,
    /// Output bitmap size in pixels, `[width, height]`.
    pub size: [u32; 2],
    #[serde(default)]
    pub seed: u64,
    /// Free pixels kept around the shape when the projection is fitted.
    #[serde(default = "default_padding")]
    pub padding: f64,
    /// Fixed pixels-per-unit.  Without it the shape is fitted to the bitmap.
    #[serde(default)]
    pub dpi: Option<f64>,
    /// Pixel offset used together with `dpi`.
    #[serde(default)]
    pub offset: Option<[f64; 2]>,
    pub add: Vec<AnchorLoop>,
    #[serde(default)]
    pub subtract: Vec<AnchorLoop>,
}

impl BakeJob {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let job: Self = toml::from_str(source).context("malformed bake job")?;
        job.generator.validate()?;
        for sprite in &job.sprites {
            sprite
                .validate()
                .with_context(|| format!("sprite `{}`", sprite.name))?;
        }
        Ok(job)
    }
}

impl SpriteJob {
    fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.name.contains(['/', '\\']) {
            bail!("name must be a non-empty file stem");
        }
        if self.size[0] == 0 || self.size[1] == 0 {
            bail!("size must be non-zero, got {:?}", self.size);
        }
        if self.add.iter().all(|l| l.len() < 2) {
            bail!("needs at least one additive loop with two or more anchors");
        }
        if let Some(dpi) = self.dpi {
            if !(dpi.is_finite() && dpi > 0.0) {
                bail!("dpi must be positive, got {dpi}");
            }
        }
        Ok(())
    }

    pub fn add_shape(&self) -> Shape {
        Shape::from_anchor_loops(&anchor_loops(&self.add))
    }

    pub fn subtract_shape(&self) -> Option<Shape> {
        if self.subtract.is_empty() {
            None
        } else {
            Some(Shape::from_anchor_loops(&anchor_loops(&self.subtract)))
        }
    }

    /// Fixed projection when `dpi` is given, otherwise `bounds` fitted into
    /// the bitmap with `padding`.
    pub fn projection(&self, bounds: Aabb) -> Result<Projection> {
        let [width, height] = self.size;
        match self.dpi {
            Some(dpi) => {
                let [x, y] = self.offset.unwrap_or_default();
                Ok(Projection::from_dpi(dpi, [x, y].into()))
            }
            None => Projection::fit(bounds, width, height, self.padding).with_context(|| {
                format!(
                    "cannot fit the shape into {width}x{height} px with {} px padding",
                    self.padding
                )
            }),
        }
    }
}

fn anchor_loops(loops: &[AnchorLoop]) -> Vec<Vec<Anchor>> {
    loops
        .iter()
        .map(|l| l.iter().map(|&[x, y, t]| Anchor::new(x, y, t)).collect())
        .collect()
}
