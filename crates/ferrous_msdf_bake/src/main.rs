//! `ferrous_msdf_bake`: bake sprite outlines described in a TOML job into
//! MSDF PNGs.
//!
//! ```text
//! ferrous_msdf_bake <job.toml> [--out <DIR>] [-v | -vv | -q]
//! ```

mod job;
mod logging;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use ferrous_msdf::MsdfGenerator;
use log::LevelFilter;

use crate::job::{BakeJob, SpriteJob};

#[derive(Debug, Parser)]
#[command(name = "ferrous_msdf_bake", version, about = "Bake sprite outlines into MSDF PNGs")]
struct Args {
    /// TOML bake job.
    job: PathBuf,
    /// Output directory, overriding the job's `output_dir`.
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,
    /// More log output (`-v` debug, `-vv` trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Only warnings and errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Warn,
            (false, 0) => LevelFilter::Info,
            (false, 1) => LevelFilter::Debug,
            (false, _) => LevelFilter::Trace,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.level()).context("logger already installed")?;

    let source = fs::read_to_string(&args.job)
        .with_context(|| format!("reading {}", args.job.display()))?;
    let job = BakeJob::from_toml_str(&source)
        .with_context(|| format!("loading {}", args.job.display()))?;

    let out_dir = args.out.unwrap_or_else(|| job.output_dir.clone());
    fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let generator = MsdfGenerator::new(job.generator);
    for sprite in &job.sprites {
        let path = bake(&generator, sprite, &out_dir).with_context(|| format!("sprite `{}`", sprite.name))?;
        log::info!("wrote {}", path.display());
    }
    log::info!("baked {} sprites", job.sprites.len());
    Ok(())
}

fn bake(generator: &MsdfGenerator, sprite: &SpriteJob, out_dir: &Path) -> Result<PathBuf> {
    let [width, height] = sprite.size;
    let mut add = sprite.add_shape();
    let mut sub = sprite.subtract_shape();
    let projection = sprite.projection(add.bounds())?;
    log::debug!(
        "{}: {width}x{height} px, dpi {:.3}, {} edges",
        sprite.name,
        projection.dpi,
        add.edge_count()
    );

    let bitmap = generator.generate_composite(&mut add, sub.as_mut(), sprite.seed, width, height, &projection)?;
    let image = image::RgbaImage::from_raw(width, height, bitmap.to_rgba8(u8::MAX))
        .context("bitmap does not match the sprite size")?;
    let path = out_dir.join(format!("{}.png", sprite.name));
    image
        .save(&path)
        .with_context(|| format!("saving {}", path.display()))?;
    Ok(path)
}
