//! Step an effect, then draw a single frame to PNG

use crate::effect::EffectFile;
use anyhow::{Context, Result};
use spark_core::Color;
use spark_render::Raster;
use std::path::PathBuf;
use tracing::debug;

pub struct RenderArgs {
    pub effect: PathBuf,
    pub output: PathBuf,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub time: f32,
    pub dt: f32,
    pub seed: u64,
    pub background: Option<Color>,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let effect = EffectFile::load(&args.effect)?;
    let mut system = effect.build(args.seed)?;
    println!("Loaded effect: {}", args.effect.display());

    super::step_for(&mut system, args.time, args.dt, |_, _| {})?;

    let width = args.width.unwrap_or(effect.canvas.width);
    let height = args.height.unwrap_or(effect.canvas.height);
    let background = args.background.unwrap_or(effect.canvas.background);
    debug!(width, height, %background, "rasterizing frame");
    let mut raster = Raster::with_background(width, height, background);
    system.draw(&mut raster).context("Failed to draw particles")?;

    raster
        .save_png(&args.output)
        .with_context(|| format!("Failed to write '{}'", args.output.display()))?;
    println!(
        "Rendered {} particle(s) at t={:.2}s to {} ({}x{})",
        system.particle_count(),
        args.time,
        args.output.display(),
        width,
        height
    );
    Ok(())
}
