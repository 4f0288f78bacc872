//! Spark CLI - Headless runner for Spark particle effects

mod commands;
mod effect;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{forces, render, simulate};
use spark_core::Color;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spark")]
#[command(about = "Simulate and render 2D particle effects from TOML effect files", long_about = None)]
#[command(version)]
struct Cli {
    /// Log engine lifecycle events (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an effect headlessly and report its population over time
    Simulate {
        /// Path to effect file
        effect: PathBuf,

        /// Seconds to simulate
        #[arg(long, default_value = "5.0")]
        duration: f32,

        /// Fixed step in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,

        /// Random seed
        #[arg(long, default_value = "1")]
        seed: u64,
    },

    /// Run an effect for a while, then render one frame to a PNG image
    Render {
        /// Path to effect file
        effect: PathBuf,

        /// Output image path
        #[arg(short, long, default_value = "render.png")]
        output: PathBuf,

        /// Image width in pixels (default: from the effect file)
        #[arg(long)]
        width: Option<u32>,

        /// Image height in pixels (default: from the effect file)
        #[arg(long)]
        height: Option<u32>,

        /// Simulated seconds before the frame is captured
        #[arg(long, default_value = "2.0")]
        time: f32,

        /// Fixed step in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,

        /// Random seed
        #[arg(long, default_value = "1")]
        seed: u64,

        /// Background color, e.g. "#101018" (default: from the effect file)
        #[arg(long)]
        background: Option<Color>,
    },

    /// List the built-in force field algorithms
    Forces,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Simulate {
            effect,
            duration,
            dt,
            seed,
        } => simulate::run(simulate::SimulateArgs {
            effect,
            duration,
            dt,
            seed,
        }),
        Commands::Render {
            effect,
            output,
            width,
            height,
            time,
            dt,
            seed,
            background,
        } => render::run(render::RenderArgs {
            effect,
            output,
            width,
            height,
            time,
            dt,
            seed,
            background,
        }),
        Commands::Forces => forces::run(),
    }
}
