//! Spark Core - Foundational types for the Spark particle engine
//!
//! This crate provides the types every other Spark crate depends on:
//! - `Vec2` and helpers - 2D value-type vector math
//! - `Color`, `ColorSource` - RGBA colors and per-particle color choice
//! - `ParticleRng`, `RandomRange`, `Param` - seeded sampling and parameter sources
//! - `Canvas` - the raster render-target contract particles draw into
//! - Error types and Result alias

mod canvas;
mod error;
mod param;
mod random;
mod types;

pub use canvas::{Canvas, ImageId};
pub use error::{Result, SparkError};
pub use param::{ColorSource, Generator, Param, RandomRange, Sample};
pub use random::ParticleRng;
pub use types::{heading, rotate, Color, Vec2};
