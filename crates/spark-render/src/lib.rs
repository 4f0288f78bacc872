//! Spark Render - Software rasterizer for Spark particles
//!
//! `Raster` implements `spark_core::Canvas` over an in-memory RGBA image so
//! effects can be drawn and saved without a GPU or window.

mod raster;

pub use raster::Raster;
