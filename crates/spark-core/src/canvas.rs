//! Raster render-target contract
//!
//! Particles draw themselves through this trait. It mirrors the small subset of a
//! 2D immediate-mode canvas the engine needs: a save/restore transform stack,
//! global alpha, a glow (shadow) setting and a handful of primitives.

use crate::types::{Color, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to an image the host registered with its render target
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub String);

impl ImageId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait Canvas {
    /// Push the current transform, alpha and glow state
    fn save(&mut self);

    /// Pop the state pushed by the matching `save`
    fn restore(&mut self);

    fn translate(&mut self, offset: Vec2);

    /// Rotate subsequent drawing by `angle` radians
    fn rotate(&mut self, angle: f32);

    /// Alpha multiplier applied to everything drawn until the next restore
    fn set_global_alpha(&mut self, alpha: f32);

    /// Soft glow around subsequent shapes. A zero blur disables it.
    fn set_glow(&mut self, color: Color, blur: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Radial gradient disc from `inner` at the center to `outer` at `radius`
    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, inner: Color, outer: Color);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);

    /// Draw a registered image with its top-left corner at `origin`
    fn draw_image(&mut self, image: &ImageId, origin: Vec2, size: Vec2);
}
