//! Parameter sources: fixed values, random ranges and generator callbacks

use crate::random::ParticleRng;
use crate::types::{Color, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Values that can be sampled uniformly between two bounds
pub trait Sample: Copy {
    fn sample(rng: &mut ParticleRng, min: Self, max: Self) -> Self;
}

impl Sample for f32 {
    fn sample(rng: &mut ParticleRng, min: Self, max: Self) -> Self {
        rng.range(min, max)
    }
}

impl Sample for Vec2 {
    fn sample(rng: &mut ParticleRng, min: Self, max: Self) -> Self {
        rng.range_vec2(min, max)
    }
}

/// Inclusive-exclusive bounds, resolved once when a particle is created
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: Sample> RandomRange<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut ParticleRng) -> T {
        T::sample(rng, self.min, self.max)
    }
}

/// Callback invoked with the particle's index within the current emission batch
pub type Generator<T> = Arc<dyn Fn(usize) -> T + Send + Sync>;

/// Where a particle-generation parameter gets its value from.
///
/// `Fixed` and `Range` are resolved once at creation time; a `Generator` is
/// called every time a value is needed.
#[derive(Clone)]
pub enum Param<T> {
    Fixed(T),
    Range(RandomRange<T>),
    Generator(Generator<T>),
}

impl<T: Sample> Param<T> {
    pub fn range(min: T, max: T) -> Self {
        Param::Range(RandomRange::new(min, max))
    }

    pub fn generator(f: impl Fn(usize) -> T + Send + Sync + 'static) -> Self {
        Param::Generator(Arc::new(f))
    }

    /// Resolve a concrete value; `n` is the index within the emission batch
    pub fn resolve(&self, rng: &mut ParticleRng, n: usize) -> T {
        match self {
            Param::Fixed(value) => *value,
            Param::Range(range) => range.sample(rng),
            Param::Generator(f) => f(n),
        }
    }
}

impl From<f32> for Param<f32> {
    fn from(value: f32) -> Self {
        Param::Fixed(value)
    }
}

impl From<Vec2> for Param<Vec2> {
    fn from(value: Vec2) -> Self {
        Param::Fixed(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Param<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Param::Range(range) => f.debug_tuple("Range").field(range).finish(),
            Param::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

/// A color, or a palette one color is picked from per particle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSource {
    Fixed(Color),
    Choice(Vec<Color>),
}

impl ColorSource {
    /// Pick the color for a new particle. An empty palette yields white.
    pub fn resolve(&self, rng: &mut ParticleRng) -> Color {
        match self {
            ColorSource::Fixed(color) => *color,
            ColorSource::Choice(colors) if colors.is_empty() => Color::WHITE,
            ColorSource::Choice(colors) => colors[rng.index(colors.len())],
        }
    }
}

impl Default for ColorSource {
    fn default() -> Self {
        ColorSource::Fixed(Color::WHITE)
    }
}

impl From<Color> for ColorSource {
    fn from(color: Color) -> Self {
        ColorSource::Fixed(color)
    }
}
