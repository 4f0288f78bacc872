//! Radial force sources that pull (or, with negative force, push) particles

use crate::lifetime::Lifetime;
use crate::particle::Particle;
use spark_core::Vec2;

/// Distances below this are clamped before applying a falloff exponent
pub const MIN_DISTANCE: f32 = 1.0;

/// Power-law falloff with a smooth taper to zero at `range`.
///
/// Returns `1 / max(distance, 1)^falloff * max(0, 1 - (distance / range)^2)`,
/// and exactly zero at or beyond the range.
pub fn radial_factor(distance: f32, range: f32, falloff: f32) -> f32 {
    if range <= 0.0 || distance >= range {
        return 0.0;
    }
    let ratio = distance / range;
    let taper = (1.0 - ratio * ratio).max(0.0);
    taper / distance.max(MIN_DISTANCE).powf(falloff)
}

#[derive(Clone, Debug)]
pub struct Attractor {
    pub position: Vec2,
    pub range: f32,
    /// Negative values repel
    pub force: f32,
    pub falloff: f32,
    pub id: Option<String>,
    pub lifetime: Lifetime,
}

impl Default for Attractor {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            range: 100.0,
            force: 100.0,
            falloff: 1.0,
            id: None,
            lifetime: Lifetime::infinite(),
        }
    }
}

impl Attractor {
    pub fn new(position: Vec2, range: f32, force: f32) -> Self {
        Self {
            position,
            range,
            force,
            ..Default::default()
        }
    }

    pub fn with_falloff(mut self, falloff: f32) -> Self {
        self.falloff = falloff;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_lifespan(mut self, lifespan: f32) -> Self {
        self.lifetime = Lifetime::new(lifespan);
        self
    }

    pub fn is_disposed(&self) -> bool {
        self.lifetime.is_disposed()
    }

    pub fn update(&mut self, dt: f32) {
        self.lifetime.advance(dt);
    }

    /// Magnitude of the pull at `distance`
    pub fn magnitude_at(&self, distance: f32) -> f32 {
        self.force * radial_factor(distance, self.range, self.falloff)
    }

    pub fn apply_force(&self, particle: &mut Particle, dt: f32) {
        let offset = self.position - particle.position;
        let distance = offset.length();
        if distance > self.range {
            return;
        }
        let direction = offset.normalize_or_zero();
        particle.velocity += direction * self.magnitude_at(distance) * dt;
    }
}
