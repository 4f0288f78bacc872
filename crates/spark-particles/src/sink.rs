//! Regions that speed up particle aging or end particles outright

use crate::attractor::radial_factor;
use crate::lifetime::Lifetime;
use crate::particle::Particle;
use spark_core::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SinkMode {
    /// Age particles faster, scaled by strength and distance falloff
    #[default]
    Fade,
    /// Set particle age to its lifespan on contact
    Instant,
}

#[derive(Clone, Debug)]
pub struct Sink {
    pub position: Vec2,
    pub range: f32,
    pub strength: f32,
    pub falloff: f32,
    pub mode: SinkMode,
    pub id: Option<String>,
    pub lifetime: Lifetime,
}

impl Default for Sink {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            range: 100.0,
            strength: 1.0,
            falloff: 1.0,
            mode: SinkMode::Fade,
            id: None,
            lifetime: Lifetime::infinite(),
        }
    }
}

impl Sink {
    pub fn new(position: Vec2, range: f32, mode: SinkMode) -> Self {
        Self {
            position,
            range,
            mode,
            ..Default::default()
        }
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
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

    /// Extra age added per second at `distance` in fade mode
    pub fn aging_multiplier(&self, distance: f32) -> f32 {
        self.strength * radial_factor(distance, self.range, self.falloff)
    }

    pub fn affect(&self, particle: &mut Particle, dt: f32) {
        let distance = self.position.distance(particle.position);
        if distance >= self.range {
            return;
        }
        match self.mode {
            SinkMode::Instant => particle.age = particle.lifespan,
            SinkMode::Fade => particle.age += self.aging_multiplier(distance) * dt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_sets_age_to_lifespan() {
        let sink = Sink::new(Vec2::ZERO, 100.0, SinkMode::Instant);
        let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO).with_lifespan(3.0);
        sink.affect(&mut p, 0.0);
        assert_eq!(p.age, p.lifespan);

        let mut q = Particle::new(Vec2::ZERO, Vec2::ZERO).with_lifespan(3.0);
        sink.affect(&mut q, 123.0);
        assert_eq!(q.age, q.lifespan);
    }

    #[test]
    fn fade_accelerates_aging() {
        let sink = Sink::new(Vec2::ZERO, 100.0, SinkMode::Fade).with_strength(2.0);
        let mut p = Particle::new(Vec2::new(10.0, 0.0), Vec2::ZERO).with_lifespan(3.0);
        sink.affect(&mut p, 0.5);
        let expected = 2.0 * (1.0 / 10.0) * (1.0 - 0.01) * 0.5;
        assert!((p.age - expected).abs() < 1e-5);
        assert!(!p.is_disposed());
    }

    #[test]
    fn no_effect_at_or_beyond_range() {
        let sink = Sink::new(Vec2::ZERO, 50.0, SinkMode::Fade).with_strength(10.0);
        let mut edge = Particle::new(Vec2::new(50.0, 0.0), Vec2::ZERO);
        sink.affect(&mut edge, 1.0);
        assert_eq!(edge.age, 0.0);

        let instant = Sink::new(Vec2::ZERO, 50.0, SinkMode::Instant);
        let mut far = Particle::new(Vec2::new(80.0, 0.0), Vec2::ZERO);
        instant.affect(&mut far, 1.0);
        assert_eq!(far.age, 0.0);

        let mut rim = Particle::new(Vec2::new(0.0, 50.0), Vec2::ZERO);
        instant.affect(&mut rim, 1.0);
        assert_eq!(rim.age, 0.0);
    }
}
