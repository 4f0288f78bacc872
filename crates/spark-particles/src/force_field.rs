//! Force fields: a uniform push, or one of the algorithms in [`crate::forces`]

use crate::forces::ForceAlgorithm;
use crate::lifetime::Lifetime;
use crate::particle::Particle;
use crate::system::SystemView;
use spark_core::{Result, Vec2};

#[derive(Clone, Debug, Default)]
pub struct ForceField {
    /// Base force; the whole effect under `ForceAlgorithm::Uniform`
    pub force: Vec2,
    pub algorithm: ForceAlgorithm,
    pub id: Option<String>,
    pub lifetime: Lifetime,
}

impl ForceField {
    pub fn new(force: Vec2) -> Self {
        Self {
            force,
            ..Default::default()
        }
    }

    pub fn with_algorithm(mut self, algorithm: ForceAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Use a built-in algorithm by name with its default parameters
    pub fn with_named_algorithm(self, name: &str) -> Result<Self> {
        Ok(self.with_algorithm(ForceAlgorithm::from_name(name)?))
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

    pub fn apply(&self, particle: &mut Particle, view: &SystemView<'_>, dt: f32) -> Result<()> {
        self.algorithm.apply(particle, self, view, dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_force_ignores_position() {
        let field = ForceField::new(Vec2::new(0.0, 98.0));
        let mut near = Particle::new(Vec2::ZERO, Vec2::ZERO);
        let mut far = Particle::new(Vec2::new(1e6, -1e6), Vec2::ZERO);
        field.apply(&mut near, &SystemView::empty(), 0.5).unwrap();
        field.apply(&mut far, &SystemView::empty(), 0.5).unwrap();
        assert_eq!(near.velocity, Vec2::new(0.0, 49.0));
        assert_eq!(far.velocity, near.velocity);
    }

    #[test]
    fn named_algorithm_lookup() {
        let field = ForceField::new(Vec2::ZERO).with_named_algorithm("drag").unwrap();
        assert_eq!(field.algorithm.name(), "drag");
        assert!(ForceField::new(Vec2::ZERO).with_named_algorithm("nope").is_err());
    }

    #[test]
    fn lifespan_disposes_field() {
        let mut field = ForceField::new(Vec2::X).with_lifespan(1.0);
        field.update(0.6);
        assert!(!field.is_disposed());
        field.update(0.6);
        assert!(field.is_disposed());
    }
}
