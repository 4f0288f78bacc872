//! Seeded random source for particle generation

use crate::types::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

pub struct ParticleRng {
    inner: StdRng,
}

impl ParticleRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// Returns a float in [min, max). Reversed or empty ranges are tolerated.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Component-wise uniform sample in the box spanned by `min` and `max`
    pub fn range_vec2(&mut self, min: Vec2, max: Vec2) -> Vec2 {
        Vec2::new(self.range(min.x, max.x), self.range(min.y, max.y))
    }

    /// Standard normal sample (Box-Muller)
    pub fn normal(&mut self) -> f32 {
        // Keep u1 away from zero so ln() stays finite
        let u1 = self.next_f32().max(f32::MIN_POSITIVE);
        let u2 = self.next_f32();
        (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }

    /// Random unit vector
    pub fn direction(&mut self) -> Vec2 {
        Vec2::from_angle(self.range(0.0, TAU))
    }

    /// Uniformly pick an index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }
}

impl Default for ParticleRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_range_bounds() {
        let mut rng = ParticleRng::new(42);
        for _ in 0..1000 {
            let v = rng.range(0.0, 10.0);
            assert!((0.0..10.0).contains(&v));
        }
    }

    #[test]
    fn rng_is_deterministic_per_seed() {
        let mut a = ParticleRng::new(7);
        let mut b = ParticleRng::new(7);
        for _ in 0..16 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
    }

    #[test]
    fn rng_direction_unit_length() {
        let mut rng = ParticleRng::new(123);
        for _ in 0..100 {
            let d = rng.direction();
            assert!((d.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn rng_normal_is_centered() {
        let mut rng = ParticleRng::new(99);
        let n = 4000;
        let mean: f32 = (0..n).map(|_| rng.normal()).sum::<f32>() / n as f32;
        assert!(mean.abs() < 0.1);
    }
}
