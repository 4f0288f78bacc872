//! Age/lifespan bookkeeping shared by emitters and field entities

/// Lifespan value meaning "never expires"
pub const INFINITE: f32 = -1.0;

/// Age, lifespan and the one-way disposed flag.
///
/// Any negative lifespan is treated as infinite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lifetime {
    pub age: f32,
    pub lifespan: f32,
    disposed: bool,
}

impl Lifetime {
    pub fn new(lifespan: f32) -> Self {
        Self {
            age: 0.0,
            lifespan,
            disposed: false,
        }
    }

    pub fn infinite() -> Self {
        Self::new(INFINITE)
    }

    pub fn is_finite(&self) -> bool {
        self.lifespan >= 0.0
    }

    /// Add `dt` to the age and dispose once a finite lifespan is reached.
    /// Returns true if disposed after this call.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.disposed {
            return true;
        }
        self.age += dt;
        if self.is_finite() && self.age >= self.lifespan {
            self.disposed = true;
        }
        self.disposed
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Normalized age in [0, 1]; always 0 for infinite lifespans
    pub fn progress(&self) -> f32 {
        if !self.is_finite() {
            0.0
        } else if self.lifespan == 0.0 {
            1.0
        } else {
            (self.age / self.lifespan).clamp(0.0, 1.0)
        }
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::infinite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_never_disposes() {
        let mut life = Lifetime::infinite();
        for _ in 0..10_000 {
            assert!(!life.advance(1.0));
        }
        assert_eq!(life.progress(), 0.0);
    }

    #[test]
    fn finite_disposes_at_threshold() {
        let mut life = Lifetime::new(1.0);
        assert!(!life.advance(0.5));
        assert!(life.advance(0.5));
        assert!(life.is_disposed());
        // Stays disposed and stops aging
        assert!(life.advance(1.0));
        assert!((life.age - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_lifespan_disposes_on_first_advance() {
        let mut life = Lifetime::new(0.0);
        assert!(life.advance(0.0));
    }
}
