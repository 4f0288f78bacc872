//! Frame clock that turns wall-clock time into clamped simulation steps

use std::time::Instant;

/// Produces the `dt` handed to `ParticleSystem::update` each frame
pub struct FrameClock {
    /// Total simulated time in seconds
    pub total_time: f32,
    /// Last clamped frame delta in seconds
    pub delta_time: f32,
    /// Upper bound on a single step (default: 1/30 second)
    pub max_delta: f32,
    last_instant: Instant,
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            max_delta: 1.0 / 30.0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_delta(max_delta: f32) -> Self {
        Self {
            max_delta,
            ..Self::default()
        }
    }

    /// Advance by an explicit elapsed time; returns the clamped step
    pub fn advance(&mut self, elapsed: f32) -> f32 {
        self.delta_time = elapsed.clamp(0.0, self.max_delta);
        self.total_time += self.delta_time;
        self.delta_time
    }

    /// Advance by the wall-clock time since the previous tick. The first tick yields zero.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            return 0.0;
        }
        let elapsed = now.duration_since(self.last_instant).as_secs_f32();
        self.last_instant = now;
        self.advance(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let clock = FrameClock::new();
        assert!((clock.max_delta - 1.0 / 30.0).abs() < 1e-7);
        assert_eq!(clock.total_time, 0.0);
    }

    #[test]
    fn stalls_are_clamped() {
        let mut clock = FrameClock::new();
        assert!((clock.advance(0.01) - 0.01).abs() < 1e-7);
        assert!((clock.advance(2.0) - 1.0 / 30.0).abs() < 1e-7);
        assert_eq!(clock.advance(-1.0), 0.0);
        assert!((clock.total_time - (0.01 + 1.0 / 30.0)).abs() < 1e-6);
    }

    #[test]
    fn first_tick_is_zero() {
        let mut clock = FrameClock::with_max_delta(0.1);
        assert_eq!(clock.tick(), 0.0);
        assert!(clock.tick() <= 0.1);
    }
}
