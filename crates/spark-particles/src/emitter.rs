//! Emitters: particle templates plus a rate, burst or custom emission policy

use crate::lifetime::Lifetime;
use crate::options::ParticleOptions;
use crate::particle::Particle;
use crate::style::StyleTemplate;
use spark_core::{rotate, Generator, Param, ParticleRng, Result, Vec2};
use std::f32::consts::TAU;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Callback returning how many particles to emit this update (rounded up)
pub type CustomEmission = Arc<dyn Fn(&Emitter, f32) -> Result<f32> + Send + Sync>;

/// Rate ranges are re-sampled once per window of this many seconds
pub const RATE_RESAMPLE_INTERVAL: f32 = 1.0;

#[derive(Clone)]
pub enum Emission {
    /// Continuous emission in particles per second
    Rate { rate: Param<f32> },
    /// One shot of `count` particles once the emitter is `delay` seconds old
    Burst { count: Param<f32>, delay: f32 },
    /// User-driven count each update; never self-disposes
    Custom(CustomEmission),
}

impl Emission {
    /// Fixed rate in particles per second
    pub fn rate(rate: f32) -> Self {
        Emission::Rate {
            rate: Param::Fixed(rate),
        }
    }

    /// Immediate burst of a fixed count
    pub fn burst(count: f32) -> Self {
        Emission::Burst {
            count: Param::Fixed(count),
            delay: 0.0,
        }
    }

    pub fn custom(f: impl Fn(&Emitter, f32) -> Result<f32> + Send + Sync + 'static) -> Self {
        Emission::Custom(Arc::new(f))
    }
}

impl Default for Emission {
    fn default() -> Self {
        Emission::rate(10.0)
    }
}

impl fmt::Debug for Emission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Emission::Rate { rate } => f.debug_struct("Rate").field("rate", rate).finish(),
            Emission::Burst { count, delay } => f
                .debug_struct("Burst")
                .field("count", count)
                .field("delay", delay)
                .finish(),
            Emission::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How spawn positions are spread over the emitter's area
#[derive(Clone, Default)]
pub enum PositionDistribution {
    #[default]
    Uniform,
    /// Gaussian around the center, sigma = size / 6, clamped to the area
    Normal,
    /// Offset from the emitter position, per batch index
    Generator(Generator<Vec2>),
}

impl fmt::Debug for PositionDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionDistribution::Uniform => f.write_str("Uniform"),
            PositionDistribution::Normal => f.write_str("Normal"),
            PositionDistribution::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

/// Everything needed to build one particle
#[derive(Clone, Debug)]
pub struct ParticleTemplate {
    pub position: PositionDistribution,
    pub speed: Param<f32>,
    /// Radians, 0 = +x axis, counter-clockwise
    pub direction: Param<f32>,
    pub size: Param<Vec2>,
    /// `None` makes particles face their velocity
    pub rotation: Option<Param<f32>>,
    pub lifespan: Param<f32>,
    pub style: StyleTemplate,
    pub options: ParticleOptions,
}

impl Default for ParticleTemplate {
    fn default() -> Self {
        Self {
            position: PositionDistribution::Uniform,
            speed: Param::range(50.0, 100.0),
            direction: Param::range(0.0, TAU),
            size: Param::Fixed(Vec2::splat(4.0)),
            rotation: None,
            lifespan: Param::range(1.0, 2.0),
            style: StyleTemplate::default(),
            options: ParticleOptions::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Emitter {
    /// Center of the spawn area
    pub position: Vec2,
    /// Extent of the spawn area; zero spawns exactly at `position`
    pub size: Vec2,
    pub lifetime: Lifetime,
    pub emission: Emission,
    pub template: ParticleTemplate,
    total_emitted: usize,
    /// Fractional particles carried between updates
    accumulator: f32,
    current_rate: Option<f32>,
    rate_elapsed: f32,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl Emitter {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            size: Vec2::ZERO,
            lifetime: Lifetime::infinite(),
            emission: Emission::default(),
            template: ParticleTemplate::default(),
            total_emitted: 0,
            accumulator: 0.0,
            current_rate: None,
            rate_elapsed: 0.0,
        }
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_lifespan(mut self, lifespan: f32) -> Self {
        self.lifetime = Lifetime::new(lifespan);
        self
    }

    pub fn with_emission(mut self, emission: Emission) -> Self {
        self.emission = emission;
        self
    }

    pub fn with_template(mut self, template: ParticleTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn age(&self) -> f32 {
        self.lifetime.age
    }

    pub fn is_disposed(&self) -> bool {
        self.lifetime.is_disposed()
    }

    pub fn dispose(&mut self) {
        self.lifetime.dispose();
    }

    pub fn total_emitted(&self) -> usize {
        self.total_emitted
    }

    /// Rate in effect for the current resample window, if any
    pub fn current_rate(&self) -> Option<f32> {
        self.current_rate
    }

    /// Age the emitter and push any newly emitted particles onto `out`
    pub fn update(&mut self, rng: &mut ParticleRng, dt: f32, out: &mut Vec<Particle>) -> Result<()> {
        if self.is_disposed() {
            return Ok(());
        }
        if self.lifetime.advance(dt) {
            debug!(age = self.lifetime.age, emitted = self.total_emitted, "emitter expired");
            return Ok(());
        }

        let count = match &self.emission {
            Emission::Rate { rate } => {
                let rate = match rate {
                    Param::Fixed(value) => *value,
                    Param::Generator(f) => f(0),
                    Param::Range(range) => {
                        self.rate_elapsed += dt;
                        match self.current_rate {
                            Some(current) if self.rate_elapsed < RATE_RESAMPLE_INTERVAL => current,
                            _ => {
                                self.rate_elapsed = 0.0;
                                range.sample(rng)
                            }
                        }
                    }
                };
                self.current_rate = Some(rate);
                self.accumulator += rate * dt;
                if self.accumulator >= 1.0 {
                    let whole = self.accumulator.floor();
                    self.accumulator -= whole;
                    whole as usize
                } else {
                    0
                }
            }
            Emission::Burst { count, delay } => {
                if self.lifetime.age >= *delay {
                    count.resolve(rng, 0).ceil().max(0.0) as usize
                } else {
                    0
                }
            }
            Emission::Custom(f) => {
                let f = Arc::clone(f);
                f(self, dt)?.ceil().max(0.0) as usize
            }
        };

        self.emit(rng, count, out);

        if count > 0 && matches!(self.emission, Emission::Burst { .. }) {
            debug!(count, "burst emitted");
            self.dispose();
        }
        Ok(())
    }

    /// Create `count` particles onto `out`
    pub fn emit(&mut self, rng: &mut ParticleRng, count: usize, out: &mut Vec<Particle>) {
        out.reserve(count);
        for n in 0..count {
            out.push(self.create_particle(rng, n));
        }
        self.total_emitted += count;
    }

    /// Build one particle; `n` is its index within the current batch
    pub fn create_particle(&self, rng: &mut ParticleRng, n: usize) -> Particle {
        let template = &self.template;
        let position = self.spawn_position(rng, n);
        let speed = template.speed.resolve(rng, n);
        let direction = template.direction.resolve(rng, n);
        let velocity = rotate(Vec2::new(speed, 0.0), direction);
        let rotation = template.rotation.as_ref().map(|r| r.resolve(rng, n));

        Particle::new(position, velocity)
            .with_size(template.size.resolve(rng, n))
            .with_rotation(rotation)
            .with_lifespan(template.lifespan.resolve(rng, n))
            .with_style(template.style.instantiate(rng))
            .with_options(template.options.clone())
    }

    fn spawn_position(&self, rng: &mut ParticleRng, n: usize) -> Vec2 {
        let half = self.size.abs() / 2.0;
        match &self.template.position {
            PositionDistribution::Generator(f) => self.position + f(n),
            _ if half.x < f32::EPSILON && half.y < f32::EPSILON => self.position,
            PositionDistribution::Uniform => self.position + rng.range_vec2(-half, half),
            PositionDistribution::Normal => {
                let sigma = self.size.abs() / 6.0;
                let offset = Vec2::new(rng.normal(), rng.normal()) * sigma;
                self.position + offset.clamp(-half, half)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn run(emitter: &mut Emitter, steps: usize, dt: f32) -> Vec<Particle> {
        let mut rng = ParticleRng::new(42);
        let mut out = Vec::new();
        for _ in 0..steps {
            emitter.update(&mut rng, dt, &mut out).unwrap();
        }
        out
    }

    #[test]
    fn infinite_emitter_never_expires() {
        let mut emitter = Emitter::new(Vec2::ZERO).with_emission(Emission::rate(0.0));
        run(&mut emitter, 10_000, 0.1);
        assert!(!emitter.is_disposed());
    }

    #[test]
    fn finite_emitter_expires_without_emitting() {
        let mut emitter = Emitter::new(Vec2::ZERO)
            .with_lifespan(1.0)
            .with_emission(Emission::rate(1000.0));
        let out = run(&mut emitter, 4, 0.25);
        assert!(emitter.is_disposed());
        // Three live updates; the fourth only disposes
        assert_eq!(out.len(), 750);
        assert_eq!(emitter.total_emitted(), 750);
    }

    #[test]
    fn rate_accumulates_fractions() {
        let mut emitter = Emitter::new(Vec2::ZERO).with_emission(Emission::rate(10.0));
        let out = run(&mut emitter, 64, 1.0 / 64.0);
        assert_eq!(out.len(), 10);

        let mut slow = Emitter::new(Vec2::ZERO).with_emission(Emission::rate(0.5));
        let out = run(&mut slow, 1000, 0.001);
        assert!(out.is_empty());
    }

    #[test]
    fn ranged_rate_resamples_each_window() {
        let mut emitter =
            Emitter::new(Vec2::ZERO).with_emission(Emission::Rate {
                rate: Param::range(10.0, 20.0),
            });
        let mut rng = ParticleRng::new(9);
        let mut out = Vec::new();
        let mut seen = Vec::new();
        for _ in 0..300 {
            emitter.update(&mut rng, 0.01, &mut out).unwrap();
            if let Some(rate) = emitter.current_rate() {
                if seen.last() != Some(&rate) {
                    seen.push(rate);
                }
            }
        }
        assert!(seen.iter().all(|r| (10.0..20.0).contains(r)));
        assert!((3..=4).contains(&seen.len()));
    }

    #[test]
    fn generated_rate_is_called_every_update() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut emitter = Emitter::new(Vec2::ZERO).with_emission(Emission::Rate {
            rate: Param::generator(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                60.0
            }),
        });
        let out = run(&mut emitter, 60, 1.0 / 60.0);
        assert_eq!(calls.load(Ordering::SeqCst), 60);
        assert!((59..=60).contains(&out.len()));
    }

    #[test]
    fn burst_fires_once_after_delay() {
        let mut emitter = Emitter::new(Vec2::ZERO).with_emission(Emission::Burst {
            count: Param::Fixed(4.2),
            delay: 0.5,
        });
        let mut rng = ParticleRng::new(1);
        let mut out = Vec::new();

        emitter.update(&mut rng, 0.25, &mut out).unwrap();
        assert!(out.is_empty());
        assert!(!emitter.is_disposed());

        emitter.update(&mut rng, 0.25, &mut out).unwrap();
        assert_eq!(out.len(), 5);
        assert!(emitter.is_disposed());

        emitter.update(&mut rng, 0.25, &mut out).unwrap();
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn empty_burst_neither_emits_nor_disposes() {
        let mut emitter = Emitter::new(Vec2::ZERO).with_emission(Emission::burst(0.0));
        let out = run(&mut emitter, 5, 0.1);
        assert!(out.is_empty());
        assert!(!emitter.is_disposed());
    }

    #[test]
    fn custom_emission_rounds_up_and_never_disposes() {
        let mut emitter = Emitter::new(Vec2::ZERO).with_emission(Emission::custom(|_, _| Ok(1.5)));
        let out = run(&mut emitter, 3, 0.1);
        assert_eq!(out.len(), 6);
        assert!(!emitter.is_disposed());
    }

    #[test]
    fn custom_emission_errors_propagate() {
        let mut emitter = Emitter::new(Vec2::ZERO).with_emission(Emission::custom(|_, _| {
            Err(spark_core::SparkError::callback("emitter", "no count"))
        }));
        let mut rng = ParticleRng::new(1);
        let mut out = Vec::new();
        assert!(emitter.update(&mut rng, 0.1, &mut out).is_err());
    }

    #[test]
    fn zero_size_spawns_at_position() {
        let emitter = Emitter::new(Vec2::new(400.0, 300.0));
        let mut rng = ParticleRng::new(5);
        for n in 0..20 {
            assert_eq!(emitter.create_particle(&mut rng, n).position, Vec2::new(400.0, 300.0));
        }
    }

    #[test]
    fn spawn_area_bounds_positions() {
        let mut emitter = Emitter::new(Vec2::new(100.0, 100.0)).with_size(Vec2::new(20.0, 10.0));
        let mut rng = ParticleRng::new(6);
        for distribution in [PositionDistribution::Uniform, PositionDistribution::Normal] {
            emitter.template.position = distribution;
            for n in 0..200 {
                let p = emitter.create_particle(&mut rng, n).position;
                assert!((90.0..=110.0).contains(&p.x));
                assert!((95.0..=105.0).contains(&p.y));
            }
        }
    }

    #[test]
    fn velocity_follows_speed_and_direction() {
        let template = ParticleTemplate {
            speed: Param::Fixed(10.0),
            direction: Param::Fixed(std::f32::consts::FRAC_PI_2),
            lifespan: Param::Fixed(2.0),
            rotation: Some(Param::generator(|n| n as f32)),
            ..Default::default()
        };
        let emitter = Emitter::new(Vec2::ZERO).with_template(template);
        let mut rng = ParticleRng::new(7);
        let p = emitter.create_particle(&mut rng, 3);
        assert!(p.velocity.x.abs() < 1e-5);
        assert!((p.velocity.y - 10.0).abs() < 1e-5);
        assert_eq!(p.lifespan, 2.0);
        assert_eq!(p.rotation, Some(3.0));
        assert_eq!(p.render_rotation(), 3.0);
    }

    #[test]
    fn particles_own_their_style() {
        let emitter = Emitter::new(Vec2::ZERO);
        let mut rng = ParticleRng::new(8);
        let mut a = emitter.create_particle(&mut rng, 0);
        let b = emitter.create_particle(&mut rng, 1);
        a.style.color.r = 0.0;
        a.options.max_speed = 3.0;
        assert_eq!(b.style.color.r, 1.0);
        assert_eq!(b.options.max_speed, -1.0);
        assert_eq!(emitter.template.options.max_speed, -1.0);
    }
}
