//! Built-in force field algorithms
//!
//! Each algorithm replaces a field's default uniform push and acts on one
//! particle at a time. `ForceAlgorithm::from_name` is the string registry used by
//! configuration front-ends.
//!
//! `Boids` scans every live particle for every affected particle (O(n^2)). It is
//! meant for populations in the hundreds; larger systems need spatial partitioning,
//! which this crate does not provide.

use crate::attractor::MIN_DISTANCE;
use crate::force_field::ForceField;
use crate::particle::Particle;
use crate::system::SystemView;
use noise::{NoiseFn, Perlin};
use spark_core::{Result, SparkError, Vec2};
use std::f32::consts::TAU;
use std::fmt;
use std::sync::Arc;

/// Custom force callback: mutates the particle it is applied to
pub type ForceFn =
    Arc<dyn Fn(&mut Particle, &ForceField, &SystemView<'_>, f32) -> Result<()> + Send + Sync>;

/// 3D noise sampler returning values roughly in [-1, 1]
pub type NoiseSampler = Arc<dyn Fn(f32, f32, f32) -> f32 + Send + Sync>;

/// Names accepted by [`ForceAlgorithm::from_name`]
pub const BUILTIN_FORCE_NAMES: [&str; 7] = [
    "wave",
    "vortex",
    "orbital",
    "vector_field",
    "turbulence",
    "drag",
    "boids",
];

/// Offset applied to the second noise sample so the two axes decorrelate
const NOISE_AXIS_OFFSET: f32 = 1000.0;

#[derive(Clone)]
pub enum Noise {
    Perlin(Perlin),
    Custom(NoiseSampler),
}

impl Noise {
    pub fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        match self {
            Noise::Perlin(perlin) => perlin.get([x as f64, y as f64, z as f64]) as f32,
            Noise::Custom(f) => f(x, y, z),
        }
    }
}

impl Default for Noise {
    fn default() -> Self {
        Noise::Perlin(Perlin::new(Perlin::DEFAULT_SEED))
    }
}

impl fmt::Debug for Noise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Noise::Perlin(_) => f.write_str("Perlin"),
            Noise::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoidsParams {
    pub separation_distance: f32,
    pub alignment_distance: f32,
    pub cohesion_distance: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
}

impl Default for BoidsParams {
    fn default() -> Self {
        Self {
            separation_distance: 25.0,
            alignment_distance: 50.0,
            cohesion_distance: 50.0,
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
        }
    }
}

#[derive(Clone, Default)]
pub enum ForceAlgorithm {
    /// `velocity += force * dt`, independent of position
    #[default]
    Uniform,
    /// Base force plus a sinusoidal push perpendicular to it
    Wave { frequency: f32, amplitude: f32 },
    /// Tangential push around `center`
    Vortex {
        center: Vec2,
        range: f32,
        strength: f32,
        clockwise: bool,
    },
    /// Radial pull toward `center`
    Orbital {
        center: Vec2,
        range: f32,
        strength: f32,
    },
    /// Flow sampled from 3D noise over (x, y, age)
    VectorField {
        noise_scale: f32,
        time_scale: f32,
        force_amount: f32,
        noise: Noise,
    },
    /// Deterministic hash-based jitter
    Turbulence { frequency: f32, strength: f32 },
    /// Opposes current velocity
    Drag { coefficient: f32 },
    /// Separation, alignment and cohesion against all live particles
    Boids(BoidsParams),
    Custom(ForceFn),
}

impl ForceAlgorithm {
    /// Look up a built-in algorithm with its default parameters.
    /// Accepts the camelCase spelling `vectorField` as well.
    pub fn from_name(name: &str) -> Result<Self> {
        let algorithm = match name {
            "uniform" => ForceAlgorithm::Uniform,
            "wave" => ForceAlgorithm::Wave {
                frequency: 1.0,
                amplitude: 50.0,
            },
            "vortex" => ForceAlgorithm::Vortex {
                center: Vec2::ZERO,
                range: 200.0,
                strength: 1000.0,
                clockwise: false,
            },
            "orbital" => ForceAlgorithm::Orbital {
                center: Vec2::ZERO,
                range: 200.0,
                strength: 1000.0,
            },
            "vector_field" | "vectorField" => ForceAlgorithm::VectorField {
                noise_scale: 0.01,
                time_scale: 0.5,
                force_amount: 100.0,
                noise: Noise::default(),
            },
            "turbulence" => ForceAlgorithm::Turbulence {
                frequency: 1.0,
                strength: 100.0,
            },
            "drag" => ForceAlgorithm::Drag { coefficient: 0.5 },
            "boids" => ForceAlgorithm::Boids(BoidsParams::default()),
            other => return Err(SparkError::UnknownForce(other.to_string())),
        };
        Ok(algorithm)
    }

    pub fn custom(
        f: impl Fn(&mut Particle, &ForceField, &SystemView<'_>, f32) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        ForceAlgorithm::Custom(Arc::new(f))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ForceAlgorithm::Uniform => "uniform",
            ForceAlgorithm::Wave { .. } => "wave",
            ForceAlgorithm::Vortex { .. } => "vortex",
            ForceAlgorithm::Orbital { .. } => "orbital",
            ForceAlgorithm::VectorField { .. } => "vector_field",
            ForceAlgorithm::Turbulence { .. } => "turbulence",
            ForceAlgorithm::Drag { .. } => "drag",
            ForceAlgorithm::Boids(_) => "boids",
            ForceAlgorithm::Custom(_) => "custom",
        }
    }

    /// Apply to one particle on behalf of `field`
    pub fn apply(
        &self,
        particle: &mut Particle,
        field: &ForceField,
        view: &SystemView<'_>,
        dt: f32,
    ) -> Result<()> {
        match self {
            ForceAlgorithm::Uniform => particle.velocity += field.force * dt,
            ForceAlgorithm::Wave {
                frequency,
                amplitude,
            } => wave(particle, field.force, *frequency, *amplitude, dt),
            ForceAlgorithm::Vortex {
                center,
                range,
                strength,
                clockwise,
            } => vortex(particle, *center, *range, *strength, *clockwise, dt),
            ForceAlgorithm::Orbital {
                center,
                range,
                strength,
            } => orbital(particle, *center, *range, *strength, dt),
            ForceAlgorithm::VectorField {
                noise_scale,
                time_scale,
                force_amount,
                noise,
            } => vector_field(particle, noise, *noise_scale, *time_scale, *force_amount, dt),
            ForceAlgorithm::Turbulence {
                frequency,
                strength,
            } => turbulence(particle, *frequency, *strength, dt),
            ForceAlgorithm::Drag { coefficient } => {
                particle.velocity -= particle.velocity * *coefficient * dt
            }
            ForceAlgorithm::Boids(params) => boids(particle, view, params, dt),
            ForceAlgorithm::Custom(f) => f(particle, field, view, dt)?,
        }
        Ok(())
    }
}

impl fmt::Debug for ForceAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForceAlgorithm::Custom(_) => f.write_str("Custom(..)"),
            ForceAlgorithm::Boids(params) => f.debug_tuple("Boids").field(params).finish(),
            ForceAlgorithm::VectorField {
                noise_scale,
                time_scale,
                force_amount,
                noise,
            } => f
                .debug_struct("VectorField")
                .field("noise_scale", noise_scale)
                .field("time_scale", time_scale)
                .field("force_amount", force_amount)
                .field("noise", noise)
                .finish(),
            other => f.write_str(other.name()),
        }
    }
}

fn wave(particle: &mut Particle, base: Vec2, frequency: f32, amplitude: f32, dt: f32) {
    particle.velocity += base * dt;
    let perpendicular = base.try_normalize().unwrap_or(Vec2::X).perp();
    let offset = (particle.age * frequency * TAU).sin() * amplitude;
    particle.velocity += perpendicular * offset * dt;
}

fn vortex(particle: &mut Particle, center: Vec2, range: f32, strength: f32, clockwise: bool, dt: f32) {
    let offset = particle.position - center;
    let distance = offset.length();
    if distance > range {
        return;
    }
    let mut tangent = offset.normalize_or_zero().perp();
    if clockwise {
        tangent = -tangent;
    }
    particle.velocity += tangent * (strength / distance.max(MIN_DISTANCE)) * dt;
}

fn orbital(particle: &mut Particle, center: Vec2, range: f32, strength: f32, dt: f32) {
    let offset = center - particle.position;
    let distance = offset.length();
    if distance > range {
        return;
    }
    particle.velocity += offset.normalize_or_zero() * (strength / distance.max(MIN_DISTANCE)) * dt;
}

fn vector_field(
    particle: &mut Particle,
    noise: &Noise,
    noise_scale: f32,
    time_scale: f32,
    force_amount: f32,
    dt: f32,
) {
    let x = particle.position.x * noise_scale;
    let y = particle.position.y * noise_scale;
    let t = particle.age * time_scale;
    let flow = Vec2::new(
        noise.sample(x, y, t),
        noise.sample(x + NOISE_AXIS_OFFSET, y + NOISE_AXIS_OFFSET, t),
    );
    particle.velocity += flow * force_amount * dt;
}

fn turbulence(particle: &mut Particle, frequency: f32, strength: f32, dt: f32) {
    let t = particle.age * frequency;
    let p = particle.position;
    let jitter = Vec2::new(hash_unit(p.x, p.y, t, 0), hash_unit(p.x, p.y, t, 1));
    particle.velocity += jitter * strength * dt;
}

/// Deterministic pseudo-random value in [-1, 1] for a point in space-time
fn hash_unit(x: f32, y: f32, t: f32, axis: u32) -> f32 {
    let mut h = x.to_bits().wrapping_mul(0x8da6_b343)
        ^ y.to_bits().wrapping_mul(0xd816_3841)
        ^ t.to_bits().wrapping_mul(0xcb1a_b31f)
        ^ axis.wrapping_mul(0x1656_67b1);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2c1b_3c6d);
    h ^= h >> 12;
    h = h.wrapping_mul(0x297a_2d39);
    h ^= h >> 15;
    (h as f32 / u32::MAX as f32) * 2.0 - 1.0
}

fn boids(particle: &mut Particle, view: &SystemView<'_>, params: &BoidsParams, dt: f32) {
    let mut separation = Vec2::ZERO;
    let mut velocity_sum = Vec2::ZERO;
    let mut aligned = 0usize;
    let mut position_sum = Vec2::ZERO;
    let mut cohesive = 0usize;

    for other in view.neighbors().filter(|p| !p.is_disposed()) {
        let offset = particle.position - other.position;
        let distance = offset.length();

        if distance > 0.0 && distance < params.separation_distance {
            separation += offset / distance / distance.max(MIN_DISTANCE);
        }
        if distance < params.alignment_distance {
            velocity_sum += other.velocity;
            aligned += 1;
        }
        if distance < params.cohesion_distance {
            position_sum += other.position;
            cohesive += 1;
        }
    }

    let alignment = if aligned > 0 {
        velocity_sum / aligned as f32 - particle.velocity
    } else {
        Vec2::ZERO
    };
    let cohesion = if cohesive > 0 {
        position_sum / cohesive as f32 - particle.position
    } else {
        Vec2::ZERO
    };

    let steer = separation * params.separation_weight
        + alignment * params.alignment_weight
        + cohesion * params.cohesion_weight;
    particle.velocity += steer * dt;
}
