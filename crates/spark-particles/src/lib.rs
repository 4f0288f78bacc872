//! Spark Particles - CPU particle simulation
//!
//! Provides frame-stepped 2D particle simulation with:
//! - Rate, burst and custom emitters with fixed/range/generator parameters
//! - Attractors, sinks and force fields (uniform or a named algorithm)
//! - Circle, rectangle and polygon colliders with impulse response
//! - Per-particle phase toggles, id targeting, hooks and trails
//! - Drawing through the `spark_core::Canvas` render-target trait

pub mod attractor;
pub mod clock;
pub mod collider;
pub mod emitter;
pub mod force_field;
pub mod forces;
pub mod lifetime;
pub mod options;
pub mod particle;
pub mod sink;
pub mod style;
pub mod system;

pub use attractor::Attractor;
pub use clock::FrameClock;
pub use collider::{Collider, ColliderShape};
pub use emitter::{Emission, Emitter, ParticleTemplate, PositionDistribution};
pub use force_field::ForceField;
pub use forces::{BoidsParams, ForceAlgorithm, Noise, BUILTIN_FORCE_NAMES};
pub use lifetime::{Lifetime, INFINITE};
pub use options::{DrawPhases, ParticleHooks, ParticleOptions, Targeting, UpdatePhases};
pub use particle::{Particle, TrailPoint};
pub use sink::{Sink, SinkMode};
pub use style::{Fade, Glow, ParticleStyle, StyleKind, StyleTemplate, Trail};
pub use system::{ParticleSystem, SystemView};
