//! The owning aggregate that drives update and draw for every entity kind

use crate::attractor::Attractor;
use crate::collider::Collider;
use crate::emitter::Emitter;
use crate::force_field::ForceField;
use crate::particle::Particle;
use crate::sink::Sink;
use spark_core::{Canvas, ParticleRng, Result};
use std::fmt;
use tracing::trace;

/// Read-only view of the system handed to a particle while it updates.
///
/// The particle being updated is borrowed mutably elsewhere, so the other
/// particles are exposed as the slices before and after it.
#[derive(Clone, Copy)]
pub struct SystemView<'a> {
    pub emitters: &'a [Emitter],
    pub attractors: &'a [Attractor],
    pub force_fields: &'a [ForceField],
    pub colliders: &'a [Collider],
    pub sinks: &'a [Sink],
    pub before: &'a [Particle],
    pub after: &'a [Particle],
}

impl<'a> SystemView<'a> {
    /// A view with no entities at all
    pub fn empty() -> SystemView<'static> {
        SystemView {
            emitters: &[],
            attractors: &[],
            force_fields: &[],
            colliders: &[],
            sinks: &[],
            before: &[],
            after: &[],
        }
    }

    /// A view holding only other particles
    pub fn with_neighbors(before: &'a [Particle], after: &'a [Particle]) -> Self {
        Self {
            before,
            after,
            ..SystemView::empty()
        }
    }

    /// Every particle except the one being updated, in collection order
    pub fn neighbors(&self) -> impl Iterator<Item = &'a Particle> {
        self.before.iter().chain(self.after.iter())
    }
}

/// Owns the six entity collections. Collection order is update and draw order.
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
    pub emitters: Vec<Emitter>,
    pub attractors: Vec<Attractor>,
    pub force_fields: Vec<ForceField>,
    pub colliders: Vec<Collider>,
    pub sinks: Vec<Sink>,
    rng: ParticleRng,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::with_rng(ParticleRng::from_entropy())
    }

    /// Reproducible system: the same seed and inputs give the same frames
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(ParticleRng::new(seed))
    }

    fn with_rng(rng: ParticleRng) -> Self {
        Self {
            particles: Vec::new(),
            emitters: Vec::new(),
            attractors: Vec::new(),
            force_fields: Vec::new(),
            colliders: Vec::new(),
            sinks: Vec::new(),
            rng,
        }
    }

    pub fn add_particle(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn add_emitter(&mut self, emitter: Emitter) {
        self.emitters.push(emitter);
    }

    pub fn add_attractor(&mut self, attractor: Attractor) {
        self.attractors.push(attractor);
    }

    pub fn add_force_field(&mut self, field: ForceField) {
        self.force_fields.push(field);
    }

    pub fn add_collider(&mut self, collider: Collider) {
        self.colliders.push(collider);
    }

    pub fn add_sink(&mut self, sink: Sink) {
        self.sinks.push(sink);
    }

    pub fn rng_mut(&mut self) -> &mut ParticleRng {
        &mut self.rng
    }

    /// Live particles, disposed ones excluded
    pub fn particle_count(&self) -> usize {
        self.particles.iter().filter(|p| !p.is_disposed()).count()
    }

    /// Sum of `total_emitted` over the emitters still in the system
    pub fn total_emitted(&self) -> usize {
        self.emitters.iter().map(Emitter::total_emitted).sum()
    }

    /// No emitters left to spawn and no particles left to draw
    pub fn is_finished(&self) -> bool {
        self.emitters.is_empty() && self.particle_count() == 0
    }

    /// Drop every entity, colliders included
    pub fn clear(&mut self) {
        self.particles.clear();
        self.emitters.clear();
        self.attractors.clear();
        self.force_fields.clear();
        self.colliders.clear();
        self.sinks.clear();
    }

    /// Advance one frame.
    ///
    /// Particles update first, against the field entities as they were at the
    /// start of the frame. Emitters run next; what they spawn is appended after
    /// the existing particles and first updates on the following frame.
    /// Attractors, force fields and sinks then age, and disposed members of
    /// every collection are dropped. Colliders never age.
    ///
    /// `dt` is not clamped here; see [`crate::clock::FrameClock`].
    pub fn update(&mut self, dt: f32) -> Result<()> {
        let mut particles = std::mem::take(&mut self.particles);
        let updated = self.update_particles(&mut particles, dt);
        self.particles = particles;
        updated?;

        let mut spawned = Vec::new();
        let emitted = self.update_emitters(dt, &mut spawned);

        for attractor in &mut self.attractors {
            attractor.update(dt);
        }
        for field in &mut self.force_fields {
            field.update(dt);
        }
        for sink in &mut self.sinks {
            sink.update(dt);
        }

        self.particles.retain(|p| !p.is_disposed());
        self.particles.append(&mut spawned);
        self.emitters.retain(|e| !e.is_disposed());
        self.attractors.retain(|a| !a.is_disposed());
        self.force_fields.retain(|f| !f.is_disposed());
        self.sinks.retain(|s| !s.is_disposed());

        trace!(
            particles = self.particles.len(),
            emitters = self.emitters.len(),
            "frame updated"
        );
        emitted
    }

    fn update_particles(&mut self, particles: &mut [Particle], dt: f32) -> Result<()> {
        for i in 0..particles.len() {
            let (before, rest) = particles.split_at_mut(i);
            let Some((particle, after)) = rest.split_first_mut() else {
                break;
            };
            if particle.is_disposed() {
                continue;
            }
            let view = SystemView {
                emitters: &self.emitters,
                attractors: &self.attractors,
                force_fields: &self.force_fields,
                colliders: &self.colliders,
                sinks: &self.sinks,
                before,
                after,
            };
            particle.update(&view, &mut self.rng, dt)?;
        }
        Ok(())
    }

    fn update_emitters(&mut self, dt: f32, spawned: &mut Vec<Particle>) -> Result<()> {
        for emitter in &mut self.emitters {
            emitter.update(&mut self.rng, dt, spawned)?;
        }
        Ok(())
    }

    /// Draw live particles back to front in insertion order
    pub fn draw(&self, canvas: &mut dyn Canvas) -> Result<()> {
        for particle in self.particles.iter().filter(|p| !p.is_disposed()) {
            particle.draw(self, canvas)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ParticleSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticleSystem")
            .field("particles", &self.particles.len())
            .field("emitters", &self.emitters.len())
            .field("attractors", &self.attractors.len())
            .field("force_fields", &self.force_fields.len())
            .field("colliders", &self.colliders.len())
            .field("sinks", &self.sinks.len())
            .finish_non_exhaustive()
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}
