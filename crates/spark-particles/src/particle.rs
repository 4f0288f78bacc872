//! A single simulated particle: phased update pipeline, trail and drawing

use crate::options::ParticleOptions;
use crate::style::{ParticleStyle, StyleKind};
use crate::system::{ParticleSystem, SystemView};
use spark_core::{heading, Canvas, Color, ParticleRng, Result, Vec2};
use std::collections::VecDeque;

/// Minimum distance a particle must travel before a new trail sample is stored
pub const TRAIL_MIN_DISTANCE: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    pub position: Vec2,
    /// Seconds since the sample was taken
    pub age: f32,
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    /// Fixed render rotation; `None` follows the velocity heading
    pub rotation: Option<f32>,
    pub age: f32,
    pub lifespan: f32,
    pub style: ParticleStyle,
    pub options: ParticleOptions,
    render_rotation: f32,
    trail: VecDeque<TrailPoint>,
    disposed: bool,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            size: Vec2::splat(4.0),
            rotation: None,
            age: 0.0,
            lifespan: 1.0,
            style: ParticleStyle::default(),
            options: ParticleOptions::default(),
            render_rotation: 0.0,
            trail: VecDeque::new(),
            disposed: false,
        }
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_lifespan(mut self, lifespan: f32) -> Self {
        self.lifespan = lifespan;
        self
    }

    pub fn with_rotation(mut self, rotation: Option<f32>) -> Self {
        self.rotation = rotation;
        self.render_rotation = rotation.unwrap_or(0.0);
        self
    }

    pub fn with_style(mut self, style: ParticleStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_options(mut self, options: ParticleOptions) -> Self {
        self.options = options;
        self
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Mark the particle dead. Irreversible.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    /// Rotation used for drawing, as of the last direction phase
    pub fn render_rotation(&self) -> f32 {
        self.render_rotation
    }

    /// Collision radius derived from the drawn size
    pub fn radius(&self) -> f32 {
        self.size.x.max(self.size.y) / 2.0
    }

    pub fn trail(&self) -> impl Iterator<Item = &TrailPoint> {
        self.trail.iter()
    }

    /// Alpha from the style's fade-in/fade-out ramps
    pub fn fade_alpha(&self) -> f32 {
        self.style.fade.alpha(self.age, self.lifespan)
    }

    /// Advance one frame through the enabled update phases
    pub fn update(&mut self, view: &SystemView<'_>, rng: &mut ParticleRng, dt: f32) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        let phases = self.options.update_phases;

        if phases.age {
            self.age += dt;
            if self.age >= self.lifespan {
                self.dispose();
                return Ok(());
            }
        }

        if phases.physics {
            self.apply_physics(view, rng, dt)?;
        }

        if let Some(hook) = self.options.hooks.update.clone() {
            hook(self, view, dt)?;
        }

        if phases.direction {
            self.render_rotation = match self.rotation {
                Some(rotation) => rotation,
                None => heading(self.velocity),
            };
        }

        if phases.position {
            self.position += self.velocity * dt;
        }

        self.update_trail(dt);
        Ok(())
    }

    fn apply_physics(&mut self, view: &SystemView<'_>, rng: &mut ParticleRng, dt: f32) -> Result<()> {
        for attractor in view.attractors {
            if attractor.is_disposed() || !self.options.use_attractors.matches(attractor.id.as_deref()) {
                continue;
            }
            attractor.apply_force(self, dt);
        }

        for field in view.force_fields {
            if field.is_disposed() || !self.options.use_force_fields.matches(field.id.as_deref()) {
                continue;
            }
            field.apply(self, view, dt)?;
        }

        for sink in view.sinks {
            if sink.is_disposed() || !self.options.use_sinks.matches(sink.id.as_deref()) {
                continue;
            }
            sink.affect(self, dt);
        }

        for collider in view.colliders {
            if !self.options.use_colliders.matches(collider.id.as_deref()) {
                continue;
            }
            collider.handle_collision(self, rng);
        }

        if self.options.max_speed >= 0.0 {
            self.velocity = self.velocity.clamp_length_max(self.options.max_speed);
        }
        Ok(())
    }

    fn update_trail(&mut self, dt: f32) {
        let Some(trail) = &self.style.trail else {
            return;
        };

        for point in self.trail.iter_mut() {
            point.age += dt;
        }

        let moved = self
            .trail
            .back()
            .map_or(true, |last| last.position.distance(self.position) >= TRAIL_MIN_DISTANCE);
        if moved {
            self.trail.push_back(TrailPoint {
                position: self.position,
                age: 0.0,
            });
        }

        match trail.decay_time {
            Some(decay) => {
                while self.trail.front().is_some_and(|p| p.age > decay) {
                    self.trail.pop_front();
                }
            }
            None => {
                while self.trail.len() > trail.length {
                    self.trail.pop_front();
                }
            }
        }
    }

    /// Draw into `canvas`. Does not change particle state.
    pub fn draw(&self, system: &ParticleSystem, canvas: &mut dyn Canvas) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        let phases = self.options.draw_phases;
        let alpha = if phases.fade { self.fade_alpha() } else { 1.0 };

        canvas.save();
        canvas.set_global_alpha(alpha);
        if phases.trail {
            self.draw_trail(canvas);
        }
        if phases.transform {
            canvas.translate(self.position);
        }
        let result = self.draw_body(system, canvas);
        canvas.restore();
        result
    }

    fn draw_body(&self, system: &ParticleSystem, canvas: &mut dyn Canvas) -> Result<()> {
        let phases = self.options.draw_phases;
        if phases.hooks {
            if let Some(hook) = &self.options.hooks.pre_draw {
                hook(self, system, canvas)?;
            }
        }
        if phases.style {
            self.draw_style(canvas);
        }
        if phases.hooks {
            if let Some(hook) = &self.options.hooks.post_draw {
                hook(self, system, canvas)?;
            }
        }
        Ok(())
    }

    fn draw_trail(&self, canvas: &mut dyn Canvas) {
        let Some(trail) = &self.style.trail else {
            return;
        };
        if self.trail.is_empty() {
            return;
        }
        let color = trail.color.unwrap_or(self.style.color);
        let count = self.trail.len();

        let mut previous = self.trail[0].position;
        for (i, point) in self.trail.iter().enumerate().skip(1) {
            let strength = trail_strength(trail.decay_time, point, i, count);
            canvas.stroke_line(previous, point.position, trail.width, color.fade(strength));
            previous = point.position;
        }
        if previous != self.position {
            canvas.stroke_line(previous, self.position, trail.width, color);
        }
    }

    fn draw_style(&self, canvas: &mut dyn Canvas) {
        let style = &self.style;
        let color = style.color;

        if let Some(glow) = style.glow {
            canvas.set_glow(glow.color.unwrap_or(color), glow.blur);
        }

        match &style.kind {
            StyleKind::Dot => canvas.fill_circle(Vec2::ZERO, self.radius(), color),
            StyleKind::Radial => {
                canvas.fill_radial_gradient(Vec2::ZERO, self.radius(), color, color.with_alpha(0.0))
            }
            StyleKind::Line { rotation_offset } => {
                canvas.rotate(self.render_rotation + rotation_offset);
                let half = Vec2::new(self.size.x / 2.0, 0.0);
                canvas.stroke_line(-half, half, self.size.y, color);
            }
            StyleKind::Image { image, rotate } => {
                if *rotate {
                    canvas.rotate(self.render_rotation);
                }
                canvas.draw_image(image, -self.size / 2.0, self.size);
            }
        }

        if style.glow.is_some() {
            canvas.set_glow(Color::TRANSPARENT, 0.0);
        }
    }
}

/// Opacity of one trail segment: by sample age when decaying, by position otherwise
fn trail_strength(decay_time: Option<f32>, point: &TrailPoint, index: usize, count: usize) -> f32 {
    match decay_time {
        Some(decay) if decay > 0.0 => (1.0 - point.age / decay).clamp(0.0, 1.0),
        Some(_) => 0.0,
        None => (index + 1) as f32 / count as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::UpdatePhases;
    use crate::style::Trail;
    use std::f32::consts::FRAC_PI_4;

    fn step(particle: &mut Particle, dt: f32) {
        let mut rng = ParticleRng::new(1);
        let view = SystemView::empty();
        particle.update(&view, &mut rng, dt).unwrap();
    }

    #[test]
    fn ages_and_disposes_at_lifespan() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO).with_lifespan(0.5);
        step(&mut p, 0.25);
        assert!(!p.is_disposed());
        step(&mut p, 0.25);
        assert!(p.is_disposed());

        // Inert once disposed
        let before = p.age;
        step(&mut p, 1.0);
        assert_eq!(p.age, before);
        assert!(p.is_disposed());
    }

    #[test]
    fn negative_lifespan_disposes_immediately() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::X).with_lifespan(-1.0);
        step(&mut p, 0.0);
        assert!(p.is_disposed());
    }

    #[test]
    fn integrates_position_semi_implicitly() {
        let mut p = Particle::new(Vec2::new(1.0, 2.0), Vec2::new(10.0, -4.0)).with_lifespan(10.0);
        step(&mut p, 0.5);
        assert!((p.position - Vec2::new(6.0, 0.0)).length() < 1e-5);
        assert_eq!(p.velocity, Vec2::new(10.0, -4.0));
    }

    #[test]
    fn rotation_follows_velocity_when_unset() {
        let velocity = Vec2::from_angle(FRAC_PI_4) * 50.0;
        let mut p = Particle::new(Vec2::ZERO, velocity).with_lifespan(10.0);
        step(&mut p, 0.016);
        assert!((p.render_rotation() - FRAC_PI_4).abs() < 1e-5);
    }

    #[test]
    fn rotation_is_static_without_direction_phase() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::new(0.0, 10.0)).with_lifespan(10.0);
        p.options.update_phases.direction = false;
        step(&mut p, 0.016);
        assert_eq!(p.render_rotation(), 0.0);

        let mut fixed = Particle::new(Vec2::ZERO, Vec2::new(0.0, 10.0))
            .with_lifespan(10.0)
            .with_rotation(Some(1.25));
        step(&mut fixed, 0.016);
        assert_eq!(fixed.render_rotation(), 1.25);
    }

    #[test]
    fn disabled_phases_freeze_the_particle() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::new(5.0, 5.0)).with_lifespan(0.1);
        p.options.update_phases = UpdatePhases::NONE;
        step(&mut p, 1.0);
        assert_eq!(p.age, 0.0);
        assert_eq!(p.position, Vec2::ZERO);
        assert!(!p.is_disposed());
    }

    #[test]
    fn custom_hook_runs_without_physics() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO).with_lifespan(10.0);
        p.options.update_phases.physics = false;
        p.options = p.options.clone().with_update_hook(|particle, _, dt| {
            particle.velocity.y += 100.0 * dt;
            Ok(())
        });
        step(&mut p, 0.5);
        assert!((p.velocity.y - 50.0).abs() < 1e-5);
        // Position integrates the hook-modified velocity
        assert!((p.position.y - 25.0).abs() < 1e-5);
    }

    #[test]
    fn hook_errors_propagate() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO).with_lifespan(10.0);
        p.options = p
            .options
            .clone()
            .with_update_hook(|_, _, _| Err(spark_core::SparkError::callback("particle", "nope")));
        let mut rng = ParticleRng::new(1);
        let result = p.update(&SystemView::empty(), &mut rng, 0.1);
        assert!(result.is_err());
    }

    #[test]
    fn max_speed_clamps_velocity() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::new(300.0, 400.0)).with_lifespan(10.0);
        p.options.max_speed = 50.0;
        step(&mut p, 0.01);
        assert!((p.velocity.length() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn trail_samples_respect_distance_and_length() {
        let style = ParticleStyle::default().with_trail(Trail {
            length: 3,
            ..Default::default()
        });
        let mut p = Particle::new(Vec2::ZERO, Vec2::new(128.0, 0.0))
            .with_lifespan(100.0)
            .with_style(style);

        // 2 units per step: a sample every third step after the first
        for _ in 0..3 {
            step(&mut p, 1.0 / 64.0);
        }
        assert_eq!(p.trail().count(), 1);
        step(&mut p, 1.0 / 64.0);
        assert_eq!(p.trail().count(), 2);

        for _ in 0..50 {
            step(&mut p, 1.0 / 64.0);
        }
        assert_eq!(p.trail().count(), 3);
        let newest = p.trail().last().map(|t| t.position.x).unwrap_or_default();
        assert!(p.position.x - newest < TRAIL_MIN_DISTANCE);
    }

    #[test]
    fn trail_decays_by_age() {
        let style = ParticleStyle::default().with_trail(Trail {
            length: 1000,
            decay_time: Some(0.1),
            ..Default::default()
        });
        let mut p = Particle::new(Vec2::ZERO, Vec2::new(1000.0, 0.0))
            .with_lifespan(100.0)
            .with_style(style);
        for _ in 0..100 {
            step(&mut p, 0.01);
        }
        assert!(p.trail().all(|t| t.age <= 0.1));
        assert!(p.trail().count() <= 11);
    }
}
