//! Particle appearance: shape, color, glow, fade and trail settings

use spark_core::{Color, ColorSource, ImageId, ParticleRng};

/// Built-in particle shapes. `size` is interpreted per shape.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum StyleKind {
    /// Filled circle, radius = max(size.x, size.y) / 2
    #[default]
    Dot,
    /// Radial gradient from the particle color to transparent
    Radial,
    /// Segment of length size.x and width size.y along the render rotation
    Line { rotation_offset: f32 },
    /// Registered image drawn at size.x by size.y
    Image { image: ImageId, rotate: bool },
}

/// Linear alpha ramps at the start and end of a particle's life, in seconds
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Fade {
    pub fade_in: f32,
    pub fade_out: f32,
}

impl Fade {
    pub fn new(fade_in: f32, fade_out: f32) -> Self {
        Self { fade_in, fade_out }
    }

    /// Combined alpha for `age` within `lifespan`, clamped to [0, 1]
    pub fn alpha(&self, age: f32, lifespan: f32) -> f32 {
        let fade_in = if self.fade_in > 0.0 {
            (age / self.fade_in).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let fade_out = if self.fade_out > 0.0 {
            ((lifespan - age) / self.fade_out).clamp(0.0, 1.0)
        } else {
            1.0
        };
        (fade_in * fade_out).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    /// Falls back to the particle color
    pub color: Option<Color>,
    pub blur: f32,
}

impl Glow {
    pub fn new(blur: f32) -> Self {
        Self { color: None, blur }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Trail {
    /// Maximum number of stored samples
    pub length: usize,
    pub width: f32,
    /// Falls back to the particle color
    pub color: Option<Color>,
    /// When set, samples expire by age instead of by count
    pub decay_time: Option<f32>,
}

impl Default for Trail {
    fn default() -> Self {
        Self {
            length: 10,
            width: 1.0,
            color: None,
            decay_time: None,
        }
    }
}

/// Resolved style owned by a single particle
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ParticleStyle {
    pub kind: StyleKind,
    pub color: Color,
    pub glow: Option<Glow>,
    pub fade: Fade,
    pub trail: Option<Trail>,
}

impl ParticleStyle {
    pub fn new(kind: StyleKind, color: Color) -> Self {
        Self {
            kind,
            color,
            ..Default::default()
        }
    }

    pub fn with_glow(mut self, glow: Glow) -> Self {
        self.glow = Some(glow);
        self
    }

    pub fn with_fade(mut self, fade: Fade) -> Self {
        self.fade = fade;
        self
    }

    pub fn with_trail(mut self, trail: Trail) -> Self {
        self.trail = Some(trail);
        self
    }
}

/// Emitter-side style; the color may be a palette picked from per particle
#[derive(Clone, Debug, PartialEq, Default)]
pub struct StyleTemplate {
    pub kind: StyleKind,
    pub color: ColorSource,
    pub glow: Option<Glow>,
    pub fade: Fade,
    pub trail: Option<Trail>,
}

impl StyleTemplate {
    pub fn new(kind: StyleKind, color: impl Into<ColorSource>) -> Self {
        Self {
            kind,
            color: color.into(),
            ..Default::default()
        }
    }

    pub fn with_glow(mut self, glow: Glow) -> Self {
        self.glow = Some(glow);
        self
    }

    pub fn with_fade(mut self, fade: Fade) -> Self {
        self.fade = fade;
        self
    }

    pub fn with_trail(mut self, trail: Trail) -> Self {
        self.trail = Some(trail);
        self
    }

    /// Produce an independent style for one new particle
    pub fn instantiate(&self, rng: &mut ParticleRng) -> ParticleStyle {
        ParticleStyle {
            kind: self.kind.clone(),
            color: self.color.resolve(rng),
            glow: self.glow,
            fade: self.fade,
            trail: self.trail.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_ramps_multiply() {
        let fade = Fade::new(1.0, 1.0);
        assert!((fade.alpha(0.0, 4.0) - 0.0).abs() < 1e-6);
        assert!((fade.alpha(0.5, 4.0) - 0.5).abs() < 1e-6);
        assert!((fade.alpha(2.0, 4.0) - 1.0).abs() < 1e-6);
        assert!((fade.alpha(3.5, 4.0) - 0.5).abs() < 1e-6);
        assert!((fade.alpha(5.0, 4.0) - 0.0).abs() < 1e-6);
        // Overlapping ramps on a short life
        assert!((fade.alpha(0.5, 1.0) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn no_fade_is_opaque() {
        assert_eq!(Fade::default().alpha(0.0, 1.0), 1.0);
    }

    #[test]
    fn instantiate_copies_template() {
        let mut rng = ParticleRng::new(5);
        let template = StyleTemplate::new(StyleKind::Radial, Color::RED)
            .with_trail(Trail::default())
            .with_fade(Fade::new(0.2, 0.3));
        let mut style = template.instantiate(&mut rng);
        assert_eq!(style.color, Color::RED);
        assert_eq!(style.kind, StyleKind::Radial);

        // Mutating the instance leaves the template untouched
        if let Some(trail) = style.trail.as_mut() {
            trail.length = 99;
        }
        assert_eq!(template.trail.as_ref().map(|t| t.length), Some(10));
    }
}
