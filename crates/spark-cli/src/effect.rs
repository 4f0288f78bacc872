//! Effect files: TOML descriptions of a particle system for the headless runner
//!
//! ```toml
//! [canvas]
//! width = 800
//! height = 600
//! background = "#101018"
//!
//! [[emitter]]
//! position = [400, 300]
//! emission = { type = "rate", rate = 40 }
//! speed = { min = 40, max = 120 }
//! direction = { min = 240, max = 300 }   # degrees
//! particle_lifespan = 2.5
//! style = { kind = "radial", color = ["#ffcc00", "#ff6600"], fade = { fade_out = 1.0 } }
//!
//! [[force_field]]
//! force = [0, 60]
//!
//! [[collider]]
//! shape = "rectangle"
//! position = [400, 560]
//! size = [600, 20]
//! restitution = 0.4
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use spark_core::{Color, ColorSource, ImageId, Param, Sample, Vec2};
use spark_particles::{
    Attractor, Collider, ColliderShape, DrawPhases, Emission, Emitter, Fade, ForceAlgorithm,
    ForceField, Glow, ParticleOptions, ParticleSystem, ParticleTemplate, PositionDistribution, Sink,
    SinkMode, StyleKind, StyleTemplate, Targeting, Trail, UpdatePhases, INFINITE,
};
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EffectFile {
    #[serde(default)]
    pub canvas: CanvasDef,
    #[serde(default, rename = "emitter")]
    pub emitters: Vec<EmitterDef>,
    #[serde(default, rename = "attractor")]
    pub attractors: Vec<AttractorDef>,
    #[serde(default, rename = "force_field")]
    pub force_fields: Vec<ForceFieldDef>,
    #[serde(default, rename = "collider")]
    pub colliders: Vec<ColliderDef>,
    #[serde(default, rename = "sink")]
    pub sinks: Vec<SinkDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CanvasDef {
    pub width: u32,
    pub height: u32,
    pub background: Color,
}

impl Default for CanvasDef {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Color::BLACK,
        }
    }
}

/// A number, or `{ min, max }` sampled per particle
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum ParamDef<T> {
    Fixed(T),
    Range { min: T, max: T },
}

impl<T: Sample> ParamDef<T> {
    fn to_param(self) -> Param<T> {
        match self {
            ParamDef::Fixed(value) => Param::Fixed(value),
            ParamDef::Range { min, max } => Param::range(min, max),
        }
    }
}

impl ParamDef<f32> {
    /// Degrees in the file, radians in the engine
    fn to_radians(self) -> Param<f32> {
        match self {
            ParamDef::Fixed(value) => Param::Fixed(value.to_radians()),
            ParamDef::Range { min, max } => Param::range(min.to_radians(), max.to_radians()),
        }
    }
}

fn infinite() -> f32 {
    INFINITE
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum EmissionDef {
    Rate {
        rate: ParamDef<f32>,
    },
    Burst {
        count: ParamDef<f32>,
        #[serde(default)]
        delay: f32,
    },
}

impl Default for EmissionDef {
    fn default() -> Self {
        EmissionDef::Rate {
            rate: ParamDef::Fixed(10.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionDef {
    #[default]
    Uniform,
    Normal,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmitterDef {
    pub position: Vec2,
    #[serde(default)]
    pub size: Vec2,
    #[serde(default = "infinite")]
    pub lifespan: f32,
    #[serde(default)]
    pub emission: EmissionDef,
    #[serde(default)]
    pub distribution: DistributionDef,
    pub speed: Option<ParamDef<f32>>,
    /// Degrees, 0 = +x, counter-clockwise
    pub direction: Option<ParamDef<f32>>,
    pub particle_size: Option<ParamDef<Vec2>>,
    /// Degrees; omitted means particles face their velocity
    pub rotation: Option<ParamDef<f32>>,
    pub particle_lifespan: Option<ParamDef<f32>>,
    #[serde(default)]
    pub style: StyleDef,
    #[serde(default)]
    pub options: OptionsDef,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleKindDef {
    #[default]
    Dot,
    Radial,
    Line,
    Image,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleDef {
    #[serde(default)]
    pub kind: StyleKindDef,
    #[serde(default)]
    pub color: ColorSource,
    /// Registered image name, for `kind = "image"`
    pub image: Option<String>,
    #[serde(default)]
    pub rotate_image: bool,
    /// Degrees added to the render rotation of line particles
    #[serde(default)]
    pub rotation_offset: f32,
    pub glow: Option<GlowDef>,
    pub fade: Option<FadeDef>,
    pub trail: Option<TrailDef>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlowDef {
    pub blur: f32,
    pub color: Option<Color>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct FadeDef {
    pub fade_in: f32,
    pub fade_out: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrailDef {
    pub length: Option<usize>,
    pub width: Option<f32>,
    pub color: Option<Color>,
    pub decay_time: Option<f32>,
}

/// `true`/`false`, a single id, or a list of ids
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TargetDef {
    Enabled(bool),
    Id(String),
    Ids(Vec<String>),
}

impl From<TargetDef> for Targeting {
    fn from(def: TargetDef) -> Self {
        match def {
            TargetDef::Enabled(enabled) => Targeting::from(enabled),
            TargetDef::Id(id) => Targeting::Id(id),
            TargetDef::Ids(ids) => Targeting::Ids(ids),
        }
    }
}

/// `"all"`, `"none"`, or a list of phase names
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PhasesDef {
    Keyword(String),
    List(Vec<String>),
}

impl PhasesDef {
    fn names(&self, all: &[&'static str]) -> Result<Vec<String>> {
        let names = match self {
            PhasesDef::Keyword(k) if k == "all" => all.iter().map(|s| s.to_string()).collect(),
            PhasesDef::Keyword(k) if k == "none" => Vec::new(),
            PhasesDef::Keyword(k) => bail!("expected \"all\", \"none\" or a list of phases, got \"{k}\""),
            PhasesDef::List(list) => list.clone(),
        };
        if let Some(unknown) = names.iter().find(|n| !all.contains(&n.as_str())) {
            bail!("unknown phase \"{unknown}\"; valid phases: {}", all.join(", "));
        }
        Ok(names)
    }

    fn update_phases(&self) -> Result<UpdatePhases> {
        let names = self.names(&["age", "physics", "direction", "position"])?;
        let has = |n: &str| names.iter().any(|s| s == n);
        Ok(UpdatePhases {
            age: has("age"),
            physics: has("physics"),
            direction: has("direction"),
            position: has("position"),
        })
    }

    fn draw_phases(&self) -> Result<DrawPhases> {
        let names = self.names(&["fade", "trail", "transform", "hooks", "style"])?;
        let has = |n: &str| names.iter().any(|s| s == n);
        Ok(DrawPhases {
            fade: has("fade"),
            trail: has("trail"),
            transform: has("transform"),
            hooks: has("hooks"),
            style: has("style"),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsDef {
    pub use_attractors: Option<TargetDef>,
    pub use_force_fields: Option<TargetDef>,
    pub use_sinks: Option<TargetDef>,
    pub use_colliders: Option<TargetDef>,
    pub update_phases: Option<PhasesDef>,
    pub draw_phases: Option<PhasesDef>,
    pub max_speed: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttractorDef {
    pub position: Vec2,
    pub range: Option<f32>,
    /// Negative repels
    pub force: Option<f32>,
    pub falloff: Option<f32>,
    pub id: Option<String>,
    #[serde(default = "infinite")]
    pub lifespan: f32,
}

/// A built-in algorithm by name; unset parameters keep the built-in defaults
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlgorithmDef {
    pub name: String,
    pub frequency: Option<f32>,
    pub amplitude: Option<f32>,
    pub center: Option<Vec2>,
    pub range: Option<f32>,
    pub strength: Option<f32>,
    pub clockwise: Option<bool>,
    pub noise_scale: Option<f32>,
    pub time_scale: Option<f32>,
    pub force_amount: Option<f32>,
    pub coefficient: Option<f32>,
    pub separation_distance: Option<f32>,
    pub alignment_distance: Option<f32>,
    pub cohesion_distance: Option<f32>,
    pub separation_weight: Option<f32>,
    pub alignment_weight: Option<f32>,
    pub cohesion_weight: Option<f32>,
}

fn set<T: Copy>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl AlgorithmDef {
    pub fn build(&self) -> Result<ForceAlgorithm> {
        let mut algorithm = ForceAlgorithm::from_name(&self.name)?;
        match &mut algorithm {
            ForceAlgorithm::Uniform | ForceAlgorithm::Custom(_) => {}
            ForceAlgorithm::Wave {
                frequency,
                amplitude,
            } => {
                set(frequency, self.frequency);
                set(amplitude, self.amplitude);
            }
            ForceAlgorithm::Vortex {
                center,
                range,
                strength,
                clockwise,
            } => {
                set(center, self.center);
                set(range, self.range);
                set(strength, self.strength);
                set(clockwise, self.clockwise);
            }
            ForceAlgorithm::Orbital {
                center,
                range,
                strength,
            } => {
                set(center, self.center);
                set(range, self.range);
                set(strength, self.strength);
            }
            ForceAlgorithm::VectorField {
                noise_scale,
                time_scale,
                force_amount,
                ..
            } => {
                set(noise_scale, self.noise_scale);
                set(time_scale, self.time_scale);
                set(force_amount, self.force_amount);
            }
            ForceAlgorithm::Turbulence {
                frequency,
                strength,
            } => {
                set(frequency, self.frequency);
                set(strength, self.strength);
            }
            ForceAlgorithm::Drag { coefficient } => set(coefficient, self.coefficient),
            ForceAlgorithm::Boids(params) => {
                set(&mut params.separation_distance, self.separation_distance);
                set(&mut params.alignment_distance, self.alignment_distance);
                set(&mut params.cohesion_distance, self.cohesion_distance);
                set(&mut params.separation_weight, self.separation_weight);
                set(&mut params.alignment_weight, self.alignment_weight);
                set(&mut params.cohesion_weight, self.cohesion_weight);
            }
        }
        Ok(algorithm)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForceFieldDef {
    #[serde(default)]
    pub force: Vec2,
    pub algorithm: Option<AlgorithmDef>,
    pub id: Option<String>,
    #[serde(default = "infinite")]
    pub lifespan: f32,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ShapeDef {
    Circle {
        radius: f32,
    },
    Rectangle {
        size: Vec2,
        /// Degrees
        #[serde(default)]
        rotation: f32,
    },
    /// Vertices relative to the collider position
    Polygon { vertices: Vec<Vec2> },
}

#[derive(Debug, Deserialize)]
pub struct ColliderDef {
    pub position: Vec2,
    #[serde(flatten)]
    pub shape: ShapeDef,
    pub restitution: Option<f32>,
    pub friction: Option<f32>,
    pub randomness: Option<f32>,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkModeDef {
    #[default]
    Fade,
    Instant,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SinkDef {
    pub position: Vec2,
    pub range: Option<f32>,
    pub strength: Option<f32>,
    pub falloff: Option<f32>,
    #[serde(default)]
    pub mode: SinkModeDef,
    pub id: Option<String>,
    #[serde(default = "infinite")]
    pub lifespan: f32,
}

impl EffectFile {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse effect file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read effect file '{}'", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid effect file '{}'", path.display()))
    }

    /// Instantiate every entity into a seeded system
    pub fn build(&self, seed: u64) -> Result<ParticleSystem> {
        let mut system = ParticleSystem::with_seed(seed);
        for (i, def) in self.emitters.iter().enumerate() {
            let emitter = def.build().with_context(|| format!("emitter #{}", i + 1))?;
            system.add_emitter(emitter);
        }
        for def in &self.attractors {
            system.add_attractor(def.build());
        }
        for (i, def) in self.force_fields.iter().enumerate() {
            let field = def.build().with_context(|| format!("force_field #{}", i + 1))?;
            system.add_force_field(field);
        }
        for (i, def) in self.colliders.iter().enumerate() {
            let collider = def.build().with_context(|| format!("collider #{}", i + 1))?;
            system.add_collider(collider);
        }
        for def in &self.sinks {
            system.add_sink(def.build());
        }
        Ok(system)
    }
}

impl EmitterDef {
    pub fn build(&self) -> Result<Emitter> {
        let defaults = ParticleTemplate::default();
        let template = ParticleTemplate {
            position: match self.distribution {
                DistributionDef::Uniform => PositionDistribution::Uniform,
                DistributionDef::Normal => PositionDistribution::Normal,
            },
            speed: self.speed.map_or(defaults.speed, ParamDef::to_param),
            direction: self.direction.map_or(defaults.direction, ParamDef::to_radians),
            size: self.particle_size.map_or(defaults.size, ParamDef::to_param),
            rotation: self.rotation.map(ParamDef::to_radians),
            lifespan: self
                .particle_lifespan
                .map_or(defaults.lifespan, ParamDef::to_param),
            style: self.style.build()?,
            options: self.options.build()?,
        };
        let emission = match self.emission {
            EmissionDef::Rate { rate } => Emission::Rate {
                rate: rate.to_param(),
            },
            EmissionDef::Burst { count, delay } => Emission::Burst {
                count: count.to_param(),
                delay,
            },
        };
        Ok(Emitter::new(self.position)
            .with_size(self.size)
            .with_lifespan(self.lifespan)
            .with_emission(emission)
            .with_template(template))
    }
}

impl StyleDef {
    pub fn build(&self) -> Result<StyleTemplate> {
        let kind = match self.kind {
            StyleKindDef::Dot => StyleKind::Dot,
            StyleKindDef::Radial => StyleKind::Radial,
            StyleKindDef::Line => StyleKind::Line {
                rotation_offset: self.rotation_offset.to_radians(),
            },
            StyleKindDef::Image => {
                let Some(image) = &self.image else {
                    bail!("image style needs an `image` name");
                };
                StyleKind::Image {
                    image: ImageId::new(image.as_str()),
                    rotate: self.rotate_image,
                }
            }
        };
        let mut style = StyleTemplate::new(kind, self.color.clone());
        if let Some(glow) = self.glow {
            style = style.with_glow(Glow {
                color: glow.color,
                blur: glow.blur,
            });
        }
        if let Some(fade) = self.fade {
            style = style.with_fade(Fade::new(fade.fade_in, fade.fade_out));
        }
        if let Some(trail) = self.trail {
            let defaults = Trail::default();
            style = style.with_trail(Trail {
                length: trail.length.unwrap_or(defaults.length),
                width: trail.width.unwrap_or(defaults.width),
                color: trail.color,
                decay_time: trail.decay_time,
            });
        }
        Ok(style)
    }
}

impl OptionsDef {
    pub fn build(&self) -> Result<ParticleOptions> {
        let mut options = ParticleOptions::default();
        let target = |def: &Option<TargetDef>| def.clone().map_or(Targeting::All, Targeting::from);
        options.use_attractors = target(&self.use_attractors);
        options.use_force_fields = target(&self.use_force_fields);
        options.use_sinks = target(&self.use_sinks);
        options.use_colliders = target(&self.use_colliders);
        if let Some(phases) = &self.update_phases {
            options.update_phases = phases.update_phases().context("update_phases")?;
        }
        if let Some(phases) = &self.draw_phases {
            options.draw_phases = phases.draw_phases().context("draw_phases")?;
        }
        set(&mut options.max_speed, self.max_speed);
        Ok(options)
    }
}

impl AttractorDef {
    pub fn build(&self) -> Attractor {
        let mut attractor = Attractor::new(self.position, 100.0, 100.0).with_lifespan(self.lifespan);
        set(&mut attractor.range, self.range);
        set(&mut attractor.force, self.force);
        set(&mut attractor.falloff, self.falloff);
        attractor.id = self.id.clone();
        attractor
    }
}

impl ForceFieldDef {
    pub fn build(&self) -> Result<ForceField> {
        let mut field = ForceField::new(self.force).with_lifespan(self.lifespan);
        if let Some(algorithm) = &self.algorithm {
            field = field.with_algorithm(algorithm.build()?);
        }
        field.id = self.id.clone();
        Ok(field)
    }
}

impl ColliderDef {
    pub fn build(&self) -> Result<Collider> {
        let shape = match &self.shape {
            ShapeDef::Circle { radius } => ColliderShape::Circle { radius: *radius },
            ShapeDef::Rectangle { size, rotation } => ColliderShape::Rectangle {
                size: *size,
                rotation: rotation.to_radians(),
            },
            ShapeDef::Polygon { vertices } => ColliderShape::Polygon {
                vertices: vertices.clone(),
            },
        };
        let mut collider = Collider::new(self.position, shape);
        set(&mut collider.restitution, self.restitution);
        set(&mut collider.friction, self.friction);
        set(&mut collider.randomness, self.randomness);
        collider.id = self.id.clone();
        collider.validate()?;
        Ok(collider)
    }
}

impl SinkDef {
    pub fn build(&self) -> Sink {
        let mode = match self.mode {
            SinkModeDef::Fade => SinkMode::Fade,
            SinkModeDef::Instant => SinkMode::Instant,
        };
        let mut sink = Sink::new(self.position, 100.0, mode).with_lifespan(self.lifespan);
        set(&mut sink.range, self.range);
        set(&mut sink.strength, self.strength);
        set(&mut sink.falloff, self.falloff);
        sink.id = self.id.clone();
        sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOUNTAIN: &str = r##"
[canvas]
width = 320
height = 240
background = "#102030"

[[emitter]]
position = [160, 200]
size = [20, 0]
emission = { type = "rate", rate = { min = 20, max = 30 } }
speed = 80
direction = { min = 250, max = 290 }
particle_size = [3, 3]
particle_lifespan = 1.5
style = { kind = "radial", color = ["#ff0000", "rgb(0, 0, 255)"], fade = { fade_out = 0.5 } }
options = { use_attractors = "well", update_phases = ["age", "physics", "position"], max_speed = 200 }

[[attractor]]
position = [160, 100]
force = -50
id = "well"

[[force_field]]
force = [0, 40]

[[force_field]]
algorithm = { name = "vortex", center = [160, 120], clockwise = true }
lifespan = 2

[[collider]]
shape = "rectangle"
position = [160, 230]
size = [300, 10]
rotation = 5
restitution = 0.3

[[sink]]
position = [10, 10]
mode = "instant"
"##;

    #[test]
    fn parses_a_full_effect() {
        let effect = EffectFile::parse(FOUNTAIN).unwrap();
        assert_eq!(effect.canvas.width, 320);
        assert_eq!(effect.emitters.len(), 1);
        assert_eq!(effect.force_fields.len(), 2);

        let emitter = effect.emitters[0].build().unwrap();
        assert_eq!(emitter.position, Vec2::new(160.0, 200.0));
        assert!(!emitter.lifetime.is_finite());
        assert!(matches!(emitter.emission, Emission::Rate { rate: Param::Range(_) }));
        assert!(matches!(emitter.template.style.kind, StyleKind::Radial));
        assert!(matches!(&emitter.template.style.color, ColorSource::Choice(c) if c.len() == 2));

        let options = &emitter.template.options;
        assert_eq!(options.use_attractors, Targeting::Id("well".into()));
        assert_eq!(options.use_sinks, Targeting::All);
        assert!(!options.update_phases.direction);
        assert_eq!(options.max_speed, 200.0);

        match &emitter.template.direction {
            Param::Range(range) => assert!((range.min - 250f32.to_radians()).abs() < 1e-6),
            other => panic!("unexpected direction {other:?}"),
        }
    }

    #[test]
    fn builds_a_runnable_system() {
        let effect = EffectFile::parse(FOUNTAIN).unwrap();
        let mut system = effect.build(7).unwrap();
        assert_eq!(system.attractors[0].force, -50.0);
        assert_eq!(system.force_fields[1].algorithm.name(), "vortex");
        assert_eq!(system.sinks[0].mode, SinkMode::Instant);

        for _ in 0..90 {
            system.update(1.0 / 60.0).unwrap();
        }
        assert!(system.particle_count() > 0);
        // The vortex field expires after two seconds
        assert_eq!(system.force_fields.len(), 2);
        for _ in 0..40 {
            system.update(1.0 / 60.0).unwrap();
        }
        assert_eq!(system.force_fields.len(), 1);
    }

    #[test]
    fn bundled_demo_builds() {
        let effect = EffectFile::parse(include_str!("../../../demos/fountain.toml")).unwrap();
        let system = effect.build(1).unwrap();
        assert_eq!(system.emitters.len(), 2);
        assert_eq!(system.colliders.len(), 2);
        assert_eq!(system.sinks[0].id.as_deref(), Some("drain"));
    }

    #[test]
    fn algorithm_parameters_override_defaults() {
        let def = AlgorithmDef {
            name: "drag".into(),
            coefficient: Some(2.0),
            ..Default::default()
        };
        match def.build().unwrap() {
            ForceAlgorithm::Drag { coefficient } => assert_eq!(coefficient, 2.0),
            other => panic!("unexpected algorithm {other:?}"),
        }

        let def = AlgorithmDef {
            name: "vectorField".into(),
            ..Default::default()
        };
        assert_eq!(def.build().unwrap().name(), "vector_field");
    }

    #[test]
    fn rejects_bad_input() {
        let unknown_force = "[[force_field]]\nalgorithm = { name = \"gravity_well\" }\n";
        let effect = EffectFile::parse(unknown_force).unwrap();
        assert!(effect.build(1).is_err());

        let bad_phase = "[[emitter]]\nposition = [0, 0]\noptions = { update_phases = [\"spin\"] }\n";
        let effect = EffectFile::parse(bad_phase).unwrap();
        let Err(err) = effect.build(1) else {
            panic!("unknown phase accepted");
        };
        assert!(format!("{err:#}").contains("spin"));

        let bad_polygon = "[[collider]]\nshape = \"polygon\"\nposition = [0, 0]\nvertices = [[0, 0], [1, 1]]\n";
        let effect = EffectFile::parse(bad_polygon).unwrap();
        assert!(effect.build(1).is_err());

        assert!(EffectFile::parse("[[emitter]]\nposition = [0, 0]\ncolour = \"red\"\n").is_err());
        assert!(EffectFile::parse("[canvas]\nbackground = \"#12\"\n").is_err());
    }

    #[test]
    fn burst_and_image_styles() {
        let text = r#"
[[emitter]]
position = [0, 0]
emission = { type = "burst", count = 12, delay = 0.25 }
style = { kind = "image", image = "spark", rotate_image = true }
"#;
        let effect = EffectFile::parse(text).unwrap();
        let emitter = effect.emitters[0].build().unwrap();
        assert!(matches!(emitter.emission, Emission::Burst { delay, .. } if delay == 0.25));
        assert!(matches!(
            &emitter.template.style.kind,
            StyleKind::Image { image, rotate: true } if image.0 == "spark"
        ));

        let missing = "[[emitter]]\nposition = [0, 0]\nstyle = { kind = \"image\" }\n";
        assert!(EffectFile::parse(missing).unwrap().build(1).is_err());
    }
}
