//! Per-particle behavior flags: field targeting, phase toggles and custom hooks

use crate::particle::Particle;
use crate::system::{ParticleSystem, SystemView};
use spark_core::{Canvas, Result};
use std::fmt;
use std::sync::Arc;

/// Custom update hook, run after the physics phase
pub type UpdateHook = Arc<dyn Fn(&mut Particle, &SystemView<'_>, f32) -> Result<()> + Send + Sync>;

/// Custom draw hook, run inside the particle's transform
pub type DrawHook =
    Arc<dyn Fn(&Particle, &ParticleSystem, &mut dyn Canvas) -> Result<()> + Send + Sync>;

/// Which field entities of one kind may affect a particle
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Targeting {
    #[default]
    All,
    None,
    Id(String),
    Ids(Vec<String>),
}

impl Targeting {
    /// Whether an entity with the given optional id is allowed.
    /// Id-based targeting never matches entities without an id.
    pub fn matches(&self, id: Option<&str>) -> bool {
        match self {
            Targeting::All => true,
            Targeting::None => false,
            Targeting::Id(wanted) => id == Some(wanted.as_str()),
            Targeting::Ids(wanted) => id.is_some_and(|id| wanted.iter().any(|w| w == id)),
        }
    }
}

impl From<bool> for Targeting {
    fn from(enabled: bool) -> Self {
        if enabled {
            Targeting::All
        } else {
            Targeting::None
        }
    }
}

impl From<&str> for Targeting {
    fn from(id: &str) -> Self {
        Targeting::Id(id.to_string())
    }
}

impl From<Vec<String>> for Targeting {
    fn from(ids: Vec<String>) -> Self {
        Targeting::Ids(ids)
    }
}

/// Update phases, run in this order when enabled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdatePhases {
    pub age: bool,
    pub physics: bool,
    pub direction: bool,
    pub position: bool,
}

impl UpdatePhases {
    pub const ALL: Self = Self {
        age: true,
        physics: true,
        direction: true,
        position: true,
    };
    pub const NONE: Self = Self {
        age: false,
        physics: false,
        direction: false,
        position: false,
    };
}

impl Default for UpdatePhases {
    fn default() -> Self {
        Self::ALL
    }
}

/// Draw phases, run in this order when enabled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawPhases {
    pub fade: bool,
    pub trail: bool,
    pub transform: bool,
    pub hooks: bool,
    pub style: bool,
}

impl DrawPhases {
    pub const ALL: Self = Self {
        fade: true,
        trail: true,
        transform: true,
        hooks: true,
        style: true,
    };
    pub const NONE: Self = Self {
        fade: false,
        trail: false,
        transform: false,
        hooks: false,
        style: false,
    };
}

impl Default for DrawPhases {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Clone, Default)]
pub struct ParticleHooks {
    pub update: Option<UpdateHook>,
    pub pre_draw: Option<DrawHook>,
    pub post_draw: Option<DrawHook>,
}

impl fmt::Debug for ParticleHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticleHooks")
            .field("update", &self.update.is_some())
            .field("pre_draw", &self.pre_draw.is_some())
            .field("post_draw", &self.post_draw.is_some())
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct ParticleOptions {
    pub use_attractors: Targeting,
    pub use_force_fields: Targeting,
    pub use_sinks: Targeting,
    pub use_colliders: Targeting,
    pub update_phases: UpdatePhases,
    pub draw_phases: DrawPhases,
    /// Velocity magnitude clamp; negative disables it
    pub max_speed: f32,
    pub hooks: ParticleHooks,
}

impl Default for ParticleOptions {
    fn default() -> Self {
        Self {
            use_attractors: Targeting::All,
            use_force_fields: Targeting::All,
            use_sinks: Targeting::All,
            use_colliders: Targeting::All,
            update_phases: UpdatePhases::ALL,
            draw_phases: DrawPhases::ALL,
            max_speed: -1.0,
            hooks: ParticleHooks::default(),
        }
    }
}

impl ParticleOptions {
    pub fn with_update_hook(
        mut self,
        hook: impl Fn(&mut Particle, &SystemView<'_>, f32) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.update = Some(Arc::new(hook));
        self
    }

    pub fn with_pre_draw(
        mut self,
        hook: impl Fn(&Particle, &ParticleSystem, &mut dyn Canvas) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.pre_draw = Some(Arc::new(hook));
        self
    }

    pub fn with_post_draw(
        mut self,
        hook: impl Fn(&Particle, &ParticleSystem, &mut dyn Canvas) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.post_draw = Some(Arc::new(hook));
        self
    }
}
