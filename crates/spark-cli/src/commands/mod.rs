//! CLI command implementations

pub mod forces;
pub mod render;
pub mod simulate;

use anyhow::{bail, Context, Result};
use spark_particles::{FrameClock, ParticleSystem};

/// Step `system` until `duration` seconds have been simulated, `dt` at a time.
/// `on_step` sees the system after every update along with the simulated time.
pub fn step_for(
    system: &mut ParticleSystem,
    duration: f32,
    dt: f32,
    mut on_step: impl FnMut(&ParticleSystem, f32),
) -> Result<()> {
    if dt <= 0.0 {
        bail!("--dt must be positive, got {dt}");
    }
    let mut clock = FrameClock::with_max_delta(dt);
    while clock.total_time + dt * 0.5 < duration {
        let step = clock.advance(dt);
        system
            .update(step)
            .with_context(|| format!("Simulation failed at t={:.3}s", clock.total_time))?;
        on_step(system, clock.total_time);
    }
    Ok(())
}
