//! Headless simulation with a population report

use crate::effect::EffectFile;
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

pub struct SimulateArgs {
    pub effect: PathBuf,
    pub duration: f32,
    pub dt: f32,
    pub seed: u64,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let effect = EffectFile::load(&args.effect)?;
    let mut system = effect.build(args.seed)?;
    println!("Loaded effect: {}", args.effect.display());
    println!(
        "Entities: {} emitter(s), {} attractor(s), {} force field(s), {} collider(s), {} sink(s)",
        system.emitters.len(),
        system.attractors.len(),
        system.force_fields.len(),
        system.colliders.len(),
        system.sinks.len()
    );

    let mut next_report = 1.0;
    let mut peak = 0;
    super::step_for(&mut system, args.duration, args.dt, |system, time| {
        let count = system.particle_count();
        peak = peak.max(count);
        if time + args.dt * 0.5 >= next_report {
            println!(
                "  t={time:>6.2}s  particles={count:<6} emitters={:<3} emitted={}",
                system.emitters.len(),
                system.total_emitted()
            );
            next_report += 1.0;
        }
    })?;

    info!(peak, total_time = args.duration, "simulation complete");
    println!("Peak population: {peak}");
    if system.is_finished() {
        println!("Effect finished");
    } else {
        println!("Effect still running: {} live particle(s)", system.particle_count());
    }
    Ok(())
}
