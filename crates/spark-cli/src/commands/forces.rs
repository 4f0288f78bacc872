//! List the built-in force field algorithms

use anyhow::Result;
use spark_particles::{ForceAlgorithm, BUILTIN_FORCE_NAMES};

pub fn run() -> Result<()> {
    println!("Built-in force algorithms:");
    for name in BUILTIN_FORCE_NAMES {
        let algorithm = ForceAlgorithm::from_name(name)?;
        println!("  {name:<14} {algorithm:?}");
    }
    println!();
    println!("Use one in an effect file with: algorithm = {{ name = \"vortex\", strength = 800 }}");
    Ok(())
}
