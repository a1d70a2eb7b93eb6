use std::f64::consts::FRAC_PI_2;
use std::fs::File;

use launch_optimizer::io::write_trajectory;
use launch_optimizer::vehicle::presets;
use launch_optimizer::{Optimizer, OptimizerConfig, Planetoid, Program, SimConfig, System};

fn main() -> anyhow::Result<()> {
    let kerbin = Planetoid::kerbin();
    let cutoff_radius = kerbin.radius + 70_000.0;
    let throttle = Program::from_pairs(&[(0.0, 1.0), (15_000.0, 1.0), (30_000.0, 1.0)])?;
    let altitude_angle = Program::from_pairs(&[
        (0.0, FRAC_PI_2),
        (3_000.0, 1.2),
        (12_000.0, 0.8),
        (25_000.0, 0.4),
        (45_000.0, 0.0),
    ])?;
    let sim_config = SimConfig { delta_t: 0.02, ..SimConfig::default() };

    let mut optimizer = Optimizer::new(
        || presets::orbiter(&kerbin),
        &kerbin,
        throttle,
        altitude_angle,
        cutoff_radius,
        OptimizerConfig { children: 8, seed: Some(42), ..OptimizerConfig::default() },
    )
    .with_sim_config(sim_config.clone());

    println!("Searching 10 generations with seed 42 ...");
    let outcome = optimizer.run(10)?;
    for (generation, fitness) in optimizer.history().iter().enumerate() {
        println!("  gen {:>2}: {:>9.1} m/s", generation + 1, fitness);
    }
    println!("Throttle:       {}", outcome.throttle_program);
    println!("Altitude angle: {}", outcome.altitude_angle_program);

    let mut frames = Vec::new();
    let mut system = System::new(
        presets::orbiter(&kerbin),
        &kerbin,
        &outcome.throttle_program,
        &outcome.altitude_angle_program,
        sim_config,
    )
    .with_throttle_cutoff_radius(cutoff_radius);
    system.run_with(|f| frames.push(f.clone()))?;

    write_trajectory(File::create("seeded_search.csv")?, &frames)?;
    println!(
        "Apex {:.1} km after {:.0} s; exported seeded_search.csv",
        system.statistics().max_altitude() / 1000.0,
        system.time()
    );
    Ok(())
}
