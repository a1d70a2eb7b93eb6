use std::f64::consts::FRAC_PI_2;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use launch_optimizer::io::json::{write_report_file, Report};
use launch_optimizer::io::TrajectoryLog;
use launch_optimizer::orbital::circularization_delta_v;
use launch_optimizer::physics::gravity;
use launch_optimizer::sim::RunSummary;
use launch_optimizer::vehicle::presets;
use launch_optimizer::{
    Optimizer, OptimizerConfig, OptimizerOutcome, Planetoid, Program, Rocket, SimConfig, System,
};

#[derive(Parser)]
#[command(name = "launch-optimizer", about = "Search ascent guidance programs for a single-stage orbiter")]
struct Cli {
    /// Generations to run
    #[arg(short, long, default_value_t = 40)]
    generations: usize,

    /// Candidates flown per generation
    #[arg(short, long, default_value_t = 16)]
    children: usize,

    /// RNG seed for reproducible searches
    #[arg(short, long)]
    seed: Option<u64>,

    /// Target apoapsis altitude in metres
    #[arg(long, default_value_t = 75_000.0)]
    cutoff_altitude: f64,

    /// Integration step in seconds
    #[arg(long, default_value_t = 0.01, value_parser = positive_seconds)]
    delta_t: f64,

    /// Write the best trajectory to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write a JSON report to this file
    #[arg(long)]
    json: Option<PathBuf>,
}

fn positive_seconds(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} is not a positive number of seconds"))
    }
}

/// Full throttle all the way, with a gentle gravity turn.
fn seed_programs() -> Result<(Program, Program)> {
    let throttle = Program::from_pairs(&[
        (0.0, 1.0),
        (10_000.0, 1.0),
        (20_000.0, 1.0),
        (30_000.0, 1.0),
        (40_000.0, 1.0),
        (50_000.0, 1.0),
        (60_000.0, 1.0),
    ])?;
    let altitude_angle = Program::from_pairs(&[
        (0.0, FRAC_PI_2),
        (1_000.0, 1.4),
        (5_000.0, 1.1),
        (10_000.0, 0.9),
        (20_000.0, 0.6),
        (30_000.0, 0.4),
        (45_000.0, 0.2),
        (60_000.0, 0.0),
    ])?;
    Ok((throttle, altitude_angle))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let kerbin = Planetoid::kerbin();
    let cutoff_radius = kerbin.radius + cli.cutoff_altitude;
    let (throttle, altitude_angle) = seed_programs().context("invalid seed programs")?;

    let config = OptimizerConfig {
        children: cli.children,
        seed: cli.seed,
        ..OptimizerConfig::default()
    };
    let sim_config = SimConfig {
        delta_t: cli.delta_t,
        ..SimConfig::default()
    };

    let mut optimizer = Optimizer::new(
        || presets::orbiter(&kerbin),
        &kerbin,
        throttle,
        altitude_angle,
        cutoff_radius,
        config,
    )
    .with_sim_config(sim_config.clone());
    let outcome = optimizer.run(cli.generations).context("optimizer aborted")?;

    // Fly the incumbent once more to report on it.
    let mut replay = System::new(
        presets::orbiter(&kerbin),
        &kerbin,
        &outcome.throttle_program,
        &outcome.altitude_angle_program,
        sim_config,
    )
    .with_throttle_cutoff_radius(cutoff_radius);
    if let Some(path) = &cli.csv {
        let log = TrajectoryLog::create(path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        replay = replay.with_log(log);
    }
    replay.run().context("replay of best programs failed")?;
    let summary = replay.summary();

    let rocket = presets::orbiter(&kerbin);
    print_report(&kerbin, &rocket, cutoff_radius, &outcome, &summary);

    if let Some(path) = &cli.json {
        let report = Report {
            planetoid: kerbin.clone(),
            rocket,
            throttle_cutoff_radius: cutoff_radius,
            outcome: outcome.clone(),
            best_run: Some(summary),
        };
        write_report_file(path, &report)
            .with_context(|| format!("cannot write {}", path.display()))?;
    }
    Ok(())
}

fn print_report(
    planetoid: &Planetoid,
    rocket: &Rocket,
    cutoff_radius: f64,
    outcome: &OptimizerOutcome,
    summary: &RunSummary,
) {
    let g = gravity::surface_gravity(planetoid.gravitational_parameter, planetoid.radius);

    println!();
    println!("====================================================================");
    println!("  LAUNCH OPTIMIZER — {} generations", outcome.generations);
    println!("====================================================================");
    println!();
    println!("  Vehicle Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Wet mass:      {:>8.2} t     Dry mass:     {:>8.2} t",
        rocket.mass, rocket.empty_mass
    );
    println!(
        "  Thrust:        {:>8.0} kN    TWR:          {:>8.2}",
        rocket.max_thrust,
        rocket.twr(g)
    );
    println!(
        "  Isp (vac/atm): {:>4.0}/{:<4.0} s    Delta-v:      {:>8.0} m/s",
        rocket.isp_vac,
        rocket.isp_atm,
        rocket.ideal_delta_v()
    );
    println!(
        "  Target apoapsis: {:>6.1} km",
        (cutoff_radius - planetoid.radius) / 1000.0
    );
    println!();

    println!("  Best Programs (fitness {:.1} m/s)", outcome.fitness);
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Throttle");
    print!("{}", outcome.throttle_program);
    println!("  Altitude angle (deg)");
    print!("{}", outcome.altitude_angle_program.display_scaled(180.0 / std::f64::consts::PI));
    println!();

    println!("  Best Run");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  State: {:?}   ticks: {}   mission time: {:.1} s",
        summary.state, summary.ticks, summary.mission_time
    );
    for event in &summary.events {
        println!(
            "  {:<28} t={:>6.1}s   alt={:>8.0}m",
            format!("{:?}", event.kind),
            event.time,
            event.altitude
        );
    }
    if let Some(apex) = &summary.statistics.apex {
        println!(
            "  APEX      t={:>6.1}s   alt={:>8.0}m   h-vel={:>7.1}m/s   dv left={:>6.0}m/s",
            apex.time, apex.altitude, apex.horizontal_velocity, apex.ideal_delta_v
        );
        let to_circularize = circularization_delta_v(
            planetoid.gravitational_parameter,
            apex.radius,
            apex.horizontal_velocity.abs(),
        );
        println!("  Circularize at apex: {:.0} m/s", to_circularize);
    }
    let stats = &summary.statistics;
    println!(
        "  Losses:   gravity {:>6.0} m/s   drag {:>6.0} m/s   (thrust {:>6.0} m/s)",
        stats.gravity.delta_v, stats.drag.delta_v, stats.thrust.delta_v
    );
    println!("  Distance travelled: {:.1} km", stats.distance_travelled / 1000.0);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_must_be_positive() {
        assert_eq!(positive_seconds("0.02"), Ok(0.02));
        assert!(positive_seconds("0").is_err());
        assert!(positive_seconds("-0.01").is_err());
        assert!(positive_seconds("inf").is_err());
        assert!(positive_seconds("fast").is_err());
        assert!(Cli::try_parse_from(["launch-optimizer", "--delta-t", "0"]).is_err());
    }
}
