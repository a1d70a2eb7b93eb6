use std::f64::consts::TAU;

use rand::Rng;

use crate::gnc::Program;

/// Throttle level `k / intervals` for a uniformly drawn `k` in `0..=intervals`.
pub fn throttle_level<R: Rng>(rng: &mut R, intervals: u32) -> f64 {
    let intervals = intervals.max(1);
    f64::from(rng.random_range(0..=intervals)) / f64::from(intervals)
}

/// Altitude angle `2π·k / intervals` for a uniformly drawn `k` in `0..=intervals`.
pub fn altitude_angle_level<R: Rng>(rng: &mut R, intervals: u32) -> f64 {
    TAU * throttle_level(rng, intervals)
}

/// Copy of `program` with one randomly chosen breakpoint set to a new level.
pub fn mutate_throttle<R: Rng>(program: &Program, rng: &mut R, intervals: u32) -> Program {
    let index = rng.random_range(0..program.len());
    program.with_setting(index, throttle_level(rng, intervals))
}

pub fn mutate_altitude_angle<R: Rng>(
    program: &Program,
    rng: &mut R,
    intervals: u32,
) -> Program {
    let index = rng.random_range(0..program.len());
    program.with_setting(index, altitude_angle_level(rng, intervals))
}
