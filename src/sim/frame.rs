use serde::{Deserialize, Serialize};

use crate::orbital::Orbit;
use crate::physics::Vec2;

/// Forces acting during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceBreakdown {
    pub total: Vec2,
    pub thrust: Vec2,
    pub gravity: Vec2,
    pub drag: Vec2,
}

/// Snapshot of one integration tick.
///
/// Kinematic fields describe the state at the start of the tick; the
/// `delta_*` fields are what the tick adds to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub ticks: u64,
    pub time: f64,        // s
    pub delta_t: f64,     // s

    pub mass: f64,
    pub delta_mass: f64,  // propellant burned this tick
    pub position: Vec2,
    pub velocity: Vec2,
    pub delta_position: Vec2,
    pub delta_velocity: Vec2,

    pub radius: f64,
    pub altitude: f64,
    pub azimuth: f64,
    pub radial_velocity: f64,
    pub horizontal_velocity: f64,

    pub energy: f64,            // specific
    pub angular_momentum: f64,  // specific
    pub orbit: Orbit,

    pub fuel_mass: f64,
    pub ideal_delta_v: f64,

    pub forces: ForceBreakdown,
    pub throttle: f64,
    pub altitude_angle: f64,
    pub cutoff: bool,
}
