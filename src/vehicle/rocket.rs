use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::physics::vector::{Planar, Vec2};

/// Reference gravity for the Isp → mass flow conversion. Independent of the
/// simulated body's own surface gravity.
pub const ISP_G0: f64 = 9.8072;

// ---------------------------------------------------------------------------
// Rocket: single-stage point mass with a throttleable, steerable engine
// ---------------------------------------------------------------------------

/// Mutable propulsion and kinematic state of one vehicle.
///
/// Units follow the Kerbal convention (tonnes, kN, m, s) but any consistent
/// set works. `mass` never drops below `empty_mass`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rocket {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f64,
    pub empty_mass: f64,      // dry mass floor
    pub throttle: f64,        // [0, 1]
    pub altitude_angle: f64,  // rad, π/2 = straight up, 0 = prograde horizon
    pub max_thrust: f64,
    pub isp_vac: f64,         // s
    pub isp_atm: f64,         // s
    pub max_drag: f64,
}

impl Rocket {
    pub fn has_fuel(&self) -> bool {
        self.mass > self.empty_mass
    }

    pub fn fuel_mass(&self) -> f64 {
        (self.mass - self.empty_mass).max(0.0)
    }

    /// Current thrust magnitude. Hard cutoff at fuel exhaustion.
    pub fn thrust(&self) -> f64 {
        if self.has_fuel() {
            self.throttle * self.max_thrust
        } else {
            0.0
        }
    }

    /// Isp blended linearly between vacuum and sea level by the local
    /// atmosphere density factor.
    pub fn specific_impulse(&self, atmosphere_factor: f64) -> f64 {
        atmosphere_factor * self.isp_atm + (1.0 - atmosphere_factor) * self.isp_vac
    }

    /// Propellant mass flow: mdot = F / (Isp * g0)
    pub fn mass_flow_rate(&self, atmosphere_factor: f64) -> f64 {
        self.thrust() / (self.specific_impulse(atmosphere_factor) * ISP_G0)
    }

    /// Direction the engine pushes, given the azimuth of local up.
    pub fn thrust_azimuth(&self, local_up_azimuth: f64) -> f64 {
        local_up_azimuth - FRAC_PI_2 + self.altitude_angle
    }

    pub fn thrust_force(&self, local_up_azimuth: f64) -> Vec2 {
        Vec2::from_polar(self.thrust(), self.thrust_azimuth(local_up_azimuth))
    }

    /// Ideal vacuum delta-v left in the tanks (Tsiolkovsky).
    pub fn ideal_delta_v(&self) -> f64 {
        ISP_G0 * self.isp_vac * (self.mass / self.empty_mass).ln()
    }

    /// Thrust-to-weight ratio at full throttle under `gravity`.
    pub fn twr(&self, gravity: f64) -> f64 {
        self.max_thrust / (self.mass * gravity)
    }

    /// Full-throttle vacuum burn time for the remaining fuel.
    pub fn burn_time(&self) -> f64 {
        if self.max_thrust > 0.0 {
            self.fuel_mass() * self.isp_vac * ISP_G0 / self.max_thrust
        } else {
            0.0
        }
    }

    /// Remove `dm` of propellant, never going below the dry mass.
    pub fn consume(&mut self, dm: f64) {
        self.mass = (self.mass - dm).max(self.empty_mass);
    }
}

// ---------------------------------------------------------------------------
// Rocket builder
// ---------------------------------------------------------------------------

pub struct RocketBuilder {
    position: Vec2,
    velocity: Vec2,
    mass: f64,
    empty_mass: f64,
    throttle: f64,
    altitude_angle: f64,
    max_thrust: f64,
    isp_vac: f64,
    isp_atm: f64,
    max_drag: f64,
}

impl RocketBuilder {
    pub fn new() -> Self {
        Self {
            position: Vec2::zeros(),
            velocity: Vec2::zeros(),
            mass: 10.0,
            empty_mass: 3.0,
            throttle: 1.0,
            altitude_angle: FRAC_PI_2,
            max_thrust: 200.0,
            isp_vac: 375.0,
            isp_atm: 325.0,
            max_drag: 0.2,
        }
    }

    pub fn position(mut self, v: Vec2) -> Self { self.position = v; self }
    pub fn velocity(mut self, v: Vec2) -> Self { self.velocity = v; self }
    pub fn mass(mut self, v: f64) -> Self { self.mass = v; self }
    pub fn empty_mass(mut self, v: f64) -> Self { self.empty_mass = v; self }
    pub fn throttle(mut self, v: f64) -> Self { self.throttle = v; self }
    pub fn altitude_angle(mut self, v: f64) -> Self { self.altitude_angle = v; self }
    pub fn max_thrust(mut self, v: f64) -> Self { self.max_thrust = v; self }
    pub fn isp_vac(mut self, v: f64) -> Self { self.isp_vac = v; self }
    pub fn isp_atm(mut self, v: f64) -> Self { self.isp_atm = v; self }
    pub fn max_drag(mut self, v: f64) -> Self { self.max_drag = v; self }

    pub fn build(self) -> Rocket {
        Rocket {
            position: self.position,
            velocity: self.velocity,
            mass: self.mass.max(self.empty_mass),
            empty_mass: self.empty_mass,
            throttle: self.throttle.clamp(0.0, 1.0),
            altitude_angle: self.altitude_angle,
            max_thrust: self.max_thrust,
            isp_vac: self.isp_vac,
            isp_atm: self.isp_atm,
            max_drag: self.max_drag,
        }
    }
}

impl Default for RocketBuilder {
    fn default() -> Self {
        Self::new()
    }
}
