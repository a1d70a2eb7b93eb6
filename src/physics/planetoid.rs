use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::physics::aerodynamics;
use crate::physics::atmosphere;
use crate::physics::gravity;
use crate::physics::vector::{Planar, Vec2};

// ---------------------------------------------------------------------------
// Planetoid: static gravity source with an exponential atmosphere
// ---------------------------------------------------------------------------

/// A non-moving spherical body. All queries are pure functions of the
/// position (and velocity) passed in, so one instance can be shared across
/// threads for the lifetime of a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planetoid {
    pub position: Vec2,
    pub radius: f64,                   // m, surface radius
    pub gravitational_parameter: f64,  // m^3/s^2
    pub rotational_period: f64,        // s
    pub atmospheric_attenuation: f64,  // m, scale height
    pub max_atmospheric_altitude: f64, // m, density is zero above this
}

impl Planetoid {
    pub fn new(
        radius: f64,
        gravitational_parameter: f64,
        rotational_period: f64,
        atmospheric_attenuation: f64,
    ) -> Self {
        Self {
            position: Vec2::zeros(),
            radius,
            gravitational_parameter,
            rotational_period,
            atmospheric_attenuation,
            max_atmospheric_altitude: atmosphere::ceiling_altitude(atmospheric_attenuation),
        }
    }

    /// Kerbin-like body: 600 km radius, 6 h day, 5 km scale height.
    pub fn kerbin() -> Self {
        Self::new(600_000.0, 3.5316e12, 21_600.0, 5_000.0)
    }

    // --- Geometry ---

    pub fn relative_position(&self, position: &Vec2) -> Vec2 {
        position - self.position
    }

    pub fn radius_at(&self, position: &Vec2) -> f64 {
        self.relative_position(position).norm()
    }

    pub fn altitude(&self, position: &Vec2) -> f64 {
        self.radius_at(position) - self.radius
    }

    /// Azimuth of `position` about the body's centre; this is also the
    /// direction of local "up".
    pub fn azimuth(&self, position: &Vec2) -> f64 {
        self.relative_position(position).azimuth()
    }

    /// Velocity component along local up.
    pub fn radial_velocity(&self, position: &Vec2, velocity: &Vec2) -> f64 {
        let r = self.relative_position(position);
        r.dot(velocity) / r.norm()
    }

    /// Signed velocity component along the local horizon
    /// (positive counter-clockwise).
    pub fn horizontal_velocity(&self, position: &Vec2, velocity: &Vec2) -> f64 {
        let r = self.relative_position(position);
        r.cross2(velocity) / r.norm()
    }

    /// Velocity of the rotating surface beneath `position`, directed along
    /// the prograde horizon (`altitude_angle = 0` in thrust terms).
    pub fn surface_velocity(&self, position: &Vec2) -> Vec2 {
        if self.rotational_period <= 0.0 {
            return Vec2::zeros();
        }
        let speed = 2.0 * PI * self.radius / self.rotational_period;
        Vec2::from_polar(speed, self.azimuth(position) - FRAC_PI_2)
    }

    // --- Atmosphere ---

    /// Fraction of sea-level density at `position`, in `[0, 1]`.
    pub fn atmosphere_density_factor(&self, position: &Vec2) -> f64 {
        atmosphere::density_factor(
            self.altitude(position),
            self.atmospheric_attenuation,
            self.max_atmospheric_altitude,
        )
    }

    pub fn air_density(&self, position: &Vec2) -> f64 {
        self.atmosphere_density_factor(position) * atmosphere::SEA_LEVEL_DENSITY
    }

    // --- Forces ---

    pub fn gravitational_force(&self, mass: f64, position: &Vec2) -> Vec2 {
        gravity::gravitational_force(
            self.gravitational_parameter,
            mass,
            &self.relative_position(position),
        )
    }

    pub fn atmospheric_drag(&self, position: &Vec2, velocity: &Vec2, max_drag: f64, mass: f64) -> Vec2 {
        aerodynamics::max_drag_force(velocity, self.air_density(position), mass, max_drag)
    }

    /// Area/coefficient drag for comparison with the max-drag model.
    pub fn frontal_drag(&self, position: &Vec2, velocity: &Vec2, frontal_area: f64, cd: f64) -> Vec2 {
        let rho = self.atmosphere_density_factor(position) * REAL_SEA_LEVEL_DENSITY;
        aerodynamics::drag_force(velocity, rho, cd, frontal_area)
    }

    // --- Orbital quantities (per unit mass) ---

    pub fn kinetic_energy(&self, velocity: &Vec2) -> f64 {
        0.5 * velocity.norm_squared()
    }

    pub fn potential_energy(&self, position: &Vec2) -> f64 {
        gravity::potential_energy(self.gravitational_parameter, self.radius_at(position))
    }

    pub fn specific_energy(&self, position: &Vec2, velocity: &Vec2) -> f64 {
        self.kinetic_energy(velocity) + self.potential_energy(position)
    }

    pub fn specific_angular_momentum(&self, position: &Vec2, velocity: &Vec2) -> f64 {
        self.relative_position(position).cross2(velocity).abs()
    }
}

/// Physical sea-level air density (kg/m^3) used by [`Planetoid::frontal_drag`].
const REAL_SEA_LEVEL_DENSITY: f64 = 1.223_094_855_487_4;
