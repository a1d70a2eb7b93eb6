use serde::{Deserialize, Serialize};

use crate::physics::{Planetoid, Vec2};

/// Shape of the osculating orbit, derived from specific energy and specific
/// angular momentum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Orbit {
    /// Parabolic or hyperbolic (energy >= 0): no apoapsis exists.
    Open,
    Closed {
        eccentricity: f64,
        semimajor_axis: f64, // m
        periapsis: f64,      // m, radius
        apoapsis: f64,       // m, radius
    },
}

impl Orbit {
    /// Apsides from gravitational parameter `mu`, specific angular momentum
    /// `h` and specific energy `energy`.
    pub fn from_invariants(mu: f64, h: f64, energy: f64) -> Self {
        if !(energy < 0.0) {
            return Orbit::Open;
        }
        // Clamp round-off on near-circular orbits.
        let eccentricity = (1.0 + 2.0 * h * h * energy / (mu * mu)).max(0.0).sqrt();
        let semimajor_axis = -mu / (2.0 * energy);
        Orbit::Closed {
            eccentricity,
            semimajor_axis,
            periapsis: semimajor_axis * (1.0 - eccentricity),
            apoapsis: semimajor_axis * (1.0 + eccentricity),
        }
    }

    /// Orbit of a body at `position` moving with `velocity` about `planetoid`.
    pub fn from_state(planetoid: &Planetoid, position: &Vec2, velocity: &Vec2) -> Self {
        Self::from_invariants(
            planetoid.gravitational_parameter,
            planetoid.specific_angular_momentum(position, velocity),
            planetoid.specific_energy(position, velocity),
        )
    }

    pub fn apoapsis(&self) -> Option<f64> {
        match *self {
            Orbit::Closed { apoapsis, .. } => Some(apoapsis),
            Orbit::Open => None,
        }
    }

    pub fn periapsis(&self) -> Option<f64> {
        match *self {
            Orbit::Closed { periapsis, .. } => Some(periapsis),
            Orbit::Open => None,
        }
    }

    pub fn eccentricity(&self) -> Option<f64> {
        match *self {
            Orbit::Closed { eccentricity, .. } => Some(eccentricity),
            Orbit::Open => None,
        }
    }

    /// Orbital period for a closed orbit (s).
    pub fn period(&self, mu: f64) -> Option<f64> {
        match *self {
            Orbit::Closed { semimajor_axis, .. } => {
                Some(2.0 * std::f64::consts::PI * (semimajor_axis.powi(3) / mu).sqrt())
            }
            Orbit::Open => None,
        }
    }
}
