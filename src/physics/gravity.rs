use crate::physics::vector::{Planar, Vec2};

/// Inverse-square gravitational force on `mass` at `relative_position`
/// (measured from the body's centre). Always points toward the body.
pub fn gravitational_force(mu: f64, mass: f64, relative_position: &Vec2) -> Vec2 {
    let r = relative_position.norm();
    Vec2::from_polar(-mass * mu / (r * r), relative_position.azimuth())
}

/// Specific gravitational potential energy at radius `r`.
pub fn potential_energy(mu: f64, r: f64) -> f64 {
    -mu / r
}

/// Gravitational acceleration magnitude at radius `r`.
pub fn surface_gravity(mu: f64, r: f64) -> f64 {
    mu / (r * r)
}
