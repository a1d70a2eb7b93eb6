/// Circular orbit speed at radius `r`.
pub fn circular_velocity(mu: f64, r: f64) -> f64 {
    (mu / r).sqrt()
}

/// Delta-v still needed to turn a purely horizontal `speed` at radius `r`
/// into a circular orbit. Negative when the vehicle is already faster.
pub fn circularization_delta_v(mu: f64, r: f64, speed: f64) -> f64 {
    circular_velocity(mu, r) - speed
}
