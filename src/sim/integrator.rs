use crate::physics::Vec2;

/// Position and velocity increments for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub delta_velocity: Vec2,
    pub delta_position: Vec2,
}

// ---------------------------------------------------------------------------
// Constant-acceleration step
// ---------------------------------------------------------------------------

/// Advance under `force` held constant over `dt`:
/// `Δv = a·dt`, `Δr = ½·a·dt² + v·dt` with `v` the velocity at the start of
/// the tick and `a = force / mass`.
pub fn constant_acceleration_step(force: &Vec2, mass: f64, velocity: &Vec2, dt: f64) -> Step {
    let accel = force / mass;
    Step {
        delta_velocity: accel * dt,
        delta_position: accel * (0.5 * dt * dt) + velocity * dt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Planar;

    #[test]
    fn free_motion_is_linear() {
        let v = Vec2::rect(3.0, -4.0);
        let s = constant_acceleration_step(&Vec2::zeros(), 2.0, &v, 0.5);
        assert_eq!(s.delta_velocity, Vec2::zeros());
        assert_eq!(s.delta_position, Vec2::rect(1.5, -2.0));
    }

    #[test]
    fn constant_acceleration_is_exact() {
        // Ten steps of uniform acceleration reproduce ½·a·t² exactly.
        let f = Vec2::rect(0.0, -20.0);
        let mut v = Vec2::zeros();
        let mut r = Vec2::zeros();
        for _ in 0..10 {
            let s = constant_acceleration_step(&f, 2.0, &v, 0.1);
            r += s.delta_position;
            v += s.delta_velocity;
        }
        assert!((r.y + 5.0).abs() < 1e-12, "got {}", r.y);
        assert!((v.y + 10.0).abs() < 1e-12);
    }
}
