use crate::physics::vector::{Planar, Vec2};

/// Mass-proportional drag (opposing velocity):
/// `|F| = ½ · ρ · m · max_drag · |v|²`.
///
/// This is the model the ascent integrator uses; `max_drag` lumps the drag
/// coefficient and area-to-mass ratio of the whole vehicle.
pub fn max_drag_force(velocity: &Vec2, density: f64, mass: f64, max_drag: f64) -> Vec2 {
    let speed = velocity.norm();
    Vec2::from_polar(
        -0.5 * density * mass * max_drag * speed * speed,
        velocity.azimuth(),
    )
}

/// Classical quadratic drag from frontal area and drag coefficient.
pub fn drag_force(velocity: &Vec2, density: f64, cd: f64, area: f64) -> Vec2 {
    let speed = velocity.norm();
    if speed > 1e-6 {
        let q_dyn = 0.5 * density * speed * speed;
        -velocity.normalize() * (q_dyn * cd * area)
    } else {
        Vec2::zeros()
    }
}
