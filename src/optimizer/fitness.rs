use crate::orbital::circular_velocity;
use crate::sim::{Statistics, SystemState};

/// Score of one finished run against a target orbit radius. Higher is better.
///
/// Timed-out runs and runs without an apex score `-∞`. Otherwise the score
/// is the horizontal speed at the apex minus circular speed at the target,
/// plus the delta-v left in the tank when the apex reached the target.
pub fn fitness(state: SystemState, statistics: &Statistics, mu: f64, cutoff_radius: f64) -> f64 {
    if state != SystemState::Success {
        return f64::NEG_INFINITY;
    }
    let Some(apex) = statistics.apex.as_ref() else {
        return f64::NEG_INFINITY;
    };

    let v_circ = circular_velocity(mu, cutoff_radius);
    let horizontal = apex.horizontal_velocity.abs();
    if apex.radius >= cutoff_radius {
        horizontal + apex.ideal_delta_v - v_circ
    } else {
        horizontal - v_circ
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbital::Orbit;
    use crate::physics::{Planar, Vec2};
    use crate::sim::{ForceBreakdown, Frame};

    const MU: f64 = 3.5316e12;

    fn apex_at(radius: f64, horizontal_velocity: f64, ideal_delta_v: f64) -> Statistics {
        let frame = Frame {
            ticks: 100,
            time: 1.0,
            delta_t: 0.01,
            mass: 5.0,
            delta_mass: 0.0,
            position: Vec2::rect(radius, 0.0),
            velocity: Vec2::rect(0.0, horizontal_velocity),
            delta_position: Vec2::zeros(),
            delta_velocity: Vec2::zeros(),
            radius,
            altitude: radius - 600_000.0,
            azimuth: 0.0,
            radial_velocity: 0.0,
            horizontal_velocity,
            energy: 0.0,
            angular_momentum: 0.0,
            orbit: Orbit::Open,
            fuel_mass: 2.0,
            ideal_delta_v,
            forces: ForceBreakdown {
                total: Vec2::zeros(),
                thrust: Vec2::zeros(),
                gravity: Vec2::zeros(),
                drag: Vec2::zeros(),
            },
            throttle: 0.0,
            altitude_angle: 0.0,
            cutoff: true,
        };
        Statistics { apex: Some(frame), ..Statistics::default() }
    }

    #[test]
    fn timeout_scores_negative_infinity() {
        let stats = apex_at(680_000.0, 2_000.0, 500.0);
        assert_eq!(fitness(SystemState::Error, &stats, MU, 670_000.0), f64::NEG_INFINITY);
    }

    #[test]
    fn missing_apex_scores_negative_infinity() {
        let stats = Statistics::new();
        assert_eq!(fitness(SystemState::Success, &stats, MU, 670_000.0), f64::NEG_INFINITY);
    }

    #[test]
    fn apex_above_target_counts_remaining_delta_v() {
        let target = 670_000.0;
        let v_circ = (MU / target).sqrt();
        let stats = apex_at(680_000.0, -1_500.0, 400.0);
        let f = fitness(SystemState::Success, &stats, MU, target);
        assert!((f - (1_500.0 + 400.0 - v_circ)).abs() < 1e-9);
    }

    #[test]
    fn apex_below_target_ignores_remaining_delta_v() {
        let target = 670_000.0;
        let v_circ = (MU / target).sqrt();
        let stats = apex_at(650_000.0, 1_200.0, 3_000.0);
        let f = fitness(SystemState::Success, &stats, MU, target);
        assert!((f - (1_200.0 - v_circ)).abs() < 1e-9);
    }
}
