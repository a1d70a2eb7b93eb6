use serde::{Deserialize, Serialize};

use crate::physics::Vec2;

use super::frame::Frame;

/// Delta-v and work attributed to one force component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForceLedger {
    pub delta_v: f64,
    pub work: f64,
}

impl ForceLedger {
    fn accumulate(&mut self, force: &Vec2, mass: f64, dt: f64, distance: f64) {
        let f = force.norm();
        self.delta_v += dt / mass * f;
        self.work += distance * f;
    }
}

/// Running aggregates over one run, fed one frame per tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Frame with the largest radius seen so far.
    pub apex: Option<Frame>,
    pub distance_travelled: f64,
    pub thrust: ForceLedger,
    pub drag: ForceLedger,
    pub gravity: ForceLedger,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, frame: &Frame) {
        let higher = self
            .apex
            .as_ref()
            .is_none_or(|apex| frame.radius > apex.radius);
        if higher {
            self.apex = Some(frame.clone());
        }

        let distance = frame.delta_position.norm();
        self.distance_travelled += distance;
        self.thrust.accumulate(&frame.forces.thrust, frame.mass, frame.delta_t, distance);
        self.drag.accumulate(&frame.forces.drag, frame.mass, frame.delta_t, distance);
        self.gravity.accumulate(&frame.forces.gravity, frame.mass, frame.delta_t, distance);
    }

    /// Radius of the apex frame, or 0 before any frame was recorded.
    pub fn max_radius(&self) -> f64 {
        self.apex.as_ref().map_or(0.0, |apex| apex.radius)
    }

    pub fn max_altitude(&self) -> f64 {
        self.apex.as_ref().map_or(0.0, |apex| apex.altitude)
    }
}
