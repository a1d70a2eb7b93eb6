use serde::{Deserialize, Serialize};

use crate::physics::Planetoid;

use super::frame::Frame;

// ---------------------------------------------------------------------------
// Flight events
// ---------------------------------------------------------------------------

/// Kinds of flight events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Throttle forced to zero because the target apoapsis is reached.
    ThrottleCutoff,
    FuelExhausted,
    AtmosphereExit,
    AltitudeReached { altitude: f64 },
}

/// A discrete event that occurred during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    pub ticks: u64,
    pub time: f64,
    pub altitude: f64,
    pub kind: EventKind,
}

impl SimEvent {
    pub fn at(frame: &Frame, kind: EventKind) -> Self {
        Self {
            ticks: frame.ticks,
            time: frame.time,
            altitude: frame.altitude,
            kind,
        }
    }
}

/// Passive detector fed every frame in order. Each detector fires at most
/// once per run.
pub trait EventDetector: Send {
    fn check(&mut self, frame: &Frame) -> Option<EventKind>;
}

/// Fires on the first tick whose throttle was cut by the apoapsis target.
#[derive(Debug, Default)]
pub struct CutoffDetector {
    fired: bool,
}

impl EventDetector for CutoffDetector {
    fn check(&mut self, frame: &Frame) -> Option<EventKind> {
        if self.fired || !frame.cutoff {
            return None;
        }
        self.fired = true;
        Some(EventKind::ThrottleCutoff)
    }
}

/// Fires on the first tick that starts with empty tanks.
#[derive(Debug, Default)]
pub struct FuelDetector {
    fired: bool,
}

impl EventDetector for FuelDetector {
    fn check(&mut self, frame: &Frame) -> Option<EventKind> {
        if self.fired || frame.fuel_mass > 0.0 {
            return None;
        }
        self.fired = true;
        Some(EventKind::FuelExhausted)
    }
}

/// Fires the first time the vehicle is at or above `altitude`.
#[derive(Debug)]
pub struct AltitudeDetector {
    pub altitude: f64,
    kind: EventKind,
    fired: bool,
}

impl AltitudeDetector {
    pub fn new(altitude: f64) -> Self {
        Self {
            altitude,
            kind: EventKind::AltitudeReached { altitude },
            fired: false,
        }
    }

    /// Detector for leaving the sensible atmosphere of `planetoid`.
    pub fn atmosphere_exit(planetoid: &Planetoid) -> Self {
        Self {
            altitude: planetoid.max_atmospheric_altitude,
            kind: EventKind::AtmosphereExit,
            fired: false,
        }
    }
}

impl EventDetector for AltitudeDetector {
    fn check(&mut self, frame: &Frame) -> Option<EventKind> {
        if self.fired || frame.altitude < self.altitude {
            return None;
        }
        self.fired = true;
        Some(self.kind.clone())
    }
}

/// Detectors every run gets when statistics are collected.
pub fn default_detectors(planetoid: &Planetoid) -> Vec<Box<dyn EventDetector>> {
    vec![
        Box::new(CutoffDetector::default()),
        Box::new(FuelDetector::default()),
        Box::new(AltitudeDetector::atmosphere_exit(planetoid)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbital::Orbit;
    use crate::physics::Vec2;
    use crate::sim::frame::ForceBreakdown;

    fn make_frame(altitude: f64, fuel_mass: f64, cutoff: bool) -> Frame {
        Frame {
            ticks: 0,
            time: 0.0,
            delta_t: 0.01,
            mass: 3.0 + fuel_mass,
            delta_mass: 0.0,
            position: Vec2::zeros(),
            velocity: Vec2::zeros(),
            delta_position: Vec2::zeros(),
            delta_velocity: Vec2::zeros(),
            radius: 600_000.0 + altitude,
            altitude,
            azimuth: 0.0,
            radial_velocity: 0.0,
            horizontal_velocity: 0.0,
            energy: -1.0,
            angular_momentum: 0.0,
            orbit: Orbit::Open,
            fuel_mass,
            ideal_delta_v: 0.0,
            forces: ForceBreakdown {
                total: Vec2::zeros(),
                thrust: Vec2::zeros(),
                gravity: Vec2::zeros(),
                drag: Vec2::zeros(),
            },
            throttle: 1.0,
            altitude_angle: 0.0,
            cutoff,
        }
    }

    #[test]
    fn altitude_detector_fires_once() {
        let mut det = AltitudeDetector::new(1_000.0);
        assert!(det.check(&make_frame(900.0, 1.0, false)).is_none());
        assert_eq!(
            det.check(&make_frame(1_050.0, 1.0, false)),
            Some(EventKind::AltitudeReached { altitude: 1_000.0 })
        );
        assert!(det.check(&make_frame(1_100.0, 1.0, false)).is_none());
    }

    #[test]
    fn atmosphere_exit_uses_ceiling() {
        let k = Planetoid::kerbin();
        let mut det = AltitudeDetector::atmosphere_exit(&k);
        assert!(det.check(&make_frame(60_000.0, 1.0, false)).is_none());
        assert_eq!(det.check(&make_frame(70_000.0, 1.0, false)), Some(EventKind::AtmosphereExit));
    }

    #[test]
    fn fuel_and_cutoff_detectors() {
        let mut fuel = FuelDetector::default();
        assert!(fuel.check(&make_frame(0.0, 0.5, false)).is_none());
        assert_eq!(fuel.check(&make_frame(0.0, 0.0, false)), Some(EventKind::FuelExhausted));

        let mut cut = CutoffDetector::default();
        assert!(cut.check(&make_frame(0.0, 0.5, false)).is_none());
        assert_eq!(cut.check(&make_frame(0.0, 0.5, true)), Some(EventKind::ThrottleCutoff));
        assert!(cut.check(&make_frame(0.0, 0.5, true)).is_none());
    }
}
