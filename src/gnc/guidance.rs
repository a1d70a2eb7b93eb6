use serde::{Deserialize, Serialize};

use crate::error::{Channel, SimError, SimResult};
use crate::orbital::Orbit;

use super::program::Program;

// ---------------------------------------------------------------------------
// Guidance: throttle and thrust-angle settings for the current tick
// ---------------------------------------------------------------------------

/// Engine settings chosen for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GuidanceCommand {
    pub throttle: f64,
    pub altitude_angle: f64,
    /// True when the throttle was forced to zero by the apoapsis cutoff.
    pub cutoff: bool,
}

/// True when the burn should stop: a cutoff radius is set and the current
/// orbit is either open or already reaches it.
pub fn throttle_cutoff(cutoff_radius: Option<f64>, orbit: &Orbit) -> bool {
    match (cutoff_radius, orbit.apoapsis()) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(target), Some(apoapsis)) => apoapsis >= target,
    }
}

/// Altitude-scheduled guidance driven by a throttle program and an
/// altitude-angle program.
#[derive(Debug, Clone, Copy)]
pub struct ProgramGuidance<'a> {
    pub throttle: &'a Program,
    pub altitude_angle: &'a Program,
    pub cutoff_radius: Option<f64>,
}

impl<'a> ProgramGuidance<'a> {
    pub fn new(throttle: &'a Program, altitude_angle: &'a Program) -> Self {
        Self { throttle, altitude_angle, cutoff_radius: None }
    }

    pub fn with_cutoff_radius(mut self, radius: Option<f64>) -> Self {
        self.cutoff_radius = radius;
        self
    }

    /// Settings for a vehicle at `altitude` on `orbit`.
    ///
    /// A lookup below either program's first breakpoint is a configuration
    /// error and aborts the run.
    pub fn command(&self, altitude: f64, orbit: &Orbit) -> SimResult<GuidanceCommand> {
        let cutoff = throttle_cutoff(self.cutoff_radius, orbit);
        let throttle = if cutoff {
            0.0
        } else {
            self.throttle.lookup(altitude).map_err(|source| SimError::Guidance {
                channel: Channel::Throttle,
                source,
            })?
        };
        let altitude_angle = self.altitude_angle.lookup(altitude).map_err(|source| {
            SimError::Guidance { channel: Channel::AltitudeAngle, source }
        })?;

        Ok(GuidanceCommand { throttle, altitude_angle, cutoff })
    }
}
