use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{SimError, SimResult};
use crate::gnc::{Program, ProgramGuidance};
use crate::io::csv::TrajectoryLog;
use crate::orbital::Orbit;
use crate::physics::Planetoid;
use crate::vehicle::Rocket;

use super::event::{default_detectors, EventDetector, SimEvent};
use super::frame::{ForceBreakdown, Frame};
use super::integrator::constant_acceleration_step;
use super::statistics::Statistics;

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub delta_t: f64,
    /// Watchdog: runs that last longer end in [`SystemState::Error`].
    pub max_mission_time: f64,
    pub collect_stats: bool,
    /// Simulated seconds between trajectory log rows.
    pub log_interval: f64,
    /// Radial velocity below `-tolerance` counts as falling back.
    pub radial_velocity_tolerance: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            delta_t: 0.01,          // 100 Hz
            max_mission_time: 900.0,
            collect_stats: true,
            log_interval: 1.0,
            radial_velocity_tolerance: 1.0e-4,
        }
    }
}

impl SimConfig {
    /// A zero or negative step never advances the mission clock, so the
    /// watchdog could not fire.
    pub fn validate(&self) -> SimResult<()> {
        for (field, value) in [
            ("delta_t", self.delta_t),
            ("max_mission_time", self.max_mission_time),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidConfig { field, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemState {
    Ready,
    Running,
    Success,
    /// The mission clock ran out before the ascent ended.
    Error,
}

/// Result record of one finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub state: SystemState,
    pub ticks: u64,
    pub mission_time: f64,
    pub statistics: Statistics,
    pub events: Vec<SimEvent>,
}

// ---------------------------------------------------------------------------
// System: one rocket flying two guidance programs over one planetoid
// ---------------------------------------------------------------------------

/// Fixed-step ascent integrator.
///
/// Runs from the pad until the rocket either hits the ground or starts
/// falling back (the apex of the ascent), or until the mission clock runs
/// out.
pub struct System<'a> {
    rocket: Rocket,
    planetoid: &'a Planetoid,
    guidance: ProgramGuidance<'a>,
    config: SimConfig,

    ticks: u64,
    state: SystemState,
    stats: Statistics,
    detectors: Vec<Box<dyn EventDetector>>,
    events: Vec<SimEvent>,
    log: Option<TrajectoryLog>,
}

impl<'a> System<'a> {
    pub fn new(
        rocket: Rocket,
        planetoid: &'a Planetoid,
        throttle_program: &'a Program,
        altitude_angle_program: &'a Program,
        config: SimConfig,
    ) -> Self {
        let detectors = if config.collect_stats {
            default_detectors(planetoid)
        } else {
            Vec::new()
        };
        Self {
            rocket,
            planetoid,
            guidance: ProgramGuidance::new(throttle_program, altitude_angle_program),
            config,
            ticks: 0,
            state: SystemState::Ready,
            stats: Statistics::new(),
            detectors,
            events: Vec::new(),
            log: None,
        }
    }

    /// Cut the throttle once the apoapsis reaches `radius`.
    pub fn with_throttle_cutoff_radius(mut self, radius: f64) -> Self {
        self.guidance = self.guidance.with_cutoff_radius(Some(radius));
        self
    }

    pub fn with_log(mut self, log: TrajectoryLog) -> Self {
        self.log = Some(log);
        self
    }

    // --- Accessors ---

    pub fn state(&self) -> SystemState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Elapsed simulated time.
    pub fn time(&self) -> f64 {
        self.ticks as f64 * self.config.delta_t
    }

    pub fn rocket(&self) -> &Rocket {
        &self.rocket
    }

    pub fn planetoid(&self) -> &Planetoid {
        self.planetoid
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn throttle_cutoff_radius(&self) -> Option<f64> {
        self.guidance.cutoff_radius
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            state: self.state,
            ticks: self.ticks,
            mission_time: self.time(),
            statistics: self.stats.clone(),
            events: self.events.clone(),
        }
    }

    // --- Run loop ---

    /// True while the rocket is above ground and not yet falling back.
    pub fn ascending(&self) -> bool {
        let position = &self.rocket.position;
        self.planetoid.altitude(position) >= 0.0
            && self.planetoid.radial_velocity(position, &self.rocket.velocity)
                >= -self.config.radial_velocity_tolerance
    }

    pub fn run(&mut self) -> SimResult<SystemState> {
        self.run_with(|_| {})
    }

    /// Run to a terminal state, handing every frame to `observer`.
    pub fn run_with<F>(&mut self, mut observer: F) -> SimResult<SystemState>
    where
        F: FnMut(&Frame),
    {
        if self.state != SystemState::Ready {
            return Err(SimError::NotReady { state: self.state });
        }
        self.config.validate()?;
        self.state = SystemState::Running;
        if let Some(log) = self.log.as_mut() {
            log.write_header()?;
        }

        while self.ascending() {
            if self.time() > self.config.max_mission_time {
                warn!(
                    ticks = self.ticks,
                    max_mission_time = self.config.max_mission_time,
                    "mission time exceeded"
                );
                self.state = SystemState::Error;
                break;
            }
            let frame = self.tick()?;
            observer(&frame);
        }
        if self.state == SystemState::Running {
            self.state = SystemState::Success;
        }

        if let Some(log) = self.log.as_mut() {
            log.flush()?;
        }
        debug!(
            state = ?self.state,
            ticks = self.ticks,
            max_altitude = self.stats.max_altitude(),
            "run finished"
        );
        Ok(self.state)
    }

    /// Advance one tick and return its frame. Does not consult or change the
    /// run state.
    pub fn tick(&mut self) -> SimResult<Frame> {
        let planetoid = self.planetoid;
        let dt = self.config.delta_t;
        let position = self.rocket.position;
        let velocity = self.rocket.velocity;

        // Orbit of the current state drives the throttle cutoff.
        let energy = planetoid.specific_energy(&position, &velocity);
        let angular_momentum = planetoid.specific_angular_momentum(&position, &velocity);
        let orbit = Orbit::from_invariants(planetoid.gravitational_parameter, angular_momentum, energy);
        let altitude = planetoid.altitude(&position);

        let command = self.guidance.command(altitude, &orbit)?;
        self.rocket.throttle = command.throttle;
        self.rocket.altitude_angle = command.altitude_angle;

        let atmosphere = planetoid.atmosphere_density_factor(&position);
        let mass = self.rocket.mass;
        let delta_mass = self.rocket.mass_flow_rate(atmosphere) * dt;

        let forces = self.net_force();
        let step = constant_acceleration_step(&forces.total, mass, &velocity, dt);

        let frame = Frame {
            ticks: self.ticks,
            time: self.time(),
            delta_t: dt,
            mass,
            delta_mass,
            position,
            velocity,
            delta_position: step.delta_position,
            delta_velocity: step.delta_velocity,
            radius: planetoid.radius_at(&position),
            altitude,
            azimuth: planetoid.azimuth(&position),
            radial_velocity: planetoid.radial_velocity(&position, &velocity),
            horizontal_velocity: planetoid.horizontal_velocity(&position, &velocity),
            energy,
            angular_momentum,
            orbit,
            fuel_mass: self.rocket.fuel_mass(),
            ideal_delta_v: self.rocket.ideal_delta_v(),
            forces,
            throttle: command.throttle,
            altitude_angle: command.altitude_angle,
            cutoff: command.cutoff,
        };

        if self.config.collect_stats {
            self.stats.record(&frame);
            self.detect_events(&frame);
        }
        if let Some(log) = self.log.as_mut() {
            let every = ((self.config.log_interval / dt).round() as u64).max(1);
            if frame.ticks % every == 0 {
                log.record(&frame)?;
            }
        }

        self.rocket.consume(delta_mass);
        self.rocket.velocity += step.delta_velocity;
        self.rocket.position += step.delta_position;
        self.ticks += 1;

        Ok(frame)
    }

    /// Gravity, drag and thrust on the rocket in its current state.
    pub fn net_force(&self) -> ForceBreakdown {
        let rocket = &self.rocket;
        let planetoid = self.planetoid;

        let gravity = planetoid.gravitational_force(rocket.mass, &rocket.position);
        let drag = planetoid.atmospheric_drag(
            &rocket.position,
            &rocket.velocity,
            rocket.max_drag,
            rocket.mass,
        );
        let thrust = rocket.thrust_force(planetoid.azimuth(&rocket.position));

        ForceBreakdown {
            total: gravity + drag + thrust,
            thrust,
            gravity,
            drag,
        }
    }

    fn detect_events(&mut self, frame: &Frame) {
        for detector in self.detectors.iter_mut() {
            if let Some(kind) = detector.check(frame) {
                debug!(ticks = frame.ticks, altitude = frame.altitude, event = ?kind, "flight event");
                self.events.push(SimEvent::at(frame, kind));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;
    use crate::physics::{Planar, Vec2};
    use crate::sim::event::EventKind;
    use crate::vehicle::{presets, RocketBuilder};

    fn vertical() -> Program {
        Program::constant(0.0, FRAC_PI_2)
    }

    fn full() -> Program {
        Program::constant(0.0, 1.0)
    }

    fn idle() -> Program {
        Program::constant(0.0, 0.0)
    }

    #[test]
    fn dropped_rocket_falls_and_succeeds() {
        let k = Planetoid::kerbin();
        let rocket = RocketBuilder::new()
            .position(Vec2::rect(k.radius, 0.0))
            .build();
        let (t, a) = (idle(), vertical());
        let mut sys = System::new(rocket, &k, &t, &a, SimConfig::default());

        let mut altitudes = Vec::new();
        let state = sys.run_with(|f| altitudes.push(f.altitude)).unwrap();
        altitudes.push(k.altitude(&sys.rocket().position));

        assert_eq!(state, SystemState::Success);
        assert!(sys.ticks() >= 1);
        assert_eq!(altitudes.len() as u64, sys.ticks() + 1);
        assert!(altitudes.windows(2).all(|w| w[1] < w[0]));
        assert!(!sys.ascending());
    }

    #[test]
    fn altitude_strictly_decreases_while_falling() {
        let k = Planetoid::kerbin();
        // Start high with zero velocity and no thrust; observe every tick.
        let rocket = RocketBuilder::new()
            .position(Vec2::rect(k.radius + 1_000.0, 0.0))
            .build();
        let (t, a) = (idle(), vertical());
        let mut sys = System::new(rocket, &k, &t, &a, SimConfig::default());
        let mut prev = f64::INFINITY;
        for _ in 0..200 {
            let f = sys.tick().unwrap();
            assert!(f.altitude < prev);
            prev = f.altitude;
        }
    }

    #[test]
    fn vertical_burn_reaches_apex() {
        let k = Planetoid::kerbin();
        let (t, a) = (full(), vertical());
        let rocket = presets::on_pad(RocketBuilder::new().mass(6.0), &k);
        let mut sys = System::new(rocket, &k, &t, &a, SimConfig::default());
        let state = sys.run().unwrap();

        assert_eq!(state, SystemState::Success);
        let apex = sys.statistics().apex.as_ref().unwrap();
        assert!(apex.altitude > 10_000.0, "apex {:.0} m", apex.altitude);
        assert!(sys.statistics().distance_travelled > apex.altitude);
        assert!(sys.statistics().thrust.delta_v > 0.0);
        assert!(sys.statistics().gravity.delta_v > 0.0);
        assert!(sys.statistics().drag.work > 0.0);
        assert!(sys.rocket().mass >= sys.rocket().empty_mass);
    }

    #[test]
    fn cutoff_radius_stops_the_burn() {
        let k = Planetoid::kerbin();
        let (t, a) = (full(), vertical());
        let target = k.radius + 20_000.0;
        let mut sys = System::new(presets::orbiter(&k), &k, &t, &a, SimConfig::default())
            .with_throttle_cutoff_radius(target);
        sys.run().unwrap();

        assert!(sys.rocket().fuel_mass() > 0.0, "burn should stop before fuel runs out");
        let cut = sys.events().iter().any(|e| e.kind == EventKind::ThrottleCutoff);
        assert!(cut);
        // Guidance re-lights whenever drag pulls the apoapsis under the target,
        // so the apex lands just below it.
        let apex = sys.statistics().max_radius();
        assert!(apex <= target + 50.0 && apex > target - 2_000.0, "apex radius {:.0}", apex);
    }

    #[test]
    fn mission_timeout_is_error_state() {
        let k = Planetoid::kerbin();
        let (t, a) = (full(), vertical());
        let config = SimConfig { max_mission_time: 1.0, ..SimConfig::default() };
        let mut sys = System::new(presets::orbiter(&k), &k, &t, &a, config);
        assert_eq!(sys.run().unwrap(), SystemState::Error);
        assert!(sys.time() > 1.0);
    }

    #[test]
    fn non_positive_step_is_rejected() {
        let k = Planetoid::kerbin();
        let (t, a) = (idle(), vertical());
        let on_pad = || RocketBuilder::new().position(Vec2::rect(k.radius, 0.0)).build();
        for delta_t in [0.0, -0.01, f64::NAN, f64::INFINITY] {
            let config = SimConfig { delta_t, ..SimConfig::default() };
            let mut sys = System::new(on_pad(), &k, &t, &a, config);
            assert!(matches!(
                sys.run(),
                Err(SimError::InvalidConfig { field: "delta_t", .. })
            ));
            assert_eq!(sys.state(), SystemState::Ready);
            assert_eq!(sys.ticks(), 0);
        }
        let config = SimConfig { max_mission_time: f64::INFINITY, ..SimConfig::default() };
        let mut sys = System::new(on_pad(), &k, &t, &a, config);
        assert!(matches!(
            sys.run(),
            Err(SimError::InvalidConfig { field: "max_mission_time", .. })
        ));
    }

    #[test]
    fn run_twice_is_rejected() {
        let k = Planetoid::kerbin();
        let (t, a) = (idle(), vertical());
        let rocket = RocketBuilder::new().position(Vec2::rect(k.radius, 0.0)).build();
        let mut sys = System::new(rocket, &k, &t, &a, SimConfig::default());
        sys.run().unwrap();
        assert!(matches!(sys.run(), Err(SimError::NotReady { state: SystemState::Success })));
    }

    #[test]
    fn program_below_floor_aborts() {
        let k = Planetoid::kerbin();
        let t = Program::constant(100.0, 1.0);
        let a = vertical();
        let mut sys = System::new(presets::orbiter(&k), &k, &t, &a, SimConfig::default());
        assert!(matches!(sys.run(), Err(SimError::Guidance { .. })));
    }

    #[test]
    fn mass_never_below_dry() {
        let k = Planetoid::kerbin();
        let (t, a) = (full(), vertical());
        let rocket = RocketBuilder::new()
            .position(Vec2::rect(k.radius, 0.0))
            .mass(3.05)
            .empty_mass(3.0)
            .max_thrust(200.0)
            .build();
        let mut sys = System::new(rocket, &k, &t, &a, SimConfig::default());
        let mut dry_thrust = Vec::new();
        sys.run_with(|f| {
            assert!(f.mass >= 3.0);
            if f.fuel_mass == 0.0 {
                dry_thrust.push(f.forces.thrust.norm());
            }
        })
        .unwrap();
        assert!(!dry_thrust.is_empty());
        assert!(dry_thrust.iter().all(|&f| f == 0.0));
    }

    #[test]
    fn integrator_is_deterministic() {
        let k = Planetoid::kerbin();
        let t = Program::from_pairs(&[(0.0, 1.0), (5_000.0, 0.75)]).unwrap();
        let a = Program::from_pairs(&[(0.0, FRAC_PI_2), (2_000.0, 1.2)]).unwrap();
        let config = SimConfig { collect_stats: false, ..SimConfig::default() };

        let mut frames = [Vec::new(), Vec::new()];
        for out in frames.iter_mut() {
            let mut sys = System::new(presets::orbiter(&k), &k, &t, &a, config.clone());
            sys.run_with(|f| out.push(f.clone())).unwrap();
        }
        assert!(!frames[0].is_empty());
        assert_eq!(frames[0], frames[1]);
    }

    #[test]
    fn runs_with_log_attached() {
        let k = Planetoid::kerbin();
        let (t, a) = (full(), vertical());
        let config = SimConfig { max_mission_time: 2.0, log_interval: 0.5, ..SimConfig::default() };
        let mut sys = System::new(presets::orbiter(&k), &k, &t, &a, config)
            .with_log(TrajectoryLog::boxed(std::io::sink()));
        assert_eq!(sys.run().unwrap(), SystemState::Error);
    }
}
