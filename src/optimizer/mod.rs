pub mod fitness;
pub mod mutation;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::SimResult;
use crate::gnc::Program;
use crate::physics::Planetoid;
use crate::sim::{SimConfig, System};
use crate::vehicle::{Rocket, RocketFactory};

pub use fitness::fitness;
pub use mutation::{mutate_altitude_angle, mutate_throttle};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Candidates evaluated per generation.
    pub children: usize,
    /// Throttle levels are `k / throttle_intervals`.
    pub throttle_intervals: u32,
    /// Altitude-angle levels are `2π·k / altitude_angle_intervals`.
    pub altitude_angle_intervals: u32,
    /// Fixed RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            children: 16,
            throttle_intervals: 12,
            altitude_angle_intervals: 18,
            seed: None,
        }
    }
}

/// Incumbent after an optimizer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerOutcome {
    pub throttle_program: Program,
    pub altitude_angle_program: Program,
    pub fitness: f64,
    pub generations: usize,
}

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// One child of a generation. Owns everything its run touches except the
/// planetoid.
struct Candidate {
    rocket: Rocket,
    throttle_program: Program,
    altitude_angle_program: Program,
}

struct Evaluated {
    throttle_program: Program,
    altitude_angle_program: Program,
    fitness: f64,
}

impl Candidate {
    fn evaluate(
        self,
        planetoid: &Planetoid,
        cutoff_radius: f64,
        sim_config: &SimConfig,
    ) -> SimResult<Evaluated> {
        let fitness = {
            let mut system = System::new(
                self.rocket,
                planetoid,
                &self.throttle_program,
                &self.altitude_angle_program,
                sim_config.clone(),
            )
            .with_throttle_cutoff_radius(cutoff_radius);
            let state = system.run()?;
            fitness(
                state,
                system.statistics(),
                planetoid.gravitational_parameter,
                cutoff_radius,
            )
        };
        Ok(Evaluated {
            throttle_program: self.throttle_program,
            altitude_angle_program: self.altitude_angle_program,
            fitness,
        })
    }
}

// ---------------------------------------------------------------------------
// Optimizer
// ---------------------------------------------------------------------------

/// Generational `(1, λ)` search over throttle and altitude-angle programs.
///
/// Each generation mutates the incumbent into `children` candidates, flies
/// them in parallel and keeps the first candidate that strictly beats the
/// incumbent's fitness.
pub struct Optimizer<'a, F: RocketFactory> {
    factory: F,
    planetoid: &'a Planetoid,
    seed_throttle_program: Program,
    seed_altitude_angle_program: Program,
    throttle_cutoff_radius: f64,
    config: OptimizerConfig,
    sim_config: SimConfig,

    best_throttle_program: Program,
    best_altitude_angle_program: Program,
    best_fitness: f64,
    generation: usize,
    history: Vec<f64>,
    rng: StdRng,
}

impl<'a, F: RocketFactory> Optimizer<'a, F> {
    pub fn new(
        factory: F,
        planetoid: &'a Planetoid,
        seed_throttle_program: Program,
        seed_altitude_angle_program: Program,
        throttle_cutoff_radius: f64,
        config: OptimizerConfig,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            factory,
            planetoid,
            best_throttle_program: seed_throttle_program.clone(),
            best_altitude_angle_program: seed_altitude_angle_program.clone(),
            seed_throttle_program,
            seed_altitude_angle_program,
            throttle_cutoff_radius,
            config,
            sim_config: SimConfig::default(),
            best_fitness: f64::NEG_INFINITY,
            generation: 0,
            history: Vec::new(),
            rng,
        }
    }

    /// Integrator settings for every candidate run. Statistics are always
    /// collected since fitness is read from the apex frame.
    pub fn with_sim_config(mut self, sim_config: SimConfig) -> Self {
        self.sim_config = SimConfig { collect_stats: true, ..sim_config };
        self
    }

    // --- Accessors ---

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn sim_config(&self) -> &SimConfig {
        &self.sim_config
    }

    pub fn throttle_cutoff_radius(&self) -> f64 {
        self.throttle_cutoff_radius
    }

    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    pub fn best_throttle_program(&self) -> &Program {
        &self.best_throttle_program
    }

    pub fn best_altitude_angle_program(&self) -> &Program {
        &self.best_altitude_angle_program
    }

    /// Generations completed in the current run.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Best fitness after each completed generation.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn outcome(&self) -> OptimizerOutcome {
        OptimizerOutcome {
            throttle_program: self.best_throttle_program.clone(),
            altitude_angle_program: self.best_altitude_angle_program.clone(),
            fitness: self.best_fitness,
            generations: self.generation,
        }
    }

    // --- Search ---

    /// Restart from the seed programs and run `generations` generations.
    pub fn run(&mut self, generations: usize) -> SimResult<OptimizerOutcome> {
        self.best_throttle_program = self.seed_throttle_program.clone();
        self.best_altitude_angle_program = self.seed_altitude_angle_program.clone();
        self.best_fitness = f64::NEG_INFINITY;
        self.generation = 0;
        self.history.clear();

        info!(
            generations,
            children = self.config.children,
            cutoff_radius = self.throttle_cutoff_radius,
            "optimizer started"
        );
        while self.generation < generations {
            self.run_generation()?;
        }
        info!(
            generations = self.generation,
            best_fitness = self.best_fitness,
            "optimizer finished"
        );
        Ok(self.outcome())
    }

    /// Fly one generation and update the incumbent. Returns the best fitness.
    pub fn run_generation(&mut self) -> SimResult<f64> {
        let candidates = self.make_candidates();

        let planetoid = self.planetoid;
        let cutoff_radius = self.throttle_cutoff_radius;
        let sim_config = &self.sim_config;
        let evaluated = candidates
            .into_par_iter()
            .map(|candidate| candidate.evaluate(planetoid, cutoff_radius, sim_config))
            .collect::<SimResult<Vec<_>>>()?;

        // Creation order; only strict improvements replace the incumbent.
        for (child, result) in evaluated.into_iter().enumerate() {
            if result.fitness > self.best_fitness {
                info!(
                    generation = self.generation,
                    child,
                    fitness = result.fitness,
                    previous = self.best_fitness,
                    "new incumbent"
                );
                self.best_fitness = result.fitness;
                self.best_throttle_program = result.throttle_program;
                self.best_altitude_angle_program = result.altitude_angle_program;
            }
        }

        self.history.push(self.best_fitness);
        self.generation += 1;
        debug!(
            generation = self.generation,
            best_fitness = self.best_fitness,
            "generation complete"
        );
        Ok(self.best_fitness)
    }

    fn make_candidates(&mut self) -> Vec<Candidate> {
        (0..self.config.children)
            .map(|_| Candidate {
                rocket: self.factory.build(),
                throttle_program: mutate_throttle(
                    &self.best_throttle_program,
                    &mut self.rng,
                    self.config.throttle_intervals,
                ),
                altitude_angle_program: mutate_altitude_angle(
                    &self.best_altitude_angle_program,
                    &mut self.rng,
                    self.config.altitude_angle_intervals,
                ),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;
    use crate::error::SimError;
    use crate::physics::{Planar, Vec2};
    use crate::vehicle::{presets, RocketBuilder};

    fn seeds() -> (Program, Program) {
        let throttle = Program::from_pairs(&[(0.0, 1.0), (10_000.0, 1.0), (20_000.0, 1.0)]).unwrap();
        let angle = Program::from_pairs(&[(0.0, FRAC_PI_2), (5_000.0, 1.2), (15_000.0, 0.6)]).unwrap();
        (throttle, angle)
    }

    fn quick() -> SimConfig {
        SimConfig { delta_t: 0.05, ..SimConfig::default() }
    }

    #[test]
    fn defaults() {
        let c = OptimizerConfig::default();
        assert_eq!(c.children, 16);
        assert_eq!(c.throttle_intervals, 12);
        assert_eq!(c.altitude_angle_intervals, 18);
        assert_eq!(c.seed, None);
    }

    #[test]
    fn all_timeouts_keep_the_seed() {
        let k = Planetoid::kerbin();
        let (t, a) = seeds();
        // Dry rocket coasting upward: no program can end the run early.
        let r = k.radius + 100_000.0;
        let v_circ = (k.gravitational_parameter / r).sqrt();
        let coasting = move || {
            RocketBuilder::new()
                .position(Vec2::rect(r, 0.0))
                .velocity(Vec2::rect(100.0, v_circ))
                .mass(3.0)
                .empty_mass(3.0)
                .build()
        };
        let config = OptimizerConfig { children: 4, seed: Some(1), ..OptimizerConfig::default() };
        let sim = SimConfig { max_mission_time: 0.5, ..quick() };
        let mut opt = Optimizer::new(coasting, &k, t.clone(), a.clone(), k.radius + 70_000.0, config)
            .with_sim_config(sim);

        let outcome = opt.run(2).unwrap();
        assert_eq!(outcome.fitness, f64::NEG_INFINITY);
        assert_eq!(outcome.throttle_program, t);
        assert_eq!(outcome.altitude_angle_program, a);
        assert_eq!(outcome.generations, 2);
        assert_eq!(opt.history(), &[f64::NEG_INFINITY, f64::NEG_INFINITY]);
    }

    #[test]
    fn first_generation_beats_negative_infinity() {
        let k = Planetoid::kerbin();
        let (t, a) = seeds();
        let config = OptimizerConfig { children: 4, seed: Some(9), ..OptimizerConfig::default() };
        let mut opt = Optimizer::new(|| presets::orbiter(&k), &k, t, a, k.radius + 30_000.0, config)
            .with_sim_config(quick());

        let best = opt.run_generation().unwrap();
        assert!(best.is_finite());
        assert_eq!(opt.generation(), 1);
    }

    #[test]
    fn program_errors_abort_the_search() {
        let k = Planetoid::kerbin();
        let t = Program::constant(500.0, 1.0);
        let a = Program::constant(0.0, FRAC_PI_2);
        let config = OptimizerConfig { children: 2, seed: Some(2), ..OptimizerConfig::default() };
        let mut opt = Optimizer::new(|| presets::orbiter(&k), &k, t, a, k.radius + 30_000.0, config);
        assert!(matches!(opt.run(1), Err(SimError::Guidance { .. })));
    }

    #[test]
    fn sim_config_always_collects_stats() {
        let k = Planetoid::kerbin();
        let (t, a) = seeds();
        let opt = Optimizer::new(presets::orbiter(&k), &k, t, a, k.radius, OptimizerConfig::default())
            .with_sim_config(SimConfig { collect_stats: false, ..SimConfig::default() });
        assert!(opt.sim_config().collect_stats);
    }
}
