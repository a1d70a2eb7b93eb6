pub mod error;
pub mod physics;
pub mod vehicle;
pub mod gnc;
pub mod orbital;
pub mod sim;
pub mod io;
pub mod optimizer;

pub use error::{ProgramError, SimError, SimResult};
pub use gnc::Program;
pub use optimizer::{Optimizer, OptimizerConfig, OptimizerOutcome};
pub use physics::{Planar, Planetoid, Vec2};
pub use sim::{SimConfig, System, SystemState};
pub use vehicle::{Rocket, RocketBuilder, RocketFactory};
