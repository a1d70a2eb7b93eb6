pub mod apsides;
pub mod maneuvers;

pub use apsides::Orbit;
pub use maneuvers::{circular_velocity, circularization_delta_v};
