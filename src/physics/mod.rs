pub mod vector;
pub mod atmosphere;
pub mod gravity;
pub mod aerodynamics;
pub mod planetoid;

pub use planetoid::Planetoid;
pub use vector::{Planar, Vec2};
