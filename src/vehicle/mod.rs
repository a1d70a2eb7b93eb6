pub mod rocket;
pub mod factory;

pub use rocket::{Rocket, RocketBuilder, ISP_G0};
pub use factory::{presets, RocketFactory};
