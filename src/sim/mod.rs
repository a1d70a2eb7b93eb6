pub mod event;
pub mod frame;
pub mod integrator;
pub mod statistics;
pub mod system;

pub use event::{default_detectors, EventDetector, EventKind, SimEvent};
pub use frame::{ForceBreakdown, Frame};
pub use integrator::{constant_acceleration_step, Step};
pub use statistics::{ForceLedger, Statistics};
pub use system::{RunSummary, SimConfig, System, SystemState};
