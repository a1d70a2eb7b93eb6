pub mod program;
pub mod guidance;

pub use program::{Breakpoint, Program};
pub use guidance::{throttle_cutoff, GuidanceCommand, ProgramGuidance};
