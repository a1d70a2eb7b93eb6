pub mod csv;
pub mod json;

pub use self::csv::{write_trajectory, TrajectoryLog};
pub use self::json::{write_report, write_report_file, Report};
