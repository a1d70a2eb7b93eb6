use thiserror::Error;

use crate::sim::SystemState;

/// Failures raised by a guidance [`Program`](crate::gnc::Program).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProgramError {
    #[error("program has no breakpoints")]
    Empty,

    #[error("breakpoint {index} is not above the previous altitude")]
    NotAscending { index: usize },

    #[error("altitude {altitude:.1} m is below the first breakpoint at {floor:.1} m")]
    BelowRange { altitude: f64, floor: f64 },
}

/// Which guidance channel a program lookup was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Throttle,
    AltitudeAngle,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Throttle => f.write_str("throttle"),
            Channel::AltitudeAngle => f.write_str("altitude angle"),
        }
    }
}

/// Precondition and I/O failures of a simulation run.
///
/// Mission timeouts are not errors: they end the run in
/// [`SystemState::Error`] and are reported through the run summary.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid simulation config: {field} = {value} must be positive and finite")]
    InvalidConfig { field: &'static str, value: f64 },

    #[error("system must be ready to run, found {state:?}")]
    NotReady { state: SystemState },

    #[error("{channel} program lookup failed: {source}")]
    Guidance {
        channel: Channel,
        #[source]
        source: ProgramError,
    },

    #[error("trajectory log error: {0}")]
    Log(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
