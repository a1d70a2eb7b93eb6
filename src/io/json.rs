use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimResult;
use crate::optimizer::OptimizerOutcome;
use crate::physics::Planetoid;
use crate::sim::RunSummary;
use crate::vehicle::Rocket;

/// Everything needed to reproduce and judge an optimizer result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub planetoid: Planetoid,
    pub rocket: Rocket,
    pub throttle_cutoff_radius: f64,
    pub outcome: OptimizerOutcome,
    /// Replay of the incumbent programs, if one was flown.
    pub best_run: Option<RunSummary>,
}

/// Write the report as pretty-printed JSON. Non-finite fitness values are
/// written as `null`.
pub fn write_report<W: Write>(writer: &mut W, report: &Report) -> SimResult<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}

pub fn write_report_file(path: &Path, report: &Report) -> SimResult<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_report(&mut file, report)?;
    file.flush()?;
    Ok(())
}
