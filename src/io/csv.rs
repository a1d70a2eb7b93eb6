use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use csv::WriterBuilder;

use crate::sim::Frame;

/// Column names of the trajectory log, in order.
pub const HEADER: [&str; 15] = [
    "tick", "time", "m", "dm", "x", "y", "vx", "vy", "r", "alt", "azm", "fx", "fy",
    "throttle", "altitude_angle",
];

/// Fixed-precision CSV row for one frame, matching [`HEADER`].
pub fn frame_record(frame: &Frame) -> [String; 15] {
    [
        frame.ticks.to_string(),
        format!("{:.3}", frame.time),
        format!("{:.4}", frame.mass),
        format!("{:.6}", frame.delta_mass),
        format!("{:.2}", frame.position.x),
        format!("{:.2}", frame.position.y),
        format!("{:.3}", frame.velocity.x),
        format!("{:.3}", frame.velocity.y),
        format!("{:.2}", frame.radius),
        format!("{:.2}", frame.altitude),
        format!("{:.6}", frame.azimuth),
        format!("{:.4}", frame.forces.total.x),
        format!("{:.4}", frame.forces.total.y),
        format!("{:.3}", frame.throttle),
        format!("{:.4}", frame.altitude_angle),
    ]
}

/// Streaming trajectory log. The header is written once, before the first
/// row.
pub struct TrajectoryLog<W: Write = Box<dyn Write + Send>> {
    writer: csv::Writer<W>,
    header_written: bool,
}

impl TrajectoryLog {
    /// Log into any sendable writer, type-erased so a `System` can own it.
    pub fn boxed<W: Write + Send + 'static>(writer: W) -> Self {
        TrajectoryLog::new(Box::new(writer) as Box<dyn Write + Send>)
    }

    /// Log to a file, creating parent directories as needed.
    pub fn create(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self::boxed(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> TrajectoryLog<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: WriterBuilder::new().has_headers(false).from_writer(writer),
            header_written: false,
        }
    }

    pub fn write_header(&mut self) -> csv::Result<()> {
        if !self.header_written {
            self.writer.write_record(HEADER)?;
            self.header_written = true;
        }
        Ok(())
    }

    pub fn record(&mut self, frame: &Frame) -> csv::Result<()> {
        self.write_header()?;
        self.writer.write_record(frame_record(frame))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> io::Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| io::Error::new(e.error().kind(), e.error().to_string()))
    }
}

/// Write a complete trajectory: header plus one row per frame.
pub fn write_trajectory<W: Write>(writer: W, frames: &[Frame]) -> csv::Result<W> {
    let mut log = TrajectoryLog::new(writer);
    log.write_header()?;
    for frame in frames {
        log.record(frame)?;
    }
    Ok(log.into_inner()?)
}
