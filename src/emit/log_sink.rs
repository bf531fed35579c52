//! CSV session log sink
//!
//! One self-describing CSV file per simulation session, named by the
//! session start timestamp. The header row is written once from the
//! telemetry field names; every subsequent row is one tick's snapshot.
//! A single writer serializes appends across all vehicles, and every row
//! is flushed before the call returns, so a crash loses at most the
//! in-flight record.

use crate::simulation::error::{SimulationError, SimulationResult};
use crate::vehicle::Telemetry;
use chrono::Local;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

/// Append-only CSV log shared by every vehicle actor in a session
#[derive(Debug)]
pub struct SessionLog {
    writer: Mutex<csv::Writer<File>>,
    path: PathBuf,
}

impl SessionLog {
    /// Create the session file under `directory`, creating the directory
    /// if needed
    pub fn create(directory: impl AsRef<Path>) -> SimulationResult<Self> {
        let directory = directory.as_ref();
        fs::create_dir_all(directory)?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = directory.join(format!("session_{}.csv", stamp));
        let writer = csv::Writer::from_path(&path)?;

        info!(path = %path.display(), "session log created");
        Ok(Self { writer: Mutex::new(writer), path })
    }

    /// Path of the session file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one snapshot as a single row and flush it
    ///
    /// The lock covers the whole serialize+flush sequence so rows from
    /// different vehicles can never interleave within a line.
    pub fn append(&self, snapshot: &Telemetry) -> SimulationResult<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| SimulationError::log_sink_error("session log writer poisoned"))?;
        writer.serialize(snapshot)?;
        writer.flush()?;
        Ok(())
    }

    /// Flush any buffered output at end of session
    pub fn finalize(&self) -> SimulationResult<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| SimulationError::log_sink_error("session log writer poisoned"))?;
        writer.flush()?;
        info!(path = %self.path.display(), "session log finalized");
        Ok(())
    }
}
