//! JSON serialization and on-disk reports for measurements.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::verdict::Measurement;

/// Failure to write a measurement report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Report file or its parent directory could not be written.
    #[error("failed to write report to {}: {source}", .path.display())]
    Io {
        /// Path we attempted to write.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Measurement could not be serialized.
    #[error("failed to serialize measurement: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Serialize a Measurement to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for Measurement).
pub fn to_json(measurement: &Measurement) -> Result<String, serde_json::Error> {
    serde_json::to_string(measurement)
}

/// Serialize a Measurement to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for Measurement).
pub fn to_json_pretty(measurement: &Measurement) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(measurement)
}

/// Append `measurement` to `path` as one JSON line, creating parent directories.
pub fn append_report(path: &Path, measurement: &Measurement) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut line = to_json(measurement)?;
    line.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    file.write_all(line.as_bytes()).map_err(io_err)
}
