//! Error types for the analysis pipeline.
//!
//! Only the inputs themselves can fail a run: a missing or malformed metadata
//! file, or a log source that cannot be read. Everything inside the log is
//! handled best-effort and never surfaces here, unless strict mode asks for it.

use std::path::PathBuf;

/// Result type for pipeline operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can abort an analysis run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The metadata file does not exist.
    #[error("Metadata file not found: {}", .0.display())]
    MetaNotFound(PathBuf),

    /// The metadata file exists but is not a JSON object we can read.
    #[error("Invalid metadata file {}: {source}", .path.display())]
    InvalidMeta {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The event log could not be opened or read.
    #[error("Failed to read event log {}: {source}", .path.display())]
    LogUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Strict mode found integrity problems in the event log.
    #[error("Event log failed integrity checks: {0}")]
    Integrity(String),

    /// I/O error outside of the two inputs
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
