use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Error types for Trellis core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Error reading a ticket file from disk
    #[error("Failed to read tickets from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error decoding a ticket file
    #[error("Failed to parse tickets in {path}: {source}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Error decoding an in-memory ticket document
    #[error("Failed to parse ticket document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A month selector outside the calendar
    #[error("Invalid month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },

    /// A project range whose start is after its end
    #[error("Invalid project range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// A malformed user mapping document
    #[error("Invalid user mapping: {0}")]
    UserMapping(#[source] serde_json::Error),

    /// Error for invalid input or validation failure
    #[error("{message}")]
    ValidationError { message: String },
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
