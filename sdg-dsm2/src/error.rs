/// Error types for reading and normalizing DSM2 output
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for DSM2 source handling
#[derive(Error, Debug)]
pub enum Dsm2Error {
    /// A required input file is missing or unreadable
    #[error("Source unavailable: {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file was read but its contents violate the expected layout
    #[error("Malformed source {path}: {reason}")]
    MalformedSource { path: PathBuf, reason: String },

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Write to an output stream failed
    #[error("Write failed: {0}")]
    Write(#[from] std::io::Error),

    /// A pathname or pathname filter could not be parsed
    #[error("Invalid pathname {text:?}: {reason}")]
    InvalidPathname { text: String, reason: String },

    /// Timestamp parsing failed
    #[error("Failed to parse datetime: {0:?}")]
    DatetimeParse(String),

    /// A datetime window expression could not be parsed
    #[error("Invalid datetime window {text:?}: {reason}")]
    InvalidWindow { text: String, reason: String },

    /// Scenario directory contents do not pair up
    #[error("Unmatched scenario files in {dir}: {reason}")]
    UnmatchedScenarioFiles { dir: PathBuf, reason: String },
}

/// Type alias for Results using Dsm2Error
pub type Result<T> = std::result::Result<T, Dsm2Error>;

/// Attach a file path to an error raised while parsing bare text.
pub(crate) fn with_path(err: Dsm2Error, path: &std::path::Path) -> Dsm2Error {
    match err {
        Dsm2Error::MalformedSource { reason, .. } => Dsm2Error::MalformedSource {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    }
}
