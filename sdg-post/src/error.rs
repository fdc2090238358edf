/// Error types for the post-processing pipeline
use thiserror::Error;

/// Main error type for gate post-processing
#[derive(Error, Debug)]
pub enum PostError {
    /// A gate's required flow or stage selection matched no rows,
    /// meaning the gate configuration and the source data disagree on
    /// series naming
    #[error("gate {gate}: series key {key:?} matched no rows")]
    EmptyPartition { gate: String, key: String },

    /// Flow and stage series handed to the velocity engine do not share
    /// a common timestamp index
    #[error("flow and stage series misaligned: {reason}")]
    SeriesMisaligned { reason: String },

    /// Failed to write delimited output
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Write to an output stream failed
    #[error("Write failed: {0}")]
    Write(#[from] std::io::Error),

    /// Failed to serialize a summary structure
    #[error("Failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for Results using PostError
pub type Result<T> = std::result::Result<T, PostError>;
