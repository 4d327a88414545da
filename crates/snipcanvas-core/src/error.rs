//! Error types for the fallible edges of the core.
//!
//! Canvas operations themselves never fail: missing ids are no-ops and
//! out-of-range sizes are clamped. Only configuration loading, export
//! writing and background requests can produce a `CanvasError`.

use thiserror::Error;

/// Errors raised by the core.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Extraction failed for {file}: {reason}")]
    Extraction { file: String, reason: String },
    #[error("Background {0} request panicked")]
    Worker(String),
}

/// Result type for core operations that can fail.
pub type CanvasResult<T> = Result<T, CanvasError>;
