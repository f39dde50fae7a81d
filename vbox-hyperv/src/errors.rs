//! Error types for the conversion pipeline.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors surfaced by a conversion run.
///
/// Every variant is terminal for the run. Messages carry the offending
/// path and the underlying cause so they can be shown to an operator as-is.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Input artifact was produced by a builder we cannot import from.
    #[error("unknown artifact type: {actual}\ncan only import from {expected} artifacts")]
    UnsupportedArtifact { actual: String, expected: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("io error: {0}")]
    Io(String),

    /// External disk converter failed to run or reported an error.
    #[error("disk conversion failed: {0}")]
    ConversionFailed(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("packaging error: {0}")]
    Packaging(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        ConvertError::Io(err.to_string())
    }
}
