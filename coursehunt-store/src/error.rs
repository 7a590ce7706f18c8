//! Store error types.

use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The queue file is missing or holds no courses. Recoverable for the
    /// read path used before curation; a setup error before hunting.
    #[error("no courses selected yet; run `coursehunt select` first")]
    NoCourses,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data did not parse.
    #[error("invalid stored data: {0}")]
    Serialization(#[from] serde_json::Error),
}
