//! Storage error types
//!
//! Only the persistence path can fail; in-memory store operations report
//! absence through `Option` instead.

use thiserror::Error;

/// Errors that can occur while persisting or restoring listings
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Two restored listings claim the same store index
    #[error("Duplicate store index in snapshot: {0}")]
    DuplicateIndex(usize),

    /// Snapshot written by an incompatible version
    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
