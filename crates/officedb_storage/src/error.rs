//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Stored bytes were expected to be text but are not valid UTF-8.
    #[error("stored data at {location} is not valid UTF-8")]
    InvalidUtf8 {
        /// Where the data was read from.
        location: String,
    },

    /// The stored image is corrupted.
    #[error("storage corrupted: {0}")]
    Corrupted(String),

    /// The backend refused the write.
    #[error("write rejected by {location}")]
    WriteRejected {
        /// The backend that rejected the write.
        location: String,
    },
}
