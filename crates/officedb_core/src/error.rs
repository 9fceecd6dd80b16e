//! Error types for officedb core.

use crate::types::StoreState;
use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in officedb core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] officedb_storage::StorageError),

    /// Record codec error.
    #[error("codec error: {0}")]
    Codec(#[from] officedb_codec::CodecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A collection file could not be created, read, or parsed.
    #[error("collection {collection} unavailable: {reason}")]
    StorageUnavailable {
        /// Name of the collection.
        collection: String,
        /// What went wrong.
        reason: String,
    },

    /// Another process holds the data root.
    #[error("data directory locked: another process has exclusive access")]
    DirectoryLocked,

    /// Record operations need an active company.
    #[error("store not ready (state: {state})")]
    NotReady {
        /// State the store was in.
        state: StoreState,
    },

    /// Company id is empty or not a single path component.
    #[error("invalid company id: {id:?}")]
    InvalidCompanyId {
        /// The rejected id.
        id: String,
    },

    /// A company with this id already has settings on disk.
    #[error("company already exists: {id}")]
    CompanyExists {
        /// The existing id.
        id: String,
    },

    /// The highest persisted id is not a number.
    #[error("collection {scope} contains non-numeric ids (e.g. {id:?})")]
    NonNumericId {
        /// Allocation scope.
        scope: String,
        /// One of the offending ids.
        id: String,
    },

    /// The highest id in a scope is already `u64::MAX`.
    #[error("collection {scope} has no ids left after {max}")]
    IdsExhausted {
        /// Allocation scope.
        scope: String,
        /// The highest id in use.
        max: u64,
    },

    /// An extension kind is malformed.
    #[error("invalid extension kind: {message}")]
    InvalidKind {
        /// Why the kind was rejected.
        message: String,
    },

    /// Strict mode: the extension kind was never registered.
    #[error("extension kind not registered: {name}")]
    UnregisteredKind {
        /// Element name of the kind.
        name: String,
    },

    /// The settings blob is not a JSON object.
    #[error("invalid settings: {message}")]
    InvalidSettings {
        /// Description of the problem.
        message: String,
    },

    /// Operation not permitted for the given input.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why operation is invalid.
        message: String,
    },

    /// A blocking task of the async facade panicked or was cancelled.
    #[error("background task failed: {message}")]
    TaskFailed {
        /// Join error description.
        message: String,
    },
}

impl CoreError {
    /// Creates a storage unavailable error.
    pub fn storage_unavailable(collection: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            collection: collection.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid kind error.
    pub fn invalid_kind(message: impl Into<String>) -> Self {
        Self::InvalidKind {
            message: message.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Creates an invalid settings error.
    pub fn invalid_settings(message: impl Into<String>) -> Self {
        Self::InvalidSettings {
            message: message.into(),
        }
    }
}
