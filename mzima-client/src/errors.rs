//! # State Error Types
//!
//! Errors raised by the storage adapter and the stores built on top of it.

use thiserror::Error;

/// Result type alias for state operations
pub type StateResult<T> = Result<T, StateError>;

/// Failure reported by a key-value backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend is not available (no window, storage disabled, ...)
    #[error("Storage unavailable: {reason}")]
    Unavailable {
        /// Why the backend cannot be used.
        reason: String,
    },

    /// The backend refused a write, typically because its quota is exhausted
    #[error("Storage write rejected for key {key}: {reason}")]
    WriteRejected {
        /// Physical key of the rejected write.
        key: String,
        /// Backend explanation.
        reason: String,
    },

    /// Any other backend failure
    #[error("Storage backend error: {message}")]
    Backend {
        /// Backend explanation.
        message: String,
    },
}

impl StorageError {
    /// Create a new write rejected error
    #[must_use]
    pub fn write_rejected<K: Into<String>, R: Into<String>>(key: K, reason: R) -> Self {
        Self::WriteRejected {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a new backend error
    #[must_use]
    pub fn backend<T: Into<String>>(message: T) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Error type for store operations
#[derive(Error, Debug)]
pub enum StateError {
    /// Persisting a snapshot failed; nothing was published
    #[error("Persistence failed: {0}")]
    Storage(#[from] StorageError),

    /// A persisted value could not be parsed into its declared type
    #[error("Corrupt persisted value for {key}: {value:?}")]
    CorruptPreferenceValue {
        /// Physical key holding the value.
        key: String,
        /// The raw value read.
        value: String,
    },

    /// A value could not be serialized for storage
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StateError {
    /// Create a new corrupt value error
    #[must_use]
    pub fn corrupt<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self::CorruptPreferenceValue {
            key: key.into(),
            value: value.into(),
        }
    }
}
