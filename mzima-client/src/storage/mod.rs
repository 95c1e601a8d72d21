//! # Persistent Key-Value Storage
//!
//! A synchronous string-keyed store behind the [`KeyValueStore`] trait, and
//! the [`NamespacedStorage`] adapter every store writes through.

mod memory;

#[cfg(target_arch = "wasm32")]
mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserLocalStorage, BrowserSessionStorage};
pub use memory::MemoryStore;

use crate::errors::StorageError;
use std::fmt;
use std::rc::Rc;
use tracing::warn;

/// A synchronous string key-value store.
///
/// Implementations do not validate values; a missing key is `Ok(None)`.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be reached.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be reached.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// One step of a multi-key write, addressed by logical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOp {
    /// Store `value` under `key`.
    Set {
        /// Logical key.
        key: String,
        /// Value to store.
        value: String,
    },
    /// Delete `key`.
    Remove {
        /// Logical key.
        key: String,
    },
}

impl StorageOp {
    /// A [`StorageOp::Set`] step.
    #[must_use]
    pub fn set<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A [`StorageOp::Remove`] step.
    #[must_use]
    pub fn remove<K: Into<String>>(key: K) -> Self {
        Self::Remove { key: key.into() }
    }

    fn key(&self) -> &str {
        match self {
            Self::Set { key, .. } | Self::Remove { key } => key,
        }
    }
}

/// Key-value access confined to a fixed key prefix.
///
/// Every logical key is mapped through [`NamespacedStorage::namespaced_key`]
/// before it reaches the backend, so unrelated consumers of the same
/// physical store never collide.
#[derive(Clone)]
pub struct NamespacedStorage {
    prefix: Rc<str>,
    backend: Rc<dyn KeyValueStore>,
}

impl fmt::Debug for NamespacedStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespacedStorage")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl NamespacedStorage {
    /// Wraps `backend`, prefixing every key with `prefix`.
    #[must_use]
    pub fn new(prefix: &str, backend: Rc<dyn KeyValueStore>) -> Self {
        Self {
            prefix: Rc::from(prefix),
            backend,
        }
    }

    /// Maps a logical key to its physical key.
    #[must_use]
    pub fn namespaced_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Reads a logical key.
    ///
    /// # Errors
    /// Propagates backend failures.
    pub fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.backend.get(&self.namespaced_key(key))
    }

    /// Writes a logical key.
    ///
    /// # Errors
    /// Propagates backend failures.
    pub fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.backend.set(&self.namespaced_key(key), value)
    }

    /// Removes a logical key.
    ///
    /// # Errors
    /// Propagates backend failures.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.backend.remove(&self.namespaced_key(key))
    }

    /// Applies `ops` as a unit.
    ///
    /// Prior values of every touched key are captured first. If any step
    /// fails, the steps already applied are reverted in reverse order and
    /// the first error is returned, so the backend holds either all of the
    /// new values or none of them.
    ///
    /// # Errors
    /// Returns the backend error that aborted the batch.
    pub fn write_batch(&self, ops: &[StorageOp]) -> Result<(), StorageError> {
        let mut prior = Vec::with_capacity(ops.len());
        for op in ops {
            let key = self.namespaced_key(op.key());
            let previous = self.backend.get(&key)?;
            prior.push((key, previous));
        }

        for (index, op) in ops.iter().enumerate() {
            let key = &prior[index].0;
            let result = match op {
                StorageOp::Set { value, .. } => self.backend.set(key, value),
                StorageOp::Remove { .. } => self.backend.remove(key),
            };
            if let Err(err) = result {
                warn!(key = %key, error = %err, "batch write failed, rolling back");
                self.rollback(&prior[..index]);
                return Err(err);
            }
        }
        Ok(())
    }

    fn rollback(&self, applied: &[(String, Option<String>)]) {
        for (key, previous) in applied.iter().rev() {
            let restored = match previous {
                Some(value) => self.backend.set(key, value),
                None => self.backend.remove(key),
            };
            if let Err(err) = restored {
                warn!(key = %key, error = %err, "failed to restore key during rollback");
            }
        }
    }
}
