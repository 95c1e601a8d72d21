//! Browser `localStorage` and `sessionStorage` backends.

use super::KeyValueStore;
use crate::errors::StorageError;
use gloo_storage::{LocalStorage, SessionStorage, Storage};

/// Durable store backed by `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserLocalStorage;

/// Tab-scoped store backed by `window.sessionStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSessionStorage;

fn get_raw(storage: &web_sys::Storage, key: &str) -> Result<Option<String>, StorageError> {
    storage
        .get_item(key)
        .map_err(|err| StorageError::backend(format!("{err:?}")))
}

fn set_raw(storage: &web_sys::Storage, key: &str, value: &str) -> Result<(), StorageError> {
    storage
        .set_item(key, value)
        .map_err(|err| StorageError::write_rejected(key, format!("{err:?}")))
}

fn remove_raw(storage: &web_sys::Storage, key: &str) -> Result<(), StorageError> {
    storage
        .remove_item(key)
        .map_err(|err| StorageError::backend(format!("{err:?}")))
}

impl KeyValueStore for BrowserLocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        get_raw(&LocalStorage::raw(), key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        set_raw(&LocalStorage::raw(), key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        remove_raw(&LocalStorage::raw(), key)
    }
}

impl KeyValueStore for BrowserSessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        get_raw(&SessionStorage::raw(), key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        set_raw(&SessionStorage::raw(), key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        remove_raw(&SessionStorage::raw(), key)
    }
}
