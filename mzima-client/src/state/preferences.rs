//! Persisted UI preference flags.

use crate::errors::{StateError, StateResult};
use crate::reactive::{Observable, Subscription};
use crate::storage::NamespacedStorage;
use tracing::{debug, warn};

/// Storage key of the filter panel visibility flag.
pub const FILTERS_VISIBLE_KEY: &str = "isFiltersVisible";

/// Storage key of the main filters collapse flag.
pub const MAIN_FILTERS_COLLAPSED_KEY: &str = "main_filters_closed";

/// A persisted boolean with its own stream.
#[derive(Debug)]
pub struct PreferenceFlag {
    key: &'static str,
    storage: NamespacedStorage,
    value: Observable<bool>,
}

impl PreferenceFlag {
    /// Creates the flag and loads its persisted value.
    #[must_use]
    pub fn new(key: &'static str, storage: NamespacedStorage) -> Self {
        let flag = Self {
            key,
            storage,
            value: Observable::new(false),
        };
        flag.load();
        flag
    }

    /// Unprefixed storage key.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> bool {
        self.value.get()
    }

    /// Stream of the value.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<bool> {
        self.value.subscribe()
    }

    /// Re-reads the persisted value. Missing reads as `false`; anything that
    /// is not `true`/`false` is logged and reads as `false`.
    pub fn load(&self) {
        let value = match self.storage.read(self.key) {
            Ok(Some(raw)) => match self.parse(&raw) {
                Ok(value) => value,
                Err(err) => {
                    warn!(error = %err, "ignoring corrupt preference");
                    false
                }
            },
            Ok(None) => false,
            Err(err) => {
                warn!(key = self.key, error = %err, "preference unreadable, using default");
                false
            }
        };
        self.value.publish(value);
    }

    /// Persists `value`, then publishes it.
    ///
    /// # Errors
    /// Returns [`StateError::Storage`] if the write fails.
    pub fn set(&self, value: bool) -> StateResult<()> {
        self.storage.write(self.key, if value { "true" } else { "false" })?;
        debug!(key = self.key, value, "preference stored");
        self.value.publish(value);
        Ok(())
    }

    fn parse(&self, raw: &str) -> StateResult<bool> {
        match raw.trim() {
            "true" => Ok(true),
            "false" | "" => Ok(false),
            _ => Err(StateError::corrupt(self.storage.namespaced_key(self.key), raw)),
        }
    }
}

/// The two independent UI toggles.
#[derive(Debug)]
pub struct UiPreferences {
    /// Whether the filter panel is shown.
    pub filters_visible: PreferenceFlag,
    /// Whether the main filters are collapsed.
    pub main_filters_collapsed: PreferenceFlag,
}

impl UiPreferences {
    /// Loads both flags from `storage`.
    #[must_use]
    pub fn new(storage: &NamespacedStorage) -> Self {
        Self {
            filters_visible: PreferenceFlag::new(FILTERS_VISIBLE_KEY, storage.clone()),
            main_filters_collapsed: PreferenceFlag::new(MAIN_FILTERS_COLLAPSED_KEY, storage.clone()),
        }
    }
}
