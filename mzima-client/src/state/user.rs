//! User profile store and the logged-in stream.

use crate::errors::{StateError, StateResult};
use crate::reactive::{Observable, Subscription};
use crate::storage::{NamespacedStorage, StorageOp};
use shared::models::{FieldValue, UserField, UserProfile, UserProfileUpdate};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

/// Removed alongside the profile on logout.
pub const ACTIVE_SAVED_SEARCH_KEY: &str = "activeSavedSearch";

/// Session-scoped keys that must survive a profile wipe.
pub const RETAINED_SESSION_KEYS: [&str; 2] = ["cookies", "filters"];

/// Holds the current user's profile and the derived login flag.
#[derive(Debug)]
pub struct UserStore {
    storage: NamespacedStorage,
    session_scoped: NamespacedStorage,
    current: Observable<UserProfile>,
    logged: Observable<bool>,
}

impl UserStore {
    /// Creates the store and hydrates it from `storage`.
    ///
    /// `session_scoped` is the short-lived store holding `cookies` and
    /// `filters`.
    #[must_use]
    pub fn new(storage: NamespacedStorage, session_scoped: NamespacedStorage) -> Self {
        let store = Self {
            storage,
            session_scoped,
            current: Observable::default(),
            logged: Observable::new(false),
        };
        store.load_from_persistence();
        store
    }

    /// Current profile snapshot.
    #[must_use]
    pub fn snapshot(&self) -> UserProfile {
        self.current.get()
    }

    /// Stream of profile snapshots.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<UserProfile> {
        self.current.subscribe()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_logged(&self) -> bool {
        self.logged.get()
    }

    /// Stream of the login flag.
    #[must_use]
    pub fn subscribe_logged(&self) -> Subscription<bool> {
        self.logged.subscribe()
    }

    /// Reads every profile field from storage and republishes.
    pub fn load_from_persistence(&self) {
        let mut profile = UserProfile::default();
        for field in UserField::iter() {
            let value = match self.storage.read(field.key()) {
                Ok(Some(raw)) => self.decode(field, raw),
                Ok(None) => continue,
                Err(err) => {
                    warn!(key = field.key(), error = %err, "profile field unreadable, using default");
                    continue;
                }
            };
            field.set(&mut profile, value);
        }
        info!(logged = profile.is_logged(), "user profile loaded from storage");
        self.publish(profile);
    }

    /// Persists the fields present in `update`, then merges them into the
    /// snapshot. Absent fields keep their current value.
    ///
    /// # Errors
    /// Returns [`StateError::Storage`] if persisting fails; the snapshot is
    /// left untouched.
    pub fn set_current_user(&self, update: &UserProfileUpdate) -> StateResult<()> {
        let mut ops = Vec::new();
        for field in UserField::iter() {
            if let Some(value) = field.get_update(update) {
                ops.push(StorageOp::set(field.key(), encode(value)?));
            }
        }
        self.storage.write_batch(&ops)?;

        let mut profile = self.current.get();
        profile.apply(update);
        debug!(fields = ops.len(), "user profile updated");
        self.publish(profile);
        Ok(())
    }

    /// Wipes the profile from storage and memory.
    ///
    /// `cookies` and `filters` in the session-scoped store are read before
    /// the wipe and written back afterwards.
    ///
    /// # Errors
    /// Returns [`StateError::Storage`] if removing the profile keys fails.
    pub fn clear_user_data(&self) -> StateResult<()> {
        let retained: Vec<(&str, String)> = RETAINED_SESSION_KEYS
            .iter()
            .filter_map(|&key| match self.session_scoped.read(key) {
                Ok(Some(value)) if !value.is_empty() => Some((key, value)),
                Ok(_) => None,
                Err(err) => {
                    warn!(key, error = %err, "could not read session-scoped key before logout");
                    None
                }
            })
            .collect();

        let mut ops: Vec<_> = UserField::iter()
            .map(|field| StorageOp::remove(field.key()))
            .collect();
        ops.push(StorageOp::remove(ACTIVE_SAVED_SEARCH_KEY));
        self.storage.write_batch(&ops)?;

        self.publish(UserProfile::default());
        info!("user data cleared");

        for (key, value) in retained {
            if let Err(err) = self.session_scoped.write(key, &value) {
                warn!(key, error = %err, "could not restore session-scoped key after logout");
            }
        }
        Ok(())
    }

    fn publish(&self, profile: UserProfile) {
        let logged = profile.is_logged();
        self.current.publish(profile);
        self.logged.publish(logged);
    }

    fn decode(&self, field: UserField, raw: String) -> FieldValue {
        if !field.is_list() {
            return FieldValue::Text(raw);
        }
        if !raw.trim_start().starts_with('[') {
            return FieldValue::Text(raw);
        }
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(items) => FieldValue::List(items),
            Err(_) => {
                let err = StateError::corrupt(self.storage.namespaced_key(field.key()), raw);
                warn!(error = %err, "ignoring corrupt profile list");
                FieldValue::List(Vec::new())
            }
        }
    }
}

fn encode(value: FieldValue) -> StateResult<String> {
    match value {
        FieldValue::Text(text) => Ok(text),
        FieldValue::List(items) => Ok(serde_json::to_string(&items)?),
    }
}
