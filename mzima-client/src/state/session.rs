//! Session token store.

use crate::errors::{StateError, StateResult};
use crate::reactive::{Observable, Subscription};
use crate::storage::{NamespacedStorage, StorageOp};
use shared::models::{SessionField, SessionToken};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

/// Holds the current auth token and mirrors it to persistent storage.
#[derive(Debug)]
pub struct SessionStore {
    storage: NamespacedStorage,
    current: Observable<SessionToken>,
}

impl SessionStore {
    /// Creates the store and hydrates it from `storage`.
    #[must_use]
    pub fn new(storage: NamespacedStorage) -> Self {
        let store = Self {
            storage,
            current: Observable::default(),
        };
        store.load_from_persistence();
        store
    }

    /// Current session snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionToken {
        self.current.get()
    }

    /// Stream of session snapshots.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<SessionToken> {
        self.current.subscribe()
    }

    /// Current access token, empty when logged out.
    #[must_use]
    pub fn auth_token(&self) -> String {
        self.current.with(|token| token.access_token.clone())
    }

    /// Current token type, e.g. `Bearer`.
    #[must_use]
    pub fn auth_token_type(&self) -> String {
        self.current.with(|token| token.token_type.clone())
    }

    /// Whether an access token is held.
    #[must_use]
    pub fn has_auth_token(&self) -> bool {
        self.current.with(SessionToken::has_access_token)
    }

    /// Rebuilds the snapshot from persisted values and republishes it.
    ///
    /// Missing values read as empty; an unreadable or corrupt value is logged
    /// and replaced by the field default.
    pub fn load_from_persistence(&self) {
        let mut token = SessionToken::default();
        for field in SessionField::iter() {
            let raw = match self.storage.read(field.key()) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(err) => {
                    warn!(key = field.key(), error = %err, "session field unreadable, using default");
                    continue;
                }
            };
            if field.decode(&mut token, &raw).is_err() {
                let err = StateError::corrupt(self.storage.namespaced_key(field.key()), raw);
                warn!(error = %err, "ignoring corrupt session field");
            }
        }
        info!(
            authenticated = token.has_access_token(),
            "session loaded from storage"
        );
        self.current.publish(token);
    }

    /// Persists all four fields as one batch, then publishes `session`.
    ///
    /// # Errors
    /// Returns [`StateError::Storage`] if the batch fails; storage is rolled
    /// back and the snapshot is left untouched.
    pub fn set_session_data(&self, session: SessionToken) -> StateResult<()> {
        let ops: Vec<_> = SessionField::iter()
            .map(|field| StorageOp::set(field.key(), field.encode(&session)))
            .collect();
        self.storage.write_batch(&ops)?;
        debug!(token_type = %session.token_type, "session data stored");
        self.current.publish(session);
        Ok(())
    }

    /// Removes all four persisted fields and publishes the empty session.
    ///
    /// # Errors
    /// Returns [`StateError::Storage`] if the batch fails.
    pub fn clear_session_data(&self) -> StateResult<()> {
        let ops: Vec<_> = SessionField::iter()
            .map(|field| StorageOp::remove(field.key()))
            .collect();
        self.storage.write_batch(&ops)?;
        debug!("session data cleared");
        self.current.publish(SessionToken::default());
        Ok(())
    }
}
