//! The process-wide [`SessionService`].

use super::deployment::DeploymentStore;
use super::policy;
use super::preferences::UiPreferences;
use super::session::SessionStore;
use super::user::UserStore;
use crate::errors::StateResult;
use crate::reactive::Subscription;
use crate::storage::{KeyValueStore, NamespacedStorage};
use shared::config::ClientConfig;
use shared::models::{
    ConfigCategory, ConfigMap, DeploymentInfo, DonationConfig, SessionToken, UserProfile,
    UserProfileUpdate,
};
use std::rc::Rc;
use tracing::info;

/// Process-wide state authority.
///
/// Built once at startup and shared by reference with every consumer. It
/// owns the session, profile, deployment and preference stores; nothing
/// else mutates their snapshots.
#[derive(Debug)]
pub struct SessionService {
    storage: NamespacedStorage,
    session: SessionStore,
    user: UserStore,
    deployment: DeploymentStore,
    preferences: UiPreferences,
}

impl SessionService {
    /// Builds the service and hydrates every store.
    ///
    /// `local` is the durable store, `session_scoped` the tab/app-lifetime
    /// store holding `cookies` and `filters`. Both are namespaced with
    /// [`ClientConfig::storage_prefix`].
    #[must_use]
    pub fn new(
        local: Rc<dyn KeyValueStore>,
        session_scoped: Rc<dyn KeyValueStore>,
        config: &ClientConfig,
    ) -> Self {
        let storage = NamespacedStorage::new(&config.storage_prefix, local);
        let session_scoped = NamespacedStorage::new(&config.storage_prefix, session_scoped);

        let service = Self {
            session: SessionStore::new(storage.clone()),
            user: UserStore::new(storage.clone(), session_scoped),
            deployment: DeploymentStore::new(),
            preferences: UiPreferences::new(&storage),
            storage,
        };
        info!(
            prefix = %config.storage_prefix,
            authenticated = service.session.has_auth_token(),
            logged = service.user.is_logged(),
            "session service started"
        );
        service
    }

    /// Builds the service on the browser's `localStorage` and `sessionStorage`.
    #[cfg(target_arch = "wasm32")]
    #[must_use]
    pub fn in_browser(config: &ClientConfig) -> Self {
        use crate::storage::{BrowserLocalStorage, BrowserSessionStorage};
        Self::new(
            Rc::new(BrowserLocalStorage),
            Rc::new(BrowserSessionStorage),
            config,
        )
    }

    /// Maps a logical key to its namespaced storage key.
    #[must_use]
    pub fn namespaced_key(&self, key: &str) -> String {
        self.storage.namespaced_key(key)
    }

    // Session

    /// Current session snapshot.
    #[must_use]
    pub fn session_snapshot(&self) -> SessionToken {
        self.session.snapshot()
    }

    /// Stream of session snapshots.
    #[must_use]
    pub fn subscribe_session(&self) -> Subscription<SessionToken> {
        self.session.subscribe()
    }

    /// Current access token, empty when logged out.
    #[must_use]
    pub fn current_auth_token(&self) -> String {
        self.session.auth_token()
    }

    /// Current token type.
    #[must_use]
    pub fn current_auth_token_type(&self) -> String {
        self.session.auth_token_type()
    }

    /// See [`SessionStore::set_session_data`].
    ///
    /// # Errors
    /// Returns an error if persisting the session fails.
    pub fn set_session_data(&self, session: SessionToken) -> StateResult<()> {
        self.session.set_session_data(session)
    }

    /// See [`SessionStore::clear_session_data`].
    ///
    /// # Errors
    /// Returns an error if removing the persisted session fails.
    pub fn clear_session_data(&self) -> StateResult<()> {
        self.session.clear_session_data()
    }

    // User

    /// Current profile snapshot.
    #[must_use]
    pub fn current_user(&self) -> UserProfile {
        self.user.snapshot()
    }

    /// Stream of profile snapshots.
    #[must_use]
    pub fn subscribe_user(&self) -> Subscription<UserProfile> {
        self.user.subscribe()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_logged(&self) -> bool {
        self.user.is_logged()
    }

    /// Stream of the login flag.
    #[must_use]
    pub fn subscribe_logged(&self) -> Subscription<bool> {
        self.user.subscribe_logged()
    }

    /// See [`UserStore::set_current_user`].
    ///
    /// # Errors
    /// Returns an error if persisting the profile fails.
    pub fn set_current_user(&self, update: &UserProfileUpdate) -> StateResult<()> {
        self.user.set_current_user(update)
    }

    /// See [`UserStore::clear_user_data`].
    ///
    /// # Errors
    /// Returns an error if removing the persisted profile fails.
    pub fn clear_user_data(&self) -> StateResult<()> {
        self.user.clear_user_data()
    }

    // Deployment configuration

    /// Settings of one category.
    #[must_use]
    pub fn config(&self, category: ConfigCategory) -> ConfigMap {
        self.deployment.config(category)
    }

    /// `site` settings.
    #[must_use]
    pub fn site_config(&self) -> ConfigMap {
        self.deployment.site_config()
    }

    /// `features` settings.
    #[must_use]
    pub fn feature_config(&self) -> ConfigMap {
        self.deployment.feature_config()
    }

    /// `map` settings.
    #[must_use]
    pub fn map_config(&self) -> ConfigMap {
        self.deployment.map_config()
    }

    /// See [`DeploymentStore::set_config`].
    pub fn set_config(&self, category: ConfigCategory, data: ConfigMap) {
        self.deployment.set_config(category, data);
    }

    /// See [`DeploymentStore::set_site_donation`].
    ///
    /// # Errors
    /// Returns an error if the donation settings cannot be serialized.
    pub fn set_site_donation(&self, donation: &DonationConfig) -> StateResult<()> {
        self.deployment.set_site_donation(donation)
    }

    /// Current deployment info.
    #[must_use]
    pub fn deployment_info(&self) -> Option<DeploymentInfo> {
        self.deployment.info()
    }

    /// Stream of deployment info.
    #[must_use]
    pub fn subscribe_deployment_info(&self) -> Subscription<Option<DeploymentInfo>> {
        self.deployment.subscribe_info()
    }

    // Derived access

    /// Whether the current visitor may view the deployment.
    #[must_use]
    pub fn access_to_site(&self) -> bool {
        let session = self.session.snapshot();
        let site = self.deployment.site_config();
        policy::access_to_site(&site, &session)
    }

    /// Whether the API returned a site configuration.
    #[must_use]
    pub fn site_found(&self) -> bool {
        self.deployment.site_found()
    }

    /// Truthiness of `features[flag]`.
    #[must_use]
    pub fn is_feature_enabled(&self, flag: &str) -> bool {
        self.deployment.is_feature_enabled(flag)
    }

    /// Radius in meters used to blur a post location.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn precision_radius(&self, location_precision: i32) -> f64 {
        policy::precision_radius(location_precision)
    }

    // UI preferences

    /// Whether the filter panel is shown.
    #[must_use]
    pub fn is_filters_visible(&self) -> bool {
        self.preferences.filters_visible.get()
    }

    /// Stream of the filter panel visibility.
    #[must_use]
    pub fn subscribe_filters_visible(&self) -> Subscription<bool> {
        self.preferences.filters_visible.subscribe()
    }

    /// Persists and publishes the filter panel visibility.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn set_filter_visibility(&self, visible: bool) -> StateResult<()> {
        self.preferences.filters_visible.set(visible)
    }

    /// Whether the main filters are collapsed.
    #[must_use]
    pub fn is_main_filters_collapsed(&self) -> bool {
        self.preferences.main_filters_collapsed.get()
    }

    /// Stream of the main filters collapse state.
    #[must_use]
    pub fn subscribe_main_filters_collapsed(&self) -> Subscription<bool> {
        self.preferences.main_filters_collapsed.subscribe()
    }

    /// Persists and publishes the main filters collapse state.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn set_main_filters_collapsed(&self, collapsed: bool) -> StateResult<()> {
        self.preferences.main_filters_collapsed.set(collapsed)
    }
}
