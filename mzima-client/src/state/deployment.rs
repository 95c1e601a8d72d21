//! Deployment configuration store.

use crate::errors::StateResult;
use crate::reactive::{Observable, Subscription};
use shared::models::{ConfigCategory, ConfigMap, DeploymentConfig, DeploymentInfo, DonationConfig};
use tracing::debug;

use super::policy;

/// Holds the deployment configuration fetched from the API.
///
/// Configuration is not persisted; it is refetched on every start. The
/// derived [`DeploymentInfo`] is `None` until the first category is set.
#[derive(Debug, Default)]
pub struct DeploymentStore {
    config: Observable<DeploymentConfig>,
    info: Observable<Option<DeploymentInfo>>,
}

impl DeploymentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings of one category.
    #[must_use]
    pub fn config(&self, category: ConfigCategory) -> ConfigMap {
        self.config.with(|config| config.get(category).clone())
    }

    /// Full configuration snapshot.
    #[must_use]
    pub fn snapshot(&self) -> DeploymentConfig {
        self.config.get()
    }

    /// `site` settings.
    #[must_use]
    pub fn site_config(&self) -> ConfigMap {
        self.config(ConfigCategory::Site)
    }

    /// `features` settings.
    #[must_use]
    pub fn feature_config(&self) -> ConfigMap {
        self.config(ConfigCategory::Features)
    }

    /// `map` settings.
    #[must_use]
    pub fn map_config(&self) -> ConfigMap {
        self.config(ConfigCategory::Map)
    }

    /// Replaces `category` wholesale and republishes the deployment info.
    pub fn set_config(&self, category: ConfigCategory, data: ConfigMap) {
        let mut config = self.config.get();
        config.replace(category, data);
        let info = DeploymentInfo::from_site(&config.site);
        self.config.publish(config);
        debug!(%category, title = %info.title, private = info.private, "deployment config replaced");
        self.info.publish(Some(info));
    }

    /// Stores donation settings under `site.donation`, keeping the other
    /// site fields.
    ///
    /// # Errors
    /// Returns [`crate::errors::StateError::Serialization`] if the settings
    /// cannot be converted to JSON.
    pub fn set_site_donation(&self, donation: &DonationConfig) -> StateResult<()> {
        let value = serde_json::to_value(donation)?;
        let mut config = self.config.get();
        config.site.insert("donation".to_string(), value);
        self.config.publish(config);
        Ok(())
    }

    /// Current deployment info, `None` before any configuration arrived.
    #[must_use]
    pub fn info(&self) -> Option<DeploymentInfo> {
        self.info.get()
    }

    /// Stream of deployment info.
    #[must_use]
    pub fn subscribe_info(&self) -> Subscription<Option<DeploymentInfo>> {
        self.info.subscribe()
    }

    /// Whether the API returned a site configuration.
    #[must_use]
    pub fn site_found(&self) -> bool {
        self.config.with(|config| policy::site_found(&config.site))
    }

    /// Whether the deployment is private.
    #[must_use]
    pub fn is_site_private(&self) -> bool {
        self.config.with(|config| policy::is_site_private(&config.site))
    }

    /// Truthiness of `features[flag]`.
    #[must_use]
    pub fn is_feature_enabled(&self, flag: &str) -> bool {
        self.config
            .with(|config| policy::is_feature_enabled(&config.features, flag))
    }
}
