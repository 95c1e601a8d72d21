//! Deployment configuration and derived deployment info.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Settings of a single configuration category, as delivered by the API.
pub type ConfigMap = Map<String, Value>;

/// The three configuration categories a deployment exposes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConfigCategory {
    /// Feature flags.
    Features,
    /// General site settings.
    Site,
    /// Map defaults.
    Map,
}

/// Deployment configuration, one mapping per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Feature flags.
    pub features: ConfigMap,
    /// General site settings.
    pub site: ConfigMap,
    /// Map defaults.
    pub map: ConfigMap,
}

impl DeploymentConfig {
    /// Returns the settings of `category`.
    #[must_use]
    pub fn get(&self, category: ConfigCategory) -> &ConfigMap {
        match category {
            ConfigCategory::Features => &self.features,
            ConfigCategory::Site => &self.site,
            ConfigCategory::Map => &self.map,
        }
    }

    /// Replaces the settings of `category` wholesale.
    pub fn replace(&mut self, category: ConfigCategory, data: ConfigMap) {
        match category {
            ConfigCategory::Features => self.features = data,
            ConfigCategory::Site => self.site = data,
            ConfigCategory::Map => self.map = data,
        }
    }
}

/// Flattened view of the deployment shown in headers and menus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentInfo {
    /// Site name.
    pub title: String,
    /// Site description.
    pub description: String,
    /// Header image URL.
    pub logo: String,
    /// Whether only signed-in users may view the site.
    pub private: bool,
    /// Contact address.
    pub email: String,
}

impl DeploymentInfo {
    /// Derives the view from the `site` category.
    ///
    /// Missing or non-text fields fall back to an empty string, a missing
    /// `private` flag falls back to `false`.
    #[must_use]
    pub fn from_site(site: &ConfigMap) -> Self {
        let text = |key: &str| {
            site.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            title: text("name"),
            description: text("description"),
            logo: text("image_header"),
            private: site.get("private").is_some_and(is_truthy),
            email: text("email"),
        }
    }
}

/// Image attached to a donation campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DonationImage {
    /// Media id, if uploaded.
    pub id: Option<u64>,
    /// Full-size image URL.
    pub original_file_url: String,
}

/// Donation settings stored under `site.donation`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DonationConfig {
    /// Whether the donation banner is shown.
    pub enabled: bool,
    /// Campaign title.
    pub title: String,
    /// Campaign description.
    pub description: String,
    /// Payment pointer receiving donations.
    pub wallet: String,
    /// Campaign images.
    pub images: Vec<DonationImage>,
}

/// Loose truthiness of a configuration value.
///
/// `null`, `false`, `0`, `NaN` and the empty string are falsy. Every other
/// value, including empty arrays and objects, is truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
