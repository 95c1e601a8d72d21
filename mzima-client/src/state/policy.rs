//! Access decisions derived from the current store snapshots.
//!
//! Everything here is pure: callers pass the snapshots they hold and nothing
//! is cached or persisted.

use shared::models::{ConfigMap, SessionToken, is_truthy};

/// Meters covered by precision level 0.
const BASE_PRECISION_RADIUS: f64 = 1000.0;

/// `true` if the deployment is marked private.
#[must_use]
pub fn is_site_private(site: &ConfigMap) -> bool {
    site.get("private").is_some_and(is_truthy)
}

/// Public sites are visible to everyone, private ones only with a token.
#[must_use]
pub fn access_to_site(site: &ConfigMap, session: &SessionToken) -> bool {
    !is_site_private(site) || session.has_access_token()
}

/// `true` once the site configuration has been loaded.
#[must_use]
pub fn site_found(site: &ConfigMap) -> bool {
    !site.is_empty()
}

/// Truthiness of `features[flag]`; an unknown flag is disabled.
#[must_use]
pub fn is_feature_enabled(features: &ConfigMap, flag: &str) -> bool {
    features.get(flag).is_some_and(is_truthy)
}

/// Radius in meters for a location precision level: `1000 / 10^level`.
#[must_use]
pub fn precision_radius(level: i32) -> f64 {
    BASE_PRECISION_RADIUS / 10f64.powi(level)
}
