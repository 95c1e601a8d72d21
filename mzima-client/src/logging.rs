//! Tracing setup driven by [`ClientConfig::log_level`].
//!
//! `RUST_LOG` wins when it is set; otherwise the configured level becomes
//! the default directive.

use shared::config::ClientConfig;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Level parsed from the configuration, `INFO` when it does not parse.
#[must_use]
pub fn default_level(config: &ClientConfig) -> LevelFilter {
    config
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO)
}

/// Filter honoring `RUST_LOG` first, then the configured level.
#[must_use]
pub fn build_env_filter(config: &ClientConfig) -> EnvFilter {
    let default_level = default_level(config);

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy()
    })
}

/// Installs the global subscriber.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(config: &ClientConfig) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(build_env_filter(config))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_level(level: &str) -> ClientConfig {
        ClientConfig {
            log_level: level.to_string(),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn configured_level_is_parsed() {
        assert_eq!(default_level(&config_with_level("debug")), LevelFilter::DEBUG);
        assert_eq!(default_level(&config_with_level("WARN")), LevelFilter::WARN);
        assert_eq!(default_level(&config_with_level("off")), LevelFilter::OFF);
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        assert_eq!(default_level(&config_with_level("chatty")), LevelFilter::INFO);
        assert_eq!(default_level(&config_with_level("")), LevelFilter::INFO);
    }

    #[test]
    fn second_init_is_rejected() {
        let config = ClientConfig::default();
        let _ = init_logging(&config);
        assert!(init_logging(&config).is_err());
    }
}
