//! # Configuration
//!
//! Client configuration: storage namespacing, back-navigation behaviour and
//! logging. Values resolve from defaults, then an optional YAML or JSON file,
//! then `MZIMA_*` environment variables, then explicit overrides.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
use std::{env, fs, path::PathBuf};

/// Namespace prepended to every persisted key.
pub const DEFAULT_STORAGE_PREFIX: &str = "USH_";

/// Errors raised while loading or validating a [`ClientConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file could not be parsed
    #[error("Failed to parse configuration file: {message}")]
    Parse {
        /// Parser error text.
        message: String,
    },

    /// The configuration file has an unknown extension
    #[error("Unsupported configuration format. Use 'yaml' or 'json'.")]
    UnsupportedFormat,

    /// A value failed validation
    #[error("Invalid {field} value: {message}")]
    InvalidValue {
        /// Offending field or variable.
        field: String,
        /// Why the value was rejected.
        message: String,
    },
}

impl ConfigError {
    fn invalid<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Configuration of the client state core.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix applied to every persisted key
    pub storage_prefix: String,

    /// Routes on which a hardware back press arms the exit gesture
    pub exit_routes: Vec<String>,

    /// How long the "tap back again" prompt stays visible, in milliseconds
    pub exit_prompt_duration_ms: u64,

    /// Logging level
    pub log_level: String,

    /// Oldest iOS version that does not trigger the update prompt
    pub minimum_ios_version: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ClientConfig {
    /// Generates a default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            exit_routes: vec!["/".to_string(), "/deployment".to_string()],
            exit_prompt_duration_ms: 2000,
            log_level: "info".to_string(),
            minimum_ios_version: "16.5".to_string(),
        }
    }

    /// Visible lifetime of the exit prompt.
    #[must_use]
    pub fn exit_prompt_duration(&self) -> Duration {
        Duration::from_millis(self.exit_prompt_duration_ms)
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// # Arguments
    /// * `config_path` - Optional path to a `.yaml`/`.yml` or `.json` file.
    /// * `prefix_override` - Optional storage prefix taking precedence over everything else.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, an
    /// environment variable is malformed, or the result fails validation.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_config(
        config_path: Option<PathBuf>,
        prefix_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::with_defaults();
        let mut config = defaults.clone();

        if let Some(path) = config_path {
            let content = fs::read_to_string(&path)?;
            config = match path.extension().and_then(|ext| ext.to_str()) {
                Some("yaml" | "yml") => serde_yml::from_str(&content).map_err(|err| {
                    ConfigError::Parse {
                        message: err.to_string(),
                    }
                })?,
                Some("json") => serde_json::from_str(&content).map_err(|err| ConfigError::Parse {
                    message: err.to_string(),
                })?,
                _ => return Err(ConfigError::UnsupportedFormat),
            };
        }

        // Environment variables only fill values still at their defaults
        if config.storage_prefix == defaults.storage_prefix {
            if let Ok(prefix) = env::var("MZIMA_STORAGE_PREFIX") {
                config.storage_prefix = prefix;
            }
        }
        if config.exit_routes == defaults.exit_routes {
            if let Ok(routes) = env::var("MZIMA_EXIT_ROUTES") {
                config.exit_routes = routes
                    .split(',')
                    .map(str::trim)
                    .filter(|route| !route.is_empty())
                    .map(str::to_string)
                    .collect();
            }
        }
        if config.exit_prompt_duration_ms == defaults.exit_prompt_duration_ms {
            if let Ok(duration) = env::var("MZIMA_EXIT_PROMPT_MS") {
                config.exit_prompt_duration_ms = duration.parse().map_err(|_| {
                    ConfigError::invalid("MZIMA_EXIT_PROMPT_MS", "must be a number of milliseconds")
                })?;
            }
        }
        if config.log_level == defaults.log_level {
            if let Ok(log_level) = env::var("MZIMA_LOG_LEVEL") {
                config.log_level = log_level;
            }
        }

        if let Some(prefix) = prefix_override {
            config.storage_prefix = prefix;
        }

        config.validate()?;
        tracing::debug!(prefix = %config.storage_prefix, "client configuration loaded");
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_prefix.is_empty() {
            return Err(ConfigError::invalid("storage_prefix", "must not be empty"));
        }
        if self.exit_routes.is_empty() {
            return Err(ConfigError::invalid(
                "exit_routes",
                "at least one exit route is required",
            ));
        }
        if let Some(route) = self.exit_routes.iter().find(|route| !route.starts_with('/')) {
            return Err(ConfigError::invalid(
                "exit_routes",
                format!("route '{route}' must start with '/'"),
            ));
        }
        if self.exit_prompt_duration_ms == 0 {
            return Err(ConfigError::invalid(
                "exit_prompt_duration_ms",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn cleanup_env_vars() {
        unsafe {
            std::env::remove_var("MZIMA_STORAGE_PREFIX");
            std::env::remove_var("MZIMA_EXIT_ROUTES");
            std::env::remove_var("MZIMA_EXIT_PROMPT_MS");
            std::env::remove_var("MZIMA_LOG_LEVEL");
        }
    }

    #[test]
    fn test_config_with_defaults() {
        let config = ClientConfig::with_defaults();

        assert_eq!(config.storage_prefix, "USH_");
        assert_eq!(config.exit_routes, vec!["/", "/deployment"]);
        assert_eq!(config.exit_prompt_duration(), Duration::from_secs(2));
        assert_eq!(config.minimum_ios_version, "16.5");
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_load_config_with_defaults() {
        cleanup_env_vars();
        let config = ClientConfig::load_config(None, None).unwrap();
        assert_eq!(config, ClientConfig::with_defaults());
    }

    #[test]
    #[serial]
    fn test_load_config_with_environment_variables() {
        cleanup_env_vars();
        unsafe {
            std::env::set_var("MZIMA_STORAGE_PREFIX", "TEST_");
            std::env::set_var("MZIMA_EXIT_ROUTES", "/, /map ,");
            std::env::set_var("MZIMA_EXIT_PROMPT_MS", "3500");
            std::env::set_var("MZIMA_LOG_LEVEL", "debug");
        }

        let config = ClientConfig::load_config(None, None).unwrap();

        assert_eq!(config.storage_prefix, "TEST_");
        assert_eq!(config.exit_routes, vec!["/", "/map"]);
        assert_eq!(config.exit_prompt_duration_ms, 3500);
        assert_eq!(config.log_level, "debug");

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_prefix_override_precedence() {
        cleanup_env_vars();
        unsafe {
            std::env::set_var("MZIMA_STORAGE_PREFIX", "ENV_");
        }

        let config = ClientConfig::load_config(None, Some("CLI_".to_string())).unwrap();
        assert_eq!(config.storage_prefix, "CLI_");

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_invalid_prompt_duration_environment() {
        cleanup_env_vars();
        unsafe {
            std::env::set_var("MZIMA_EXIT_PROMPT_MS", "soon");
        }

        let result = ClientConfig::load_config(None, None);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("MZIMA_EXIT_PROMPT_MS")
        );

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_load_config_from_yaml_file() -> Result<(), Box<dyn std::error::Error>> {
        cleanup_env_vars();
        let temp_dir = TempDir::new()?;
        let config_file = temp_dir.path().join("client.yaml");
        fs::write(
            &config_file,
            r#"
storage_prefix: "MZ_"
exit_routes: ["/", "/feed"]
exit_prompt_duration_ms: 1500
"#,
        )?;

        let config = ClientConfig::load_config(Some(config_file), None)?;

        assert_eq!(config.storage_prefix, "MZ_");
        assert_eq!(config.exit_routes, vec!["/", "/feed"]);
        assert_eq!(config.exit_prompt_duration_ms, 1500);
        assert_eq!(config.log_level, "info");
        Ok(())
    }

    #[test]
    #[serial]
    fn test_load_config_from_json_file() -> Result<(), Box<dyn std::error::Error>> {
        cleanup_env_vars();
        let temp_dir = TempDir::new()?;
        let config_file = temp_dir.path().join("client.json");
        fs::write(&config_file, r#"{"log_level": "trace"}"#)?;

        let config = ClientConfig::load_config(Some(config_file), None)?;

        assert_eq!(config.log_level, "trace");
        assert_eq!(config.storage_prefix, DEFAULT_STORAGE_PREFIX);
        Ok(())
    }

    #[test]
    fn test_unsupported_format() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("client.toml");
        fs::write(&config_file, "storage_prefix = 'X'").unwrap();

        let result = ClientConfig::load_config(Some(config_file), None);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ClientConfig::load_config(Some(PathBuf::from("/nonexistent/client.yaml")), None);
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_validate_rejects_relative_routes() {
        let config = ClientConfig {
            exit_routes: vec!["deployment".to_string()],
            ..ClientConfig::with_defaults()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("exit_routes"));
    }

    #[test]
    fn test_validate_rejects_empty_prefix() {
        let config = ClientConfig {
            storage_prefix: String::new(),
            ..ClientConfig::with_defaults()
        };
        assert!(config.validate().is_err());
    }
}
