//! Configuration loading and validation.

use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{ServiceConfig, MIN_HEADER_BYTES};

/// Error raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ServiceConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Semantic checks beyond what serde enforces.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server
            .listen_address
            .parse::<SocketAddr>()
            .map_err(|_| {
                ConfigError::Invalid(format!(
                    "listen address is not a valid socket address: {}",
                    self.server.listen_address
                ))
            })?;

        if self.server.max_header_bytes < MIN_HEADER_BYTES {
            return Err(ConfigError::Invalid(format!(
                "max_header_bytes must be at least {MIN_HEADER_BYTES}, got {}",
                self.server.max_header_bytes
            )));
        }

        if let Some(registry) = &self.registry {
            if registry.url.is_empty() {
                return Err(ConfigError::Invalid(
                    "registry url must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunMode;

    #[test]
    fn parses_full_config() {
        let config = ServiceConfig::from_toml_str(
            r#"
            [server]
            listen_address = "127.0.0.1:9100"
            mode = "debug"

            [registry]
            url = "http://registry.internal/api/endpoints"
            username = "svc"
            password = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.listen_address, "127.0.0.1:9100");
        assert_eq!(config.server.mode, RunMode::Debug);
        let registry = config.registry.unwrap();
        assert_eq!(registry.username, "svc");
    }

    #[test]
    fn empty_config_falls_back_to_defaults() {
        let config = ServiceConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.listen_address, "0.0.0.0:8080");
        assert!(config.registry.is_none());
    }

    #[test]
    fn rejects_bad_listen_address() {
        let err = ServiceConfig::from_toml_str(
            r#"
            [server]
            listen_address = "not-an-address"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_undersized_header_cap() {
        let err = ServiceConfig::from_toml_str(
            r#"
            [server]
            max_header_bytes = 1024
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_registry_without_url() {
        let err = ServiceConfig::from_toml_str(
            r#"
            [registry]
            username = "svc"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
