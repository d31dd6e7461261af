//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Duration-valued fields are expressed as `*_secs` integers and exposed
//! through accessors returning [`std::time::Duration`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Write timeout applied in debug mode, generous enough for interactive
/// profiling and debugging tooling.
pub const DEBUG_WRITE_TIMEOUT_SECS: u64 = 120;

/// Smallest header cap hyper's HTTP/1 connection accepts; anything
/// below this would panic inside the serve task.
pub const MIN_HEADER_BYTES: usize = 8192;

/// Deployment mode of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Verbose logging, colored output, extended write timeout.
    Debug,
    /// Production defaults.
    #[default]
    Release,
}

impl RunMode {
    pub fn is_debug(self) -> bool {
        matches!(self, RunMode::Debug)
    }
}

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP listener configuration.
    pub server: ServerConfig,

    /// Discovery registration settings. Absent means the service does
    /// not announce itself.
    pub registry: Option<RegistryConfig>,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub listen_address: String,

    /// Read (header) timeout in seconds.
    pub read_timeout_secs: u64,

    /// Write timeout in seconds. Overridden in debug mode, see
    /// [`ServerConfig::write_timeout`].
    pub write_timeout_secs: u64,

    /// Maximum accepted request header size in bytes.
    pub max_header_bytes: usize,

    /// Deployment mode.
    pub mode: RunMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:8080".to_string(),
            read_timeout_secs: 10,
            write_timeout_secs: 10,
            max_header_bytes: 1 << 20,
            mode: RunMode::Release,
        }
    }
}

impl ServerConfig {
    /// Default configuration bound to the given address.
    pub fn new(listen_address: impl Into<String>, mode: RunMode) -> Self {
        Self {
            listen_address: listen_address.into(),
            mode,
            ..Self::default()
        }
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Effective write timeout. Debug mode pins it to
    /// [`DEBUG_WRITE_TIMEOUT_SECS`] so long-lived debugging requests are
    /// not cut off by the production bound.
    pub fn write_timeout(&self) -> Duration {
        match self.mode {
            RunMode::Debug => Duration::from_secs(DEBUG_WRITE_TIMEOUT_SECS),
            RunMode::Release => Duration::from_secs(self.write_timeout_secs),
        }
    }

    /// Header size cap handed to the connection builder, floored at
    /// [`MIN_HEADER_BYTES`] so an undersized value cannot panic hyper.
    pub fn header_cap_bytes(&self) -> usize {
        self.max_header_bytes.max(MIN_HEADER_BYTES)
    }
}

/// Discovery registration settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registration endpoint URL.
    pub url: String,

    /// Basic-auth username.
    pub username: String,

    /// Basic-auth password.
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_write_timeout_uses_configured_value() {
        let config = ServerConfig::new("127.0.0.1:0", RunMode::Release);
        assert_eq!(config.write_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn debug_write_timeout_is_extended() {
        let config = ServerConfig::new("127.0.0.1:0", RunMode::Debug);
        assert_eq!(config.write_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn debug_override_wins_over_configured_write_timeout() {
        let mut config = ServerConfig::new("127.0.0.1:0", RunMode::Debug);
        config.write_timeout_secs = 30;
        assert_eq!(config.write_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn defaults_match_production_policy() {
        let config = ServerConfig::default();
        assert_eq!(config.read_timeout(), Duration::from_secs(10));
        assert_eq!(config.write_timeout(), Duration::from_secs(10));
        assert_eq!(config.max_header_bytes, 1 << 20);
        assert_eq!(config.mode, RunMode::Release);
    }

    #[test]
    fn undersized_header_cap_is_floored() {
        let mut config = ServerConfig::default();
        config.max_header_bytes = 1024;
        assert_eq!(config.header_cap_bytes(), MIN_HEADER_BYTES);
        config.max_header_bytes = 1 << 20;
        assert_eq!(config.header_cap_bytes(), 1 << 20);
    }

    #[test]
    fn run_mode_deserializes_lowercase() {
        let config: ServerConfig = toml::from_str(r#"mode = "debug""#).unwrap();
        assert!(config.mode.is_debug());
    }
}
