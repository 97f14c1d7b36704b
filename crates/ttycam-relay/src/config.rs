//! TOML-based configuration for the relay server.
//!
//! A missing config file falls back to defaults; malformed TOML or invalid
//! values are fatal at startup.  Fields absent from the file take their
//! `#[serde(default = …)]` values so old config files keep working.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating the relay configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configured port is outside the accepted range.
    #[error("invalid port {0}: must satisfy 1000 <= port < 65535")]
    InvalidPort(u16),

    /// The bind address could not be parsed.
    #[error("invalid bind address {addr:?}: {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Relay server configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelayConfig {
    /// IP address to bind the UDP socket to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// UDP port to listen on.  Accepted range: 1000 (inclusive) to 65535
    /// (exclusive).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Length of one bandwidth reporting interval in seconds.
    #[serde(default = "default_stats_interval_secs")]
    pub stats_interval_secs: u64,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    6969
}
fn default_stats_interval_secs() -> u64 {
    1
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            stats_interval_secs: default_stats_interval_secs(),
        }
    }
}

impl RelayConfig {
    /// Validates field values and resolves the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] or [`ConfigError::InvalidAddress`].
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.port < 1000 || self.port == u16::MAX {
            return Err(ConfigError::InvalidPort(self.port));
        }
        let ip = self
            .bind_address
            .parse()
            .map_err(|source| ConfigError::InvalidAddress {
                addr: self.bind_address.clone(),
                source,
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Loads [`RelayConfig`] from `path`, or returns defaults when no path is
/// given or the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(RelayConfig::default());
    };

    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(RelayConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_listens_on_loopback_6969() {
        let cfg = RelayConfig::default();
        assert_eq!(cfg.bind_address, "127.0.0.1");
        assert_eq!(cfg.port, 6969);
        assert_eq!(cfg.stats_interval_secs, 1);
    }

    #[test]
    fn test_default_config_resolves_socket_addr() {
        let addr = RelayConfig::default().socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:6969");
    }

    #[test]
    fn test_port_below_1000_is_rejected() {
        let cfg = RelayConfig {
            port: 999,
            ..Default::default()
        };
        assert!(matches!(cfg.socket_addr(), Err(ConfigError::InvalidPort(999))));
    }

    #[test]
    fn test_port_65535_is_rejected() {
        let cfg = RelayConfig {
            port: u16::MAX,
            ..Default::default()
        };
        assert!(matches!(cfg.socket_addr(), Err(ConfigError::InvalidPort(_))));
    }

    #[test]
    fn test_port_1000_is_accepted() {
        let cfg = RelayConfig {
            port: 1000,
            ..Default::default()
        };
        assert!(cfg.socket_addr().is_ok());
    }

    #[test]
    fn test_unparseable_bind_address_is_rejected() {
        let cfg = RelayConfig {
            bind_address: "not-an-ip".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            cfg.socket_addr(),
            Err(ConfigError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_load_config_without_path_returns_defaults() {
        let cfg = load_config(None).unwrap();
        assert_eq!(cfg, RelayConfig::default());
    }

    #[test]
    fn test_load_config_missing_file_returns_defaults() {
        let path = Path::new("/nonexistent/ttycam/relay.toml");
        let cfg = load_config(Some(path)).unwrap();
        assert_eq!(cfg, RelayConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        let cfg: RelayConfig = toml::from_str("port = 7777").unwrap();
        assert_eq!(cfg.port, 7777);
        assert_eq!(cfg.bind_address, "127.0.0.1");
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let cfg = RelayConfig {
            bind_address: "0.0.0.0".to_string(),
            port: 7000,
            stats_interval_secs: 5,
        };
        let text = toml::to_string_pretty(&cfg).unwrap();
        let restored: RelayConfig = toml::from_str(&text).unwrap();
        assert_eq!(cfg, restored);
    }
}
