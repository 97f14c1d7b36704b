//! TOML-based configuration for the client application.
//!
//! `server_addr` and `name` are required; the remaining fields have defaults
//! and are clamped into their working ranges rather than rejected, so a
//! hand-edited config cannot produce chunk sizes the wire format (u8 chunk
//! counts) or typical MTUs cannot carry.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Widest frame the encoded column-count byte can describe.
pub const MAX_FRAME_WIDTH: u16 = 255;
/// Smallest permitted chunk size.
pub const MIN_CHUNK_SIZE: usize = 128;
/// Largest permitted chunk size.
pub const MAX_CHUNK_SIZE: usize = 1024;

/// Errors from loading or validating the client configuration.
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

    /// A required field was left empty.
    #[error("missing required config field: {0}")]
    MissingField(&'static str),
}

/// Client configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Relay server address, e.g. `"198.1.1.8:6969"`.  Required.
    #[serde(default)]
    pub server_addr: String,
    /// Display name announced to the relay.  Required.
    #[serde(default)]
    pub name: String,
    /// Width of the captured video in characters.  `0` means "maximum";
    /// values of 255 and above clamp to [`MAX_FRAME_WIDTH`].
    #[serde(default)]
    pub width: u16,
    /// Maximum bytes of encoded frame per datagram chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// When true, received frames are not rendered (audio-only mode).
    #[serde(default)]
    pub hide: bool,
}

fn default_chunk_size() -> usize {
    256
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: String::new(),
            name: String::new(),
            width: 0,
            chunk_size: default_chunk_size(),
            hide: false,
        }
    }
}

impl ClientConfig {
    /// Checks required fields and clamps ranged ones.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when `server_addr` or `name`
    /// is empty.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.server_addr.is_empty() {
            return Err(ConfigError::MissingField("server_addr"));
        }
        if self.name.is_empty() {
            return Err(ConfigError::MissingField("name"));
        }

        if self.width == 0 || self.width >= MAX_FRAME_WIDTH {
            self.width = MAX_FRAME_WIDTH;
        }
        self.chunk_size = self.chunk_size.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE);

        Ok(self)
    }
}

/// Loads [`ClientConfig`] from `path`, or returns defaults when no path is
/// given or the file does not exist.  Call [`ClientConfig::validate`] on the
/// result before use.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(ClientConfig::default());
    };

    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ClientConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
