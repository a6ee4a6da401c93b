//! TOML-based configuration for the client application.
//!
//! The file is optional.  Every field has a default, so a partial file (or
//! none at all) still yields a complete [`ClientConfig`]:
//!
//! ```toml
//! [client]
//! id = 3
//! server_address = "server:12345"
//! data_file = "/data/agency-3.csv"
//! log_level = "debug"
//!
//! [batch]
//! max_bytes = 8192
//! max_amount = 255
//! ```
//!
//! Command-line flags and `CLI_*` environment variables override whatever is
//! read here; see `main.rs`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
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
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default)]
    pub client: ClientSection,
    #[serde(default)]
    pub batch: BatchSection,
}

/// Identity, server, and input file settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientSection {
    /// Agency id of this client.
    #[serde(default = "default_agency")]
    pub id: u8,
    /// `host:port` of the lottery server.
    #[serde(default = "default_server_address")]
    pub server_address: String,
    /// Bets file.  When absent, `agency-{id}.csv` in the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Batch size limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchSection {
    /// Maximum size in bytes of one bet-batch frame, header included.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
    /// Maximum number of bets in one batch.
    #[serde(default = "default_max_amount")]
    pub max_amount: usize,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_agency() -> u8 {
    1
}
fn default_server_address() -> String {
    "127.0.0.1:12345".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_max_bytes() -> usize {
    8192
}
fn default_max_amount() -> usize {
    255
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            id: default_agency(),
            server_address: default_server_address(),
            data_file: None,
            log_level: default_log_level(),
        }
    }
}

impl Default for BatchSection {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            max_amount: default_max_amount(),
        }
    }
}

/// Default bets file name for `agency`.
pub fn default_data_file(agency: u8) -> PathBuf {
    PathBuf::from(format!("agency-{agency}.csv"))
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses a config from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed or a value has the
/// wrong type.
pub fn parse_config(content: &str) -> Result<ClientConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Loads the config file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read (including when it
/// does not exist) and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
