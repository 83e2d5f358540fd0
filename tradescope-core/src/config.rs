//! Report view configuration, stored as TOML.
//!
//! ```toml
//! [services]
//! accounts_url = "http://localhost:18088"
//! reference_data_url = "http://localhost:18085"
//! prices_url = "http://localhost:18090"
//! timeout_secs = 10
//!
//! [selection]
//! default_account_index = 5
//!
//! [feed]
//! source = "report-view"
//! ```
//!
//! Every section and field is optional; missing values take the defaults above.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directory position of the account selected at startup.
pub const DEFAULT_ACCOUNT_INDEX: usize = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub services: ServicesConfig,
    pub selection: SelectionConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub accounts_url: String,
    pub reference_data_url: String,
    pub prices_url: String,
    pub timeout_secs: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            accounts_url: "http://localhost:18088".into(),
            reference_data_url: "http://localhost:18085".into(),
            prices_url: "http://localhost:18090".into(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub default_account_index: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            default_account_index: DEFAULT_ACCOUNT_INDEX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Sender id stamped on every published message.
    pub source: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: "report-view".into(),
        }
    }
}

impl ReportConfig {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
