//! Configuration loading
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [sip]
//! message_lifetime = 32
//!
//! [msrp]
//! message_rate = 30
//! max_logged_body = 4096
//! ```
//!
//! Every section and field is optional and falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use ims_infra_common::LoggingSettings;
use ims_transport_core::MessageContextConfig;

/// Top-level configuration of an [`ImsCore`](crate::ImsCore)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImsConfig {
    pub logging: LoggingSettings,
    pub sip: MessageContextConfig,
    pub msrp: MessageContextConfig,
}

impl ImsConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a `.toml` or `.json` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            Some("toml") | None => Self::from_toml_str(&contents),
            Some(other) => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),
}
