//! Settings the frontend passes in when creating the reader

use serde::{Deserialize, Serialize};

#[cfg(debug_assertions)]
const DEFAULT_LOG_FILTER: &str = "simple_nfc=debug,simple_nfc_ndef=debug";

#[cfg(not(debug_assertions))]
const DEFAULT_LOG_FILTER: &str = "simple_nfc=info,simple_nfc_ndef=info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    /// `tracing` filter directives, `RUST_LOG` takes precedence when set
    pub log_filter: String,

    /// Show a notification for every decoded tag
    pub show_notifications: bool,

    /// Ask the user to switch NFC on when activating while it is off
    pub prompt_when_disabled: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            show_notifications: true,
            prompt_when_disabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum ConfigError {
    #[error("invalid reader config: {0}")]
    Invalid(String),
}

impl ReaderConfig {
    /// Parse a JSON document, missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|error| ConfigError::Invalid(error.to_string()))
    }
}

#[uniffi::export]
fn default_reader_config() -> ReaderConfig {
    ReaderConfig::default()
}

#[uniffi::export]
fn reader_config_from_json(json: String) -> Result<ReaderConfig, ConfigError> {
    ReaderConfig::from_json(&json)
}
