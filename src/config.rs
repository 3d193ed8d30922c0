// src/config.rs
// =============================================================================
// Optional TOML configuration.
//
// Example linksmith.toml:
//
//   auto_populate_params = true
//   replace_strategy = "position"
//   fetch_timeout_secs = 20
//
//   [deep_link]
//   utm_source = "newsletter"
//   utm_medium = "email"
//
// Every key is optional. A missing file just means the defaults.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::links::{DeepLinkParams, ReplaceStrategy};

pub const DEFAULT_CONFIG_FILE: &str = "linksmith.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed the deep-link parameters from the first link that already has a block
    pub auto_populate_params: bool,
    pub replace_strategy: ReplaceStrategy,
    pub fetch_timeout_secs: u64,
    /// Starting values for the deep-link parameters
    pub deep_link: DeepLinkParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_populate_params: true,
            replace_strategy: ReplaceStrategy::default(),
            fetch_timeout_secs: 10,
            deep_link: DeepLinkParams::default(),
        }
    }
}

impl Settings {
    /// Loads settings from `config_path`. `Ok(None)` if the file does not exist.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let settings =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(settings))
    }

    /// Loads from an explicit path, or from ./linksmith.toml, or falls back to
    /// defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Ok(Self::load_from_path(path)?.unwrap_or_default())
    }
}
