//! Configuration file support for scholar-discovery.
//!
//! This module provides TOML configuration file reading and writing. Values
//! not present in the file fall back to their defaults.
//!
//! # Configuration File Format
//!
//! ```toml
//! [catalog]
//! base_url = "https://api.discovery-ui.com"
//! min_latency_ms = 200
//! max_latency_ms = 800
//! failure_rate = 0.05
//!
//! [search]
//! page_size = 10
//! suggestion_limit = 5
//! debounce_ms = 300
//!
//! [storage]
//! session_file = "~/.config/scholar-discovery/session.json"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{CatalogConfig, Config, LoggingConfig, SearchConfig, StorageConfig};

/// Configuration file structure
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        Config {
            catalog: file.catalog,
            search: file.search,
            storage: file.storage,
            logging: file.logging,
        }
    }
}

impl From<&Config> for ConfigFile {
    fn from(config: &Config) -> Self {
        ConfigFile {
            catalog: config.catalog.clone(),
            search: config.search.clone(),
            storage: config.storage.clone(),
            logging: config.logging.clone(),
        }
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
