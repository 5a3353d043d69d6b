//! Configuration management.

mod file_config;

pub use file_config::{ConfigFile, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the configuration file looked up by [`find_config_file`]
pub const CONFIG_FILE_NAME: &str = "scholar-discovery.toml";

/// Prefix for environment variable overrides, e.g. `SCHOLAR_DISCOVERY_SEARCH__PAGE_SIZE`
pub const ENV_PREFIX: &str = "SCHOLAR_DISCOVERY";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Simulated catalog service settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Search page settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Session storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Simulated catalog service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL reported in request logs
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Lower bound of the simulated response delay
    #[serde(default = "default_min_latency")]
    pub min_latency_ms: u64,

    /// Upper bound (exclusive) of the simulated response delay
    #[serde(default = "default_max_latency")]
    pub max_latency_ms: u64,

    /// Probability in `[0, 1]` that a request fails
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            min_latency_ms: default_min_latency(),
            max_latency_ms: default_max_latency(),
            failure_rate: default_failure_rate(),
        }
    }
}

impl CatalogConfig {
    /// Settings with no delay and no injected failures
    pub fn instant() -> Self {
        Self {
            min_latency_ms: 0,
            max_latency_ms: 0,
            failure_rate: 0.0,
            ..Self::default()
        }
    }
}

fn default_base_url() -> String {
    "https://api.discovery-ui.com".to_string()
}

fn default_min_latency() -> u64 {
    200
}

fn default_max_latency() -> u64 {
    800
}

fn default_failure_rate() -> f64 {
    0.05
}

/// Search page configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Results shown per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Maximum number of typeahead suggestions
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Quiet period before a suggestion fetch is issued
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            suggestion_limit: default_suggestion_limit(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn default_page_size() -> usize {
    10
}

fn default_suggestion_limit() -> usize {
    5
}

fn default_debounce_ms() -> u64 {
    300
}

/// Session storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file backing the session key/value store
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            session_file: default_session_file(),
        }
    }
}

/// Default session file under the user config directory
pub fn default_session_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scholar-discovery")
        .join("session.json")
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `"json"` for structured output, anything else for plain text
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|format| format.eq_ignore_ascii_case("json"))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

/// Load configuration from a file, with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(env_source())
        .build()?;

    settings.try_deserialize()
}

/// Get the configuration from environment variables or defaults
pub fn get_config() -> Config {
    let settings = config::Config::builder()
        .add_source(env_source())
        .build()
        .and_then(|settings| settings.try_deserialize::<Config>());

    match settings {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring invalid environment configuration: {}", e);
            Config::default()
        }
    }
}

/// Look for a config file in the working directory, then the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("scholar-discovery").join("config.toml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog.min_latency_ms, 200);
        assert_eq!(config.catalog.max_latency_ms, 800);
        assert_eq!(config.catalog.failure_rate, 0.05);
        assert_eq!(config.search.page_size, 10);
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
        assert!(config.storage.session_file.ends_with("session.json"));
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_load_config_fills_missing_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[search]\npage_size = 2\n\n[logging]\nformat = \"JSON\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.search.page_size, 2);
        assert_eq!(config.search.suggestion_limit, 5);
        assert_eq!(config.catalog, CatalogConfig::default());
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_instant_catalog_config() {
        let catalog = CatalogConfig::instant();
        assert_eq!(catalog.max_latency_ms, 0);
        assert_eq!(catalog.failure_rate, 0.0);
        assert_eq!(catalog.base_url, default_base_url());
    }
}
