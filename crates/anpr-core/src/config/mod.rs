//! Configuration types for the ANPR console.
//!
//! Configuration is loaded from a single YAML file (`anpr.yaml` by default).
//! Every section has defaults, so an empty file or no file at all yields a
//! usable configuration pointing at a local backend.
//!
//! # Lookup order
//!
//! 1. An explicit path (the CLI `--config` flag)
//! 2. The `ANPR_CONFIG` environment variable
//! 3. `anpr.yaml` in the working directory, if present
//! 4. Built-in defaults
//!
//! The backend base URL can always be overridden with `ANPR_API_URL`.

pub mod api;
pub mod filters;

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use api::ApiConfig;
pub use filters::{FilterLimits, FilterScope};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "ANPR_CONFIG";

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "ANPR_API_URL";

/// Default configuration file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "anpr.yaml";

/// Largest page size the backend accepts.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Complete console configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnprConfig {
    /// REST backend settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Local persistent storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Date-range limits for filters.
    #[serde(default)]
    pub filters: FilterLimits,

    /// Listing defaults.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Where session tokens and preferences are persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `storage.json`.
    #[serde(default = "default_storage_dir")]
    pub directory: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: default_storage_dir(),
        }
    }
}

impl StorageConfig {
    /// Path of the storage file inside the configured directory.
    pub fn file_path(&self) -> PathBuf {
        self.directory.join("storage.json")
    }
}

/// Listing defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Rows requested per page for paginated listings.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".anpr")
}

fn default_page_size() -> u32 {
    50
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnprConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content without validating it.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Resolve the configuration following the documented lookup order,
    /// apply environment overrides, then validate.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match Self::resolve_path(explicit) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading configuration");
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        config.with_api_url(env::var(API_URL_ENV).ok())
    }

    /// Apply an `ANPR_API_URL` value and validate the result.
    fn with_api_url(mut self, url: Option<String>) -> Result<Self, ConfigError> {
        if let Some(url) = url
            && !url.trim().is_empty()
        {
            self.api.base_url = url.trim().to_string();
        }
        self.validate()?;
        Ok(self)
    }

    fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = env::var(CONFIG_ENV)
            && !path.is_empty()
        {
            return Some(PathBuf::from(path));
        }
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        local.exists().then_some(local)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Config("api.base_url must not be empty".to_string()));
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(ConfigError::Config(format!(
                "api.base_url must start with http:// or https:// (got '{}')",
                self.api.base_url
            )));
        }
        if self.filters.dashboard_max_days == 0 || self.filters.report_max_days == 0 {
            return Err(ConfigError::Config(
                "filter limits must be at least one day".to_string(),
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.display.page_size) {
            return Err(ConfigError::Config(format!(
                "display.page_size must be between 1 and {MAX_PAGE_SIZE} (got {})",
                self.display.page_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = AnprConfig::from_yaml("").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.filters.dashboard_max_days, 30);
        assert_eq!(config.filters.report_max_days, 90);
        assert_eq!(config.display.page_size, 50);
        assert!(config.api.timeout_secs.is_none());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = r#"
api:
  base_url: https://anpr.example.com/api
  timeout_secs: 15
filters:
  report_max_days: 60
"#;
        let config = AnprConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.api.base_url, "https://anpr.example.com/api");
        assert_eq!(config.api.timeout_secs, Some(15));
        assert_eq!(config.filters.dashboard_max_days, 30);
        assert_eq!(config.filters.report_max_days, 60);
    }

    #[test]
    fn rejects_non_http_base_url() {
        let config = AnprConfig::from_yaml("api:\n  base_url: ftp://nope\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Config(_)));
    }

    #[test]
    fn rejects_zero_limits() {
        let config = AnprConfig::from_yaml("filters:\n  dashboard_max_days: 0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("at least one day"));
    }

    #[test]
    fn page_size_is_bounded() {
        let config = AnprConfig::from_yaml("display:\n  page_size: 1000\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("between 1 and 500"));

        let config = AnprConfig::from_yaml("display:\n  page_size: 0\n").unwrap();
        assert!(config.validate().is_err());

        let config = AnprConfig::from_yaml("display:\n  page_size: 500\n").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn api_url_override_is_applied_before_validation() {
        let config = AnprConfig::from_yaml("api:\n  base_url: not-a-url\n").unwrap();
        let config = config
            .with_api_url(Some(" https://anpr.example.com ".to_string()))
            .unwrap();
        assert_eq!(config.api.base_url, "https://anpr.example.com");

        let config = AnprConfig::from_yaml("api:\n  base_url: not-a-url\n").unwrap();
        assert!(config.clone().with_api_url(None).is_err());
        assert!(config.with_api_url(Some("  ".to_string())).is_err());
    }

    #[test]
    fn load_validates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "display:\n  page_size: 1000\n").unwrap();
        assert!(AnprConfig::from_file(&path).is_ok());
        assert!(AnprConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn loads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        fs::write(&path, "storage:\n  directory: /tmp/anpr-test\n").unwrap();

        let config = AnprConfig::from_file(&path).unwrap();
        assert_eq!(
            config.storage.file_path(),
            PathBuf::from("/tmp/anpr-test/storage.json")
        );
    }
}
