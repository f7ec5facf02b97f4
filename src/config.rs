//! Configuration module for cloudfs.

use serde::Deserialize;
use std::path::Path;

use crate::datetime::is_valid_timezone;
use crate::{CloudFsError, Result};

/// Environment variable that overrides `store.app_name`.
pub const APP_NAME_ENV: &str = "CLOUDFS_APP_NAME";

/// Remote store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Application display name; titles the documents folder.
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Backing directory for the local-directory store.
    #[serde(default = "default_root_path")]
    pub root_path: String,
}

fn default_app_name() -> String {
    "CloudFs".to_string()
}

fn default_root_path() -> String {
    "data/remote".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            root_path: default_root_path(),
        }
    }
}

/// Listing display configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Timezone for `lastModified` (e.g., "Asia/Tokyo", "UTC").
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty disables file logging.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/cloudfs.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| CloudFsError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides.
    ///
    /// - `CLOUDFS_APP_NAME`: the host application's display name
    pub fn apply_env_overrides(&mut self) {
        if let Ok(app_name) = std::env::var(APP_NAME_ENV) {
            if !app_name.is_empty() {
                self.store.app_name = app_name;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let app_name = self.store.app_name.trim();
        if app_name.is_empty() {
            return Err(CloudFsError::Config("store.app_name is empty".to_string()));
        }
        if app_name.contains('/') || app_name == "." || app_name == ".." {
            return Err(CloudFsError::Config(format!(
                "store.app_name is not a valid folder title: {:?}",
                self.store.app_name
            )));
        }
        if !is_valid_timezone(&self.display.timezone) {
            return Err(CloudFsError::Config(format!(
                "unknown timezone: {}",
                self.display.timezone
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.store.app_name, "CloudFs");
        assert_eq!(config.store.root_path, "data/remote");
        assert_eq!(config.display.timezone, "UTC");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/cloudfs.log");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[store]
app_name = "Notes"
root_path = "/var/lib/cloudfs"

[display]
timezone = "Asia/Tokyo"

[logging]
level = "debug"
file = ""
"#;
        let config = Config::parse(toml).unwrap();

        assert_eq!(config.store.app_name, "Notes");
        assert_eq!(config.store.root_path, "/var/lib/cloudfs");
        assert_eq!(config.display.timezone, "Asia/Tokyo");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.file.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let config = Config::parse("[store]\napp_name = \"Photos\"\n").unwrap();

        assert_eq!(config.store.app_name, "Photos");
        assert_eq!(config.store.root_path, "data/remote");
        assert_eq!(config.display.timezone, "UTC");
    }

    #[test]
    fn test_parse_invalid_toml() {
        let err = Config::parse("[store\napp_name = 1").unwrap_err();
        assert!(matches!(err, CloudFsError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_bad_app_name() {
        let mut config = Config::default();
        config.store.app_name = "  ".to_string();
        assert!(config.validate().is_err());

        config.store.app_name = "a/b".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_timezone() {
        let mut config = Config::default();
        config.display.timezone = "Nowhere/Special".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/cloudfs.toml").unwrap_err();
        assert!(matches!(err, CloudFsError::Io(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\ntimezone = \"Europe/Paris\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.display.timezone, "Europe/Paris");
    }
}
