//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Environment variables and command-line arguments (API key only)

use crate::error::{Error, Result};
use fairway_core::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upstream connection, retry and identifier settings
    pub api: ClientConfig,

    /// Output settings
    pub output: OutputConfig,
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON results even without `--pretty`
    pub pretty: bool,
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Skipping unreadable config file");
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Default configuration file paths, in lookup order
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".fairway.yaml"),
            PathBuf::from(".fairway.json"),
            PathBuf::from("fairway.yaml"),
            PathBuf::from("fairway.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let fairway_dir = config_dir.join("fairway");
            paths.push(fairway_dir.join("config.yaml"));
            paths.push(fairway_dir.join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".fairway.yaml"));
            paths.push(home_dir.join(".fairway.json"));
        }

        paths
    }

    /// Where `config init` writes when no path is given
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fairway").join("config.yaml"))
    }

    /// Let a key from the command line or environment override the file
    pub fn apply_api_key(&mut self, api_key: Option<&str>) {
        if let Some(key) = api_key.map(str::trim).filter(|key| !key.is_empty()) {
            self.api.api_key = key.to_string();
        }
    }

    /// The client configuration, checked before any connection is made
    pub fn client_config(&self) -> Result<ClientConfig> {
        if self.api.api_key.trim().is_empty() {
            return Err(Error::ApiKeyMissing);
        }
        self.api.validate()?;
        Ok(self.api.clone())
    }

    /// A copy safe to print
    pub fn redacted(&self) -> Self {
        let mut shown = self.clone();
        if !shown.api.api_key.is_empty() {
            shown.api.api_key = "***".to_string();
        }
        shown
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairway_core::DEFAULT_BASE_URL;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_file_with_partial_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fairway.yaml");
        std::fs::write(
            &path,
            "api:\n  api_key: from-file\n  retry:\n    max_attempts: 5\noutput:\n  pretty: true\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.api.api_key, "from-file");
        assert_eq!(config.api.retry.max_attempts, 5);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fairway.json");
        std::fs::write(&path, r#"{"api": {"base_url": "https://staging.example.test/api_v2"}}"#).unwrap();

        let config = Config::load_with_file(Some(&path)).unwrap();
        assert_eq!(config.api.base_url, "https://staging.example.test/api_v2");
        assert!(config.api.api_key.is_empty());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = Config::from_file(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_api_key_override() {
        let mut config = Config::default();
        config.api.api_key = "from-file".to_string();

        config.apply_api_key(Some("  "));
        assert_eq!(config.api.api_key, "from-file");

        config.apply_api_key(Some("from-env"));
        assert_eq!(config.api.api_key, "from-env");
    }

    #[test]
    fn test_missing_key_fails_before_connecting() {
        let err = Config::default().client_config().unwrap_err();
        assert!(matches!(err, Error::ApiKeyMissing));
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn test_redacted_and_saved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.apply_api_key(Some("secret-key"));
        config.redacted().save(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("secret-key"));
        assert!(written.contains("***"));

        let reloaded = Config::from_file(&path).unwrap();
        assert_eq!(reloaded.api.base_url, config.api.base_url);
    }
}
