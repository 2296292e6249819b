//! Core `Config` struct and its persistence.
//!
//! Covers:
//! - `load` / `save` (YAML file I/O with atomic write)
//! - XDG-style path helpers (`config_path`, `config_dir`)
//! - `validate` for values the rest of the application relies on

use crate::error::ConfigError;
use crate::types::LogLevel;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration.
///
/// Every field carries a serde default so that config files written by older
/// versions (or edited by hand) keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the protein explorer backend, without a trailing slash.
    #[serde(default = "crate::defaults::api_base_url")]
    pub api_base_url: String,

    /// Global timeout applied to every backend request.
    #[serde(default = "crate::defaults::request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on a single response body.
    #[serde(default = "crate::defaults::max_response_bytes")]
    pub max_response_bytes: u64,

    /// Prefix of generated tab names ("Search 1", "Search 2", ...).
    #[serde(default = "crate::defaults::tab_name_prefix")]
    pub tab_name_prefix: String,

    /// Ask before deleting a search tab.
    #[serde(default = "crate::defaults::bool_true")]
    pub confirm_tab_delete: bool,

    /// Verbosity of the debug log file.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Chat messages containing any of these phrases are answered locally.
    #[serde(default = "crate::defaults::identity_questions")]
    pub identity_questions: Vec<String>,

    /// Local answer for identity questions.
    #[serde(default = "crate::defaults::identity_response")]
    pub identity_response: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: crate::defaults::api_base_url(),
            request_timeout_secs: crate::defaults::request_timeout_secs(),
            max_response_bytes: crate::defaults::max_response_bytes(),
            tab_name_prefix: crate::defaults::tab_name_prefix(),
            confirm_tab_delete: crate::defaults::bool_true(),
            log_level: LogLevel::default(),
            identity_questions: crate::defaults::identity_questions(),
            identity_response: crate::defaults::identity_response(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            log::info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            if let Err(e) = config.save() {
                log::error!("Failed to save default config: {}", e);
                return Err(e);
            }
            Ok(config)
        }
    }

    /// Load and validate configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path).map_err(ConfigError::from)?;
        let config: Config = serde_yaml_ng::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(ConfigError::from)?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::from)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(ConfigError::from)?;
        fs::rename(&temp_path, path).map_err(ConfigError::from)?;

        Ok(())
    }

    /// Check the values other components depend on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.api_base_url).map_err(|e| {
            ConfigError::Validation(format!(
                "api_base_url '{}' is not a valid URL: {}",
                self.api_base_url, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "api_base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.tab_name_prefix.trim().is_empty() {
            return Err(ConfigError::Validation(
                "tab_name_prefix must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    /// The base URL with any trailing slash removed.
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("protein-explorer")
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("protein-explorer")
            } else {
                PathBuf::from(".")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api_base(), "http://localhost:5000/api");
        assert_eq!(config.identity_questions.len(), 5);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let config = Config {
            api_base_url: "https://proteins.example.org/api/".to_string(),
            confirm_tab_delete: false,
            log_level: LogLevel::Debug,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.api_base(), "https://proteins.example.org/api");
        assert!(!path.with_extension("yaml.tmp").exists());
    }

    #[test]
    fn partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "tab_name_prefix: Query\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.tab_name_prefix, "Query");
        assert_eq!(loaded.request_timeout_secs, 30);
        assert!(loaded.confirm_tab_delete);
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "request_timeout_secs: [not, a, number]\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let bad_scheme = Config {
            api_base_url: "ftp://example.org".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            bad_scheme.validate(),
            Err(ConfigError::Validation(_))
        ));

        let zero_timeout = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert!(zero_timeout.validate().is_err());

        let blank_prefix = Config {
            tab_name_prefix: "  ".to_string(),
            ..Config::default()
        };
        assert!(blank_prefix.validate().is_err());
    }
}
