//! Configuration handling for the TUI

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the REST API address
pub const API_URL_ENV: &str = "CADASTRO_API_URL";
/// Environment variable overriding the CEP service address
pub const CEP_URL_ENV: &str = "CADASTRO_CEP_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    /// REST API base address
    pub api_url: Option<String>,
    /// CEP lookup service base address
    pub cep_url: Option<String>,
    /// HTTP request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl TuiConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("br", "cadastro", "cadastro-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Directory the log file is written to
    pub fn log_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Load configuration from file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::config_path() {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                config = serde_json::from_str(&content)?;
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override addresses from `lookup` (the process environment in `load`)
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.is_empty()) {
            self.api_url = Some(url);
        }
        if let Some(url) = lookup(CEP_URL_ENV).filter(|u| !u.is_empty()) {
            self.cep_url = Some(url);
        }
    }

    pub fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .unwrap_or(crate::api::DEFAULT_BASE_URL)
    }

    pub fn cep_url(&self) -> &str {
        self.cep_url
            .as_deref()
            .unwrap_or(crate::cep::DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = TuiConfig::default();
        assert_eq!(config.api_url(), "http://localhost:3333");
        assert_eq!(config.cep_url(), "https://brasilapi.com.br/api");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_file() {
        let json = r#"{"api_url": "http://api.local:8080"}"#;
        let parsed: TuiConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.api_url(), "http://api.local:8080");
        assert_eq!(parsed.cep_url(), "https://brasilapi.com.br/api");
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        let json = r#"{"timeout_secs": 3, "unknown_field": "value"}"#;
        let parsed: TuiConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut config = TuiConfig {
            api_url: Some("http://from-file".to_string()),
            cep_url: Some("http://cep-from-file".to_string()),
            timeout_secs: None,
        };
        config.apply_overrides(|key| match key {
            API_URL_ENV => Some("http://from-env".to_string()),
            CEP_URL_ENV => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.api_url(), "http://from-env");
        assert_eq!(config.cep_url(), "http://cep-from-file");
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = TuiConfig {
            api_url: Some("http://localhost:3333".to_string()),
            timeout_secs: Some(5),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: TuiConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.api_url, config.api_url);
        assert_eq!(parsed.timeout_secs, Some(5));
        assert!(parsed.cep_url.is_none());
    }

    #[test]
    fn test_load_returns_ok() {
        assert!(TuiConfig::load().is_ok());
    }
}
