//! Configuration management for txweb
//!
//! This module handles loading, validation, and management of
//! txweb configuration from YAML files. Every section has defaults,
//! so an empty file (or no file at all) yields a working configuration.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use error::{ConfigError, ConfigResult};

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// REST backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the transaction resource
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Page size requested when listing, large enough to cover the whole dataset
    #[serde(default = "default_list_page_size")]
    pub list_page_size: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            list_page_size: default_list_page_size(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api/v1/transactions".to_string()
}

fn default_list_page_size() -> usize {
    10000
}

/// Table pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Rows per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Choices offered by the page-size control
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            page_size_options: default_page_size_options(),
        }
    }
}

fn default_page_size() -> usize {
    10
}

fn default_page_size_options() -> Vec<usize> {
    vec![10, 20, 50, 100]
}

/// Number and text display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Symbol printed before amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Remarks longer than this are truncated in the table
    #[serde(default = "default_remarks_max_chars")]
    pub remarks_max_chars: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            decimal_places: default_decimal_places(),
            remarks_max_chars: default_remarks_max_chars(),
        }
    }
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_remarks_max_chars() -> usize {
    40
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Backend settings
    #[serde(default)]
    pub backend: BackendConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError { message: e.to_string() })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        // An empty document deserializes to unit, not to a mapping
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content)
                .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        let base_url = self.backend.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "backend.base_url".to_string(),
                reason: "Base URL must start with http:// or https://".to_string(),
            });
        }

        if self.backend.list_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "backend.list_page_size".to_string(),
                reason: "List page size must be greater than 0".to_string(),
            });
        }

        if self.pagination.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.page_size".to_string(),
                reason: "Page size must be greater than 0".to_string(),
            });
        }

        if self.display.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "display.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Page-size choices, always including the configured default
    pub fn page_size_options(&self) -> Vec<usize> {
        let mut options: Vec<usize> = self.pagination.page_size_options
            .iter()
            .copied()
            .filter(|&n| n > 0)
            .collect();
        if !options.contains(&self.pagination.page_size) {
            options.push(self.pagination.page_size);
        }
        options.sort_unstable();
        options.dedup();
        options
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.backend.base_url, "http://localhost:8080/api/v1/transactions");
        assert_eq!(config.pagination.page_size, 10);
        assert_eq!(config.display.currency_symbol, "$");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_template_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.pagination.page_size_options, vec![10, 20, 50, 100]);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_partial_document() {
        let config = Config::from_yaml("backend:\n  base_url: \"https://tx.example.com/api/v1/transactions\"\n").unwrap();
        assert_eq!(config.backend.base_url, "https://tx.example.com/api/v1/transactions");
        assert_eq!(config.backend.list_page_size, 10000);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("server: [unclosed").unwrap_err();
        assert_eq!(err.code(), error::ConfigErrorCode::InvalidYaml);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let err = Config::from_yaml("server:\n  port: 0\n").unwrap_err();
        match err {
            ConfigError::InvalidValue { field, .. } => assert_eq!(field, "server.port"),
            other => panic!("unexpected error: {:?}", other),
        }

        let err = Config::from_yaml("backend:\n  base_url: \"localhost:8080\"\n").unwrap_err();
        assert!(err.to_string().contains("backend.base_url"));

        let err = Config::from_yaml("pagination:\n  page_size: 0\n").unwrap_err();
        assert!(err.to_string().contains("pagination.page_size"));

        let err = Config::from_yaml("display:\n  decimal_places: 11\n").unwrap_err();
        assert!(err.to_string().contains("display.decimal_places"));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here/config.yaml")).unwrap_err();
        assert_eq!(err.code(), error::ConfigErrorCode::FileNotFound);
        assert!(!err.to_details().suggestions.is_empty());
    }

    #[test]
    fn test_page_size_options_include_default() {
        let config = Config::from_yaml("pagination:\n  page_size: 15\n  page_size_options: [50, 10, 0, 10]\n").unwrap();
        assert_eq!(config.page_size_options(), vec![10, 15, 50]);
    }

    #[test]
    fn test_error_details_display() {
        let err = ConfigError::InvalidValue {
            field: "server.port".to_string(),
            reason: "Port must be greater than 0".to_string(),
        };
        let text = err.to_details().to_string();
        assert!(text.starts_with("[INVALID_VALUE]"));
        assert!(text.contains("Field: server.port"));
    }
}
