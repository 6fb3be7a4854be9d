//! Configuration management for inventoryweb
//!
//! This module handles loading, validation, and management of
//! inventoryweb configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};

/// Placeholder endpoint shipped with the default configuration
pub const PLACEHOLDER_ENDPOINT: &str = "https://<api-id>.execute-api.<region>.amazonaws.com/<stage>";

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
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Inventory endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Fixed URL queried on every activation
    #[serde(default = "default_endpoint_url")]
    pub url: String,
    /// Request timeout in seconds, 0 disables the timeout
    #[serde(default)]
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_endpoint_url(),
            timeout_secs: 0,
        }
    }
}

fn default_endpoint_url() -> String {
    PLACEHOLDER_ENDPOINT.to_string()
}

/// Dashboard page settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Page title
    #[serde(default = "default_title")]
    pub title: String,
    /// Label of the trigger button
    #[serde(default = "default_button_label")]
    pub button_label: String,
    /// How often the page re-requests the view while a request is in flight
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            button_label: default_button_label(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_title() -> String {
    "AWS Inventory Dashboard".to_string()
}

fn default_button_label() -> String {
    "Call Lambda API".to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

/// Currency formatting for cost totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Symbol placed before the amount
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimal_places: default_decimal_places(),
        }
    }
}

fn default_symbol() -> String {
    "$".to_string()
}

fn default_decimal_places() -> u32 {
    2
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
    /// Inventory endpoint settings
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// Dashboard page settings
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError,
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;

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

        let url = self.endpoint.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "endpoint.url".to_string(),
                reason: "Endpoint URL must start with http:// or https://".to_string(),
            });
        }

        if self.dashboard.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.poll_interval_ms".to_string(),
                reason: "Poll interval must be greater than 0".to_string(),
            });
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Whether the endpoint still points at the shipped placeholder
    pub fn is_placeholder_endpoint(&self) -> bool {
        self.endpoint.url.contains("<api-id>")
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Default config path used by the CLI
    pub fn default_path() -> PathBuf {
        PathBuf::from("config.yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use error::ConfigErrorCode;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.currency.symbol, "$");
        assert_eq!(config.currency.decimal_places, 2);
        assert_eq!(config.endpoint.timeout_secs, 0);
        assert!(config.is_placeholder_endpoint());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bundled_template_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.dashboard.title, "AWS Inventory Dashboard");
        assert_eq!(config.dashboard.button_label, "Call Lambda API");
        assert_eq!(config.bind_address(), "0.0.0.0:8081");
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = Config::from_yaml("endpoint:\n  url: http://localhost:9000/inventory\n").unwrap();
        assert_eq!(config.endpoint.url, "http://localhost:9000/inventory");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.dashboard.poll_interval_ms, 500);
        assert!(!config.is_placeholder_endpoint());
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let err = Config::from_yaml("endpoint:\n  url: ftp://example.com\n").unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::InvalidValue);
        assert!(err.to_string().contains("endpoint.url"));
    }

    #[test]
    fn test_rejects_zero_port() {
        let err = Config::from_yaml("server:\n  port: 0\n").unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::InvalidValue);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("server: [unclosed").unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::InvalidYaml);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("/nonexistent/inventoryweb/config.yaml").unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::FileNotFound);
    }

    #[test]
    fn test_errors_propagate_through_config_result() {
        fn load_port(yaml: &str) -> ConfigResult<u16> {
            Ok(Config::from_yaml(yaml)?.server.port)
        }
        assert_eq!(load_port("server:\n  port: 9090\n").unwrap(), 9090);
        assert_eq!(
            load_port("server:\n  port: 0\n").unwrap_err().code(),
            ConfigErrorCode::InvalidValue
        );
    }
}
