//! Configuration file
//!
//! A single JSON object. Every field is optional; absent fields take the
//! defaults below. An absent `data_dir` selects the in-memory store.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use super::errors::{CliError, CliResult};
use crate::api::PageLimits;
use crate::http_server::HttpServerConfig;
use crate::observability::LogFormat;
use crate::schema::ValidationOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory for record files. Absent: records live in memory only.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// `EnvFilter` directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default = "default_page_limit")]
    pub default_page_limit: usize,

    #[serde(default = "default_max_page_limit")]
    pub max_page_limit: usize,

    #[serde(default)]
    pub reject_unknown_fields: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_page_limit() -> usize {
    10
}
fn default_max_page_limit() -> usize {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            default_page_limit: default_page_limit(),
            max_page_limit: default_max_page_limit(),
            reject_unknown_fields: false,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("failed to read config {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.host.trim().is_empty() {
            return Err(CliError::config_error("host must not be empty"));
        }

        if self.port == 0 {
            return Err(CliError::config_error("port must be > 0"));
        }

        if self.default_page_limit == 0 {
            return Err(CliError::config_error("default_page_limit must be > 0"));
        }

        if self.max_page_limit < self.default_page_limit {
            return Err(CliError::config_error(format!(
                "max_page_limit ({}) must not be below default_page_limit ({})",
                self.max_page_limit, self.default_page_limit
            )));
        }

        if let Err(e) = EnvFilter::try_new(&self.log_level) {
            return Err(CliError::config_error(format!(
                "invalid log_level '{}': {}",
                self.log_level, e
            )));
        }

        if matches!(&self.data_dir, Some(dir) if dir.as_os_str().is_empty()) {
            return Err(CliError::config_error("data_dir must not be empty when set"));
        }

        Ok(())
    }

    /// Server settings, with an optional port override from the command line.
    pub fn http_config(&self, port: Option<u16>) -> HttpServerConfig {
        HttpServerConfig {
            host: self.host.clone(),
            port: port.unwrap_or(self.port),
            cors_origins: self.cors_origins.clone(),
        }
    }

    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_limit: self.default_page_limit,
            max_limit: self.max_page_limit,
        }
    }

    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            reject_unknown_fields: self.reject_unknown_fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_takes_defaults() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.data_dir, None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"{
                "data_dir": "/var/lib/leadschema",
                "host": "127.0.0.1",
                "port": 9000,
                "cors_origins": ["http://localhost:5173"],
                "log_level": "leadschema=debug",
                "log_format": "pretty",
                "default_page_limit": 25,
                "max_page_limit": 50,
                "reject_unknown_fields": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/leadschema")));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.page_limits().default_limit, 25);
        assert!(config.validation_options().reject_unknown_fields);

        let http = config.http_config(None);
        assert_eq!(http.socket_addr(), "127.0.0.1:9000");
        assert_eq!(config.http_config(Some(7000)).port, 7000);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for content in [
            r#"{"port": 0}"#,
            r#"{"host": " "}"#,
            r#"{"default_page_limit": 0}"#,
            r#"{"default_page_limit": 20, "max_page_limit": 5}"#,
            r#"{"log_format": "xml"}"#,
            r#"{"data_dir": ""}"#,
            "not json",
        ] {
            let err = Config::parse(content).unwrap_err();
            assert_eq!(err.code_str(), "CLI_CONFIG_ERROR", "{}", content);
        }
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/leadschema.json")).unwrap_err();
        assert_eq!(err.code_str(), "CLI_CONFIG_ERROR");
        assert!(err.message().contains("failed to read config"));
    }
}
