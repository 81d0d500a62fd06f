//! # Runtime Configuration Module
//!
//! Environment and file based configuration for the dispatch layer.
//!
//! ## Environment Variables
//!
//! ### `CORRIDOR_REQUEST_ID_HEADER`
//!
//! Inbound header consulted for an existing correlation id. When the header
//! carries a valid ULID it becomes the request's id; otherwise a new one is
//! generated. Default: `x-request-id`.
//!
//! ### `CORRIDOR_LOG_LEVEL`
//!
//! Fallback filter for [`crate::logging::init_logging`] when `RUST_LOG` is not
//! set. Default: `info`.
//!
//! ### `CORRIDOR_LOG_FORMAT`
//!
//! `json` for one JSON object per line, `pretty` for the human formatter.
//! Default: `pretty`.
//!
//! ## File Configuration
//!
//! The same keys can be read from TOML:
//!
//! ```toml
//! request_id_header = "x-correlation-id"
//! log_level = "debug"
//! log_format = "json"
//! ```
//!
//! ```rust
//! use corridor::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("request id header: {}", config.request_id_header);
//! ```

use std::env;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_REQUEST_ID_HEADER: &str = "x-request-id";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "pretty" | "text" => Some(LogFormat::Pretty),
            _ => None,
        }
    }
}

/// Runtime configuration shared by the router and the logging setup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Header carrying an inbound correlation id (default: `x-request-id`)
    pub request_id_header: String,
    /// Fallback log filter when `RUST_LOG` is unset (default: `info`)
    pub log_level: String,
    /// Log line format (default: pretty)
    pub log_format: LogFormat,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            request_id_header: DEFAULT_REQUEST_ID_HEADER.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let request_id_header = env::var("CORRIDOR_REQUEST_ID_HEADER")
            .ok()
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.request_id_header);
        let log_level = env::var("CORRIDOR_LOG_LEVEL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.log_level);
        let log_format = env::var("CORRIDOR_LOG_FORMAT")
            .ok()
            .and_then(|v| LogFormat::parse(&v))
            .unwrap_or(defaults.log_format);
        RuntimeConfig {
            request_id_header,
            log_level,
            log_format,
        }
    }

    /// Parse configuration from a TOML document. Missing keys take defaults.
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        let mut config: RuntimeConfig =
            toml::from_str(source).context("invalid runtime configuration")?;
        config.request_id_header = config.request_id_header.to_ascii_lowercase();
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_overrides_and_defaults() {
        let config = RuntimeConfig::from_toml_str(
            r#"
request_id_header = "X-Correlation-Id"
log_format = "json"
"#,
        )
        .unwrap();
        assert_eq!(config.request_id_header, "x-correlation-id");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(RuntimeConfig::from_toml_str("log_format = \"xml\"").is_err());
    }

    #[test]
    fn loads_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();
        let config = RuntimeConfig::load(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.request_id_header, DEFAULT_REQUEST_ID_HEADER);

        let missing = file.path().with_extension("missing");
        let err = RuntimeConfig::load(&missing).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"));
    }

    #[test]
    fn log_format_parse_is_lenient() {
        assert_eq!(LogFormat::parse(" JSON "), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("text"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("yaml"), None);
    }
}
