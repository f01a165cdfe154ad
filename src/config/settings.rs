//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use serde::Deserialize;

use crate::error::ConfigError;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// YouTube transcript backend settings.
    #[serde(default)]
    pub youtube: YouTubeConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.youtube.validate()
    }
}

/// YouTube backend configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YouTubeConfig {
    /// Caption languages to try, in order of preference.
    /// Default: `["en"]`
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Base URL of the YouTube frontend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Override for the HTTP `User-Agent` header.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds. No timeout when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl YouTubeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.languages.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "youtube.languages must list at least one language code".to_string(),
            });
        }
        if self.languages.iter().any(|lang| lang.trim().is_empty()) {
            return Err(ConfigError::ValidationError {
                message: "youtube.languages must not contain blank entries".to_string(),
            });
        }

        match reqwest::Url::parse(&self.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "youtube.base_url must use http or https, got '{}'",
                        url.scheme()
                    ),
                });
            }
            Err(e) => {
                return Err(ConfigError::ValidationError {
                    message: format!("Invalid youtube.base_url '{}': {e}", self.base_url),
                });
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError {
                message: "youtube.timeout_secs must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            base_url: default_base_url(),
            user_agent: None,
            timeout_secs: None,
        }
    }
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_base_url() -> String {
    "https://www.youtube.com".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
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
    "warn".to_string()
}
