//! Configuration loading and validation for the viewer service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated viewer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Path of the record store file. Ignored when `record_store_url` is set.
    #[serde(default = "default_record_store_path")]
    pub record_store_path: String,

    /// URL of a remotely hosted record store. Takes precedence over the path.
    #[serde(default)]
    pub record_store_url: Option<String>,

    /// Request timeout (seconds) when fetching a remote record store.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Text shown whenever no personal message can be displayed.
    #[serde(default = "default_generic_message")]
    pub generic_message: String,

    /// Show the fully generic message instead of a greeting by id.
    #[serde(default)]
    pub collapse_fallbacks: bool,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_record_store_path() -> String {
    "messages-encrypted.json".into()
}
fn default_fetch_timeout() -> u64 {
    10
}
fn default_generic_message() -> String {
    "Wishing you all the best for the year ahead!".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default().try_parsing(true))
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        match &self.record_store_url {
            Some(url) => {
                let parsed = url::Url::parse(url)
                    .with_context(|| format!("RECORD_STORE_URL is not a valid URL: {url}"))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    anyhow::bail!("RECORD_STORE_URL must use http or https");
                }
            }
            None => ensure_non_empty(&self.record_store_path, "RECORD_STORE_PATH")?,
        }
        ensure_non_empty(&self.generic_message, "GENERIC_MESSAGE")?;
        if self.fetch_timeout_secs == 0 {
            anyhow::bail!("FETCH_TIMEOUT_SECS must be > 0");
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            listen_port: default_listen_port(),
            record_store_path: default_record_store_path(),
            record_store_url: None,
            fetch_timeout_secs: default_fetch_timeout(),
            generic_message: default_generic_message(),
            collapse_fallbacks: false,
            log_level: default_log_level(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_listen_port(), 8080);
        assert_eq!(default_record_store_path(), "messages-encrypted.json");
        assert_eq!(default_fetch_timeout(), 10);
        assert_eq!(default_log_level(), "info");
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_store_path() {
        let cfg = Config {
            record_store_path: " ".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn store_url_replaces_path_requirement() {
        let cfg = Config {
            record_store_path: "".into(),
            record_store_url: Some("https://cdn.example.com/messages-encrypted.json".into()),
            ..valid()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_store_url() {
        let relative = Config {
            record_store_url: Some("messages-encrypted.json".into()),
            ..valid()
        };
        assert!(relative.validate().is_err());

        let ftp = Config {
            record_store_url: Some("ftp://example.com/store.json".into()),
            ..valid()
        };
        assert!(ftp.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let cfg = Config {
            fetch_timeout_secs: 0,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }
}
