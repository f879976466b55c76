//! Configuration loading for the generator CLI.
//!
//! Environment variables provide defaults; command-line flags override them.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Generator configuration read from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Default base URL of the viewer page, used when `--base-url` is absent.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Tracing log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build generator configuration")?;

        cfg.try_deserialize()
            .context("failed to deserialise generator configuration")
    }

    /// The base URL to build links from: `flag` if given, else `BASE_URL`.
    ///
    /// Only presence is checked here; the URL itself is validated before any
    /// message is sealed.
    pub fn base_url(&self, flag: Option<&str>) -> Result<String> {
        flag.or(self.base_url.as_deref())
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_owned)
            .context("no base URL: pass --base-url or set BASE_URL")
    }
}
