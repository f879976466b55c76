//! Record store sources available to the viewer.
//!
//! A local file is read with [`FileRecordSource`]; a hosted store is fetched
//! over HTTP(S) on every resolution by [`HttpRecordSource`].

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use common::{FileRecordSource, RecordSource, RecordStore, TransportError};

use crate::config::Config;

/// Fetches the record store from a URL.
#[derive(Debug, Clone)]
pub struct HttpRecordSource {
    client: reqwest::Client,
    url: String,
}

impl HttpRecordSource {
    /// Create a source fetching `url` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self::with_client(client, url))
    }

    /// Create a source using an already configured client.
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn fetch(&self) -> Result<RecordStore, TransportError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(RecordStore::from_slice(&body)?)
    }

    fn describe(&self) -> String {
        format!("http:{}", self.url)
    }
}

/// Build the source selected by `cfg`: the URL if set, otherwise the file.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn from_config(cfg: &Config) -> Result<Arc<dyn RecordSource>> {
    let source: Arc<dyn RecordSource> = match &cfg.record_store_url {
        Some(url) => Arc::new(HttpRecordSource::new(
            url.clone(),
            Duration::from_secs(cfg.fetch_timeout_secs),
        )?),
        None => Arc::new(FileRecordSource::new(&cfg.record_store_path)),
    };
    Ok(source)
}
