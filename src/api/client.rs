//! Signal endpoint client.

use super::TransportError;
use crate::poller::PollConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

/// Per-call timeout covering connect, send and body read.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches the raw response body from the configured endpoint.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// One authenticated GET. Returns the body trimmed of surrounding whitespace.
    async fn fetch(&self, config: &PollConfig) -> Result<String, TransportError>;
}

/// [`Fetcher`] backed by reqwest with HTTP Basic authentication.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    /// Client with the default [`FETCH_TIMEOUT`].
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    /// Client with a custom per-call timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sigwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(skip(self, config), fields(endpoint = %config.endpoint()), level = "debug")]
    async fn fetch(&self, config: &PollConfig) -> Result<String, TransportError> {
        // The status code is not inspected: error pages are still bodies.
        let resp = self
            .http
            .get(config.endpoint())
            .basic_auth(config.username(), Some(config.password().expose()))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        let body = body.trim().to_string();

        debug!(%status, len = body.len(), "endpoint responded");

        Ok(body)
    }
}
