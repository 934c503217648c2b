//! HTTP transport for results pages.
//!
//! The walker only depends on the [`FetchPage`] trait, so tests can serve
//! canned HTML without a network.

use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

/// Why a page could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS, timeout or body-read failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    Status { status: StatusCode, url: String },
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Http(e) if e.is_timeout())
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Http(e) => e.status(),
            FetchError::Status { status, .. } => Some(*status),
        }
    }
}

/// Something that can turn a page URL into its HTML body.
///
/// Pages are fetched one at a time, so the returned futures need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait FetchPage {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// [`FetchPage`] over a shared `reqwest` client.
///
/// Certificate validation is turned off so a misconfigured or self-signed
/// target still answers. This is an accepted risk for a read-only scraper.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with its own connection pool.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Upper bound for a whole request, connect through body
    /// * `user_agent` - Sent as the `User-Agent` header on every request
    ///
    /// # Returns
    ///
    /// The fetcher, or [`FetchError::Http`] if the TLS backend cannot be set up.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let fetcher = HttpFetcher::new(Duration::from_secs(10), DEFAULT_USER_AGENT)?;
    /// let html = fetcher.fetch(&page_url(&base, 1)).await?;
    /// ```
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self { client })
    }
}

impl FetchPage for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(%status, elapsed_ms = t0.elapsed().as_millis() as u64, "Non-success response");
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }
        let body = resp.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}
