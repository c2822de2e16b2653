//! HTTP fetch collaborator.
//!
//! Page fetching is a narrow seam the detection pipeline consumes: give it a
//! URL, get text back. The [`PageFetcher`] trait exists so the scrape façade
//! can be exercised against stub pages in tests.

pub mod url;

use reqwest::{Client, Url, header};
use std::time::{Duration, Instant};

pub use url::{UrlError, canonicalize};

use pdfscout_core::Error;

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "pdfscout/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "pdfscout/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

impl FetchConfig {
    /// Derive fetch settings from the application configuration.
    pub fn from_app_config(config: &pdfscout_core::AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// Narrow page-fetch seam consumed by detection and the scrape façade.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a URL and return its body as text.
    async fn fetch_text(&self, url: &str) -> Result<String, Error>;
}

/// HTTP fetch client over reqwest.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a URL, returning the body text and final URL after redirects.
    ///
    /// Enforces the configured byte limit and rejects non-success statuses.
    /// Bodies are decoded lossily; use [`Self::fetch_bytes`] for binary
    /// content.
    pub async fn fetch(&self, url_str: &str) -> Result<(Url, String), Error> {
        let (final_url, bytes) =
            self.fetch_raw(url_str, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8").await?;
        Ok((final_url, String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Fetch a URL, returning the raw body bytes and final URL.
    ///
    /// For binary payloads (PDF downloads) where lossy text decoding would
    /// corrupt the content.
    pub async fn fetch_bytes(&self, url_str: &str) -> Result<(Url, Vec<u8>), Error> {
        self.fetch_raw(url_str, "application/pdf,application/octet-stream;q=0.9,*/*;q=0.8").await
    }

    async fn fetch_raw(&self, url_str: &str, accept: &str) -> Result<(Url, Vec<u8>), Error> {
        let start = Instant::now();
        let url = canonicalize(url_str).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let response = self
            .http
            .get(url.as_str())
            .header("Accept", accept)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::FetchTimeout(url.to_string())
                } else {
                    Error::HttpError(format!("network error: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::HttpError(format!("failed to read response: {}", e)))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        tracing::debug!(
            url = %url,
            final_url = %final_url,
            status = status.as_u16(),
            content_type = content_type.as_deref().unwrap_or("-"),
            bytes = bytes.len(),
            fetch_ms = start.elapsed().as_millis() as u64,
            "fetched"
        );

        Ok((final_url, bytes.to_vec()))
    }
}

#[async_trait::async_trait]
impl PageFetcher for FetchClient {
    async fn fetch_text(&self, url: &str) -> Result<String, Error> {
        let (_, body) = self.fetch(url).await?;
        Ok(body)
    }
}
