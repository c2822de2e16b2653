//! Consumer-facing scrape entry point.
//!
//! Ties cached adapters back into fresh scraping: look up an adapter for the
//! target's domain, re-apply its recorded strategy to a fresh fetch, and
//! fall back to full discovery when the adapter yields nothing. The adapter
//! store is re-read from disk on every call so external edits to the file
//! take effect immediately; no adapter state is cached in-process.

use serde::Serialize;
use std::sync::Arc;

use pdfscout_core::{Adapter, AppConfig, Error, Strategy, adapter::domain, adapter::store};

use crate::detect::{self, RenderOptions};
use crate::discover::{DiscoveryOptions, discover};
use crate::fetch::{FetchClient, FetchConfig, PageFetcher, canonicalize};

/// Which path produced a scrape result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeSource {
    /// A cached adapter was re-applied successfully.
    Adapter,
    /// Default discovery ran (no adapter, or the adapter yielded nothing).
    Default,
}

/// Outcome of one scrape call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOutcome {
    /// Deduplicated PDF URLs found on the page.
    pub pdf_urls: Vec<String>,
    /// The adapter that produced the result, when `source` is `Adapter`.
    pub adapter_used: Option<Adapter>,
    /// Which path produced the result.
    pub source: ScrapeSource,
}

/// Scrape façade over the adapter store and the discovery pipeline.
pub struct Scraper {
    config: AppConfig,
    fetcher: Arc<dyn PageFetcher>,
}

impl Scraper {
    /// Create a scraper backed by the real HTTP fetch client.
    pub fn new(config: AppConfig) -> Result<Self, Error> {
        let fetcher = FetchClient::new(FetchConfig::from_app_config(&config))?;
        Ok(Self { config, fetcher: Arc::new(fetcher) })
    }

    /// Create a scraper with a caller-supplied page fetcher (tests, replay).
    pub fn with_fetcher(config: AppConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Find PDF URLs on `url`, preferring a cached adapter for its domain.
    ///
    /// # Errors
    ///
    /// Only for unusable caller input (a URL without a host). Everything
    /// downstream degrades: adapter misses, fetch failures, and zero-yield
    /// strategies all fall through to default discovery, and a dry default
    /// discovery returns an empty outcome rather than an error.
    pub async fn get_pdf_urls_with_adapters(&self, url: &str) -> Result<ScrapeOutcome, Error> {
        let target = canonicalize(url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let host = target
            .host_str()
            .ok_or_else(|| Error::InvalidUrl(format!("no host in {}", target)))?
            .to_string();

        let collection = store::load(&self.config.store_path);
        if let Some(adapter) = collection.find_for_domain(&host).cloned() {
            let urls = self.apply_adapter(&adapter, target.as_str()).await;
            if !urls.is_empty() {
                tracing::debug!(url = %target, adapter = %adapter.id, count = urls.len(), "adapter hit");
                return Ok(ScrapeOutcome { pdf_urls: urls, adapter_used: Some(adapter), source: ScrapeSource::Adapter });
            }
            tracing::warn!(url = %target, adapter = %adapter.id, "adapter yielded nothing, falling back to discovery");
        }

        self.discover_default(target.as_str(), &host).await
    }

    /// Re-apply a stored strategy to a fresh page. Fetch or strategy
    /// failures yield an empty list, which triggers the discovery fallback.
    async fn apply_adapter(&self, adapter: &Adapter, url: &str) -> Vec<String> {
        match &adapter.strategy {
            Strategy::Selector { selector } => match self.fetcher.fetch_text(url).await {
                Ok(markup) => detect::selector::apply(selector, &markup),
                Err(e) => {
                    tracing::warn!(url, error = %e, "refetch for selector adapter failed");
                    Vec::new()
                }
            },
            Strategy::Pattern { .. } => match self.fetcher.fetch_text(url).await {
                Ok(markup) => detect::pattern::extract_urls(&markup),
                Err(e) => {
                    tracing::warn!(url, error = %e, "refetch for pattern adapter failed");
                    Vec::new()
                }
            },
            Strategy::Dynamic => self.apply_dynamic(url).await,
        }
    }

    #[cfg(feature = "render")]
    async fn apply_dynamic(&self, url: &str) -> Vec<String> {
        let render = RenderOptions::from_app_config(&self.config);
        detect::dynamic::detect(url, &render)
            .await
            .map(|r| r.urls)
            .unwrap_or_default()
    }

    #[cfg(not(feature = "render"))]
    async fn apply_dynamic(&self, url: &str) -> Vec<String> {
        tracing::warn!(url, "javascript adapter cached but built without the render feature");
        Vec::new()
    }

    /// Full discovery path: fresh fetch, orchestrated detection, and
    /// persistence of the accepted strategy as a new adapter.
    async fn discover_default(&self, url: &str, host: &str) -> Result<ScrapeOutcome, Error> {
        let markup = match self.fetcher.fetch_text(url).await {
            Ok(markup) => markup,
            Err(e) => {
                // The dynamic detector fetches through the browser, so
                // discovery can still succeed without markup.
                tracing::warn!(url, error = %e, "page fetch failed, detection limited to rendering");
                String::new()
            }
        };

        let options = DiscoveryOptions {
            render: RenderOptions::from_app_config(&self.config),
            ..Default::default()
        };

        let Some(result) = discover(&markup, Some(url), &options).await else {
            return Ok(ScrapeOutcome { pdf_urls: Vec::new(), adapter_used: None, source: ScrapeSource::Default });
        };

        self.persist_accepted(&result, host);

        Ok(ScrapeOutcome { pdf_urls: result.urls, adapter_used: None, source: ScrapeSource::Default })
    }

    /// Upsert the accepted detection as an adapter for the host's base
    /// domain. Store write failures are logged, never surfaced: the caller
    /// already has its URLs.
    fn persist_accepted(&self, result: &detect::DetectionResult, host: &str) {
        let Some(strategy) = result.strategy.to_persistable() else {
            tracing::debug!(host, "accepted result has no persistable parameters, skipping adapter save");
            return;
        };

        let base = domain::base_domain(&domain::normalize(host));
        let id = format!("{}-{}", base, strategy.kind().wire_name());
        let description = format!("auto-discovered from {} URL(s)", result.urls.len());

        let adapter = Adapter::new(id, vec![base], strategy, result.confidence, Some(description));

        let mut collection = store::load(&self.config.store_path);
        collection.upsert(adapter);
        if let Err(e) = store::save(&collection, &self.config.store_path) {
            tracing::warn!(error = %e, "failed to persist discovered adapter");
        }
    }
}
