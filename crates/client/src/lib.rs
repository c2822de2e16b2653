//! Client side of pdfscout.
//!
//! This crate provides the HTTP fetch collaborator, the three PDF-link
//! detection strategies, the discovery orchestrator that runs and ranks
//! them, and the scrape façade that ties cached adapters back into fresh
//! scraping attempts.

pub mod detect;
pub mod discover;
pub mod download;
pub mod fetch;
pub mod scrape;

pub use detect::{DetectedStrategy, DetectionResult, RenderOptions};
pub use discover::{DiscoveryOptions, DiscoveryReport, discover, discover_with_report};
pub use download::{DownloadSummary, download_all};
pub use fetch::{FetchClient, FetchConfig, PageFetcher, canonicalize};
pub use scrape::{ScrapeOutcome, ScrapeSource, Scraper};
