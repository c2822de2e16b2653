//! PDF link detection strategies.
//!
//! Three independent techniques with different cost/reliability tradeoffs:
//! - [`selector`]: fixed CSS probe catalog over parsed markup (cheap, precise)
//! - [`pattern`]: regex extraction over raw text plus URL-pattern inference
//!   (cheap, permissive)
//! - [`dynamic`]: headless-browser rendering for script-built pages
//!   (expensive, highest confidence ceiling)
//!
//! Each detector returns `Option<DetectionResult>` and degrades to `None` on
//! any internal failure. The orchestrator in [`crate::discover`] runs and
//! ranks them.

#[cfg(feature = "render")]
pub mod dynamic;
pub mod pattern;
pub mod scoring;
pub mod selector;

use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;

use pdfscout_core::{AppConfig, Strategy, StrategyKind};

/// Marker a candidate URL must contain to count as a PDF link.
pub const PDF_MARKER: &str = ".pdf";

/// Options for a dynamic detection run.
///
/// Plain data, available regardless of the `render` feature so discovery
/// options keep the same shape either way.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Bound on the wait for navigation/network quiescence (default: 30s).
    pub timeout: Duration,

    /// Fixed wait after navigation for deferred script rendering
    /// (default: 2s).
    pub settle_delay: Duration,

    /// Whether the browser runs headless (default: true).
    pub headless: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), settle_delay: Duration::from_secs(2), headless: true }
    }
}

impl RenderOptions {
    /// Derive render settings from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self { timeout: config.render_timeout(), settle_delay: config.settle_delay(), headless: config.headless }
    }
}

/// The strategy a detector ran, with the parameters it detected.
///
/// Unlike the persisted [`Strategy`], a fresh pattern detection may carry no
/// inferred pattern (URLs found, but no shared shape).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DetectedStrategy {
    Selector { selector: String },
    Pattern { pattern: Option<String> },
    Dynamic,
}

impl DetectedStrategy {
    /// The bare discriminant, used for ranking.
    pub fn kind(&self) -> StrategyKind {
        match self {
            DetectedStrategy::Selector { .. } => StrategyKind::Selector,
            DetectedStrategy::Pattern { .. } => StrategyKind::Pattern,
            DetectedStrategy::Dynamic => StrategyKind::Dynamic,
        }
    }

    /// Convert into a persistable strategy.
    ///
    /// A pattern detection without an inferred pattern is not persistable
    /// (a `pattern` adapter must carry its pattern) and yields `None`.
    pub fn to_persistable(&self) -> Option<Strategy> {
        match self {
            DetectedStrategy::Selector { selector } => Some(Strategy::Selector { selector: selector.clone() }),
            DetectedStrategy::Pattern { pattern: Some(pattern) } => {
                Some(Strategy::Pattern { pattern: pattern.clone() })
            }
            DetectedStrategy::Pattern { pattern: None } => None,
            DetectedStrategy::Dynamic => Some(Strategy::Dynamic),
        }
    }
}

/// Result of one detection run. Ephemeral; lives within one discovery call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    /// The strategy that produced this result.
    pub strategy: DetectedStrategy,
    /// Deduplicated candidate URLs in discovery order.
    pub urls: Vec<String>,
    /// Heuristic confidence in [0,1]; see [`scoring`] for the formulas.
    pub confidence: f64,
}

/// Order-preserving deduplication.
pub(crate) fn dedupe(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter().filter(|u| seen.insert(u.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_preserves_first_occurrence_order() {
        let urls = vec!["/a.pdf".to_string(), "/b.pdf".to_string(), "/a.pdf".to_string()];
        assert_eq!(dedupe(urls), vec!["/a.pdf", "/b.pdf"]);
    }

    #[test]
    fn test_pattern_without_shape_is_not_persistable() {
        let strategy = DetectedStrategy::Pattern { pattern: None };
        assert!(strategy.to_persistable().is_none());
        assert_eq!(strategy.kind(), StrategyKind::Pattern);
    }

    #[test]
    fn test_render_options_from_app_config() {
        let config =
            AppConfig { render_timeout_ms: 10_000, settle_delay_ms: 500, headless: false, ..Default::default() };
        let opts = RenderOptions::from_app_config(&config);
        assert_eq!(opts.timeout, Duration::from_millis(10_000));
        assert_eq!(opts.settle_delay, Duration::from_millis(500));
        assert!(!opts.headless);
    }

    #[test]
    fn test_selector_strategy_round_trips_to_persistable() {
        let strategy = DetectedStrategy::Selector { selector: "a[href*=\".pdf\"]".to_string() };
        assert_eq!(
            strategy.to_persistable(),
            Some(Strategy::Selector { selector: "a[href*=\".pdf\"]".to_string() })
        );
    }
}
