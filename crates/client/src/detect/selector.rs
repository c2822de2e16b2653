//! Structural probe detection over parsed markup.
//!
//! Runs a fixed, ordered catalog of CSS probes against the document and
//! keeps the probe yielding the most PDF links. The winning probe string is
//! what gets persisted in a `selector` adapter, so future visits can re-run
//! just that one query.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

use super::{DetectedStrategy, DetectionResult, PDF_MARKER, scoring};

/// Fixed probe catalog, in precedence order: attribute-contains,
/// attribute-suffix, class-name, then data-attribute probes. Ties on match
/// count keep the earlier probe.
const PROBES: &[&str] = &[
    r#"a[href*=".pdf" i]"#,
    r#"a[href$=".pdf" i]"#,
    "a.pdf-link",
    "a.pdf-download",
    "a.download-pdf",
    "a[data-pdf]",
    r#"a[data-href*=".pdf" i]"#,
    r#"[data-url*=".pdf" i]"#,
    r#"[data-file*=".pdf" i]"#,
];

/// Attributes that may carry the link, in preference order. `href` is the
/// explicit link attribute; the rest are data-attribute fallbacks.
const LINK_ATTRS: &[&str] = &["href", "data-href", "data-url", "data-pdf", "data-file"];

/// Run the probe catalog against raw markup.
///
/// Pure and deterministic: identical markup yields an identical result.
/// Malformed markup degrades to `None` (the parser is lenient and never
/// fails outright; a document with no matching nodes simply yields nothing).
pub fn detect(markup: &str) -> Option<DetectionResult> {
    let document = Html::parse_document(markup);

    let mut best: Option<(&str, Vec<String>)> = None;
    for probe in PROBES {
        let selector = match Selector::parse(probe) {
            Ok(s) => s,
            Err(_) => continue,
        };

        let urls = collect_matches(&document, &selector);
        if !urls.is_empty() && best.as_ref().is_none_or(|(_, b)| urls.len() > b.len()) {
            best = Some((probe, urls));
        }
    }

    let (probe, urls) = best?;
    let confidence = confidence_for(urls.len());

    tracing::debug!(probe, count = urls.len(), confidence, "selector probe matched");

    Some(DetectionResult { strategy: DetectedStrategy::Selector { selector: probe.to_string() }, urls, confidence })
}

/// Re-apply a stored selector expression to fresh markup.
///
/// Used by the scrape façade when a `selector` adapter is cached for the
/// domain. An unparseable stored expression yields no URLs.
pub fn apply(selector_expr: &str, markup: &str) -> Vec<String> {
    let selector = match Selector::parse(selector_expr) {
        Ok(s) => s,
        Err(_) => {
            tracing::warn!(selector = selector_expr, "stored selector does not parse");
            return Vec::new();
        }
    };

    let document = Html::parse_document(markup);
    collect_matches(&document, &selector)
}

fn collect_matches(document: &Html, selector: &Selector) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for element in document.select(selector) {
        let Some(value) = link_value(&element) else { continue };
        if !value.to_lowercase().contains(PDF_MARKER) {
            continue;
        }
        if seen.insert(value.clone()) {
            urls.push(value);
        }
    }

    urls
}

fn link_value(element: &ElementRef) -> Option<String> {
    LINK_ATTRS
        .iter()
        .find_map(|attr| element.value().attr(attr))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn confidence_for(match_count: usize) -> f64 {
    scoring::SELECTOR_CAP.min(scoring::SELECTOR_BASE + scoring::SELECTOR_PER_MATCH * match_count as f64)
}
