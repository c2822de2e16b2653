//! Raw-text extraction and URL-pattern inference.
//!
//! Deliberately more permissive than the selector detector: it catches PDF
//! references outside anchor tags (inline script strings, visible text,
//! base64 data URIs) at the cost of precision, which the lower confidence
//! ceiling reflects. When enough URLs share a structural shape, the shape is
//! inferred by collapsing numeric runs and id-like tokens into placeholders
//! and persisted alongside the adapter.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use super::{DetectedStrategy, DetectionResult, dedupe, scoring};

/// `.pdf` paths inside href attributes (single- or double-quoted).
static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)href\s*=\s*["']([^"']*\.pdf[^"']*)["']"#).expect("valid regex"));

/// Bare absolute URLs or root-relative paths ending in `.pdf`, as they
/// appear in visible text or script bodies.
static BARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)(?:https?://|/)[^\s"'<>]*\.pdf[^\s"'<>]*"#).expect("valid regex"));

/// Inline PDF documents as base64 data URIs.
static DATA_URI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"data:application/pdf;base64,[A-Za-z0-9+/=]+").expect("valid regex"));

/// Numeric runs, collapsed to `{num}` during pattern inference.
static NUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Long hex-ish tokens (hashes, ids), collapsed to `{id}`.
static ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9a-fA-F]{8,}").expect("valid regex"));

/// Run raw-text extraction and pattern inference over markup.
pub fn detect(markup: &str) -> Option<DetectionResult> {
    let urls = extract_urls(markup);
    if urls.is_empty() {
        return None;
    }

    let pattern = if urls.len() >= 2 { infer_pattern(&urls) } else { None };

    let mut confidence = scoring::PATTERN_BASE + scoring::PATTERN_PER_URL * urls.len() as f64;
    if pattern.is_some() {
        confidence += scoring::PATTERN_BONUS;
    }
    let confidence = scoring::PATTERN_CAP.min(confidence);

    tracing::debug!(count = urls.len(), pattern = pattern.as_deref().unwrap_or("-"), confidence, "pattern extraction");

    Some(DetectionResult { strategy: DetectedStrategy::Pattern { pattern }, urls, confidence })
}

/// Extract and validate candidate PDF URLs from raw text.
///
/// Also reused by the dynamic detector over rendered HTML and by the façade
/// when re-applying a `pattern` adapter.
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    for caps in HREF_RE.captures_iter(text) {
        candidates.push(caps[1].to_string());
    }
    for m in BARE_RE.find_iter(text) {
        candidates.push(m.as_str().to_string());
    }
    for m in DATA_URI_RE.find_iter(text) {
        candidates.push(m.as_str().to_string());
    }

    dedupe(candidates.iter().filter_map(|c| validate(c)).collect())
}

/// Trim, strip trailing punctuation, and require a usable shape: a
/// root-relative path, an http(s) URL, or a data URI.
fn validate(candidate: &str) -> Option<String> {
    let trimmed = candidate.trim().trim_end_matches(['.', ',', ';', ':', '!', '?', ')', '"', '\'']);
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_lowercase();
    let usable = trimmed.starts_with('/') || lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("data:");

    usable.then(|| trimmed.to_string())
}

/// Infer the placeholder template covering the largest subset of `urls`.
///
/// Returns `None` unless the winning template covers at least
/// [`scoring::PATTERN_COVERAGE_MIN`] of all URLs and at least two of them.
/// Count ties resolve to the template seen first, keeping inference
/// deterministic for a given URL order.
fn infer_pattern(urls: &[String]) -> Option<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for url in urls {
        if let Some(template) = template_of(url) {
            let count = counts.entry(template.clone()).or_insert(0);
            if *count == 0 {
                order.push(template);
            }
            *count += 1;
        }
    }

    let mut best: Option<(String, usize)> = None;
    for template in order {
        let count = counts[&template];
        if best.as_ref().is_none_or(|(_, c)| count > *c) {
            best = Some((template, count));
        }
    }

    let (template, count) = best?;
    if count < 2 {
        return None;
    }

    let coverage = count as f64 / urls.len() as f64;
    (coverage >= scoring::PATTERN_COVERAGE_MIN).then_some(template)
}

/// Collapse variable parts of a URL into placeholders. Data URIs have no
/// meaningful structure to share and are excluded.
fn template_of(url: &str) -> Option<String> {
    if url.starts_with("data:") {
        return None;
    }

    let collapsed = ID_RE.replace_all(url, |caps: &regex::Captures| {
        let token = &caps[0];
        // An all-letter token of hex chars ("deadbeef"-shaped words) is more
        // likely a real word; only collapse when a digit is present.
        if token.chars().any(|c| c.is_ascii_digit()) { "{id}".to_string() } else { token.to_string() }
    });
    let collapsed = NUM_RE.replace_all(&collapsed, "{num}");

    Some(collapsed.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_href_candidates() {
        let markup = r#"<a href="/pdf/page1.pdf">1</a><a href="/pdf/page2.pdf">2</a>"#;
        let result = detect(markup).unwrap();
        assert_eq!(result.urls, vec!["/pdf/page1.pdf", "/pdf/page2.pdf"]);
    }

    #[test]
    fn test_detect_infers_numeric_pattern() {
        let markup = r#"
            <a href="/files/report-1.pdf">one</a>
            <a href="/files/report-2.pdf">two</a>
            <a href="/files/report-3.pdf">three</a>
        "#;

        let result = detect(markup).unwrap();
        match result.strategy {
            DetectedStrategy::Pattern { pattern } => {
                assert_eq!(pattern.as_deref(), Some("/files/report-{num}.pdf"));
            }
            other => panic!("expected pattern strategy, got {:?}", other),
        }
        // 0.5 + 3*0.05 + 0.15 bonus
        assert!((result.confidence - 0.80).abs() < 1e-9);
    }

    #[test]
    fn test_detect_no_pattern_below_coverage() {
        let markup = r#"
            "/alpha/one.pdf" "/beta/two-2.pdf" "/gamma/three.pdf" "/delta/four.pdf"
        "#;

        let result = detect(markup).unwrap();
        assert_eq!(result.urls.len(), 4);
        match result.strategy {
            DetectedStrategy::Pattern { pattern } => assert!(pattern.is_none()),
            other => panic!("expected pattern strategy, got {:?}", other),
        }
        // No bonus without a qualifying pattern.
        assert!((result.confidence - 0.70).abs() < 1e-9);
    }

    #[test]
    fn test_extract_bare_urls_in_text() {
        let text = "Download https://example.com/docs/manual.pdf, or see /local/copy.pdf.";
        let urls = extract_urls(text);
        assert_eq!(urls, vec!["https://example.com/docs/manual.pdf", "/local/copy.pdf"]);
    }

    #[test]
    fn test_extract_data_uri() {
        let text = "var doc = \"data:application/pdf;base64,JVBERi0xLjQK\";";
        let urls = extract_urls(text);
        assert_eq!(urls, vec!["data:application/pdf;base64,JVBERi0xLjQK"]);
    }

    #[test]
    fn test_extract_rejects_relative_without_slash() {
        let markup = r#"<a href="page.pdf">page</a>"#;
        assert!(extract_urls(markup).is_empty());
    }

    #[test]
    fn test_extract_dedupes_across_families() {
        // The same absolute URL appears as an href and as visible text.
        let markup = r#"<a href="https://example.com/a.pdf">a</a> https://example.com/a.pdf"#;
        let urls = extract_urls(markup);
        assert_eq!(urls, vec!["https://example.com/a.pdf"]);
    }

    #[test]
    fn test_detect_none_on_plain_markup() {
        assert!(detect("<p>nothing to see</p>").is_none());
    }

    #[test]
    fn test_detect_confidence_caps_at_095() {
        let markup: String = (0..12).map(|i| format!(r#"<a href="/d/{i}.pdf">x</a>"#)).collect();
        let result = detect(&markup).unwrap();
        assert!((result.confidence - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_template_collapses_hex_ids() {
        let urls = vec![
            "/dl/3f9a2b1c44d0/report.pdf".to_string(),
            "/dl/9e8d7c6b5a40/report.pdf".to_string(),
        ];
        assert_eq!(infer_pattern(&urls).as_deref(), Some("/dl/{id}/report.pdf"));
    }

    #[test]
    fn test_template_keeps_wordlike_hex() {
        // "cafebabe" has no digit... but "decade" style words stay words.
        assert_eq!(template_of("/feedback/added.pdf").as_deref(), Some("/feedback/added.pdf"));
    }

    #[test]
    fn test_tied_templates_resolve_to_first_seen() {
        // Two templates, two URLs each: the first-seen template must win
        // every time, not whichever hashes first.
        let urls: Vec<String> = ["/alpha/1.pdf", "/beta/1.pdf", "/alpha/2.pdf", "/beta/2.pdf"]
            .iter()
            .map(|u| u.to_string())
            .collect();

        for _ in 0..16 {
            assert_eq!(infer_pattern(&urls).as_deref(), Some("/alpha/{num}.pdf"));
        }
    }

    #[test]
    fn test_single_url_has_no_pattern() {
        let markup = r#"<a href="/only/one-1.pdf">one</a>"#;
        let result = detect(markup).unwrap();
        match result.strategy {
            DetectedStrategy::Pattern { pattern } => assert!(pattern.is_none()),
            other => panic!("expected pattern strategy, got {:?}", other),
        }
    }
}
