//! Discovery orchestration.
//!
//! Runs the three detectors over one page and selects the best result. The
//! dynamic detector is launched as a background task *before* the two
//! synchronous detectors run, so its browser work overlaps their parsing;
//! the task is joined (bounded by its own internal timeout) before ranking.
//! The three confidence formulas are calibrated independently and are not
//! directly comparable on their own, hence the three-level tie-break:
//! confidence, then URL count (coverage), then a fixed strategy priority
//! encoding a prior belief about reliability (dynamic > pattern > selector).

use serde::Serialize;

use crate::detect::{self, DetectionResult, RenderOptions, scoring};

/// Options for one discovery run.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Results scoring below this floor are discarded.
    pub min_confidence: f64,

    /// Settings for the dynamic detector (ignored without a source URL).
    pub render: RenderOptions,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self { min_confidence: scoring::MIN_CONFIDENCE, render: RenderOptions::default() }
    }
}

/// Every individual detector result alongside the selected best, for
/// operator inspection.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryReport {
    /// All non-empty detector results in final ranking order, including
    /// those below the confidence floor.
    pub results: Vec<DetectionResult>,
    /// The best result that cleared the confidence floor, if any.
    pub best: Option<DetectionResult>,
}

/// Run all applicable detectors and return the best result.
///
/// The dynamic detector only runs when `source_url` is supplied (and the
/// `render` feature is enabled); the two markup detectors always run.
pub async fn discover(markup: &str, source_url: Option<&str>, options: &DiscoveryOptions) -> Option<DetectionResult> {
    discover_with_report(markup, source_url, options).await.best
}

/// Like [`discover`], but reports every individual result as well.
pub async fn discover_with_report(
    markup: &str,
    source_url: Option<&str>,
    options: &DiscoveryOptions,
) -> DiscoveryReport {
    // Launch the browser task first; it overlaps the synchronous detectors.
    #[cfg(feature = "render")]
    let dynamic_task = source_url.map(|url| {
        let url = url.to_string();
        let render = options.render.clone();
        tokio::spawn(async move { detect::dynamic::detect(&url, &render).await })
    });
    #[cfg(not(feature = "render"))]
    if source_url.is_some() {
        tracing::debug!("dynamic detection unavailable: built without the render feature");
    }

    let mut results = Vec::new();
    if let Some(result) = detect::selector::detect(markup) {
        results.push(result);
    }
    if let Some(result) = detect::pattern::detect(markup) {
        results.push(result);
    }

    #[cfg(feature = "render")]
    if let Some(task) = dynamic_task {
        match task.await {
            Ok(Some(result)) => results.push(result),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "dynamic detection task failed to join"),
        }
    }

    rank(&mut results);

    // The floor gates selection only; the report keeps every result so
    // sub-threshold detections stay inspectable.
    let best = results.iter().find(|r| r.confidence >= options.min_confidence).cloned();

    tracing::debug!(
        candidates = results.len(),
        best = best.as_ref().map(|b| b.strategy.kind().wire_name()).unwrap_or("-"),
        "discovery finished"
    );

    DiscoveryReport { results, best }
}

/// Order results best-first: confidence descending, URL count descending,
/// then fixed strategy priority.
fn rank(results: &mut [DetectionResult]) {
    results.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| b.urls.len().cmp(&a.urls.len()))
            .then_with(|| b.strategy.kind().priority().cmp(&a.strategy.kind().priority()))
    });
}
