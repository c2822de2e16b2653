//! Headless-browser detection for script-rendered pages.
//!
//! The expensive strategy of the three: loads the page in a fresh Chromium
//! session, waits for navigation to settle plus a fixed delay for deferred
//! rendering, then harvests anchors from the live DOM and re-scans the
//! serialized HTML with the pattern extractor. Links that only exist after
//! script execution are invisible to the other two detectors, hence the
//! highest confidence ceiling.
//!
//! Every failure path (bad URL, launch failure, navigation error, timeout)
//! resolves to `None`; the browser and its CDP handler task are torn down on
//! every exit path.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use futures_util::StreamExt;
use url::Url;

use pdfscout_core::Error;

use super::{DetectedStrategy, DetectionResult, PDF_MARKER, RenderOptions, dedupe, pattern, scoring};

/// JS run in the page to harvest browser-resolved anchor hrefs. Relative,
/// absolute, and protocol-relative forms all come back absolute.
const COLLECT_ANCHORS_JS: &str = "Array.from(document.querySelectorAll('a[href]')).map(a => a.href)";

/// Slack added to the overall deadline beyond navigation + settle time, to
/// cover launch and extraction.
const TEARDOWN_GRACE: Duration = Duration::from_secs(5);

/// A scoped browser session: launched per detection run, never shared.
struct BrowserSession {
    browser: Browser,
    handler: tokio::task::JoinHandle<()>,
}

impl BrowserSession {
    async fn open(headless: bool) -> Result<Self, Error> {
        let builder = BrowserConfig::builder();
        let builder = if headless { builder } else { builder.with_head() };
        let config = builder.build().map_err(Error::RenderFailed)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::RenderFailed(format!("browser launch failed: {}", e)))?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler event error: {e}");
                    break;
                }
            }
        });

        Ok(Self { browser, handler: handle })
    }

    /// Tear down the browser and its handler task. Called on every exit path.
    async fn close(mut self) {
        self.browser.close().await.ok();
        self.browser.wait().await.ok();
        self.handler.abort();
    }
}

/// Render `url` and harvest PDF links from the live page.
///
/// Resolves to `None` for malformed URLs, on any browser or navigation
/// failure, on timeout, and when the rendered page holds no PDF links. It
/// never returns an error and never waits longer than the configured
/// timeouts plus a fixed teardown grace.
pub async fn detect(url: &str, opts: &RenderOptions) -> Option<DetectionResult> {
    let parsed = match Url::parse(url) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => u,
        _ => {
            tracing::debug!(url, "dynamic detection skipped: not a fetchable URL");
            return None;
        }
    };

    let session = match BrowserSession::open(opts.headless).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(url, error = %e, "browser session unavailable");
            return None;
        }
    };

    let deadline = opts.timeout + opts.settle_delay + TEARDOWN_GRACE;
    let outcome = tokio::time::timeout(deadline, harvest(&session, &parsed, opts)).await;
    session.close().await;

    let urls = match outcome {
        Ok(Ok(urls)) => urls,
        Ok(Err(e)) => {
            tracing::warn!(url, error = %e, "dynamic detection failed");
            return None;
        }
        Err(_) => {
            tracing::warn!(url, deadline_ms = deadline.as_millis() as u64, "dynamic detection timed out");
            return None;
        }
    };

    if urls.is_empty() {
        return None;
    }

    let confidence = scoring::DYNAMIC_CAP.min(scoring::DYNAMIC_BASE + scoring::DYNAMIC_PER_URL * urls.len() as f64);

    tracing::debug!(url, count = urls.len(), confidence, "dynamic detection succeeded");

    Some(DetectionResult { strategy: DetectedStrategy::Dynamic, urls, confidence })
}

async fn harvest(session: &BrowserSession, url: &Url, opts: &RenderOptions) -> Result<Vec<String>, Error> {
    let page = session
        .browser
        .new_page(url.as_str())
        .await
        .map_err(|e| Error::RenderFailed(format!("navigation failed: {}", e)))?;

    tokio::time::timeout(opts.timeout, page.wait_for_navigation())
        .await
        .map_err(|_| Error::RenderFailed(format!("navigation did not settle within {}ms", opts.timeout.as_millis())))?
        .map_err(|e| Error::RenderFailed(format!("navigation failed: {}", e)))?;

    tokio::time::sleep(opts.settle_delay).await;

    let anchors: Vec<String> = page
        .evaluate(COLLECT_ANCHORS_JS)
        .await
        .map_err(|e| Error::RenderFailed(format!("anchor collection failed: {}", e)))?
        .into_value()
        .map_err(|e| Error::RenderFailed(format!("anchor collection failed: {}", e)))?;

    let mut urls: Vec<String> = anchors
        .into_iter()
        .map(|href| href.trim().to_string())
        .filter(|href| href.to_lowercase().contains(PDF_MARKER))
        .collect();

    // Non-anchor occurrences (script strings, data URIs) via the raw-text
    // families over the rendered document.
    let html = page
        .content()
        .await
        .map_err(|e| Error::RenderFailed(format!("content retrieval failed: {}", e)))?;
    urls.extend(pattern::extract_urls(&html));

    page.close().await.ok();

    Ok(dedupe(urls))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_detect_rejects_malformed_url() {
        let result = detect("not a url", &RenderOptions::default()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_detect_rejects_non_http_scheme() {
        let result = detect("file:///tmp/x.html", &RenderOptions::default()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    #[ignore = "requires Chrome/Chromium installation and network"]
    async fn test_detect_renders_real_page() {
        let result = detect("https://example.com", &RenderOptions::default()).await;
        // example.com has no PDF links; the point is a clean no-match.
        assert!(result.is_none());
    }
}
