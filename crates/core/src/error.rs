//! Unified error types for pdfscout.
//!
//! Detector-internal failures (bad markup, navigation errors, timeouts)
//! degrade to an absent result and never surface here; these variants cover
//! the genuinely caller-facing failures.

/// Unified error types for pdfscout.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// HTTP error response.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Render failed.
    #[error("RENDER_FAILED: {0}")]
    RenderFailed(String),

    /// Adapter store write failed.
    #[error("STORE_ERROR: {0}")]
    StoreWrite(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidUrl("not-a-url".to_string());
        assert!(err.to_string().contains("INVALID_URL"));
        assert!(err.to_string().contains("not-a-url"));
    }

    #[test]
    fn test_store_error_display() {
        let err = Error::StoreWrite("permission denied".to_string());
        assert!(err.to_string().contains("STORE_ERROR"));
    }
}
