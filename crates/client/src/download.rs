//! Batch download of found PDF URLs.
//!
//! Consumes the URLs the scrape path produces: each file lands in the output
//! directory under a name derived from its URL path, files already present
//! are skipped, and a short politeness delay separates requests. One bad URL
//! never fails the batch.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;

use pdfscout_core::Error;

use crate::fetch::FetchClient;

/// Delay between consecutive downloads.
const POLITENESS_DELAY: Duration = Duration::from_millis(500);

/// Per-batch download tallies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Files written to disk.
    pub downloaded: usize,
    /// Files skipped because they already existed.
    pub skipped: usize,
    /// URLs that failed to download.
    pub failed: usize,
}

/// Download every URL into `out_dir`, creating it if needed.
///
/// # Errors
///
/// Only if the output directory cannot be created; per-URL failures are
/// logged and tallied in the summary instead.
pub async fn download_all(urls: &[String], out_dir: &Path, client: &FetchClient) -> Result<DownloadSummary, Error> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|e| Error::StoreWrite(format!("create {}: {}", out_dir.display(), e)))?;

    let mut summary = DownloadSummary::default();
    for (i, url) in urls.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(POLITENESS_DELAY).await;
        }
        match download_one(url, out_dir, client).await {
            Ok(true) => summary.downloaded += 1,
            Ok(false) => summary.skipped += 1,
            Err(e) => {
                tracing::warn!(url, error = %e, "download failed");
                summary.failed += 1;
            }
        }
    }

    tracing::debug!(
        downloaded = summary.downloaded,
        skipped = summary.skipped,
        failed = summary.failed,
        dir = %out_dir.display(),
        "download batch finished"
    );

    Ok(summary)
}

/// Download a single URL. Returns `Ok(false)` when the target file already
/// exists and was left untouched.
async fn download_one(url: &str, out_dir: &Path, client: &FetchClient) -> Result<bool, Error> {
    let path = out_dir.join(filename_for(url));
    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        tracing::debug!(url, path = %path.display(), "already downloaded, skipping");
        return Ok(false);
    }

    let (_, body) = client.fetch_bytes(url).await?;
    tokio::fs::write(&path, &body)
        .await
        .map_err(|e| Error::StoreWrite(format!("write {}: {}", path.display(), e)))?;

    tracing::debug!(url, path = %path.display(), bytes = body.len(), "downloaded");
    Ok(true)
}

/// Derive a local filename from the URL path, falling back to a timestamped
/// name when the path has none.
fn filename_for(url: &str) -> PathBuf {
    let basename = url::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|name| !name.is_empty())
                .map(|name| name.to_string())
        })
        .unwrap_or_else(|| format!("file_{}.pdf", Utc::now().timestamp()));

    PathBuf::from(basename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchConfig;

    /// One-shot HTTP server on a loopback socket, serving a fixed body.
    fn serve_once(body: Vec<u8>, content_type: &'static str) -> (std::net::SocketAddr, std::thread::JoinHandle<()>) {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                content_type,
                body.len()
            );
            stream.write_all(header.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
        });
        (addr, handle)
    }

    #[tokio::test]
    async fn test_download_preserves_binary_bytes() {
        // PDF stream data is rarely valid UTF-8; the written file must match
        // the served bytes exactly, with no replacement characters.
        let body: Vec<u8> =
            [b"%PDF-1.4\n".as_slice(), &[0x80, 0x81, 0xfe, 0xff, 0x00, 0x1b], b"\n%%EOF"].concat();
        let (addr, server) = serve_once(body.clone(), "application/pdf");

        let dir = tempfile::tempdir().unwrap();
        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let urls = vec![format!("http://{addr}/doc.pdf")];

        let summary = download_all(&urls, dir.path(), &client).await.unwrap();
        server.join().unwrap();

        assert_eq!(summary, DownloadSummary { downloaded: 1, skipped: 0, failed: 0 });
        let written = std::fs::read(dir.path().join("doc.pdf")).unwrap();
        assert_eq!(written, body);
    }

    #[tokio::test]
    async fn test_download_skips_existing_file_without_fetching() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("report.pdf"), b"already here").unwrap();

        // Unroutable port: reaching the network would fail the download.
        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let urls = vec!["http://127.0.0.1:1/report.pdf".to_string()];

        let summary = download_all(&urls, dir.path(), &client).await.unwrap();
        assert_eq!(summary, DownloadSummary { downloaded: 0, skipped: 1, failed: 0 });
        assert_eq!(std::fs::read(dir.path().join("report.pdf")).unwrap(), b"already here");
    }

    #[test]
    fn test_filename_from_url_path() {
        assert_eq!(filename_for("https://example.com/docs/report.pdf"), PathBuf::from("report.pdf"));
    }

    #[test]
    fn test_filename_ignores_query() {
        assert_eq!(filename_for("https://example.com/a/b.pdf?v=2"), PathBuf::from("b.pdf"));
    }

    #[test]
    fn test_filename_fallback_for_bare_host() {
        let name = filename_for("https://example.com/");
        let name = name.to_string_lossy().into_owned();
        assert!(name.starts_with("file_"));
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn test_filename_fallback_for_invalid_url() {
        let name = filename_for("/relative/only.pdf");
        // Relative references do not parse as absolute URLs; fall back.
        assert!(name.to_string_lossy().starts_with("file_"));
    }

    #[test]
    fn test_summary_default_is_zeroed() {
        assert_eq!(DownloadSummary::default(), DownloadSummary { downloaded: 0, skipped: 0, failed: 0 });
    }
}
