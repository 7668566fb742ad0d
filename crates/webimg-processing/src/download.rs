//! Sequential image downloader
//!
//! Each URL is fetched one after the other into a unique path of the target
//! folder. A failing URL is recorded and skipped; it never aborts the run.

use crate::error::ProcessingError;
use crate::naming::resolve_unique_path;
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use webimg_core::constants::FALLBACK_DOWNLOAD_NAME;
use webimg_core::{CsvRecord, DownloadReport, ImageJob};

/// Last path segment of `url`, percent-decoded, or `image.jpg`.
pub fn filename_from_url(url: &str) -> String {
    let segment = match reqwest::Url::parse(url.trim()) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .map(str::to_string),
    };

    segment
        .map(|s| percent_decode_str(&s).decode_utf8_lossy().into_owned())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_DOWNLOAD_NAME.to_string())
}

#[derive(Clone, Debug)]
pub struct ImageDownloader {
    client: reqwest::Client,
}

impl ImageDownloader {
    /// `timeout` bounds each request, not the whole run.
    pub fn new(timeout: Duration) -> Result<Self, ProcessingError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProcessingError::ClientBuild(e.to_string()))?;
        Ok(Self { client })
    }

    /// Download every record into `target_dir`, in order.
    pub async fn download(&self, records: &[CsvRecord], target_dir: &Path) -> DownloadReport {
        let mut report = DownloadReport::default();

        for record in records {
            let destination =
                match unique_destination(target_dir, filename_from_url(&record.url)).await {
                    Ok(path) => path,
                    Err(e) => {
                        tracing::warn!(url = %record.url, error = %e, "Download failed");
                        report.failed_urls.push(record.url.clone());
                        continue;
                    }
                };

            match self.fetch_to(&record.url, &destination).await {
                Ok(size) => {
                    tracing::debug!(
                        url = %record.url,
                        path = %destination.display(),
                        size_bytes = size,
                        "Image downloaded"
                    );
                    report
                        .downloaded
                        .push(ImageJob::new(destination, record.sku.clone()));
                }
                Err(e) => {
                    tracing::warn!(url = %record.url, error = %e, "Download failed");
                    discard_partial(&destination).await;
                    report.failed_urls.push(record.url.clone());
                }
            }
        }

        tracing::info!(
            requested = records.len(),
            downloaded = report.downloaded.len(),
            failed = report.failed_urls.len(),
            target = %target_dir.display(),
            "Download run finished"
        );

        report
    }

    async fn fetch_to(&self, url: &str, destination: &Path) -> Result<u64, ProcessingError> {
        let mut response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ProcessingError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let mut file = fs::File::create(destination)
            .await
            .map_err(|e| ProcessingError::io(destination, e))?;

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk)
                .await
                .map_err(|e| ProcessingError::io(destination, e))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| ProcessingError::io(destination, e))?;

        Ok(written)
    }
}

/// Resolve the download name off the async runtime; the resolver stats files.
async fn unique_destination(target_dir: &Path, name: String) -> Result<PathBuf, ProcessingError> {
    let directory = target_dir.to_path_buf();
    tokio::task::spawn_blocking(move || resolve_unique_path(&directory, &name))
        .await
        .map_err(|e| ProcessingError::io(target_dir, std::io::Error::other(e)))
}

/// Remove whatever a failed fetch left at `destination`.
async fn discard_partial(destination: &Path) {
    if !fs::try_exists(destination).await.unwrap_or(false) {
        return;
    }
    if let Err(e) = fs::remove_file(destination).await {
        tracing::warn!(
            path = %destination.display(),
            error = %e,
            "Failed to remove partial download"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn downloader() -> ImageDownloader {
        ImageDownloader::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn filename_from_url_variants() {
        assert_eq!(filename_from_url("http://x/a/b/shoe.jpg"), "shoe.jpg");
        assert_eq!(filename_from_url("http://x/a/shoe.jpg?w=100#top"), "shoe.jpg");
        assert_eq!(filename_from_url("http://x/my%20shoe.png"), "my shoe.png");
        assert_eq!(filename_from_url("http://x/"), "image.jpg");
        assert_eq!(filename_from_url("http://x"), "image.jpg");
        assert_eq!(filename_from_url("not a url/pic.gif?x=1"), "pic.gif");
    }

    #[tokio::test]
    async fn failed_url_does_not_stop_the_run() {
        let mut server = mockito::Server::new_async().await;
        let a = server
            .mock("GET", "/a.jpg")
            .with_status(200)
            .with_body("aaa")
            .create_async()
            .await;
        let missing = server
            .mock("GET", "/missing.jpg")
            .with_status(404)
            .create_async()
            .await;
        let c = server
            .mock("GET", "/c.jpg")
            .with_status(200)
            .with_body("ccc")
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let records = vec![
            CsvRecord::new(format!("{}/a.jpg", server.url()), Some("S1".into())),
            CsvRecord::new(format!("{}/missing.jpg", server.url()), Some("S2".into())),
            CsvRecord::new(format!("{}/c.jpg", server.url()), None),
        ];

        let report = downloader().download(&records, dir.path()).await;

        assert_eq!(
            report.downloaded,
            vec![
                ImageJob::new(dir.path().join("a.jpg"), Some("S1".into())),
                ImageJob::new(dir.path().join("c.jpg"), None),
            ]
        );
        assert_eq!(report.failed_urls, vec![records[1].url.clone()]);
        assert!(!dir.path().join("missing.jpg").exists());
        assert_eq!(std::fs::read(dir.path().join("c.jpg")).unwrap(), b"ccc");

        a.assert_async().await;
        missing.assert_async().await;
        c.assert_async().await;
    }

    #[tokio::test]
    async fn duplicate_names_get_counters() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/same.jpg")
            .with_status(200)
            .with_body("x")
            .expect(2)
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let url = format!("{}/same.jpg", server.url());
        let records = vec![CsvRecord::new(&url, None), CsvRecord::new(&url, None)];

        let report = downloader().download(&records, dir.path()).await;

        let paths: Vec<_> = report.downloaded.iter().map(|j| j.source_path.clone()).collect();
        assert_eq!(
            paths,
            vec![dir.path().join("same.jpg"), dir.path().join("same_1.jpg")]
        );
    }

    #[tokio::test]
    async fn discard_partial_removes_leftover_file() {
        let dir = tempdir().unwrap();
        let partial = dir.path().join("half.jpg");
        std::fs::write(&partial, b"half").unwrap();

        discard_partial(&partial).await;
        assert!(!partial.exists());

        // Already gone: nothing to do.
        discard_partial(&partial).await;
    }

    #[tokio::test]
    async fn discard_partial_survives_removal_failure() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-file.jpg");
        std::fs::create_dir(&blocker).unwrap();

        discard_partial(&blocker).await;
        assert!(blocker.is_dir());
    }

    #[tokio::test]
    async fn unreachable_host_is_recorded() {
        let dir = tempdir().unwrap();
        let records = vec![CsvRecord::new("http://127.0.0.1:1/a.jpg", None)];

        let report = downloader().download(&records, dir.path()).await;

        assert!(report.downloaded.is_empty());
        assert_eq!(report.failed_urls, vec!["http://127.0.0.1:1/a.jpg".to_string()]);
    }
}
