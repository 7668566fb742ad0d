//! Storage roots, downloader and normalizer construction.

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use webimg_core::Config;
use webimg_processing::{ImageDownloader, ImageNormalizer};
use webimg_storage::{DownloadFolders, LocalUploadStore};

pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let folders = DownloadFolders::new(&config.download_root)
        .await
        .context("Failed to initialize download folder")?;

    let uploads = LocalUploadStore::new(&config.upload_root)
        .await
        .context("Failed to initialize upload store")?;

    let downloader = ImageDownloader::new(Duration::from_secs(config.download_timeout_secs))
        .context("Failed to initialize downloader")?;

    tracing::info!(
        download_root = %folders.root().display(),
        upload_root = %uploads.base_path().display(),
        timeout_secs = config.download_timeout_secs,
        "Services initialized"
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        folders,
        uploads: Arc::new(uploads),
        downloader,
        normalizer: Arc::new(ImageNormalizer::new()),
    }))
}
