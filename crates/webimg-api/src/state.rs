//! Application state shared by all handlers.

use std::sync::Arc;
use webimg_core::Config;
use webimg_processing::{ImageDownloader, Normalizer};
use webimg_storage::{CsvUploadStore, DownloadFolders};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Dated download folders under the download root
    pub folders: DownloadFolders,
    /// Token store for CSVs between prepare and process
    pub uploads: Arc<dyn CsvUploadStore>,
    pub downloader: ImageDownloader,
    pub normalizer: Arc<dyn Normalizer>,
}
