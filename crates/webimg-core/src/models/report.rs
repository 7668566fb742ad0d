use serde::Serialize;

use super::job::ImageJob;

/// Outcome of a conversion batch: file names in job order, no deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub processed: Vec<String>,
    pub failed: Vec<String>,
}

impl BatchReport {
    pub fn is_empty(&self) -> bool {
        self.processed.is_empty() && self.failed.is_empty()
    }
}

/// Outcome of a download run.
///
/// `failed_urls` holds the URLs exactly as they appeared in the CSV, not the
/// file names derived from them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub downloaded: Vec<ImageJob>,
    pub failed_urls: Vec<String>,
}
