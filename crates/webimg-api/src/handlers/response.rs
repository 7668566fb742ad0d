//! Response body shared by the CSV and image upload routes.

use serde::Serialize;
use utoipa::ToSchema;
use webimg_core::{BatchReport, NormalizeOptions};
use webimg_storage::TargetFolder;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessResponse {
    pub message: String,
    /// Output file names, in job order
    pub processed: Vec<String>,
    /// `Download failed: <url>` and `Conversion failed: <file>` entries
    pub skipped: Vec<String>,
    /// Destination folder, relative to the download root
    pub folder_key: String,
    /// Absolute destination folder
    pub download_folder: String,
    pub quality: u8,
    pub keep_png: bool,
    pub enhance_filenames: bool,
    pub sku_applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_count: Option<usize>,
    /// `csv` or `images`
    pub source: String,
}

impl ProcessResponse {
    /// Assemble the response for a finished run.
    ///
    /// `failed_downloads` holds URLs, `report.failed` file names.
    pub fn from_run(
        source: &str,
        folder: &TargetFolder,
        options: &NormalizeOptions,
        failed_downloads: &[String],
        report: BatchReport,
    ) -> Self {
        let skipped: Vec<String> = failed_downloads
            .iter()
            .map(|url| format!("Download failed: {}", url))
            .chain(
                report
                    .failed
                    .iter()
                    .map(|name| format!("Conversion failed: {}", name)),
            )
            .collect();

        let processed = report.processed;

        let message = match processed.len() {
            0 => "No images were processed".to_string(),
            1 => "Processed 1 image".to_string(),
            n => format!("Processed {} images", n),
        };

        let note = match (processed.is_empty(), skipped.is_empty()) {
            (true, true) => Some("No images found to process.".to_string()),
            (true, false) => Some(
                "None of the images could be processed. Check that the URLs are reachable and point to image files."
                    .to_string(),
            ),
            (false, false) => Some(format!(
                "{} item(s) were skipped. See the skipped list for details.",
                skipped.len()
            )),
            (false, true) => None,
        };

        let skipped_count = (!skipped.is_empty()).then_some(skipped.len());

        ProcessResponse {
            message,
            processed,
            skipped,
            folder_key: folder.key.clone(),
            download_folder: folder.path.display().to_string(),
            quality: options.quality.value(),
            keep_png: options.keep_png,
            enhance_filenames: options.enhance_filenames,
            sku_applied: false,
            column: None,
            sku_column: None,
            note,
            skipped_count,
            source: source.to_string(),
        }
    }
}
