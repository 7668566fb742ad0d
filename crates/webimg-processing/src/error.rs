use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the processing pipeline.
///
/// Per-item variants (`Decode`, `Encode`, `Io`, `Http*`) are folded into batch
/// reports by the callers; only `ColumnNotFound`, `Csv` and `ClientBuild`
/// normally reach the HTTP layer.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode JPEG: {0}")]
    Encode(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Column '{column}' not found in CSV. Available columns: {}", available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),
}

impl ProcessingError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProcessingError::Io {
            path: path.into(),
            source,
        }
    }
}
