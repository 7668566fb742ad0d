//! Error types module
//!
//! All request-level failures are unified under [`AppError`]. Per-item failures
//! inside a batch (one URL that 404s, one corrupt image) never become an
//! `AppError`; they are folded into the batch report instead.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "INVALID_INPUT")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upload not found: {0}")]
    UploadNotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Storage(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::UploadNotFound(_) => (
            400,
            "UPLOAD_NOT_FOUND",
            false,
            Some("Upload the CSV file again to get a fresh token"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size or split the upload"),
            false,
            LogLevel::Debug,
        ),
        AppError::Csv(_) => (
            500,
            "CSV_ERROR",
            false,
            Some("Check that the file is a valid comma-separated CSV"),
            false,
            LogLevel::Warn,
        ),
        AppError::Storage(_) => (
            500,
            "STORAGE_ERROR",
            true,
            Some("Retry after a short delay"),
            false,
            LogLevel::Error,
        ),
        AppError::ImageProcessing(_) => (
            500,
            "IMAGE_PROCESSING_ERROR",
            false,
            Some("Check image format and try a different file"),
            false,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::UploadNotFound(_) => "UploadNotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Csv(_) => "Csv",
            AppError::Storage(_) => "Storage",
            AppError::ImageProcessing(_) => "ImageProcessing",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::UploadNotFound(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::Csv(ref msg) => msg.clone(),
            AppError::Storage(ref msg) => msg.clone(),
            AppError::ImageProcessing(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_invalid_input() {
        let err = AppError::InvalidInput("Column 'url' not found".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Column 'url' not found");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_upload_not_found_is_a_client_error() {
        let err = AppError::UploadNotFound("expired".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "UPLOAD_NOT_FOUND");
        assert_eq!(err.client_message(), "expired");
    }

    #[test]
    fn test_csv_error_surfaces_message() {
        let err = AppError::Csv("found record with 3 fields".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "found record with 3 fields");
        assert!(!err.is_sensitive());
    }

    #[test]
    fn test_internal_error_hides_message() {
        let err = AppError::Internal("join error".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "Internal server error");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let err: AppError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert!(err.client_message().contains("denied"));
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let source = anyhow::anyhow!("disk full").context("writing report");
        let err = AppError::from(source);
        let details = err.detailed_message();
        assert!(details.starts_with("Internal error with source"));
        assert!(details.contains("Caused by"));
    }
}
