//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Domain errors
//! (`AppError`, `StorageError`, `ProcessingError`) convert into `HttpAppError`
//! and render as an [`ErrorResponse`] with the status from [`ErrorMetadata`].

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use utoipa::ToSchema;
use webimg_core::{AppError, Config, ErrorMetadata, LogLevel};
use webimg_processing::ProcessingError;
use webimg_storage::StorageError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse (orphan rule).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<tokio::task::JoinError> for HttpAppError {
    fn from(err: tokio::task::JoinError) -> Self {
        HttpAppError(AppError::Internal(format!("Background task failed: {}", err)))
    }
}

/// Convert JSON body deserialization failures into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that returns our ErrorResponse format (400 + JSON) on deserialization failure.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// Hidden once the router is built for production.
static DETAILS_VISIBLE: AtomicBool = AtomicBool::new(true);

/// Set from `Config::is_production` when the router is built.
pub fn configure_error_details(config: &Config) {
    DETAILS_VISIBLE.store(!config.is_production(), Ordering::Relaxed);
}

impl HttpAppError {
    fn render(&self, details_visible: bool) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Never for sensitive errors.
        let show_details = details_visible && !app_error.is_sensitive();

        let body = ErrorResponse {
            error: app_error.client_message(),
            details: show_details.then(|| app_error.detailed_message()),
            error_type: show_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        };

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        self.render(DETAILS_VISIBLE.load(Ordering::Relaxed))
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(_) => AppError::UploadNotFound(
                "Upload not found or expired. Please upload the CSV again.".to_string(),
            ),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::UploadFailed(msg)
            | StorageError::DeleteFailed(msg)
            | StorageError::ConfigError(msg) => AppError::Storage(msg),
            StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
        };
        HttpAppError(app)
    }
}

impl From<ProcessingError> for HttpAppError {
    fn from(err: ProcessingError) -> Self {
        let app = match err {
            ProcessingError::ColumnNotFound { .. } => AppError::InvalidInput(err.to_string()),
            ProcessingError::Csv(_) => AppError::Csv(err.to_string()),
            ProcessingError::Decode { .. } | ProcessingError::Encode(_) => {
                AppError::ImageProcessing(err.to_string())
            }
            ProcessingError::Io { .. } => AppError::Storage(err.to_string()),
            ProcessingError::Http(_)
            | ProcessingError::HttpStatus { .. }
            | ProcessingError::ClientBuild(_) => AppError::Internal(err.to_string()),
        };
        HttpAppError(app)
    }
}
