use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use webimg_core::AppError;
use webimg_processing::{list_columns, secure_filename};

use crate::constants::FALLBACK_CSV_NAME;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_csv_file;

#[derive(Debug, Serialize, ToSchema)]
pub struct PrepareCsvResponse {
    /// Opaque handle for `/csv/process`
    pub token: String,
    pub columns: Vec<String>,
    /// Column preselected in the form
    pub default_column: String,
    pub filename: String,
}

/// Store an uploaded CSV and list its columns.
#[utoipa::path(
    post,
    path = "/csv/prepare",
    tag = "csv",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "CSV stored", body = PrepareCsvResponse),
        (status = 400, description = "Missing file or unreadable header", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "CSV could not be parsed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "prepare_csv"))]
pub async fn prepare_csv(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<PrepareCsvResponse>, HttpAppError> {
    let upload = extract_csv_file(multipart).await?;

    let mut filename = secure_filename(&upload.file_name);
    if filename.is_empty() {
        filename = FALLBACK_CSV_NAME.to_string();
    }

    let token = state.uploads.prepare(&filename, upload.data).await?;

    match read_columns(&state, &token).await {
        Ok(columns) => {
            let default_column = if columns.contains(&state.config.default_csv_column) {
                state.config.default_csv_column.clone()
            } else {
                columns[0].clone()
            };

            tracing::info!(
                filename = %filename,
                columns = columns.len(),
                default_column = %default_column,
                "CSV prepared"
            );

            Ok(Json(PrepareCsvResponse {
                token,
                columns,
                default_column,
                filename,
            }))
        }
        Err(e) => {
            if let Err(discard_err) = state.uploads.discard(&token).await {
                tracing::warn!(error = %discard_err, "Failed to discard rejected CSV");
            }
            Err(e)
        }
    }
}

/// Header of the stored CSV; never empty on success.
async fn read_columns(state: &AppState, token: &str) -> Result<Vec<String>, HttpAppError> {
    let path = state.uploads.resolve(token).await?;
    let columns = tokio::task::spawn_blocking(move || list_columns(&path)).await??;

    if columns.is_empty() {
        return Err(AppError::InvalidInput("CSV file has no header row".to_string()).into());
    }
    Ok(columns)
}
