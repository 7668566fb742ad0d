use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use webimg_core::models::parse_flag;
use webimg_core::{AppError, NormalizeOptions, Quality};
use webimg_processing::{extract_records, process_batch, sanitize_sku};

use crate::constants::SOURCE_CSV;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::response::ProcessResponse;
use crate::state::AppState;
use crate::utils::upload::json_scalar;

/// Body of `/csv/process`. Flags and quality accept strings, numbers or booleans.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessCsvRequest {
    pub token: Option<String>,
    pub column: Option<String>,
    #[schema(value_type = Option<String>, example = "90")]
    pub quality: Option<serde_json::Value>,
    #[schema(value_type = Option<String>, example = "true")]
    pub keep_png: Option<serde_json::Value>,
    #[schema(value_type = Option<String>, example = "false")]
    pub enhance_filenames: Option<serde_json::Value>,
}

impl ProcessCsvRequest {
    fn options(&self, default_quality: Quality) -> NormalizeOptions {
        NormalizeOptions {
            quality: Quality::parse_or(json_scalar(self.quality.as_ref()).as_deref(), default_quality),
            keep_png: parse_flag(json_scalar(self.keep_png.as_ref()).as_deref()),
            enhance_filenames: parse_flag(json_scalar(self.enhance_filenames.as_ref()).as_deref()),
        }
    }
}

/// Download and normalize every image listed in a prepared CSV.
///
/// The stored CSV is discarded once the request finishes, whatever the outcome.
#[utoipa::path(
    post,
    path = "/csv/process",
    tag = "csv",
    request_body = ProcessCsvRequest,
    responses(
        (status = 200, description = "Batch finished", body = ProcessResponse),
        (status = 400, description = "Missing token, unknown token or unknown column", body = ErrorResponse),
        (status = 500, description = "CSV could not be parsed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "process_csv"))]
pub async fn process_csv(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ProcessCsvRequest>,
) -> Result<Json<ProcessResponse>, HttpAppError> {
    let token = request
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing upload token".to_string()))?
        .to_string();

    let result = run(&state, &token, &request).await;

    if let Err(e) = state.uploads.discard(&token).await {
        tracing::warn!(error = %e, "Failed to discard processed CSV");
    }

    result.map(Json)
}

async fn run(
    state: &AppState,
    token: &str,
    request: &ProcessCsvRequest,
) -> Result<ProcessResponse, HttpAppError> {
    let csv_path = state.uploads.resolve(token).await?;

    let column = request
        .column
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(&state.config.default_csv_column)
        .to_string();

    let default_quality = Quality::clamped(state.config.default_quality as i64);
    let options = request.options(default_quality);

    let (records, sku_column) = {
        let column = column.clone();
        tokio::task::spawn_blocking(move || extract_records(&csv_path, &column)).await??
    };

    let folder = state.folders.today().await?;

    tracing::info!(
        column = %column,
        records = records.len(),
        sku_column = ?sku_column,
        folder = %folder.key,
        quality = options.quality.value(),
        keep_png = options.keep_png,
        enhance_filenames = options.enhance_filenames,
        "Processing CSV"
    );

    let downloads = state.downloader.download(&records, &folder.path).await;

    let sku_applied = options.enhance_filenames
        && downloads
            .downloaded
            .iter()
            .any(|job| sanitize_sku(job.sku.as_deref()).is_some());

    let normalizer = state.normalizer.clone();
    let jobs = downloads.downloaded;
    let report =
        tokio::task::spawn_blocking(move || process_batch(normalizer.as_ref(), &jobs, &options))
            .await?;

    let mut response = ProcessResponse::from_run(
        SOURCE_CSV,
        &folder,
        &options,
        &downloads.failed_urls,
        report,
    );
    response.column = Some(column.clone());
    response.sku_column = sku_column;
    response.sku_applied = sku_applied;
    if records.is_empty() {
        response.note = Some(format!("No image URLs found in column '{}'.", column));
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: serde_json::Value) -> ProcessCsvRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn options_accept_loose_types() {
        let options = request(json!({
            "token": "t",
            "quality": "250",
            "keep_png": 1,
            "enhance_filenames": "on"
        }))
        .options(Quality::default());

        assert_eq!(options.quality.value(), 100);
        assert!(options.keep_png);
        assert!(options.enhance_filenames);
    }

    #[test]
    fn options_fall_back_to_defaults() {
        let options = request(json!({ "token": "t", "quality": "abc" })).options(Quality::clamped(80));

        assert_eq!(options.quality.value(), 80);
        assert!(!options.keep_png);
        assert!(!options.enhance_filenames);
    }
}
