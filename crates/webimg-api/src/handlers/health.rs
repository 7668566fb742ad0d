//! Health check handler.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

const CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Run an async check with timeout; returns "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = std::io::Result<()>>,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

async fn directory_check(path: PathBuf) -> std::io::Result<()> {
    let metadata = tokio::fs::metadata(&path).await?;
    if metadata.is_dir() {
        Ok(())
    } else {
        Err(std::io::Error::other("not a directory"))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheckResponse {
    pub status: String,
    pub downloads: String,
    pub uploads: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Both storage roots are usable", body = HealthCheckResponse),
        (status = 503, description = "A storage root is missing", body = HealthCheckResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let downloads = run_check(
        CHECK_TIMEOUT,
        directory_check(state.config.download_root.clone()),
        "unhealthy",
    )
    .await;
    let uploads = run_check(
        CHECK_TIMEOUT,
        directory_check(state.config.upload_root.clone()),
        "unhealthy",
    )
    .await;

    let healthy = downloads == "healthy" && uploads == "healthy";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthCheckResponse {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            downloads,
            uploads,
        }),
    )
}
