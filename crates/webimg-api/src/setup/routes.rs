//! Route configuration and setup

use crate::constants::{
    CSV_PREPARE_PATH, CSV_PROCESS_PATH, HEALTH_PATH, HOME_PATH, OPENAPI_PATH, UPLOAD_IMAGES_PATH,
};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use webimg_core::Config;

/// Setup all application routes
pub async fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
) -> Result<Router<()>, anyhow::Error> {
    crate::error::configure_error_details(config);

    tracing::info!(
        max_upload_mb = config.max_upload_size_bytes / 1024 / 1024,
        max_concurrent_batches = config.max_concurrent_batches,
        "Request body and batch concurrency limits enabled"
    );

    // Batches resolve output names against shared folders; one semaphore
    // covers both routes.
    let batch_routes = Router::new()
        .route(CSV_PROCESS_PATH, post(handlers::csv_process::process_csv))
        .route(UPLOAD_IMAGES_PATH, post(handlers::image_upload::upload_images))
        .layer(GlobalConcurrencyLimitLayer::new(
            config.max_concurrent_batches,
        ));

    let app = Router::new()
        .route(HOME_PATH, get(handlers::home::index))
        .route(CSV_PREPARE_PATH, post(handlers::csv_prepare::prepare_csv))
        .merge(batch_routes)
        .route(HEALTH_PATH, get(handlers::health::health_check))
        .route(
            OPENAPI_PATH,
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .layer(RequestBodyLimitLayer::new(config.max_upload_size_bytes))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}
