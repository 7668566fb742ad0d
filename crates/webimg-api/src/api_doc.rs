//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Webimg API",
        version = "0.1.0",
        description = "Downloads images listed in a CSV, or accepts uploaded images, and converts them to web-ready JPEG (or PNG) files."
    ),
    paths(
        handlers::csv_prepare::prepare_csv,
        handlers::csv_process::process_csv,
        handlers::image_upload::upload_images,
        handlers::health::health_check,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::csv_prepare::PrepareCsvResponse,
        handlers::csv_process::ProcessCsvRequest,
        handlers::response::ProcessResponse,
        handlers::health::HealthCheckResponse,
    )),
    tags(
        (name = "csv", description = "Two-step CSV flow: prepare, then process"),
        (name = "images", description = "Direct image upload"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
