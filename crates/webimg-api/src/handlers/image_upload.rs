use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use webimg_core::models::parse_flag;
use webimg_core::{AppError, ImageJob, NormalizeOptions, Quality};
use webimg_processing::{process_batch, resolve_unique_path};

use crate::constants::SOURCE_IMAGES;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::response::ProcessResponse;
use crate::state::AppState;
use crate::utils::upload::{extract_image_form, UploadedFile};

/// Save dropped images into a download folder and normalize them.
///
/// Form fields: repeated `images`, plus `quality`, `keep_png`,
/// `enhance_filenames` and `folder_key`.
#[utoipa::path(
    post,
    path = "/upload-images",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Batch finished", body = ProcessResponse),
        (status = 400, description = "No images in the request", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 500, description = "Images could not be stored", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_images"))]
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ProcessResponse>, HttpAppError> {
    let form = extract_image_form(multipart).await?;

    if form.files.is_empty() {
        return Err(AppError::InvalidInput("No images uploaded".to_string()).into());
    }

    let default_quality = Quality::clamped(state.config.default_quality as i64);
    let options = NormalizeOptions {
        quality: Quality::parse_or(form.quality.as_deref(), default_quality),
        keep_png: parse_flag(form.keep_png.as_deref()),
        enhance_filenames: parse_flag(form.enhance_filenames.as_deref()),
    };

    let folder = state
        .folders
        .resolve_folder_key(form.folder_key.as_deref())
        .await?;

    let directory = folder.path.clone();
    let files = form.files;
    let jobs = tokio::task::spawn_blocking(move || save_uploads(&directory, files)).await??;

    tracing::info!(
        images = jobs.len(),
        folder = %folder.key,
        quality = options.quality.value(),
        keep_png = options.keep_png,
        enhance_filenames = options.enhance_filenames,
        "Processing uploaded images"
    );

    let normalizer = state.normalizer.clone();
    let report =
        tokio::task::spawn_blocking(move || process_batch(normalizer.as_ref(), &jobs, &options))
            .await?;

    Ok(Json(ProcessResponse::from_run(
        SOURCE_IMAGES,
        &folder,
        &options,
        &[],
        report,
    )))
}

/// Write each upload under a name no other file in `directory` uses.
fn save_uploads(directory: &Path, files: Vec<UploadedFile>) -> Result<Vec<ImageJob>, AppError> {
    let mut jobs = Vec::with_capacity(files.len());
    for file in files {
        let destination = resolve_unique_path(directory, &file.file_name);
        std::fs::write(&destination, &file.data).map_err(|e| {
            AppError::Storage(format!(
                "Failed to save {}: {}",
                destination.display(),
                e
            ))
        })?;
        tracing::debug!(
            original = %file.file_name,
            path = %destination.display(),
            size_bytes = file.data.len(),
            "Uploaded image saved"
        );
        jobs.push(ImageJob::new(destination, None));
    }
    Ok(jobs)
}
