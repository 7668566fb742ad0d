//! Common utilities for multipart upload handlers

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use webimg_core::AppError;

use crate::constants::{CSV_FILE_FIELD, IMAGES_FIELD};

/// One file part of a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Fields of the `/upload-images` form, in raw text form.
#[derive(Debug, Default)]
pub struct ImageUploadForm {
    pub files: Vec<UploadedFile>,
    pub quality: Option<String>,
    pub keep_png: Option<String>,
    pub enhance_filenames: Option<String>,
    pub folder_key: Option<String>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload exceeds the size limit: {}", e.body_text()))
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", e.body_text()))
    }
}

async fn read_file(field: Field<'_>) -> Result<Option<UploadedFile>, AppError> {
    let file_name = field.file_name().map(str::to_string).unwrap_or_default();
    let data = field.bytes().await.map_err(multipart_error)?;

    // Browsers send an empty, unnamed part when no file was picked.
    if file_name.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(UploadedFile {
        file_name,
        data: data.to_vec(),
    }))
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(multipart_error)
}

/// Extract the CSV part of `/csv/prepare`.
///
/// Only one field named "file" is accepted.
pub async fn extract_csv_file(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    let mut file: Option<UploadedFile> = None;
    let mut seen = false;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(CSV_FILE_FIELD) {
            continue;
        }
        if seen {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }
        seen = true;
        file = read_file(field).await?;
    }

    match (seen, file) {
        (false, _) => Err(AppError::InvalidInput("No file provided".to_string())),
        (true, None) => Err(AppError::InvalidInput("No file selected".to_string())),
        (true, Some(file)) => Ok(file),
    }
}

/// Collect every part of `/upload-images`. Unknown fields are ignored.
pub async fn extract_image_form(mut multipart: Multipart) -> Result<ImageUploadForm, AppError> {
    let mut form = ImageUploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string).unwrap_or_default();
        match name.as_str() {
            IMAGES_FIELD => {
                if let Some(file) = read_file(field).await? {
                    form.files.push(file);
                }
            }
            "quality" => form.quality = Some(read_text(field).await?),
            "keep_png" => form.keep_png = Some(read_text(field).await?),
            "enhance_filenames" => form.enhance_filenames = Some(read_text(field).await?),
            "folder_key" => form.folder_key = Some(read_text(field).await?),
            _ => {}
        }
    }

    Ok(form)
}

/// Render a JSON scalar the way a form field would carry it.
pub fn json_scalar(value: Option<&serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
