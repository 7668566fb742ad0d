//! Route paths and multipart field names.

pub const HOME_PATH: &str = "/";
pub const CSV_PREPARE_PATH: &str = "/csv/prepare";
pub const CSV_PROCESS_PATH: &str = "/csv/process";
pub const UPLOAD_IMAGES_PATH: &str = "/upload-images";
pub const HEALTH_PATH: &str = "/health";
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Multipart field carrying the CSV in `/csv/prepare`
pub const CSV_FILE_FIELD: &str = "file";
/// Repeated multipart field carrying images in `/upload-images`
pub const IMAGES_FIELD: &str = "images";

/// Name reported for a CSV whose filename sanitizes to nothing
pub const FALLBACK_CSV_NAME: &str = "upload.csv";

/// `source` value of responses from the image upload route
pub const SOURCE_IMAGES: &str = "images";
/// `source` value of responses from the CSV route
pub const SOURCE_CSV: &str = "csv";
