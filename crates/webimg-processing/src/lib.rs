//! Webimg Processing Library
//!
//! The normalization pipeline: output naming, flattening and JPEG encoding,
//! the per-batch fold, CSV record extraction and sequential downloading.

pub mod batch;
pub mod csv_records;
pub mod download;
pub mod error;
pub mod image;
pub mod naming;

pub use batch::process_batch;
pub use csv_records::{
    extract_records, extract_records_from_reader, find_sku_column, list_columns,
    list_columns_from_reader,
};
pub use download::{filename_from_url, ImageDownloader};
pub use error::ProcessingError;
pub use self::image::{ImageNormalizer, Normalizer};
pub use naming::{build_output_path, resolve_unique_path, sanitize_sku, secure_filename};
