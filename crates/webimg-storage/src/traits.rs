//! Storage abstraction trait
//!
//! This module defines the CSV upload store used between the prepare and
//! process steps of the CSV flow.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Temporary storage for uploaded CSV files, addressed by opaque tokens.
///
/// A token is issued by [`prepare`](CsvUploadStore::prepare), looked up by
/// [`resolve`](CsvUploadStore::resolve) and must be released exactly once with
/// [`discard`](CsvUploadStore::discard).
#[async_trait]
pub trait CsvUploadStore: Send + Sync {
    /// Persist an uploaded CSV and return the token that refers to it.
    async fn prepare(&self, original_filename: &str, data: Vec<u8>) -> StorageResult<String>;

    /// Path of the stored CSV for `token`.
    ///
    /// Returns `StorageError::NotFound` when the token is empty after
    /// sanitization or no file backs it.
    async fn resolve(&self, token: &str) -> StorageResult<PathBuf>;

    /// Delete the stored CSV. Deleting an already-removed token is not an error.
    async fn discard(&self, token: &str) -> StorageResult<()>;
}
