use crate::paths::{confine, sanitize_token};
use crate::traits::{CsvUploadStore, StorageError, StorageResult};
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const TOKEN_BYTES: usize = 24;

/// Local filesystem CSV upload store
///
/// Each upload lives at `<root>/<token>.csv`.
#[derive(Clone, Debug)]
pub struct LocalUploadStore {
    base_path: PathBuf,
}

impl LocalUploadStore {
    /// Create a new LocalUploadStore, creating `base_path` if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create upload directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalUploadStore { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn generate_token() -> String {
        let bytes: [u8; TOKEN_BYTES] = rand::random();
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Convert a token to its backing path; the token is sanitized first.
    fn token_to_path(&self, token: &str) -> StorageResult<PathBuf> {
        let token = sanitize_token(token);
        if token.is_empty() {
            return Err(StorageError::NotFound("empty upload token".to_string()));
        }
        confine(&self.base_path, &self.base_path.join(format!("{}.csv", token)))
    }
}

#[async_trait]
impl CsvUploadStore for LocalUploadStore {
    async fn prepare(&self, original_filename: &str, data: Vec<u8>) -> StorageResult<String> {
        let token = Self::generate_token();
        let path = self.token_to_path(&token)?;
        let size = data.len();
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            original_filename = %original_filename,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "CSV upload stored"
        );

        Ok(token)
    }

    async fn resolve(&self, token: &str) -> StorageResult<PathBuf> {
        let path = self.token_to_path(token)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(format!(
                "no upload for token {}",
                sanitize_token(token)
            )));
        }

        Ok(path)
    }

    async fn discard(&self, token: &str) -> StorageResult<()> {
        let path = match self.token_to_path(token) {
            Ok(path) => path,
            Err(StorageError::NotFound(_)) => return Ok(()),
            Err(e) => return Err(e),
        };

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "CSV upload discarded");

        Ok(())
    }
}
