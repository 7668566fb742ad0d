//! Dated download folders
//!
//! Downloads and uploaded images land in `<root>/YYYY.MM.DD - Images`. A client
//! may name another folder through a `folder_key`; keys that escape the root
//! are ignored and the most recent dated folder is used instead.

use crate::paths::confine;
use crate::traits::{StorageError, StorageResult};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tokio::fs;
use webimg_core::constants::{DATED_FOLDER_DATE_FORMAT, DATED_FOLDER_SUFFIX};

/// A resolved, existing destination folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFolder {
    /// Path relative to the download root, `/`-separated
    pub key: String,
    pub path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct DownloadFolders {
    root: PathBuf,
}

impl DownloadFolders {
    /// Create the download root if needed.
    pub async fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create download directory {}: {}",
                root.display(),
                e
            ))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `YYYY.MM.DD - Images`
    pub fn dated_folder_name(date: NaiveDate) -> String {
        format!("{}{}", date.format(DATED_FOLDER_DATE_FORMAT), DATED_FOLDER_SUFFIX)
    }

    /// Parse the date back out of a dated folder name.
    pub fn parse_dated_folder_name(name: &str) -> Option<NaiveDate> {
        let date = name.strip_suffix(DATED_FOLDER_SUFFIX)?;
        NaiveDate::parse_from_str(date, DATED_FOLDER_DATE_FORMAT).ok()
    }

    /// Today's folder (local time), created if missing.
    pub async fn today(&self) -> StorageResult<TargetFolder> {
        self.for_date(Local::now().date_naive()).await
    }

    pub async fn for_date(&self, date: NaiveDate) -> StorageResult<TargetFolder> {
        self.ensure(&Self::dated_folder_name(date)).await
    }

    /// Most recent existing dated folder, by the date in its name.
    pub async fn latest_dated_folder(&self) -> StorageResult<Option<TargetFolder>> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut latest: Option<(NaiveDate, String)> = None;

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(date) = Self::parse_dated_folder_name(&name) {
                if latest.as_ref().map_or(true, |(d, _)| date > *d) {
                    latest = Some((date, name));
                }
            }
        }

        match latest {
            Some((_, name)) => Ok(Some(self.ensure(&name).await?)),
            None => Ok(None),
        }
    }

    /// Pick the destination for a request.
    ///
    /// No key: today's folder. A key inside the root: that folder (created if
    /// needed). A key outside the root: the latest dated folder, or today's when
    /// none exists yet.
    pub async fn resolve_folder_key(&self, folder_key: Option<&str>) -> StorageResult<TargetFolder> {
        let Some(key) = folder_key.map(str::trim).filter(|k| !k.is_empty()) else {
            return self.today().await;
        };

        match self.ensure(key).await {
            Ok(folder) => Ok(folder),
            Err(StorageError::InvalidKey(reason)) => {
                tracing::warn!(
                    folder_key = %key,
                    reason = %reason,
                    "Ignoring folder key outside download root"
                );
                match self.latest_dated_folder().await? {
                    Some(folder) => Ok(folder),
                    None => self.today().await,
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Confine `key` to the root and create the directory.
    async fn ensure(&self, key: &str) -> StorageResult<TargetFolder> {
        let candidate = Path::new(key);
        let candidate = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        };
        let path = confine(&self.root, &candidate)?;
        fs::create_dir_all(&path).await?;

        let root_abs = std::path::absolute(&self.root)?;
        let key = path
            .strip_prefix(&root_abs)
            .map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_else(|_| key.to_string());

        Ok(TargetFolder { key, path })
    }
}
