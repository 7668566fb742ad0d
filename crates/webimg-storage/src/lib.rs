//! Webimg Storage Library
//!
//! On-disk state owned by the service: the CSV upload-token store and the
//! per-day download folders. Every path handed out by this crate is confined to
//! its configured root; callers never join user input onto a root themselves.

pub mod folders;
pub mod local;
pub(crate) mod paths;
pub mod traits;

// Re-export commonly used types
pub use folders::{DownloadFolders, TargetFolder};
pub use local::LocalUploadStore;
pub use traits::{CsvUploadStore, StorageError, StorageResult};
