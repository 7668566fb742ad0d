//! Domain models shared by the processing pipeline and the HTTP layer.

pub mod job;
pub mod report;
pub mod settings;

pub use job::{CsvRecord, ImageJob};
pub use report::{BatchReport, DownloadReport};
pub use settings::{parse_flag, NormalizeOptions, Quality};
