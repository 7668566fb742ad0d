use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One image waiting for normalization, with the SKU of the CSV row it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageJob {
    pub source_path: PathBuf,
    pub sku: Option<String>,
}

impl ImageJob {
    pub fn new(source_path: impl Into<PathBuf>, sku: Option<String>) -> Self {
        Self {
            source_path: source_path.into(),
            sku,
        }
    }

    /// File name of the source, used for failure reporting.
    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.display().to_string())
    }
}

/// A non-blank URL cell from the selected CSV column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRecord {
    pub url: String,
    pub sku: Option<String>,
}

impl CsvRecord {
    pub fn new(url: impl Into<String>, sku: Option<String>) -> Self {
        Self {
            url: url.into(),
            sku,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_uses_last_component() {
        let job = ImageJob::new("/tmp/day/shoe.png", Some("S1".to_string()));
        assert_eq!(job.file_name(), "shoe.png");
    }
}
