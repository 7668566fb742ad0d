//! CSV record extraction
//!
//! Reads the URL column (and an optional `sku` column) out of an uploaded CSV.
//! Cells holding the usual spreadsheet "not available" markers count as
//! missing, the same as empty cells.

use crate::error::ProcessingError;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use webimg_core::constants::SKU_COLUMN;
use webimg_core::CsvRecord;

const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn open(path: &Path) -> Result<File, ProcessingError> {
    File::open(path).map_err(|e| ProcessingError::io(path, e))
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(input)
}

fn header_names<R: Read>(reader: &mut csv::Reader<R>) -> Result<Vec<String>, ProcessingError> {
    let headers = reader.headers()?;
    Ok(headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect())
}

/// Cell value, trimmed, or `None` when missing or an NA marker.
fn present(cell: Option<&str>) -> Option<String> {
    let value = cell?.trim();
    if NA_MARKERS.contains(&value) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Header names in file order. An empty file yields no columns.
pub fn list_columns(path: &Path) -> Result<Vec<String>, ProcessingError> {
    list_columns_from_reader(open(path)?)
}

pub fn list_columns_from_reader<R: Read>(input: R) -> Result<Vec<String>, ProcessingError> {
    let columns = header_names(&mut reader(input))?;
    if columns.len() == 1 && columns[0].is_empty() {
        return Ok(Vec::new());
    }
    Ok(columns)
}

/// Position of the first column named `sku`, ignoring case.
pub fn find_sku_column(columns: &[String]) -> Option<usize> {
    columns
        .iter()
        .position(|c| c.trim().eq_ignore_ascii_case(SKU_COLUMN))
}

/// Records from `column`, with the name of the SKU column used, if any.
pub fn extract_records(
    path: &Path,
    column: &str,
) -> Result<(Vec<CsvRecord>, Option<String>), ProcessingError> {
    extract_records_from_reader(open(path)?, column)
}

pub fn extract_records_from_reader<R: Read>(
    input: R,
    column: &str,
) -> Result<(Vec<CsvRecord>, Option<String>), ProcessingError> {
    let mut reader = reader(input);
    let columns = header_names(&mut reader)?;

    let Some(url_index) = columns.iter().position(|c| c == column) else {
        return Err(ProcessingError::ColumnNotFound {
            column: column.to_string(),
            available: columns,
        });
    };
    let sku_index = find_sku_column(&columns);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let Some(url) = present(row.get(url_index)) else {
            continue;
        };
        let sku = sku_index.and_then(|i| present(row.get(i)));
        records.push(CsvRecord::new(url, sku));
    }

    tracing::debug!(
        column = %column,
        records = records.len(),
        sku_column = ?sku_index.map(|i| &columns[i]),
        "CSV records extracted"
    );

    Ok((records, sku_index.map(|i| columns[i].clone())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn skips_blank_and_missing_urls() {
        let csv = "1000image,sku\nhttp://x/a.jpg,S1\n,S2\nNaN,S3\n";
        let (records, sku_column) = extract_records_from_reader(csv.as_bytes(), "1000image").unwrap();

        assert_eq!(records, vec![CsvRecord::new("http://x/a.jpg", Some("S1".into()))]);
        assert_eq!(sku_column.as_deref(), Some("sku"));
    }

    #[test]
    fn trims_values_and_preserves_order() {
        let csv = "img,SKU\n  http://x/b.png , B \nhttp://x/a.jpg,\n   ,C\n";
        let (records, sku_column) = extract_records_from_reader(csv.as_bytes(), "img").unwrap();

        assert_eq!(
            records,
            vec![
                CsvRecord::new("http://x/b.png", Some("B".into())),
                CsvRecord::new("http://x/a.jpg", None),
            ]
        );
        assert_eq!(sku_column.as_deref(), Some("SKU"));
    }

    #[test]
    fn short_rows_are_missing_values() {
        let csv = "sku,1000image\nS1\nS2,http://x/c.jpg\n";
        let (records, _) = extract_records_from_reader(csv.as_bytes(), "1000image").unwrap();
        assert_eq!(records, vec![CsvRecord::new("http://x/c.jpg", Some("S2".into()))]);
    }

    #[test]
    fn no_sku_column() {
        let csv = "1000image\nhttp://x/a.jpg\n";
        let (records, sku_column) = extract_records_from_reader(csv.as_bytes(), "1000image").unwrap();
        assert_eq!(records, vec![CsvRecord::new("http://x/a.jpg", None)]);
        assert!(sku_column.is_none());
    }

    #[test]
    fn missing_column_lists_available() {
        let csv = "url,sku\nhttp://x/a.jpg,S1\n";
        let err = extract_records_from_reader(csv.as_bytes(), "1000image").unwrap_err();

        match &err {
            ProcessingError::ColumnNotFound { column, available } => {
                assert_eq!(column, "1000image");
                assert_eq!(available, &columns(&["url", "sku"]));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("Available columns: url, sku"));
    }

    #[test]
    fn sku_lookup_takes_first_case_insensitive_match() {
        assert_eq!(find_sku_column(&columns(&["a", "Sku", "sku"])), Some(1));
        assert_eq!(find_sku_column(&columns(&["a", "skus"])), None);
    }

    #[test]
    fn list_columns_strips_bom() {
        let csv = "\u{feff}1000image,sku\nx,y\n";
        assert_eq!(
            list_columns_from_reader(csv.as_bytes()).unwrap(),
            columns(&["1000image", "sku"])
        );
    }

    #[test]
    fn list_columns_of_empty_input() {
        assert!(list_columns_from_reader("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn extract_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        std::fs::write(&path, "1000image\nhttp://x/a.jpg\n").unwrap();

        let (records, _) = extract_records(&path, "1000image").unwrap();
        assert_eq!(records.len(), 1);
        assert!(matches!(
            extract_records(&dir.path().join("nope.csv"), "1000image"),
            Err(ProcessingError::Io { .. })
        ));
    }
}
