//! CSV ingestion for convotrain.
//!
//! Reads comma-separated definition files into plain rows of strings. The
//! first row is treated as a header and skipped; rows may have varying numbers
//! of columns (entity rows carry a variable synonym tail). Column meaning is a
//! caller convention, not enforced here.

use std::path::Path;

/// Errors that can occur while reading a definition file.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to open input file: {0}")]
    Open(std::io::Error),
    #[error("failed to read CSV record: {0}")]
    Csv(csv::Error),
}

pub type IngestResult<T> = std::result::Result<T, IngestError>;

/// Reads all data rows from a CSV file.
///
/// The header row is skipped. Every remaining record is returned as a
/// `Vec<String>` of its cells, in file order. Ragged rows are allowed.
///
/// # Errors
///
/// Returns an `IngestError` if the file cannot be opened or a record cannot be
/// parsed.
pub fn read_rows(path: impl AsRef<Path>) -> IngestResult<Vec<Vec<String>>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(IngestError::Open)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(IngestError::Csv)?;
        rows.push(record.iter().map(str::to_owned).collect());
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "read definition file");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn skips_the_header_row() {
        let file = write_csv("entity,value,synonyms\nproduct,fund,mutual fund\n");

        let rows = read_rows(file.path()).expect("read rows");
        assert_eq!(rows, vec![vec!["product", "fund", "mutual fund"]]);
    }

    #[test]
    fn preserves_row_order_and_ragged_widths() {
        let file = write_csv(
            "entity,value,synonyms\n\
             product,fund,mutual fund,index fund\n\
             colour,red\n",
        );

        let rows = read_rows(file.path()).expect("read rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["product", "fund", "mutual fund", "index fund"]);
        assert_eq!(rows[1], vec!["colour", "red"]);
    }

    #[test]
    fn header_only_file_yields_no_rows() {
        let file = write_csv("intent,text\n");

        let rows = read_rows(file.path()).expect("read rows");
        assert!(rows.is_empty());
    }

    #[test]
    fn missing_file_reports_open_error() {
        let err = read_rows("/nonexistent/definitions.csv").expect_err("should fail");
        assert!(matches!(err, IngestError::Open(_)));
    }

    #[test]
    fn quoted_cells_keep_embedded_commas() {
        let file = write_csv("intent,text\n\"buy, please\",buy.product\n");

        let rows = read_rows(file.path()).expect("read rows");
        assert_eq!(rows, vec![vec!["buy, please", "buy.product"]]);
    }
}
