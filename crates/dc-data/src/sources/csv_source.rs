use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::ReaderBuilder;
use dc_core::{CatalogError, RawRecord};
use tracing::{debug, warn};

use super::CatalogSource;
use crate::DataError;

/// Column every dataset row must carry
pub const CODE_COLUMN: &str = "Code";

/// Reads both catalog resources from delimited text files
#[derive(Debug, Clone)]
pub struct CsvCatalogSource {
    datasets: PathBuf,
    publications: Option<PathBuf>,
    delimiter: u8,
}

impl CsvCatalogSource {
    pub fn new(datasets: PathBuf, publications: Option<PathBuf>) -> Self {
        Self {
            datasets,
            publications,
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    async fn read_file(&self, path: &Path, required: Option<&'static str>) -> Result<Vec<RawRecord>, DataError> {
        tokio::task::spawn_blocking({
            let path = path.to_path_buf();
            let delimiter = self.delimiter;
            move || {
                let file = std::fs::File::open(&path)?;
                let rows = read_rows(std::io::BufReader::new(file), delimiter, required)?;
                debug!(path = %path.display(), rows = rows.len(), "read delimited file");
                Ok::<_, DataError>(rows)
            }
        })
        .await?
    }
}

#[async_trait]
impl CatalogSource for CsvCatalogSource {
    fn datasets_name(&self) -> String {
        self.datasets.display().to_string()
    }

    fn publications_name(&self) -> Option<String> {
        self.publications.as_ref().map(|p| p.display().to_string())
    }

    async fn load_datasets(&self) -> Result<Vec<RawRecord>, DataError> {
        self.read_file(&self.datasets, Some(CODE_COLUMN)).await
    }

    async fn load_publications(&self) -> Result<Option<Vec<RawRecord>>, DataError> {
        match &self.publications {
            Some(path) => self.read_file(path, None).await.map(Some),
            None => Ok(None),
        }
    }
}

/// Parse delimited text with a header row into field-name keyed rows.
///
/// Header names are trimmed. Rows shorter than the header are padded with
/// empty cells and cells beyond the header are dropped, both with a warning.
/// A missing `required` column fails the whole resource.
pub fn read_rows<R: Read>(reader: R, delimiter: u8, required: Option<&str>) -> Result<Vec<RawRecord>, DataError> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

    if let Some(column) = required {
        if !headers.iter().any(|h| h == column) {
            return Err(CatalogError::load_failure("header row", format!("missing required column {column:?}")).into());
        }
    }

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        if record.len() != headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            warn!(
                error = %CatalogError::MalformedRow { line, expected: headers.len(), found: record.len() },
                "normalizing row"
            );
        }

        let row: RawRecord = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| (header.clone(), record.get(idx).unwrap_or_default().to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quoted_cells_keep_delimiters_and_newlines() {
        let text = "Code,Name,Description\nA1,Alpha,\"first, with comma\nand a second line\"\n";
        let rows = read_rows(text.as_bytes(), b',', Some(CODE_COLUMN)).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Code"], "A1");
        assert_eq!(rows[0]["Description"], "first, with comma\nand a second line");
    }

    #[test]
    fn test_headers_trimmed_and_short_rows_padded() {
        let text = " Code , Name ,Year\nA1,Alpha\nB2,Beta,2021,extra\n";
        let rows = read_rows(text.as_bytes(), b',', Some(CODE_COLUMN)).unwrap();

        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["Code", "Name", "Year"]);
        assert_eq!(rows[0]["Year"], "");
        assert_eq!(rows[1]["Year"], "2021");
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let text = "Code,Name\nA1,Alpha\n,\nB2,Beta\n";
        let rows = read_rows(text.as_bytes(), b',', None).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_missing_code_column_fails() {
        let err = read_rows("Name\nAlpha\n".as_bytes(), b',', Some(CODE_COLUMN)).unwrap_err();
        assert!(matches!(err, DataError::Catalog(CatalogError::LoadFailure { .. })));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_tab_delimiter() {
        let rows = read_rows("Code\tName\nA1\tAlpha, Inc\n".as_bytes(), b'\t', None).unwrap();
        assert_eq!(rows[0]["Name"], "Alpha, Inc");
    }

    #[tokio::test]
    async fn test_unconfigured_publications_are_none() {
        let source = CsvCatalogSource::new(PathBuf::from("datasets.csv"), None);
        assert!(source.load_publications().await.unwrap().is_none());
        assert_eq!(source.publications_name(), None);
    }
}
