//! CSV-backed dataset provider

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use csv::ReaderBuilder;
use indexmap::IndexMap;
use tracing::{info, warn};

use px_core::record::{Record, RecordSet};
use px_core::services::{DatasetProvider, DatasetRequest};

use crate::DataError;

/// Name of the required projection x column
const X_COLUMN: &str = "x";
/// Name of the required projection y column
const Y_COLUMN: &str = "y";

/// Loads records from a CSV file that carries the projection
/// coordinates alongside the feature columns.
///
/// Ids are assigned by row order and stay stable for the lifetime of
/// the loaded set. Columns that fail to parse as numbers anywhere are
/// skipped with a warning; `x` and `y` must parse in every row.
pub struct CsvRecordSource {
    /// Path to the CSV file
    path: PathBuf,
}

impl CsvRecordSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Parse a CSV stream into a record set
    pub fn read_records<R: Read>(reader: R) -> Result<RecordSet, DataError> {
        let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|header| header.to_string())
            .collect();
        let x_index = headers
            .iter()
            .position(|header| header == X_COLUMN)
            .ok_or(DataError::MissingProjectionColumn(X_COLUMN))?;
        let y_index = headers
            .iter()
            .position(|header| header == Y_COLUMN)
            .ok_or(DataError::MissingProjectionColumn(Y_COLUMN))?;

        // First pass: parse every cell, tracking which columns stay numeric
        let mut rows: Vec<Vec<Option<f64>>> = Vec::new();
        let mut numeric = vec![true; headers.len()];
        for result in csv_reader.records() {
            let row = result?;
            let parsed: Vec<Option<f64>> = row
                .iter()
                .map(|cell| cell.trim().parse::<f64>().ok())
                .collect();
            for (index, value) in parsed.iter().enumerate() {
                if value.is_none() {
                    numeric[index] = false;
                }
            }
            rows.push(parsed);
        }

        for (index, header) in headers.iter().enumerate() {
            if !numeric[index] && index != x_index && index != y_index {
                warn!(column = %header, "skipping non-numeric column");
            }
        }

        let mut records = Vec::with_capacity(rows.len());
        for (row_index, parsed) in rows.into_iter().enumerate() {
            let (x, y) = match (parsed[x_index], parsed[y_index]) {
                (Some(x), Some(y)) => (x, y),
                (None, _) => return Err(DataError::NonNumericProjection(X_COLUMN)),
                (_, None) => return Err(DataError::NonNumericProjection(Y_COLUMN)),
            };

            let mut columns = IndexMap::new();
            for (index, header) in headers.iter().enumerate() {
                if index == x_index || index == y_index || !numeric[index] {
                    continue;
                }
                if let Some(value) = parsed[index] {
                    columns.insert(header.clone(), value);
                }
            }
            records.push(Record::new(row_index as u64, x, y, columns));
        }

        Ok(RecordSet::new(records)?)
    }

    fn load_from_path(path: &Path) -> Result<RecordSet, DataError> {
        let file = std::fs::File::open(path)?;
        Self::read_records(std::io::BufReader::new(file))
    }
}

#[async_trait]
impl DatasetProvider for CsvRecordSource {
    async fn load_records(&self, request: &DatasetRequest) -> anyhow::Result<Arc<RecordSet>> {
        let path = self.path.clone();
        let records = tokio::task::spawn_blocking(move || Self::load_from_path(&path))
            .await
            .map_err(DataError::Join)??;

        info!(
            dataset = %request.dataset,
            projection = %request.projection_algorithm,
            rows = records.len(),
            "loaded csv dataset"
        );
        Ok(Arc::new(records))
    }

    fn source_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
x,y,alcohol,quality,label
0.5,1.5,9.4,5,wine
1.5,2.5,9.8,6,wine
2.5,3.5,10.2,7,wine
";

    #[test]
    fn test_read_records_assigns_row_ids() {
        let set = CsvRecordSource::read_records(SAMPLE.as_bytes()).unwrap();
        assert_eq!(set.len(), 3);

        let record = set.get(1).unwrap();
        assert_eq!(record.x, 1.5);
        assert_eq!(record.y, 2.5);
        assert_eq!(record.columns.get("alcohol"), Some(&9.8));
        assert_eq!(record.columns.get("quality"), Some(&6.0));
    }

    #[test]
    fn test_non_numeric_columns_are_skipped() {
        let set = CsvRecordSource::read_records(SAMPLE.as_bytes()).unwrap();
        assert_eq!(
            set.feature_columns(),
            vec!["alcohol".to_string(), "quality".to_string()]
        );
    }

    #[test]
    fn test_missing_projection_column_errors() {
        let result = CsvRecordSource::read_records("y,alcohol\n1.0,9.4\n".as_bytes());
        assert!(matches!(
            result,
            Err(DataError::MissingProjectionColumn("x"))
        ));
    }

    #[test]
    fn test_non_numeric_projection_cell_errors() {
        let result = CsvRecordSource::read_records("x,y\n1.0,oops\n".as_bytes());
        assert!(matches!(result, Err(DataError::NonNumericProjection("y"))));
    }

    #[tokio::test]
    async fn test_provider_loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = CsvRecordSource::new(file.path().to_path_buf());
        let request = DatasetRequest::new("redwine", "tsne");
        let records = source.load_records(&request).await.unwrap();

        assert_eq!(records.len(), 3);
        assert!(!source.source_name().is_empty());
    }
}
