use crate::core::{PipelineError, Result, TableRecord};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads the input CSV datasets from a base directory into typed rows.
pub struct CsvSource {
    base_dir: PathBuf,
    delimiter: u8,
}

impl CsvSource {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read `file_name` under the base directory into rows of `T`,
    /// preserving file order. The header is validated against
    /// `T::REQUIRED_COLUMNS` before any row is parsed; columns the record
    /// type does not name are ignored.
    pub async fn read<T: TableRecord>(&self, file_name: &str) -> Result<Vec<T>> {
        let path = self.base_dir.join(file_name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(PipelineError::NotFound(path));
            }
            Err(err) => return Err(err.into()),
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .from_reader(bytes.as_slice());

        let headers = reader.headers()?.clone();
        let missing: Vec<&str> = T::REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::Schema(format!(
                "{file_name} is missing required columns: {}",
                missing.join(", ")
            )));
        }

        let mut rows = Vec::new();
        for record in reader.deserialize() {
            rows.push(record?);
        }
        Ok(rows)
    }
}
