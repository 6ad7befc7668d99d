use crate::core::{EnrichedOrder, Result, Sink};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the enriched orders table to a CSV file, overwriting any previous
/// output. Parent directories are created as needed. No index column is
/// written; the header comes from the record's field names.
pub struct CsvSink {
    path: PathBuf,
    delimiter: u8,
}

impl CsvSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

#[async_trait]
impl Sink for CsvSink {
    async fn write(&self, orders: &[EnrichedOrder]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());
        for order in orders {
            writer.serialize(order)?;
        }
        let buffer = writer
            .into_inner()
            .map_err(|err| err.into_error())?;

        tokio::fs::write(&self.path, buffer).await?;
        info!(path = %self.path.display(), rows = orders.len(), "wrote csv output");
        Ok(())
    }
}
