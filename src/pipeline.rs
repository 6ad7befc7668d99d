use crate::core::{Customer, Order, OrderItem, Result, Sink};
use crate::sink::file::CsvSink;
use crate::sink::sqlite::SqliteSink;
use crate::source::file::CsvSource;
use crate::transform::transform_orders;
use std::path::PathBuf;
use tracing::info;

pub const ORDERS_FILE: &str = "olist_orders_dataset.csv";
pub const ORDER_ITEMS_FILE: &str = "olist_order_items_dataset.csv";
pub const CUSTOMERS_FILE: &str = "olist_customers_dataset.csv";

/// Where the pipeline reads from and writes to. No CLI flags or environment
/// variables; callers construct this directly or take the defaults.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub output_path: PathBuf,
    pub db_path: PathBuf,
    pub table_name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/raw"),
            output_path: PathBuf::from("data/processed/orders_processed.csv"),
            db_path: PathBuf::from("data/processed/olist.db"),
            table_name: "orders_processed".to_string(),
        }
    }
}

pub struct Pipeline {
    source: CsvSource,
    sinks: Vec<Box<dyn Sink>>,
}

impl Pipeline {
    pub fn new(source: CsvSource, sinks: Vec<Box<dyn Sink>>) -> Self {
        Self { source, sinks }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            CsvSource::new(&config.input_dir),
            vec![
                Box::new(CsvSink::new(&config.output_path)),
                Box::new(SqliteSink::new(&config.db_path, config.table_name.clone())),
            ],
        )
    }

    /// Run the pipeline end to end: extract the three datasets, transform,
    /// then write each sink in turn. The first failure aborts the run; a
    /// sink already written stays written.
    pub async fn run(&self) -> Result<()> {
        let orders: Vec<Order> = self.source.read(ORDERS_FILE).await?;
        info!(file = ORDERS_FILE, rows = orders.len(), "extracted orders");

        let items: Vec<OrderItem> = self.source.read(ORDER_ITEMS_FILE).await?;
        info!(file = ORDER_ITEMS_FILE, rows = items.len(), "extracted order items");

        let customers: Vec<Customer> = self.source.read(CUSTOMERS_FILE).await?;
        info!(file = CUSTOMERS_FILE, rows = customers.len(), "extracted customers");

        let enriched = transform_orders(orders, items, customers);
        info!(rows = enriched.len(), "transformed orders");

        for sink in &self.sinks {
            sink.write(&enriched).await?;
        }
        Ok(())
    }
}
