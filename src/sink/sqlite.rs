use crate::core::{EnrichedOrder, Result, Sink};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::path::{Path, PathBuf};
use tracing::info;

/// Loads the enriched orders table into one table of an embedded SQLite
/// database, replacing the table wholesale on every run.
pub struct SqliteSink {
    db_path: PathBuf,
    table: String,
}

impl SqliteSink {
    pub fn new<P: AsRef<Path>>(db_path: P, table: impl Into<String>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            table: table.into(),
        }
    }

    async fn replace_table(&self, pool: &SqlitePool, orders: &[EnrichedOrder]) -> Result<()> {
        let mut tx = pool.begin().await?;

        sqlx::query(&format!("DROP TABLE IF EXISTS {}", self.table))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!(
            "CREATE TABLE {} (
                order_id TEXT,
                customer_id TEXT,
                order_status TEXT,
                order_purchase_timestamp TEXT,
                order_approved_at TEXT,
                order_delivered_carrier_date TEXT,
                order_delivered_customer_date TEXT,
                order_estimated_delivery_date TEXT,
                delivery_time_days INTEGER,
                delivery_delay_days INTEGER,
                total_items INTEGER,
                total_value REAL,
                total_freight REAL,
                customer_city TEXT,
                customer_state TEXT
            )",
            self.table
        ))
        .execute(&mut *tx)
        .await?;

        let insert = format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            self.table,
            EnrichedOrder::COLUMNS.join(", ")
        );
        for order in orders {
            sqlx::query(&insert)
                .bind(&order.order_id)
                .bind(&order.customer_id)
                .bind(&order.order_status)
                .bind(order.order_purchase_timestamp)
                .bind(order.order_approved_at)
                .bind(order.order_delivered_carrier_date)
                .bind(order.order_delivered_customer_date)
                .bind(order.order_estimated_delivery_date)
                .bind(order.delivery_time_days)
                .bind(order.delivery_delay_days)
                .bind(order.total_items)
                .bind(order.total_value)
                .bind(order.total_freight)
                .bind(&order.customer_city)
                .bind(&order.customer_state)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl Sink for SqliteSink {
    async fn write(&self, orders: &[EnrichedOrder]) -> Result<()> {
        if let Some(parent) = self.db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        // Close the pool whether or not the load succeeded.
        let result = self.replace_table(&pool, orders).await;
        pool.close().await;
        result?;

        info!(
            db = %self.db_path.display(),
            table = %self.table,
            rows = orders.len(),
            "loaded sqlite table"
        );
        Ok(())
    }
}
