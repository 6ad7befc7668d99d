use crate::core::{EnrichedOrder, Result};
use async_trait::async_trait;

/// A destination for the enriched orders table. Sinks are independent of
/// each other; the pipeline writes them in sequence and a failure in one
/// does not roll back another.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn write(&self, orders: &[EnrichedOrder]) -> Result<()>;
}
