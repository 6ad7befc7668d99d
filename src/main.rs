use olist_etl::{Pipeline, PipelineConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stdout)
        .init();

    info!("starting olist order etl");
    let pipeline = Pipeline::from_config(&PipelineConfig::default());
    pipeline.run().await?;
    info!("pipeline completed successfully");

    Ok(())
}
