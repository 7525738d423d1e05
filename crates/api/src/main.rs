//! Machine Failure Predictor - Main Entry Point

use api::{init_logging, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("=== Machine Failure Predictor v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Model backend: {}, validation: {:?}",
        config.models.backend.as_str(),
        config.validation
    );

    run_server(&config).await?;

    Ok(())
}
