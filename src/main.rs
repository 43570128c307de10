//! Demo service entry point.

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use devops_demo_app::config::Config;
use devops_demo_app::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Load configuration
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        "Starting {} v{} ({})",
        env!("CARGO_PKG_NAME"),
        config.app_version,
        config.node_env
    );

    server::run(config).await?;

    info!("Server stopped");
    Ok(())
}
