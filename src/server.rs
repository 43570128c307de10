//! Listener setup and serve loop.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::error::Result;
use crate::metrics;
use crate::utils::shutdown_signal;

/// Install the metrics recorder, bind the listener, and serve until shutdown.
pub async fn run(config: Config) -> Result<()> {
    let handle = metrics::install_recorder()?;
    metrics::spawn_process_collector();

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server running on port {} in {} mode", config.port, config.node_env);
    info!("Metrics available at http://localhost:{}/metrics", config.port);
    info!("Health check at http://localhost:{}/health", config.port);

    let state = AppState::new(config, Some(handle));
    let router = create_router(state);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
