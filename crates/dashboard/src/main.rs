//! Container Dashboard - HTTP backend for the container usage dashboard
//!
//! Lists containers on the host with live CPU/memory usage, starts and stops
//! them, and estimates savings from stopping idle ones.

use anyhow::Result;
use container_dashboard::{api, config::DashboardConfig};
use dashboard_lib::{
    health::{components, HealthRegistry},
    DockerRuntime, InventoryService, StructuredLogger,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DASHBOARD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting container-dashboard");

    let config = DashboardConfig::load()?;
    info!(
        host = %config.host_name,
        port = config.port,
        stats_concurrency = config.stats_concurrency,
        "Dashboard configured"
    );

    let health_registry = HealthRegistry::new();
    health_registry.register(components::RUNTIME).await;

    let runtime = DockerRuntime::connect()?;

    // The daemon may come up after us; start anyway and report it through /healthz.
    if let Err(e) = runtime.ping().await {
        warn!(error = %e, "Docker daemon not reachable at startup");
        health_registry
            .set_unhealthy(components::RUNTIME, e.to_string())
            .await;
    }

    let logger = StructuredLogger::new(&config.host_name);
    let inventory =
        InventoryService::new(Arc::new(runtime)).with_stats_concurrency(config.stats_concurrency);

    let app_state = Arc::new(api::AppState::new(
        inventory,
        health_registry.clone(),
        logger.clone(),
    ));

    health_registry.set_ready(true).await;

    let bind_addr = config.bind_addr();
    logger.log_startup(DASHBOARD_VERSION, &bind_addr);

    let shutdown_logger = logger.clone();
    let shutdown = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        shutdown_logger.log_shutdown("SIGINT received");
    };

    api::serve(&bind_addr, app_state, config.enable_cors, shutdown).await?;

    info!("Shut down");
    Ok(())
}
