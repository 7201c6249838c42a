use std::sync::Arc;

use dbdeploy_api::config::DeployConfig;
use dbdeploy_api::kubernetes::K8sClient;
use dbdeploy_api::routes;
use dbdeploy_api::shutdown::ShutdownCoordinator;
use dbdeploy_api::AppState;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--print-config") {
        println!("{}", DeployConfig::generate_sample());
        return Ok(());
    }

    // Load configuration
    let config = DeployConfig::load()?;

    // Held until exit so buffered file logs are flushed
    let _log_guard = config
        .logging
        .init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        return Err(anyhow::anyhow!("Invalid configuration: {}", e));
    }
    info!("Configuration loaded successfully");

    let client = K8sClient::from_config(&config.kubernetes).await?;
    info!(
        api_server = %client.api_server(),
        namespace = %config.kubernetes.namespace,
        "Kubernetes client configured"
    );

    let state = Arc::new(AppState::new(Arc::new(client), &config));
    let app = routes::router(state);

    // Set up graceful shutdown
    let shutdown = ShutdownCoordinator::new();
    let signal_listener = shutdown.clone();
    tokio::spawn(async move {
        signal_listener.wait_for_signal().await;
    });

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("dbdeploy API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.signal())
        .await?;

    info!("Server stopped, exiting");

    Ok(())
}
