pub mod api;
pub mod services;
pub mod storage;


use std::sync::Arc;
use common::config::Settings;
use common::Result;
use services::CatalogService;
use storage::Document;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

/// Loads the city document and serves the catalog API until shutdown.
pub async fn run_store(config_path: &str) -> Result<()> {
    // Load configuration
    let config = Settings::new(config_path)?;

    // Initialize catalog service from the persisted document
    let document = Document::new(&config.store.data_path);
    let service = Arc::new(CatalogService::open(document).await);

    // Create API router
    let api_router = api::routes(Arc::clone(&service));

    // Start the server
    let address = format!("{}:{}", config.store.host, config.store.port);
    let listener = TcpListener::bind(&address).await?;
    info!("Store API server listening on {}", address);
    axum::serve(listener, api_router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Store API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
