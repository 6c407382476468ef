// Load configuration
// Set up logging
// Wire cache, indexer client and recent buffer
// Start HTTP server

use token_history_service::{api, config::Config, state::AppState};

use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting token-history-service");

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Configuration loaded: {:?}", config);

    let addr = format!("{}:{}", config.server_host, config.server_port);

    // Create shared state
    let app_state = Arc::new(AppState::from_config(&config)?);

    // Start HTTP server
    let app = api::create_router(app_state).layer(CorsLayer::permissive());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Starting server on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
