// API server binary entry point.
//
// Usage: cargo run --features api --bin api_server

use moisture_monitor::{create_router, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // Default log level: info for our crate, warn for others
                "moisture_monitor=info,tower_http=debug,axum=debug,warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting moisture monitor server...");

    // Configuration from environment variables
    let artifact_path = std::env::var("ARTIFACT_PATH")
        .unwrap_or_else(|_| "artifacts/moisture_bundle.json".to_string());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    tracing::info!("Configuration:");
    tracing::info!("  ARTIFACT_PATH: {}", artifact_path);
    tracing::info!("  PORT: {}", port);

    // Load artifacts and build the alignment; any failure here is fatal.
    let state = AppState::new(&artifact_path)?;
    tracing::info!("Application state initialized successfully");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
