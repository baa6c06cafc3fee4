//! Outbreak forecast HTTP server binary.
//!
//! Loads configuration, builds the prediction service from the outbreak table
//! and serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin outbreak-server
//!
//! # Point at another table
//! OUTBREAK_DATA_PATH=/srv/wahis.csv cargo run --bin outbreak-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 5000)
//! - `OUTBREAK_DATA_PATH`: Outbreak CSV (default: data/wahis_outbreak_details.csv)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use outbreak_forecast::config::ForecastConfig;
use outbreak_forecast::http::{create_router, AppState};
use outbreak_forecast::models::CountryRegistry;
use outbreak_forecast::services::{ForecastService, ModelSlots};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; `log` records from the library are bridged in
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting outbreak forecast server");

    let config = ForecastConfig::load()?;
    let addr: SocketAddr = config.bind_address().parse()?;

    // Trained model weights are not bundled; predictions use the fallback
    // estimator until slots are provided.
    let models = ModelSlots::absent();
    warn!("No sequence models loaded, predictions will use the mean fallback");

    let service = Arc::new(ForecastService::new(config, CountryRegistry::supported(), models));
    let init = service.clone();
    let issues = tokio::task::spawn_blocking(move || init.initialize()).await?;
    info!(
        "Forecast service initialized ({} availability issues)",
        issues.len()
    );

    let app = create_router(AppState::new(service));

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
