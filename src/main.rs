// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use crate::application::refresh_scheduler::RefreshScheduler;
use crate::application::risk_scoring::RiskScoringEngine;
use crate::application::session::Session;
use crate::application::snapshot_service::SnapshotService;
use crate::domain::geo::Coordinates;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::weather_api::WeatherApiGateway;
use crate::presentation::app_state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hazard_watch=info,tower_http=info".into()),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;
    if config.weather_api.api_key.is_empty() {
        tracing::warn!("No WeatherAPI key configured; snapshots will use fallback weather");
    }

    // Create gateway (infrastructure layer)
    let gateway = Arc::new(WeatherApiGateway::new(
        config.weather_api.base_url.clone(),
        config.weather_api.api_key.clone(),
        config.weather_api.timeout(),
    )?);

    // Create services (application layer)
    let snapshot_service = SnapshotService::new(
        gateway.clone(),
        gateway,
        RiskScoringEngine::new(config.scoring.baseline_window_secs),
    );
    let session = Session::new();
    let scheduler = RefreshScheduler::new(
        snapshot_service.clone(),
        session.clone(),
        config.refresh.interval(),
    );

    // Start monitoring the default location
    let default_location = Coordinates::new(config.refresh.default_lat, config.refresh.default_lng)?;
    scheduler.select(default_location).await;

    // Create application state
    let state = Arc::new(AppState {
        snapshot_service,
        session,
        scheduler,
    });

    // Build router (presentation layer)
    let router = presentation::router(state.clone());

    // Start server
    let addr: SocketAddr = config.bind_address().parse()?;
    tracing::info!("Starting hazard-watch service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.scheduler.stop().await;
    tracing::info!("hazard-watch stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
