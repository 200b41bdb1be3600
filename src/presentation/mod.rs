// Presentation layer - HTTP routes
pub mod api_error;
pub mod app_state;
pub mod handlers;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    acknowledge_alert, clear_selection, current_selection, dismiss_alert, get_alert, get_forecast,
    get_snapshot, health_check, latest_snapshot, list_alerts, select_location, stream_snapshots,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/snapshot", get(get_snapshot))
        .route("/forecast", get(get_forecast))
        .route(
            "/session/selection",
            get(current_selection).put(select_location).delete(clear_selection),
        )
        .route("/session/snapshot", get(latest_snapshot))
        .route("/session/stream", get(stream_snapshots))
        .route("/alerts", get(list_alerts))
        .route("/alerts/:id", get(get_alert))
        .route("/alerts/:id/acknowledge", post(acknowledge_alert))
        .route("/alerts/:id/dismiss", post(dismiss_alert))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
