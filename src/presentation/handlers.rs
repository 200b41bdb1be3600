// HTTP request handlers
use crate::domain::alert::Severity;
use crate::domain::geo::Coordinates;
use crate::domain::snapshot::LocationSnapshot;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::api_error::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Response,
    },
    Json,
};
use futures::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsQuery {
    pub min_severity: Option<Severity>,
}

const DEFAULT_FORECAST_DAYS: u8 = 3;

#[derive(Deserialize)]
pub struct CoordinateQuery {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Deserialize)]
pub struct ForecastQuery {
    pub lat: f64,
    pub lng: f64,
    pub days: Option<u8>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// One-shot snapshot for any coordinate; leaves the session untouched
pub async fn get_snapshot(
    Query(query): Query<CoordinateQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let coordinates = Coordinates::new(query.lat, query.lng)?;
    let snapshot = state.snapshot_service.get_snapshot(coordinates).await?;
    Ok(json_response(&snapshot, accepts_brotli(&headers)).await?)
}

pub async fn get_forecast(
    Query(query): Query<ForecastQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let coordinates = Coordinates::new(query.lat, query.lng)?;
    let days = query.days.unwrap_or(DEFAULT_FORECAST_DAYS);
    let forecast = state.snapshot_service.forecast(coordinates, days).await;
    Ok(json_response(&forecast, accepts_brotli(&headers)).await?)
}

/// Switch the monitored coordinate; the first refresh runs in the background
pub async fn select_location(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CoordinateQuery>,
) -> Result<StatusCode, ApiError> {
    let coordinates = Coordinates::new(body.lat, body.lng)?;
    state.scheduler.select(coordinates).await;
    Ok(StatusCode::ACCEPTED)
}

pub async fn current_selection(State(state): State<Arc<AppState>>) -> Result<Json<Coordinates>, ApiError> {
    state
        .scheduler
        .current()
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("no location selected"))
}

/// Stop monitoring; the stored snapshot and alert history are kept
pub async fn clear_selection(State(state): State<Arc<AppState>>) -> StatusCode {
    state.scheduler.stop().await;
    StatusCode::NO_CONTENT
}

pub async fn latest_snapshot(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let snapshot = state
        .session
        .latest()
        .await
        .ok_or(ApiError::NotFound("no snapshot available yet"))?;
    Ok(json_response(&snapshot, accepts_brotli(&headers)).await?)
}

/// Server-sent events: the latest snapshot, then one event per refresh
pub async fn stream_snapshots(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.session.subscribe();
    let initial = state.session.latest().await;

    let stream = async_stream::stream! {
        if let Some(event) = initial.as_ref().and_then(snapshot_event) {
            yield Ok(event);
        }
        loop {
            match rx.recv().await {
                Ok(snapshot) => {
                    if let Some(event) = snapshot_event(&snapshot) {
                        yield Ok(event);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Snapshot stream lagged, skipped {} updates", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn snapshot_event(snapshot: &LocationSnapshot) -> Option<Event> {
    Event::default()
        .event("snapshot")
        .json_data(snapshot)
        .map_err(|e| tracing::error!("Failed to encode snapshot event: {}", e))
        .ok()
}

/// Actionable alerts plus the critical badge count; `minSeverity` narrows the list only
pub async fn list_alerts(
    Query(query): Query<AlertsQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let mut summary = state.session.alert_summary().await;
    if let Some(min_severity) = query.min_severity {
        summary.alerts.retain(|alert| alert.severity >= min_severity);
    }
    Ok(json_response(&summary, accepts_brotli(&headers)).await?)
}

/// Lookup across the whole history, dismissed alerts included
pub async fn get_alert(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let alert = state
        .session
        .alert(&id)
        .await
        .ok_or(ApiError::NotFound("unknown alert"))?;
    Ok(json_response(&alert, accepts_brotli(&headers)).await?)
}

/// Unknown ids are accepted silently
pub async fn acknowledge_alert(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> StatusCode {
    state.session.acknowledge(&id).await;
    StatusCode::NO_CONTENT
}

/// Unknown ids are accepted silently
pub async fn dismiss_alert(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> StatusCode {
    state.session.dismiss(&id).await;
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::refresh_scheduler::{RefreshScheduler, DEFAULT_REFRESH_INTERVAL};
    use crate::application::risk_scoring::RiskScoringEngine;
    use crate::application::session::Session;
    use crate::application::snapshot_service::SnapshotService;
    use crate::application::test_support::{StubGateway, StubResolver};
    use crate::presentation::router;
    use axum::body::{to_bytes, Body, BodyDataStream};
    use axum::http::{Method, Request};
    use axum::Router;
    use futures::StreamExt;
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app_with_state() -> (Router, Arc<AppState>) {
        let service = SnapshotService::new(
            Arc::new(StubGateway::default()),
            Arc::new(StubResolver {
                name: Some("Jaipur, Rajasthan, India".to_string()),
            }),
            RiskScoringEngine::default(),
        );
        let session = Session::new();
        let scheduler = RefreshScheduler::new(service.clone(), session.clone(), DEFAULT_REFRESH_INTERVAL);
        let state = Arc::new(AppState {
            snapshot_service: service,
            session,
            scheduler,
        });
        (router(state.clone()), state)
    }

    fn app() -> Router {
        app_with_state().0
    }

    async fn open_stream(app: &Router) -> BodyDataStream {
        let request = Request::builder().uri("/session/stream").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/event-stream");
        response.into_body().into_data_stream()
    }

    /// Next `snapshot` event, skipping keep-alive comments; `None` once the stream ends
    async fn next_snapshot_event(stream: &mut BodyDataStream) -> Option<String> {
        while let Some(chunk) = stream.next().await {
            let text = String::from_utf8(chunk.unwrap().to_vec()).unwrap();
            if text.contains("event: snapshot") {
                return Some(text);
            }
        }
        None
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app()
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_one_shot_snapshot() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/snapshot?lat=26.91&lng=75.79", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["locationName"], "Jaipur, Rajasthan, India");
        assert_eq!(body["riskScore"]["flood"], 100);
        assert_eq!(body["degraded"], false);
        assert_eq!(body["alerts"][0]["severity"], "critical");

        // One-shot reads do not feed the session
        let (status, _) = send(&app, Method::GET, "/session/snapshot", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_coordinates_rejected() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/snapshot?lat=95&lng=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("lat"));

        let (status, _) = send(
            &app,
            Method::PUT,
            "/session/selection",
            Some(serde_json::json!({"lat": 10.0, "lng": 200.0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_lifecycle_over_http() {
        let app = app();
        let (status, _) = send(
            &app,
            Method::PUT,
            "/session/selection",
            Some(serde_json::json!({"lat": 26.91, "lng": 75.79})),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        tokio::time::sleep(Duration::from_millis(1)).await;

        let (_, body) = send(&app, Method::GET, "/alerts", None).await;
        assert_eq!(body["criticalCount"], 1);
        let id = body["alerts"][0]["id"].as_str().unwrap().to_string();

        let (status, _) = send(&app, Method::POST, &format!("/alerts/{}/acknowledge", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, Method::GET, "/alerts", None).await;
        assert_eq!(body["criticalCount"], 0);
        assert_eq!(body["alerts"].as_array().unwrap().len(), 0);

        let (_, snapshot) = send(&app, Method::GET, "/session/snapshot", None).await;
        assert_eq!(snapshot["coordinates"]["lat"], 26.91);
        assert_eq!(snapshot["alerts"].as_array().unwrap().len(), 0);

        let (status, alert) = send(&app, Method::GET, &format!("/alerts/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(alert["acknowledged"], true);
        assert_eq!(body["tracked"], 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection_can_be_read_and_cleared() {
        let app = app();
        let (status, _) = send(&app, Method::GET, "/session/selection", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        send(
            &app,
            Method::PUT,
            "/session/selection",
            Some(serde_json::json!({"lat": 26.91, "lng": 75.79})),
        )
        .await;
        let (status, body) = send(&app, Method::GET, "/session/selection", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lng"], 75.79);

        let (status, _) = send(&app, Method::DELETE, "/session/selection", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, "/session/selection", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_alert_ids_are_noops() {
        let app = app();
        let (status, _) = send(&app, Method::GET, "/alerts/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::POST, "/alerts/missing/acknowledge", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::POST, "/alerts/missing/dismiss", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_forecast_defaults_to_three_days() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/forecast?lat=26.91&lng=75.79", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["days"].as_array().unwrap().len(), 3);
        assert_eq!(body["degraded"], false);
    }

    #[tokio::test(start_paused = true)]
    async fn test_alerts_filtered_by_min_severity() {
        let app = app();
        send(
            &app,
            Method::PUT,
            "/session/selection",
            Some(serde_json::json!({"lat": 26.91, "lng": 75.79})),
        )
        .await;
        tokio::time::sleep(Duration::from_millis(1)).await;

        let (_, body) = send(&app, Method::GET, "/alerts?minSeverity=low", None).await;
        assert_eq!(body["alerts"].as_array().unwrap().len(), 1);

        let (_, body) = send(&app, Method::GET, "/alerts?minSeverity=critical", None).await;
        assert_eq!(body["alerts"][0]["severity"], "critical");

        let (status, _) = send(&app, Method::GET, "/alerts?minSeverity=severe", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_sends_latest_then_each_refresh() {
        let app = app();
        send(
            &app,
            Method::PUT,
            "/session/selection",
            Some(serde_json::json!({"lat": 26.91, "lng": 75.79})),
        )
        .await;
        tokio::time::sleep(Duration::from_millis(1)).await;

        let mut stream = open_stream(&app).await;
        let initial = next_snapshot_event(&mut stream).await.unwrap();
        assert!(initial.contains("Jaipur, Rajasthan, India"));

        // Paused time auto-advances to the next refresh
        let refreshed = next_snapshot_event(&mut stream).await.unwrap();
        assert!(refreshed.contains("\"lat\":26.91"));
    }

    #[tokio::test]
    async fn test_stream_skips_over_lagged_updates() {
        let (app, state) = app_with_state();
        let mut stream = open_stream(&app).await;

        let jaipur = Coordinates::new(26.91, 75.79).unwrap();
        let generation = state.session.select(jaipur).await;
        let snapshot = state.snapshot_service.get_snapshot(jaipur).await.unwrap();
        for _ in 0..20 {
            state.session.apply(generation, snapshot.clone()).await.unwrap();
        }

        // The oldest updates overflowed the buffer; the rest still arrive
        for _ in 0..16 {
            assert!(next_snapshot_event(&mut stream).await.is_some());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_ends_when_session_closes() {
        let app = app();
        send(
            &app,
            Method::PUT,
            "/session/selection",
            Some(serde_json::json!({"lat": 26.91, "lng": 75.79})),
        )
        .await;
        tokio::time::sleep(Duration::from_millis(1)).await;

        let mut stream = open_stream(&app).await;
        assert!(next_snapshot_event(&mut stream).await.is_some());

        send(&app, Method::DELETE, "/session/selection", None).await;
        drop(app);
        assert!(next_snapshot_event(&mut stream).await.is_none());
    }
}
