// Session - Selection, latest snapshot and alert lifecycle behind one lock
use crate::application::alert_store::AlertLifecycleStore;
use crate::domain::alert::Alert;
use crate::domain::geo::Coordinates;
use crate::domain::snapshot::LocationSnapshot;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

const UPDATE_BUFFER: usize = 16;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub alerts: Vec<Alert>,
    pub critical_count: usize,
    pub tracked: usize,
}

#[derive(Debug, Default)]
struct SessionState {
    selection: Option<Coordinates>,
    /// Bumped on every selection change; results tagged with an older value are stale
    generation: u64,
    latest: Option<LocationSnapshot>,
    alerts: AlertLifecycleStore,
}

impl SessionState {
    fn sync_latest_alerts(&mut self) {
        if let Some(latest) = self.latest.as_mut() {
            latest.alerts = self.alerts.active_alerts_at(latest.coordinates.bucket());
        }
    }
}

/// The process-wide mutable state. Merges and user actions take the same lock, so
/// a refresh can never interleave with an acknowledgement or dismissal.
#[derive(Clone)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
    updates: broadcast::Sender<LocationSnapshot>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(UPDATE_BUFFER);
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            updates,
        }
    }

    /// Makes `coordinates` the current selection and returns its generation
    pub async fn select(&self, coordinates: Coordinates) -> u64 {
        let mut state = self.state.lock().await;
        state.generation += 1;
        state.selection = Some(coordinates);
        tracing::info!("Selected {} (generation {})", coordinates.label(), state.generation);
        state.generation
    }

    /// Drops the selection so any in-flight result is discarded
    pub async fn clear_selection(&self) {
        let mut state = self.state.lock().await;
        state.generation += 1;
        state.selection = None;
    }

    pub async fn current(&self) -> Option<(Coordinates, u64)> {
        let state = self.state.lock().await;
        state.selection.map(|coordinates| (coordinates, state.generation))
    }

    /// Merges a pipeline result issued for `generation`.
    ///
    /// Returns the applied snapshot (its alerts replaced by the store's actionable
    /// view for the snapshot's coordinate), or `None` when the selection has moved on since the fetch was issued.
    pub async fn apply(&self, generation: u64, mut snapshot: LocationSnapshot) -> Option<LocationSnapshot> {
        let mut state = self.state.lock().await;

        if state.generation != generation || state.selection != Some(snapshot.coordinates) {
            tracing::debug!(
                "Discarding stale snapshot for {} (generation {}, current {})",
                snapshot.coordinates.label(),
                generation,
                state.generation
            );
            return None;
        }

        let summary = state.alerts.merge(std::mem::take(&mut snapshot.alerts));
        tracing::debug!(
            "Merged alerts for {}: {} new, {} already tracked",
            snapshot.coordinates.label(),
            summary.inserted,
            summary.refreshed
        );

        snapshot.alerts = state.alerts.active_alerts_at(snapshot.coordinates.bucket());
        state.latest = Some(snapshot.clone());

        // No receivers is fine
        let _ = self.updates.send(snapshot.clone());
        Some(snapshot)
    }

    pub async fn acknowledge(&self, alert_id: &str) -> bool {
        let mut state = self.state.lock().await;
        let changed = state.alerts.acknowledge(alert_id);
        if changed {
            tracing::info!("Alert {} acknowledged", alert_id);
            state.sync_latest_alerts();
        }
        changed
    }

    pub async fn dismiss(&self, alert_id: &str) -> bool {
        let mut state = self.state.lock().await;
        let changed = state.alerts.dismiss(alert_id);
        if changed {
            tracing::info!("Alert {} dismissed", alert_id);
            state.sync_latest_alerts();
        }
        changed
    }

    /// Actionable alerts, their critical count and the size of the full history, read under one lock
    pub async fn alert_summary(&self) -> AlertSummary {
        let state = self.state.lock().await;
        AlertSummary {
            alerts: state.alerts.active_alerts(),
            critical_count: state.alerts.critical_count(),
            tracked: state.alerts.alerts().len(),
        }
    }

    /// Any alert ever stored, dismissed ones included
    pub async fn alert(&self, alert_id: &str) -> Option<Alert> {
        self.state.lock().await.alerts.get(alert_id).cloned()
    }

    pub async fn latest(&self) -> Option<LocationSnapshot> {
        self.state.lock().await.latest.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LocationSnapshot> {
        self.updates.subscribe()
    }
}
