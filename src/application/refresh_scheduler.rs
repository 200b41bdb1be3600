// Refresh scheduler - Periodic re-evaluation of the selected coordinate
use crate::application::session::Session;
use crate::application::snapshot_service::SnapshotService;
use crate::domain::geo::Coordinates;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tick {
    Applied,
    Failed,
    /// The selection moved on while this tick was fetching
    Stale,
}

/// Owns the single refresh task for the current selection.
///
/// Each selection gets its own task: it fetches immediately, then sleeps for the
/// interval measured from the end of each fetch. Selecting again aborts the old
/// task; anything it still manages to deliver is rejected by the session's
/// generation check.
#[derive(Clone)]
pub struct RefreshScheduler {
    service: SnapshotService,
    session: Session,
    interval: Duration,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl RefreshScheduler {
    pub fn new(service: SnapshotService, session: Session, interval: Duration) -> Self {
        Self {
            service,
            session,
            interval,
            task: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn select(&self, coordinates: Coordinates) {
        let mut task = self.task.lock().await;
        if let Some(handle) = task.take() {
            handle.abort();
        }

        let generation = self.session.select(coordinates).await;
        let service = self.service.clone();
        let session = self.session.clone();
        let interval = self.interval;

        *task = Some(tokio::spawn(async move {
            refresh_loop(service, session, coordinates, generation, interval).await;
        }));
    }

    pub async fn stop(&self) {
        let mut task = self.task.lock().await;
        if let Some(handle) = task.take() {
            handle.abort();
        }
        self.session.clear_selection().await;
        tracing::info!("Refresh scheduler stopped");
    }

    pub async fn current(&self) -> Option<Coordinates> {
        self.session.current().await.map(|(coordinates, _)| coordinates)
    }
}

async fn refresh_loop(
    service: SnapshotService,
    session: Session,
    coordinates: Coordinates,
    generation: u64,
    interval: Duration,
) {
    loop {
        if refresh_once(&service, &session, coordinates, generation).await == Tick::Stale {
            break;
        }
        tokio::time::sleep(interval).await;
    }
}

async fn refresh_once(
    service: &SnapshotService,
    session: &Session,
    coordinates: Coordinates,
    generation: u64,
) -> Tick {
    tracing::debug!("Refreshing {} (generation {})", coordinates.label(), generation);

    let snapshot = match service.get_snapshot(coordinates).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!("Could not build snapshot for {}: {}", coordinates.label(), e);
            return Tick::Failed;
        }
    };

    match session.apply(generation, snapshot).await {
        Some(applied) => {
            tracing::debug!(
                "Applied snapshot for {}: overall risk {}, {} active alerts",
                coordinates.label(),
                applied.risk_score.overall(),
                applied.alerts.len()
            );
            Tick::Applied
        }
        None => Tick::Stale,
    }
}
