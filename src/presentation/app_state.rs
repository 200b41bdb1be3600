// Application state for HTTP handlers
use crate::application::refresh_scheduler::RefreshScheduler;
use crate::application::session::Session;
use crate::application::snapshot_service::SnapshotService;

#[derive(Clone)]
pub struct AppState {
    pub snapshot_service: SnapshotService,
    pub session: Session,
    pub scheduler: RefreshScheduler,
}
