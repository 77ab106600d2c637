use dispatch_core::config::DashboardConfig;
use dispatch_core::{DashboardError, DashboardState, Event, IncidentId};
use std::sync::{Arc, Mutex, PoisonError};

/// Shared handle to the current dashboard snapshot.
///
/// Readers get an `Arc` to an immutable snapshot; writers compute the next
/// snapshot from the current one while holding the lock and swap it in.
#[derive(Clone)]
pub struct AppState {
    snapshot: Arc<Mutex<Arc<DashboardState>>>,
    config: Arc<DashboardConfig>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let initial = DashboardState::new(config.callers.clone(), config.units);
        Self {
            snapshot: Arc::new(Mutex::new(Arc::new(initial))),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Arc<DashboardState> {
        let guard = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Applies `event`. A rejected event is recorded as the dashboard notice
    /// and returned to the caller; incidents and unit counts stay unchanged.
    pub fn apply(&self, event: &Event) -> Result<Arc<DashboardState>, DashboardError> {
        let mut guard = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.apply(event) {
            Ok(next) => {
                *guard = Arc::new(next);
                Ok(Arc::clone(&guard))
            }
            Err(err) => {
                *guard = Arc::new(guard.with_notice(event.incident_id(), &err));
                Err(err)
            }
        }
    }

    /// Records a rejection that never reached the reducer (for example an
    /// unparseable unit type) as the dashboard notice.
    pub fn record_rejection(&self, incident_id: Option<IncidentId>, err: &DashboardError) {
        let mut guard = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(guard.with_notice(incident_id, err));
    }
}
