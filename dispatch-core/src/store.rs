//! Incident store: the dashboard snapshot and the reducer that advances it.
//!
//! Every mutation goes through [`DashboardState::apply`], which reads the prior
//! snapshot and returns a new one. A rejected event leaves the caller holding
//! the old snapshot, untouched.

use crate::card::CardSummary;
use crate::error::DashboardError;
use crate::incident::{CallerInfo, Incident, IncidentId, Triage, TriageFailure, UnitPool, UnitType};
use crate::ordering;
use serde::{Deserialize, Serialize};
use triage_registry::TriagePayloadV1;

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Tick,
    Ingested {
        id: IncidentId,
        payload: TriagePayloadV1,
    },
    IngestFailed {
        id: IncidentId,
        failure: TriageFailure,
    },
    Dispatch {
        id: IncidentId,
        unit: UnitType,
    },
    Select {
        id: Option<IncidentId>,
    },
}

impl Event {
    /// Incident the event is about, if any.
    pub fn incident_id(&self) -> Option<IncidentId> {
        match self {
            Event::Tick => None,
            Event::Ingested { id, .. }
            | Event::IngestFailed { id, .. }
            | Event::Dispatch { id, .. } => Some(*id),
            Event::Select { id } => *id,
        }
    }
}

/// Last operation the dashboard refused, kept so the dispatcher can see it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub incident_id: Option<IncidentId>,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    incidents: Vec<Incident>,
    selected: Option<IncidentId>,
    units: UnitPool,
    notice: Option<Notice>,
}

impl DashboardState {
    pub fn new(callers: impl IntoIterator<Item = CallerInfo>, units: UnitPool) -> Self {
        let mut incidents: Vec<Incident> = callers.into_iter().map(Incident::placeholder).collect();
        incidents.sort_by_key(|i| i.id);
        incidents.dedup_by_key(|i| i.id);
        Self {
            incidents,
            selected: None,
            units,
            notice: None,
        }
    }

    pub fn apply(&self, event: &Event) -> Result<Self, DashboardError> {
        match event {
            Event::Tick => Ok(self.tick()),
            Event::Ingested { id, payload } => self.ingest_triage_result(*id, payload.clone()),
            Event::IngestFailed { id, failure } => self.record_ingest_failure(*id, failure.clone()),
            Event::Dispatch { id, unit } => self.dispatch_unit(*id, *unit),
            Event::Select { id } => self.select_incident(*id),
        }
    }

    pub fn ingest_triage_result(
        &self,
        id: IncidentId,
        payload: TriagePayloadV1,
    ) -> Result<Self, DashboardError> {
        let index = self.index_of(id)?;
        let triage = Triage::try_from(payload)?;
        let mut next = self.clone();
        next.incidents[index].merge_triage(triage);
        Ok(next)
    }

    pub fn record_ingest_failure(
        &self,
        id: IncidentId,
        failure: TriageFailure,
    ) -> Result<Self, DashboardError> {
        let index = self.index_of(id)?;
        let mut next = self.clone();
        let incident = &mut next.incidents[index];
        if !incident.ready {
            incident.triage_failure = Some(failure);
        }
        Ok(next)
    }

    pub fn tick(&self) -> Self {
        let mut next = self.clone();
        for incident in &mut next.incidents {
            incident.advance_clock();
        }
        next
    }

    /// A repeated dispatch of a unit type already on scene is a no-op and
    /// does not consume another unit.
    pub fn dispatch_unit(&self, id: IncidentId, unit: UnitType) -> Result<Self, DashboardError> {
        let index = self.index_of(id)?;
        if self.incidents[index].dispatched.get(unit) {
            let mut next = self.clone();
            next.notice = None;
            return Ok(next);
        }
        let mut next = self.clone();
        next.units.take(unit)?;
        next.incidents[index].dispatched.mark(unit);
        next.notice = None;
        Ok(next)
    }

    pub fn select_incident(&self, id: Option<IncidentId>) -> Result<Self, DashboardError> {
        if let Some(id) = id {
            self.index_of(id)?;
        }
        let mut next = self.clone();
        next.selected = id;
        next.notice = None;
        Ok(next)
    }

    /// Records `error` as the notice, attributed to the incident the refused
    /// operation targeted.
    pub fn with_notice(&self, incident_id: Option<IncidentId>, error: &DashboardError) -> Self {
        let incident_id = match error {
            DashboardError::IncidentNotFound(id) => Some(*id),
            _ => incident_id,
        };
        let mut next = self.clone();
        next.notice = Some(Notice {
            incident_id,
            message: error.to_string(),
        });
        next
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn incident(&self, id: IncidentId) -> Option<&Incident> {
        self.incidents.iter().find(|i| i.id == id)
    }

    pub fn selected_id(&self) -> Option<IncidentId> {
        self.selected
    }

    /// Resolved on every read, so the detail panel always shows the latest
    /// record for the selected id.
    pub fn selected_incident(&self) -> Option<&Incident> {
        self.selected.and_then(|id| self.incident(id))
    }

    pub fn units(&self) -> UnitPool {
        self.units
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn active_incidents(&self) -> Vec<&Incident> {
        ordering::active_list(&self.incidents)
    }

    pub fn active_cards(&self) -> Vec<CardSummary> {
        self.active_incidents()
            .into_iter()
            .map(CardSummary::from)
            .collect()
    }

    pub fn pending_incidents(&self) -> Vec<&Incident> {
        self.incidents.iter().filter(|i| !i.ready).collect()
    }

    pub fn average_dispatch_latency(&self) -> f64 {
        let latencies: Vec<f64> = self
            .incidents
            .iter()
            .filter_map(|i| {
                i.dispatched_at
                    .map(|at| at as f64 - i.created_at as f64)
            })
            .collect();
        if latencies.is_empty() {
            return 0.0;
        }
        latencies.iter().sum::<f64>() / latencies.len() as f64
    }

    fn index_of(&self, id: IncidentId) -> Result<usize, DashboardError> {
        self.incidents
            .iter()
            .position(|i| i.id == id)
            .ok_or(DashboardError::IncidentNotFound(id))
    }
}
