//! Display-ready projections of a [`DashboardState`] snapshot.

use crate::card::{average_is_over_goal, CardSummary, GOAL_TIME_SECS};
use crate::config::DashboardConfig;
use crate::incident::{Dispatched, Incident, IncidentId, UnitPool};
use crate::map::MapPins;
use crate::recommend::recommendation_label;
use crate::store::{DashboardState, Notice};
use crate::style::{self, PriorityStyle};
use crate::timer::{format_elapsed, format_secs};
use serde::Serialize;

const MAP_ZOOM: u8 = 15;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PendingView {
    pub id: IncidentId,
    pub name: String,
    pub location: String,
    pub status: String,
    pub failed: bool,
}

impl From<&Incident> for PendingView {
    fn from(incident: &Incident) -> Self {
        let (status, failed) = match &incident.triage_failure {
            None => ("Awaiting triage".to_string(), false),
            Some(f) if f.exhausted => (
                format!("Triage failed after {} attempt(s): {}", f.attempts, f.reason),
                true,
            ),
            Some(f) => (
                format!("Triage retrying (attempt {} failed): {}", f.attempts, f.reason),
                false,
            ),
        };
        Self {
            id: incident.id,
            name: incident.name.clone(),
            location: incident.location.clone(),
            status,
            failed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetailView {
    pub id: IncidentId,
    pub name: String,
    pub phone: String,
    pub priority: Option<&'static str>,
    pub priority_class: &'static str,
    pub emotion: Option<&'static str>,
    pub location: String,
    pub map: MapPins,
    pub map_url: String,
    pub elapsed: String,
    pub injuries: &'static str,
    pub trapped: &'static str,
    pub fire: &'static str,
    pub vehicles: String,
    pub units_dispatched: &'static str,
    pub dispatched: Dispatched,
    pub transcript: String,
    pub generated_response: String,
    pub recommended_units: String,
    pub triage_score: Option<f64>,
    pub emotion_score: Option<f64>,
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

impl DetailView {
    pub fn new(incident: &Incident, config: &DashboardConfig) -> Self {
        let map = MapPins::new(incident.latitude, incident.longitude, config.headquarters);
        Self {
            id: incident.id,
            name: incident.name.clone(),
            phone: incident.phone.clone(),
            priority: incident.priority.map(|p| p.as_str()),
            priority_class: style::priority_class(incident.priority),
            emotion: incident.emotion.map(|e| e.as_str()),
            location: incident.location.clone(),
            map_url: map.embed_url(MAP_ZOOM),
            map,
            elapsed: format_secs(incident.time),
            injuries: yes_no(incident.injuries),
            trapped: yes_no(incident.trapped),
            fire: yes_no(incident.fire),
            vehicles: if incident.vehicles == 0 {
                "None".into()
            } else {
                incident.vehicles.to_string()
            },
            units_dispatched: yes_no(incident.is_dispatched()),
            dispatched: incident.dispatched,
            transcript: incident.transcript.clone(),
            generated_response: incident.generated_response.clone(),
            recommended_units: recommendation_label(incident),
            triage_score: incident.triage_score,
            emotion_score: incident.emotion_score,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardView {
    pub active_calls: usize,
    pub active: Vec<CardSummary>,
    pub pending: Vec<PendingView>,
    pub selected: Option<DetailView>,
    pub units: UnitPool,
    pub average_dispatch_secs: f64,
    pub average_display: String,
    pub average_over_goal: bool,
    pub goal_display: String,
    pub notice: Option<Notice>,
    pub legend: Vec<PriorityStyle>,
}

impl DashboardView {
    pub fn new(state: &DashboardState, config: &DashboardConfig) -> Self {
        let average = state.average_dispatch_latency();
        Self {
            active_calls: state.incidents().len(),
            active: state.active_cards(),
            pending: state
                .pending_incidents()
                .into_iter()
                .map(PendingView::from)
                .collect(),
            selected: state
                .selected_incident()
                .map(|incident| DetailView::new(incident, config)),
            units: state.units(),
            average_dispatch_secs: average,
            average_display: format_elapsed(average),
            average_over_goal: average_is_over_goal(average),
            goal_display: format_secs(GOAL_TIME_SECS),
            notice: state.notice().cloned(),
            legend: style::severity_legend().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_callers;
    use crate::incident::{TriageFailure, UnitType};
    use crate::store::Event;

    #[test]
    fn detail_view_for_unlocated_caller_uses_headquarters() {
        let config = DashboardConfig::default();
        let state = DashboardState::new(default_callers(), config.units)
            .apply(&Event::Select {
                id: Some(IncidentId(4)),
            })
            .expect("select");
        let view = DashboardView::new(&state, &config);
        let detail = view.selected.expect("detail");
        assert_eq!(detail.map.center, config.headquarters);
        assert_eq!(detail.vehicles, "None");
        assert_eq!(detail.units_dispatched, "No");
        assert_eq!(detail.recommended_units, "Police");
    }

    #[test]
    fn pending_view_reports_failures() {
        let config = DashboardConfig::default();
        let state = DashboardState::new(default_callers(), config.units)
            .apply(&Event::IngestFailed {
                id: IncidentId(2),
                failure: TriageFailure {
                    attempts: 3,
                    reason: "service returned 503".into(),
                    exhausted: true,
                },
            })
            .expect("failure");
        let view = DashboardView::new(&state, &config);
        assert!(view.active.is_empty());
        assert_eq!(view.pending.len(), 4);
        let failed = view.pending.iter().find(|p| p.id == IncidentId(2)).expect("pending");
        assert!(failed.failed);
        assert_eq!(
            failed.status,
            "Triage failed after 3 attempt(s): service returned 503"
        );
    }

    #[test]
    fn goal_and_average_displays() {
        let config = DashboardConfig::default();
        let mut state = DashboardState::new(default_callers(), config.units);
        for _ in 0..80 {
            state = state.tick();
        }
        state = state
            .dispatch_unit(IncidentId(1), UnitType::Police)
            .expect("dispatch")
            .tick();
        let view = DashboardView::new(&state, &config);
        assert_eq!(view.goal_display, "01:15");
        assert_eq!(view.average_display, "01:20");
        assert!(view.average_over_goal);
        assert_eq!(view.units.police, config.units.police - 1);
    }
}
