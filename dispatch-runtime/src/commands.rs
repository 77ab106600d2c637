use crate::state::AppState;
use dispatch_core::view::DashboardView;
use dispatch_core::{DashboardError, Event, IncidentId, UnitType};

pub fn get_dashboard(state: &AppState) -> DashboardView {
    DashboardView::new(&state.snapshot(), state.config())
}

pub fn select_incident(
    state: &AppState,
    incident_id: Option<IncidentId>,
) -> Result<DashboardView, DashboardError> {
    let snapshot = state
        .apply(&Event::Select { id: incident_id })
        .inspect_err(|err| tracing::warn!(%err, "select rejected"))?;
    Ok(DashboardView::new(&snapshot, state.config()))
}

pub fn dispatch_unit(
    state: &AppState,
    incident_id: IncidentId,
    unit: &str,
) -> Result<DashboardView, DashboardError> {
    let unit = unit.parse::<UnitType>().inspect_err(|err| {
        state.record_rejection(Some(incident_id), err);
        tracing::warn!(%err, "dispatch rejected");
    })?;
    let snapshot = state
        .apply(&Event::Dispatch {
            id: incident_id,
            unit,
        })
        .inspect_err(|err| tracing::warn!(incident = %incident_id, %err, "dispatch rejected"))?;
    tracing::info!(incident = %incident_id, %unit, "unit dispatched");
    Ok(DashboardView::new(&snapshot, state.config()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_core::config::DashboardConfig;
    use dispatch_core::UnitPool;

    fn state_with_units(units: UnitPool) -> AppState {
        AppState::new(DashboardConfig {
            units,
            ..Default::default()
        })
    }

    #[test]
    fn dispatch_updates_view() {
        let state = state_with_units(UnitPool::default());
        select_incident(&state, Some(IncidentId(1))).expect("select");
        let view = dispatch_unit(&state, IncidentId(1), "ambulance").expect("dispatch");
        assert_eq!(view.units.ambulances, UnitPool::default().ambulances - 1);
        let detail = view.selected.expect("selected");
        assert!(detail.dispatched.ambulance);
        assert_eq!(detail.units_dispatched, "Yes");
    }

    #[test]
    fn invalid_unit_is_reported_on_dashboard() {
        let state = state_with_units(UnitPool::default());
        let err = dispatch_unit(&state, IncidentId(1), "boat").unwrap_err();
        assert_eq!(err, DashboardError::InvalidUnitType("boat".into()));
        let view = get_dashboard(&state);
        let notice = view.notice.expect("notice");
        assert_eq!(notice.message, "invalid unit type 'boat'");
        assert_eq!(notice.incident_id, Some(IncidentId(1)));
    }

    #[test]
    fn rejection_notice_names_dispatch_target_not_selection() {
        let state = state_with_units(UnitPool {
            ambulances: 0,
            fire_trucks: 1,
            police: 1,
        });
        select_incident(&state, Some(IncidentId(1))).expect("select");
        let err = dispatch_unit(&state, IncidentId(3), "ambulance").unwrap_err();
        assert_eq!(err, DashboardError::UnitsExhausted(UnitType::Ambulance));

        let view = get_dashboard(&state);
        assert_eq!(view.notice.and_then(|n| n.incident_id), Some(IncidentId(3)));
        assert_eq!(view.selected.map(|d| d.id), Some(IncidentId(1)));
    }

    #[test]
    fn exhausted_pool_keeps_counter_at_zero() {
        let state = state_with_units(UnitPool {
            ambulances: 0,
            fire_trucks: 0,
            police: 0,
        });
        let err = dispatch_unit(&state, IncidentId(2), "fire").unwrap_err();
        assert_eq!(err, DashboardError::UnitsExhausted(UnitType::Fire));
        let view = get_dashboard(&state);
        assert_eq!(view.units.fire_trucks, 0);
        assert!(view.notice.is_some());
    }
}
