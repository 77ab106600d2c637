use dispatch_core::config::default_callers;
use dispatch_core::store::{DashboardState, Event};
use dispatch_core::{DashboardError, IncidentId, Priority, UnitPool, UnitType};
use triage_registry::decode_triage_v1;

fn ingest(state: &DashboardState, id: u32, body: &str) -> DashboardState {
    let payload = decode_triage_v1(body).expect("payload");
    state
        .apply(&Event::Ingested {
            id: IncidentId(id),
            payload,
        })
        .expect("ingest")
}

#[test]
fn shift_with_out_of_order_ingestion() {
    let mut state = DashboardState::new(default_callers(), UnitPool::default());
    for _ in 0..3 {
        state = state.apply(&Event::Tick).expect("tick");
    }

    state = ingest(
        &state,
        3,
        r#"{"facts": {"has_fire": true}, "triage_label": "critical", "emotion_class": "panicked"}"#,
    );
    state = ingest(
        &state,
        1,
        r#"{"facts": {"people_injured": true}, "triage_label": "high", "emotion_class": "distressed"}"#,
    );
    for _ in 0..4 {
        state = state.apply(&Event::Tick).expect("tick");
    }

    let order: Vec<u32> = state.active_incidents().iter().map(|i| i.id.0).collect();
    assert_eq!(order, vec![3, 1]);
    assert_eq!(state.pending_incidents().len(), 2);

    state = state
        .apply(&Event::Dispatch {
            id: IncidentId(3),
            unit: UnitType::Fire,
        })
        .expect("dispatch");
    state = state.apply(&Event::Tick).expect("tick");

    let order: Vec<u32> = state.active_incidents().iter().map(|i| i.id.0).collect();
    assert_eq!(order, vec![1, 3]);
    assert_eq!(state.units().fire_trucks, UnitPool::default().fire_trucks - 1);
    assert_eq!(state.average_dispatch_latency(), 4.0);

    let cards = state.active_cards();
    assert_eq!(cards[1].dispatch_lines, vec!["Firetruck Dispatched"]);
    assert_eq!(cards[0].priority_class, Priority::High.as_str());
}

#[test]
fn rejected_dispatch_is_visible() {
    let state = DashboardState::new(
        default_callers(),
        UnitPool {
            ambulances: 1,
            fire_trucks: 0,
            police: 0,
        },
    )
    .apply(&Event::Select {
        id: Some(IncidentId(2)),
    })
    .expect("select");

    let event = Event::Dispatch {
        id: IncidentId(2),
        unit: UnitType::Police,
    };
    let err = state.apply(&event).unwrap_err();
    assert_eq!(err, DashboardError::UnitsExhausted(UnitType::Police));

    let state = state.with_notice(event.incident_id(), &err);
    let notice = state.notice().expect("notice");
    assert_eq!(notice.incident_id, Some(IncidentId(2)));
    assert_eq!(state.units().police, 0);

    let state = state
        .apply(&Event::Dispatch {
            id: IncidentId(2),
            unit: UnitType::Ambulance,
        })
        .expect("dispatch");
    assert!(state.notice().is_none());
    assert_eq!(state.units().ambulances, 0);
}
