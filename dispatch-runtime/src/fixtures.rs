//! Canned triage responses for running the console without the triage service.

use crate::client::{IngestError, TriageSource};
use dispatch_core::IncidentId;
use std::future::Future;
use triage_registry::{decode_triage_v1, TriagePayloadV1};

const INCIDENT_1: &str = r#"{
  "facts": {"people_injured": true, "has_fire": false, "num_vehicles": 2, "is_trapped": true, "has_fuel_leak": true},
  "triage_label": "critical",
  "triage_score": 4.7,
  "generated_response": "Tell the caller not to move the trapped driver and to stay clear of the leaking fuel.",
  "transcript": "Two cars crashed at the intersection, the driver is trapped and I smell gas, he's bleeding.",
  "emotion_class": "panicked",
  "emotion_score": 4.8
}"#;

const INCIDENT_2: &str = r#"{
  "facts": {"people_injured": false, "has_fire": false, "num_vehicles": 1, "is_trapped": false, "has_fuel_leak": false},
  "triage_label": "low",
  "triage_score": 1.8,
  "generated_response": "Confirm everyone is out of the roadway and ask for the vehicle's position.",
  "transcript": "Somebody slid into the ditch on Texas Ave, they say they're okay.",
  "emotion_class": "calm",
  "emotion_score": 1.4
}"#;

const INCIDENT_3: &str = r#"{
  "facts": {"people_injured": true, "has_fire": true, "num_vehicles": 1, "is_trapped": false, "has_fuel_leak": false},
  "triage_label": "high",
  "triage_score": 4.0,
  "generated_response": "Ask whether anyone is still inside the vehicle and move bystanders away from the flames.",
  "transcript": "A truck is burning under the underpass and the driver has burns on his arms.",
  "emotion_class": "distressed",
  "emotion_score": 3.6
}"#;

const INCIDENT_4: &str = r#"{
  "facts": {"people_injured": false, "has_fire": false, "num_vehicles": 0, "is_trapped": false, "has_fuel_leak": false},
  "triage_label": "medium",
  "generated_response": "Get a description of the people involved and keep the caller at a safe distance.",
  "transcript": "There's a fight in the parking lot, people are yelling.",
  "emotion_class": "concerned"
}"#;

pub fn fixture_body(id: IncidentId) -> Option<&'static str> {
    match id.0 {
        1 => Some(INCIDENT_1),
        2 => Some(INCIDENT_2),
        3 => Some(INCIDENT_3),
        4 => Some(INCIDENT_4),
        _ => None,
    }
}

#[derive(Clone, Copy, Default)]
pub struct FixtureSource;

impl TriageSource for FixtureSource {
    fn transcribe(
        &self,
        id: IncidentId,
    ) -> impl Future<Output = Result<TriagePayloadV1, IngestError>> + Send {
        async move {
            let body = fixture_body(id).ok_or(IngestError::NotFound(id))?;
            decode_triage_v1(body).map_err(IngestError::Invalid)
        }
    }
}
