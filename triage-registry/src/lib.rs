use serde::{Deserialize, Serialize};

pub const TRIAGE_LABELS: [&str; 4] = ["critical", "high", "medium", "low"];
pub const EMOTION_CLASSES: [&str; 4] = ["calm", "concerned", "distressed", "panicked"];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TriageFactsV1 {
    #[serde(default)]
    pub people_injured: Option<bool>,
    #[serde(default)]
    pub has_fire: Option<bool>,
    #[serde(default)]
    pub num_vehicles: Option<u32>,
    #[serde(default)]
    pub is_trapped: Option<bool>,
    #[serde(default)]
    pub has_fuel_leak: Option<bool>,
}

/// Body of `GET /incident/{id}/transcribe`. Every field may be missing; the
/// service adds keys (`ui_suggestions`, `call_id`, ...) that are ignored here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TriagePayloadV1 {
    #[serde(default)]
    pub facts: TriageFactsV1,
    #[serde(default)]
    pub triage_label: Option<String>,
    #[serde(default)]
    pub triage_score: Option<f64>,
    #[serde(default)]
    pub generated_response: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub emotion_class: Option<String>,
    #[serde(default)]
    pub emotion_score: Option<f64>,
}

pub fn validate_triage_v1(payload: &TriagePayloadV1) -> Result<(), String> {
    if let Some(label) = payload.triage_label.as_deref() {
        let lower = label.trim().to_ascii_lowercase();
        if !TRIAGE_LABELS.contains(&lower.as_str()) {
            return Err(format!("invalid triage_label '{label}'"));
        }
    }
    if let Some(class) = payload.emotion_class.as_deref() {
        let lower = class.trim().to_ascii_lowercase();
        if !EMOTION_CLASSES.contains(&lower.as_str()) {
            return Err(format!("invalid emotion_class '{class}'"));
        }
    }
    for (name, score) in [
        ("triage_score", payload.triage_score),
        ("emotion_score", payload.emotion_score),
    ] {
        if let Some(v) = score {
            if !v.is_finite() {
                return Err(format!("{name} must be finite"));
            }
        }
    }
    Ok(())
}

pub fn decode_triage_v1(body: &str) -> Result<TriagePayloadV1, String> {
    let payload: TriagePayloadV1 = serde_json::from_str(body).map_err(|e| e.to_string())?;
    validate_triage_v1(&payload)?;
    Ok(payload)
}
