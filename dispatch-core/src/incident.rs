use crate::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use triage_registry::TriagePayloadV1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncidentId(pub u32);

impl fmt::Display for IncidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IncidentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(IncidentId)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    pub fn rank(self) -> u8 {
        match self {
            Priority::Critical => 1,
            Priority::High => 2,
            Priority::Medium => 3,
            Priority::Low => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "critical" => Some(Priority::Critical),
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionClass {
    Calm,
    Concerned,
    Distressed,
    Panicked,
}

impl EmotionClass {
    pub fn as_str(self) -> &'static str {
        match self {
            EmotionClass::Calm => "calm",
            EmotionClass::Concerned => "concerned",
            EmotionClass::Distressed => "distressed",
            EmotionClass::Panicked => "panicked",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "calm" => Some(EmotionClass::Calm),
            "concerned" => Some(EmotionClass::Concerned),
            "distressed" => Some(EmotionClass::Distressed),
            "panicked" => Some(EmotionClass::Panicked),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Ambulance,
    Fire,
    Police,
}

impl UnitType {
    pub const ALL: [UnitType; 3] = [UnitType::Ambulance, UnitType::Fire, UnitType::Police];

    pub fn as_str(self) -> &'static str {
        match self {
            UnitType::Ambulance => "ambulance",
            UnitType::Fire => "fire",
            UnitType::Police => "police",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitType {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ambulance" => Ok(UnitType::Ambulance),
            "fire" => Ok(UnitType::Fire),
            "police" => Ok(UnitType::Police),
            other => Err(DashboardError::InvalidUnitType(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatched {
    pub ambulance: bool,
    pub fire: bool,
    pub police: bool,
}

impl Dispatched {
    pub fn any(&self) -> bool {
        self.ambulance || self.fire || self.police
    }

    pub fn get(&self, unit: UnitType) -> bool {
        match unit {
            UnitType::Ambulance => self.ambulance,
            UnitType::Fire => self.fire,
            UnitType::Police => self.police,
        }
    }

    pub(crate) fn mark(&mut self, unit: UnitType) {
        match unit {
            UnitType::Ambulance => self.ambulance = true,
            UnitType::Fire => self.fire = true,
            UnitType::Police => self.police = true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageFailure {
    pub attempts: u32,
    pub reason: String,
    /// No further attempts will be made for this incident.
    pub exhausted: bool,
}

/// Typed view of a validated triage payload. Missing fields stay unset or false.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Triage {
    pub priority: Option<Priority>,
    pub injuries: bool,
    pub fire: bool,
    pub trapped: bool,
    pub gas: bool,
    pub vehicles: u32,
    pub emotion: Option<EmotionClass>,
    pub generated_response: String,
    pub transcript: String,
    pub triage_score: Option<f64>,
    pub emotion_score: Option<f64>,
}

impl TryFrom<TriagePayloadV1> for Triage {
    type Error = DashboardError;

    fn try_from(payload: TriagePayloadV1) -> Result<Self, Self::Error> {
        triage_registry::validate_triage_v1(&payload).map_err(DashboardError::InvalidPayload)?;

        let priority = match payload.triage_label.as_deref() {
            Some(label) => Some(Priority::parse(label).ok_or_else(|| {
                DashboardError::InvalidPayload(format!("invalid triage_label '{label}'"))
            })?),
            None => None,
        };
        let emotion = match payload.emotion_class.as_deref() {
            Some(class) => Some(EmotionClass::parse(class).ok_or_else(|| {
                DashboardError::InvalidPayload(format!("invalid emotion_class '{class}'"))
            })?),
            None => None,
        };

        let facts = payload.facts;
        Ok(Triage {
            priority,
            injuries: facts.people_injured.unwrap_or(false),
            fire: facts.has_fire.unwrap_or(false),
            trapped: facts.is_trapped.unwrap_or(false),
            gas: facts.has_fuel_leak.unwrap_or(false),
            vehicles: facts.num_vehicles.unwrap_or(0),
            emotion,
            generated_response: payload.generated_response.unwrap_or_default(),
            transcript: payload.transcript.unwrap_or_default(),
            triage_score: payload.triage_score,
            emotion_score: payload.emotion_score,
        })
    }
}

/// Caller metadata known before triage arrives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallerInfo {
    pub id: IncidentId,
    pub name: String,
    pub phone: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    pub name: String,
    pub phone: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ready: bool,
    pub priority: Option<Priority>,
    pub injuries: bool,
    pub fire: bool,
    pub trapped: bool,
    pub gas: bool,
    pub vehicles: u32,
    pub emotion: Option<EmotionClass>,
    pub generated_response: String,
    pub transcript: String,
    pub triage_score: Option<f64>,
    pub emotion_score: Option<f64>,
    pub time: u64,
    pub created_at: u64,
    pub dispatched_at: Option<u64>,
    pub dispatched: Dispatched,
    pub triage_failure: Option<TriageFailure>,
}

impl Incident {
    pub fn placeholder(caller: CallerInfo) -> Self {
        Self {
            id: caller.id,
            name: caller.name,
            phone: caller.phone,
            location: caller.location,
            latitude: caller.latitude,
            longitude: caller.longitude,
            ready: false,
            priority: None,
            injuries: false,
            fire: false,
            trapped: false,
            gas: false,
            vehicles: 0,
            emotion: None,
            generated_response: String::new(),
            transcript: String::new(),
            triage_score: None,
            emotion_score: None,
            time: 0,
            created_at: 0,
            dispatched_at: None,
            dispatched: Dispatched::default(),
            triage_failure: None,
        }
    }

    pub fn is_dispatched(&self) -> bool {
        self.dispatched.any()
    }

    pub(crate) fn merge_triage(&mut self, triage: Triage) {
        self.priority = triage.priority;
        self.injuries = triage.injuries;
        self.fire = triage.fire;
        self.trapped = triage.trapped;
        self.gas = triage.gas;
        self.vehicles = triage.vehicles;
        self.emotion = triage.emotion;
        self.generated_response = triage.generated_response;
        self.transcript = triage.transcript;
        self.triage_score = triage.triage_score;
        self.emotion_score = triage.emotion_score;
        self.ready = true;
        self.time = 0;
        self.created_at = 0;
        self.triage_failure = None;
    }

    pub(crate) fn advance_clock(&mut self) {
        if !self.is_dispatched() {
            self.time += 1;
        } else if self.dispatched_at.is_none() {
            self.dispatched_at = Some(self.time);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPool {
    pub ambulances: u32,
    pub fire_trucks: u32,
    pub police: u32,
}

impl Default for UnitPool {
    fn default() -> Self {
        Self {
            ambulances: 8,
            fire_trucks: 5,
            police: 15,
        }
    }
}

impl UnitPool {
    pub fn available(&self, unit: UnitType) -> u32 {
        match unit {
            UnitType::Ambulance => self.ambulances,
            UnitType::Fire => self.fire_trucks,
            UnitType::Police => self.police,
        }
    }

    pub(crate) fn take(&mut self, unit: UnitType) -> Result<(), DashboardError> {
        let slot = match unit {
            UnitType::Ambulance => &mut self.ambulances,
            UnitType::Fire => &mut self.fire_trucks,
            UnitType::Police => &mut self.police,
        };
        if *slot == 0 {
            return Err(DashboardError::UnitsExhausted(unit));
        }
        *slot -= 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_registry::TriageFactsV1;

    fn caller(id: u32) -> CallerInfo {
        CallerInfo {
            id: IncidentId(id),
            name: "Caller".into(),
            phone: "555-0100".into(),
            location: "Main St".into(),
            latitude: Some(30.6),
            longitude: Some(-96.3),
        }
    }

    #[test]
    fn triage_from_payload_maps_facts() {
        let payload = TriagePayloadV1 {
            facts: TriageFactsV1 {
                people_injured: Some(true),
                has_fire: Some(false),
                num_vehicles: Some(3),
                is_trapped: None,
                has_fuel_leak: Some(true),
            },
            triage_label: Some("HIGH".into()),
            emotion_class: Some("panicked".into()),
            transcript: Some("help".into()),
            ..Default::default()
        };
        let triage = Triage::try_from(payload).expect("triage");
        assert_eq!(triage.priority, Some(Priority::High));
        assert_eq!(triage.emotion, Some(EmotionClass::Panicked));
        assert!(triage.injuries);
        assert!(!triage.trapped);
        assert!(triage.gas);
        assert_eq!(triage.vehicles, 3);
        assert_eq!(triage.transcript, "help");
        assert_eq!(triage.generated_response, "");
    }

    #[test]
    fn triage_rejects_unknown_label() {
        let payload = TriagePayloadV1 {
            triage_label: Some("severe".into()),
            ..Default::default()
        };
        assert!(matches!(
            Triage::try_from(payload),
            Err(DashboardError::InvalidPayload(_))
        ));
    }

    #[test]
    fn unit_type_parses_and_rejects() {
        assert_eq!("Ambulance".parse::<UnitType>().ok(), Some(UnitType::Ambulance));
        assert_eq!("police".parse::<UnitType>().ok(), Some(UnitType::Police));
        assert!(matches!(
            "helicopter".parse::<UnitType>(),
            Err(DashboardError::InvalidUnitType(s)) if s == "helicopter"
        ));
    }

    #[test]
    fn clock_latches_dispatch_time_once() {
        let mut incident = Incident::placeholder(caller(1));
        incident.advance_clock();
        incident.advance_clock();
        assert_eq!(incident.time, 2);

        incident.dispatched.mark(UnitType::Police);
        incident.advance_clock();
        assert_eq!(incident.dispatched_at, Some(2));
        assert_eq!(incident.time, 2);

        incident.time = 40;
        incident.advance_clock();
        assert_eq!(incident.dispatched_at, Some(2));
    }

    #[test]
    fn pool_refuses_to_go_negative() {
        let mut pool = UnitPool {
            ambulances: 1,
            fire_trucks: 0,
            police: 2,
        };
        assert!(pool.take(UnitType::Ambulance).is_ok());
        assert_eq!(pool.ambulances, 0);
        assert!(matches!(
            pool.take(UnitType::Ambulance),
            Err(DashboardError::UnitsExhausted(UnitType::Ambulance))
        ));
        assert_eq!(pool.ambulances, 0);
        assert!(pool.take(UnitType::Fire).is_err());
    }
}
