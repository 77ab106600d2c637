use crate::incident::{Incident, IncidentId, UnitType};
use crate::style;
use crate::timer::format_secs;
use serde::Serialize;

/// Waiting time after which an undispatched card starts flashing, and the
/// target for the average dispatch time.
pub const GOAL_TIME_SECS: u64 = 75;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum Badge {
    Injuries,
    Fire,
    GasLeak,
    Vehicles(u32),
    Trapped,
}

impl Badge {
    pub fn label(&self) -> String {
        match self {
            Badge::Injuries => "Injuries".into(),
            Badge::Fire => "Fire".into(),
            Badge::GasLeak => "Gas Leak".into(),
            Badge::Vehicles(n) => format!("{n} vehicles"),
            Badge::Trapped => "Trapped".into(),
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Badge::Injuries => "badge-injuries",
            Badge::Fire => "badge-fire",
            Badge::GasLeak => "badge-gas",
            Badge::Vehicles(_) => "badge-vehicles",
            Badge::Trapped => "badge-trapped",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CardSummary {
    pub id: IncidentId,
    pub name: String,
    pub emotion: Option<&'static str>,
    pub emotion_color: &'static str,
    pub priority: Option<&'static str>,
    pub priority_class: &'static str,
    pub location: String,
    pub elapsed: String,
    pub badges: Vec<Badge>,
    pub flashing: bool,
    pub dispatch_lines: Vec<&'static str>,
}

impl From<&Incident> for CardSummary {
    fn from(incident: &Incident) -> Self {
        Self {
            id: incident.id,
            name: incident.name.clone(),
            emotion: incident.emotion.map(|e| e.as_str()),
            emotion_color: style::emotion_color(incident.emotion),
            priority: incident.priority.map(|p| p.as_str()),
            priority_class: style::priority_class(incident.priority),
            location: incident.location.clone(),
            elapsed: format_secs(incident.time),
            badges: badges(incident),
            flashing: should_flash(incident),
            dispatch_lines: dispatch_lines(incident),
        }
    }
}

pub fn badges(incident: &Incident) -> Vec<Badge> {
    let mut out = Vec::new();
    if incident.injuries {
        out.push(Badge::Injuries);
    }
    if incident.fire {
        out.push(Badge::Fire);
    }
    if incident.gas {
        out.push(Badge::GasLeak);
    }
    if incident.vehicles > 0 {
        out.push(Badge::Vehicles(incident.vehicles));
    }
    if incident.trapped {
        out.push(Badge::Trapped);
    }
    out
}

pub fn should_flash(incident: &Incident) -> bool {
    !incident.is_dispatched() && incident.time >= GOAL_TIME_SECS
}

pub fn dispatch_line(unit: UnitType) -> &'static str {
    match unit {
        UnitType::Ambulance => "Ambulance Dispatched",
        UnitType::Fire => "Firetruck Dispatched",
        UnitType::Police => "Police Dispatched",
    }
}

pub fn dispatch_lines(incident: &Incident) -> Vec<&'static str> {
    UnitType::ALL
        .into_iter()
        .filter(|u| incident.dispatched.get(*u))
        .map(dispatch_line)
        .collect()
}

pub fn average_is_over_goal(average_secs: f64) -> bool {
    average_secs > GOAL_TIME_SECS as f64
}
