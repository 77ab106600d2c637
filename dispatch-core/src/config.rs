use crate::incident::{CallerInfo, IncidentId, TriageFailure, UnitPool};
use crate::map::{LatLng, DEFAULT_HEADQUARTERS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TRIAGE_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_SCHEDULE: &str = "1@0,2@50,3@70,4@90";

/// One triage fetch, fired `delay_secs` after the dashboard starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub incident_id: IncidentId,
    pub delay_secs: u64,
}

impl ScheduleEntry {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 2_000,
            max_backoff_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// Wait before attempt `attempt + 1`, given that `attempt` (1-based) failed.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        let ms = self
            .initial_backoff_ms
            .saturating_mul(1u64 << exp)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }

    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Failure record for a fetch that failed on `attempt`. It is marked
    /// exhausted when the error is permanent or no attempts remain.
    pub fn failure(
        &self,
        attempt: u32,
        retryable: bool,
        reason: impl Into<String>,
    ) -> TriageFailure {
        TriageFailure {
            attempts: attempt,
            reason: reason.into(),
            exhausted: !(retryable && self.should_retry(attempt)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub triage_base_url: String,
    pub schedule: Vec<ScheduleEntry>,
    pub units: UnitPool,
    pub headquarters: LatLng,
    pub retry: RetryPolicy,
    pub tick_interval_ms: u64,
    pub callers: Vec<CallerInfo>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            triage_base_url: DEFAULT_TRIAGE_BASE_URL.into(),
            schedule: default_schedule(),
            units: UnitPool::default(),
            headquarters: DEFAULT_HEADQUARTERS,
            retry: RetryPolicy::default(),
            tick_interval_ms: 1_000,
            callers: default_callers(),
        }
    }
}

impl DashboardConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn transcribe_url(&self, id: IncidentId) -> String {
        format!(
            "{}/incident/{id}/transcribe",
            self.triage_base_url.trim_end_matches('/')
        )
    }
}

pub fn default_schedule() -> Vec<ScheduleEntry> {
    schedule_from(&[(1, 0), (2, 50), (3, 70), (4, 90)])
}

/// Builds a schedule from `(incident id, delay in seconds)` pairs.
pub fn schedule_from(entries: &[(u32, u64)]) -> Vec<ScheduleEntry> {
    entries
        .iter()
        .map(|&(id, delay_secs)| ScheduleEntry {
            incident_id: IncidentId(id),
            delay_secs,
        })
        .collect()
}

pub fn default_callers() -> Vec<CallerInfo> {
    vec![
        CallerInfo {
            id: IncidentId(1),
            name: "Maria Lopez".into(),
            phone: "(979) 555-0142".into(),
            location: "Highway 6 & University Dr".into(),
            latitude: Some(30.6187),
            longitude: Some(-96.3108),
        },
        CallerInfo {
            id: IncidentId(2),
            name: "James Carter".into(),
            phone: "(979) 555-0178".into(),
            location: "Texas Ave & George Bush Dr".into(),
            latitude: Some(30.6101),
            longitude: Some(-96.3295),
        },
        CallerInfo {
            id: IncidentId(3),
            name: "Priya Shah".into(),
            phone: "(979) 555-0113".into(),
            location: "Wellborn Rd underpass".into(),
            latitude: Some(30.6015),
            longitude: Some(-96.3402),
        },
        CallerInfo {
            id: IncidentId(4),
            name: "Unknown caller".into(),
            phone: "(979) 555-0190".into(),
            location: "Parkside lot 35".into(),
            latitude: None,
            longitude: None,
        },
    ]
}

/// Parses `"1@0,2@50"` into schedule entries (incident id `@` delay seconds).
pub fn parse_schedule(value: &str) -> Result<Vec<ScheduleEntry>, String> {
    let mut out = Vec::new();
    for part in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (id, delay) = part
            .split_once('@')
            .ok_or_else(|| format!("schedule entry '{part}' must look like <id>@<seconds>"))?;
        let incident_id = id
            .parse::<IncidentId>()
            .map_err(|e| format!("schedule entry '{part}': bad incident id: {e}"))?;
        let delay_secs = delay
            .trim()
            .parse::<u64>()
            .map_err(|e| format!("schedule entry '{part}': bad delay: {e}"))?;
        out.push(ScheduleEntry {
            incident_id,
            delay_secs,
        });
    }
    if out.is_empty() {
        return Err("schedule is empty".into());
    }
    Ok(out)
}

/// Parses `"ambulances,fire_trucks,police"`.
pub fn parse_units(value: &str) -> Result<UnitPool, String> {
    let counts = value
        .split(',')
        .map(|v| v.trim().parse::<u32>().map_err(|e| format!("bad unit count '{v}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    let [ambulances, fire_trucks, police] = counts[..] else {
        return Err(format!("expected 3 unit counts, got {}", counts.len()));
    };
    Ok(UnitPool {
        ambulances,
        fire_trucks,
        police,
    })
}

pub fn parse_lat_lng(value: &str) -> Result<LatLng, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("coordinate '{value}' must look like <lat>,<lng>"))?;
    let lat = lat.trim().parse::<f64>().map_err(|e| format!("bad latitude: {e}"))?;
    let lng = lng.trim().parse::<f64>().map_err(|e| format!("bad longitude: {e}"))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(format!("coordinate '{value}' out of range"));
    }
    Ok(LatLng { lat, lng })
}
