use crate::incident::{IncidentId, UnitType};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("incident {0} not found")]
    IncidentNotFound(IncidentId),
    #[error("invalid unit type '{0}'")]
    InvalidUnitType(String),
    #[error("no {0} units available")]
    UnitsExhausted(UnitType),
    #[error("invalid triage payload: {0}")]
    InvalidPayload(String),
}
