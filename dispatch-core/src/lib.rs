pub mod card;
pub mod config;
pub mod error;
pub mod incident;
pub mod map;
pub mod ordering;
pub mod recommend;
pub mod store;
pub mod style;
pub mod timer;
pub mod view;

pub use error::DashboardError;
pub use incident::{Incident, IncidentId, Priority, UnitPool, UnitType};
pub use store::{DashboardState, Event};
pub use view::DashboardView;
