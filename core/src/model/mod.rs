pub mod alert;
pub mod connection;
pub mod incident;
pub mod resource;
pub mod shelter;
pub mod snapshot;

pub use alert::{display_time, Alert, AlertDraft, AlertId, AlertIdSequence, AlertStatus, Priority};
pub use connection::ConnectionState;
pub use incident::{Incident, IncidentStatus};
pub use resource::{Resource, ResourceUsage};
pub use shelter::{occupancy_label, occupancy_percent, EvacuationCenter};
pub use snapshot::DashboardSnapshot;
