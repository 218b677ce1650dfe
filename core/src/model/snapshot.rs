use crate::model::{Alert, ConnectionState, EvacuationCenter, Incident, Resource};
use serde::{Deserialize, Serialize};

/// Full dashboard state as seen by one consumer at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardSnapshot {
    /// Newest first.
    pub alerts: Vec<Alert>,
    pub evacuation_centers: Vec<EvacuationCenter>,
    pub resources: Vec<Resource>,
    pub incidents: Vec<Incident>,
    pub connection: ConnectionState,
}

impl DashboardSnapshot {
    pub fn active_alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(|alert| alert.is_active())
    }

    pub fn alert(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|alert| alert.id.as_str() == id)
    }

    pub fn incident(&self, id: u32) -> Option<&Incident> {
        self.incidents.iter().find(|incident| incident.id == id)
    }
}
