use crate::model::alert::Priority;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Active,
    Responding,
    Pending,
    Resolved,
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IncidentStatus::Active => "active",
            IncidentStatus::Responding => "responding",
            IncidentStatus::Pending => "pending",
            IncidentStatus::Resolved => "resolved",
        };
        f.write_str(label)
    }
}

/// Field incident tracked by rescue coordinators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Incident {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub priority: Priority,
    pub time: String,
    pub status: IncidentStatus,
    pub coordinates: String,
}
