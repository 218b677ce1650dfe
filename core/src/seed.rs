//! Deterministic demonstration dataset every engine starts from.

use crate::model::{
    Alert, AlertStatus, ConnectionState, DashboardSnapshot, EvacuationCenter, Incident,
    IncidentStatus, Priority, Resource,
};
use chrono::{DateTime, Utc};

pub fn demo_snapshot(now: DateTime<Utc>) -> DashboardSnapshot {
    DashboardSnapshot {
        alerts: demo_alerts(),
        evacuation_centers: demo_centers(now),
        resources: demo_resources(now),
        incidents: demo_incidents(),
        connection: ConnectionState::connected(now),
    }
}

fn alert(id: &str, time: &str, kind: &str, location: &str, priority: Priority) -> Alert {
    Alert {
        id: id.into(),
        time: time.into(),
        kind: kind.into(),
        location: location.into(),
        priority,
        status: AlertStatus::Active,
        description: None,
    }
}

fn demo_alerts() -> Vec<Alert> {
    vec![
        alert("1", "14:30", "Flood", "Barangay Centro", Priority::High),
        alert("2", "14:15", "Landslide Risk", "Barangay Norte", Priority::Medium),
        alert("3", "13:45", "Power Outage", "Barangay Sur", Priority::Low),
        alert("4", "13:30", "Road Blocked", "Main Highway", Priority::High),
    ]
}

fn demo_centers(now: DateTime<Utc>) -> Vec<EvacuationCenter> {
    vec![
        EvacuationCenter::new("Barangay Hall - Centro", 200, 140, now),
        EvacuationCenter::new("Elementary School - Norte", 150, 95, now),
        EvacuationCenter::new("Community Center - Sur", 180, 165, now),
        EvacuationCenter::new("High School - Este", 250, 180, now),
    ]
}

fn demo_resources(now: DateTime<Utc>) -> Vec<Resource> {
    vec![
        Resource::consumable("Food Packs", 850, 320, "packs", now),
        Resource::consumable("Water Bottles", 1200, 680, "bottles", now),
        Resource::consumable("Medicine Kits", 45, 28, "kits", now),
        Resource::fleet("Relief Trucks", 8, 5, "trucks", now),
    ]
}

fn incident(
    id: u32,
    kind: &str,
    location: &str,
    priority: Priority,
    time: &str,
    status: IncidentStatus,
    coordinates: &str,
) -> Incident {
    Incident {
        id,
        kind: kind.into(),
        location: location.into(),
        priority,
        time: time.into(),
        status,
        coordinates: coordinates.into(),
    }
}

fn demo_incidents() -> Vec<Incident> {
    vec![
        incident(
            1,
            "Flood",
            "Barangay Centro",
            Priority::High,
            "14:30",
            IncidentStatus::Active,
            "14.5995° N, 120.9842° E",
        ),
        incident(
            2,
            "Landslide",
            "Barangay Norte",
            Priority::Critical,
            "14:15",
            IncidentStatus::Responding,
            "14.6012° N, 120.9856° E",
        ),
        incident(
            3,
            "Stranded Family",
            "Riverside Area",
            Priority::Medium,
            "13:45",
            IncidentStatus::Pending,
            "14.5978° N, 120.9834° E",
        ),
        incident(
            4,
            "Medical Emergency",
            "Evacuation Center",
            Priority::High,
            "13:30",
            IncidentStatus::Active,
            "14.6001° N, 120.9845° E",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_dataset_has_four_of_each() {
        let snapshot = demo_snapshot(Utc::now());
        assert_eq!(snapshot.alerts.len(), 4);
        assert_eq!(snapshot.evacuation_centers.len(), 4);
        assert_eq!(snapshot.resources.len(), 4);
        assert_eq!(snapshot.incidents.len(), 4);
        assert!(snapshot.connection.is_connected);
    }

    #[test]
    fn demo_dataset_is_deterministic() {
        let now = Utc::now();
        assert_eq!(demo_snapshot(now), demo_snapshot(now));
        let statuses: Vec<_> = demo_snapshot(now)
            .evacuation_centers
            .iter()
            .map(|c| c.status().to_string())
            .collect();
        assert_eq!(statuses, vec!["70%", "63%", "92%", "72%"]);
    }
}
