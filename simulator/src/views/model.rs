use chrono::{DateTime, Utc};
use reliefcore::model::{
    Alert, AlertId, AlertStatus, DashboardSnapshot, EvacuationCenter, Incident, IncidentStatus,
    Priority, Resource,
};
use serde::Serialize;
use std::collections::HashSet;

/// Notifications shown at once on the admin console.
const ADMIN_NOTIFICATION_SLOTS: usize = 3;

fn badge(connected: bool, up: &'static str, down: &'static str) -> &'static str {
    if connected {
        up
    } else {
        down
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminView {
    pub notifications: Vec<Alert>,
    pub active_alerts: usize,
    pub evacuation_centers: Vec<EvacuationCenter>,
    pub resources: Vec<Resource>,
    pub link: &'static str,
    pub last_update: DateTime<Utc>,
}

impl AdminView {
    pub fn project(snapshot: &DashboardSnapshot, dismissed: &HashSet<AlertId>) -> Self {
        let notifications = snapshot
            .active_alerts()
            .filter(|alert| !dismissed.contains(&alert.id))
            .take(ADMIN_NOTIFICATION_SLOTS)
            .cloned()
            .collect();

        Self {
            notifications,
            active_alerts: snapshot.active_alerts().count(),
            evacuation_centers: snapshot.evacuation_centers.clone(),
            resources: snapshot.resources.clone(),
            link: badge(snapshot.connection.is_connected, "Live", "Offline"),
            last_update: snapshot.connection.last_update,
        }
    }

    pub fn summary(&self) -> String {
        let occupancy: Vec<String> = self
            .evacuation_centers
            .iter()
            .map(|c| format!("{} {}", c.name, c.status()))
            .collect();
        format!(
            "{} | {} active alerts, {} notifications | {} | updated {}",
            self.link,
            self.active_alerts,
            self.notifications.len(),
            occupancy.join(", "),
            self.last_update.format("%H:%M:%S")
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NgoView {
    pub incidents: Vec<Incident>,
    pub active_incidents: usize,
    pub critical_incidents: usize,
    pub link: &'static str,
    pub last_update: DateTime<Utc>,
}

impl NgoView {
    pub fn project(snapshot: &DashboardSnapshot) -> Self {
        let incidents = snapshot.incidents.clone();
        Self {
            active_incidents: incidents
                .iter()
                .filter(|i| i.status == IncidentStatus::Active)
                .count(),
            critical_incidents: incidents
                .iter()
                .filter(|i| i.priority == Priority::Critical)
                .count(),
            incidents,
            link: badge(snapshot.connection.is_connected, "Live", "Offline"),
            last_update: snapshot.connection.last_update,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} | {} incidents, {} active, {} critical",
            self.link,
            self.incidents.len(),
            self.active_incidents,
            self.critical_incidents
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CitizenView {
    pub current_alert: Alert,
    pub link: &'static str,
}

/// Shown to citizens when no urgent alert is pending acknowledgment.
pub fn standing_advisory() -> Alert {
    Alert {
        id: AlertId::new("typhoon-maria"),
        time: "Now".into(),
        kind: "Typhoon Alert".into(),
        location: "All Areas".into(),
        priority: Priority::High,
        status: AlertStatus::Active,
        description: Some(
            "Typhoon Maria - Category 3. Stay indoors, secure loose objects, prepare emergency kit"
                .into(),
        ),
    }
}

impl CitizenView {
    pub fn project(snapshot: &DashboardSnapshot, acknowledged: &HashSet<AlertId>) -> Self {
        let current_alert = snapshot
            .active_alerts()
            .find(|alert| alert.priority.is_urgent() && !acknowledged.contains(&alert.id))
            .cloned()
            .unwrap_or_else(standing_advisory);

        Self {
            current_alert,
            link: badge(snapshot.connection.is_connected, "Online", "Offline"),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} | {} {} at {} ({})",
            self.link,
            self.current_alert.priority,
            self.current_alert.kind,
            self.current_alert.location,
            self.current_alert.id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reliefcore::seed::demo_snapshot;

    #[test]
    fn admin_view_skips_dismissed_and_resolved() {
        let mut snapshot = demo_snapshot(Utc::now());
        snapshot.alerts[0].status = AlertStatus::Resolved;
        let dismissed: HashSet<AlertId> = [AlertId::from("2")].into_iter().collect();

        let view = AdminView::project(&snapshot, &dismissed);
        let ids: Vec<_> = view.notifications.iter().map(|a| a.id.to_string()).collect();
        assert_eq!(ids, vec!["3", "4"]);
        assert_eq!(view.active_alerts, 3);
        assert_eq!(view.link, "Live");
    }

    #[test]
    fn admin_view_caps_notifications() {
        let snapshot = demo_snapshot(Utc::now());
        let view = AdminView::project(&snapshot, &HashSet::new());
        assert_eq!(view.notifications.len(), 3);
        assert_eq!(view.notifications[0].id.as_str(), "1");
    }

    #[test]
    fn ngo_view_counts_active_and_critical() {
        let mut snapshot = demo_snapshot(Utc::now());
        snapshot.connection.is_connected = false;
        let view = NgoView::project(&snapshot);
        assert_eq!(view.active_incidents, 2);
        assert_eq!(view.critical_incidents, 1);
        assert_eq!(view.link, "Offline");
    }

    #[test]
    fn citizen_view_walks_past_acknowledged_alerts() {
        let snapshot = demo_snapshot(Utc::now());
        let mut acknowledged = HashSet::new();
        assert_eq!(
            CitizenView::project(&snapshot, &acknowledged).current_alert.id.as_str(),
            "1"
        );

        acknowledged.insert(AlertId::from("1"));
        assert_eq!(
            CitizenView::project(&snapshot, &acknowledged).current_alert.id.as_str(),
            "4"
        );

        acknowledged.insert(AlertId::from("4"));
        let view = CitizenView::project(&snapshot, &acknowledged);
        assert_eq!(view.current_alert.id.as_str(), "typhoon-maria");
        assert_eq!(view.link, "Online");
    }
}
