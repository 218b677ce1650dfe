use chrono::{DateTime, Duration, Utc};
use reliefcore::model::{Alert, AlertId, Priority};
use std::collections::{HashMap, HashSet};

/// Pop-up notifications shown on the admin console.
///
/// Low-priority notifications expire on their own once they have been on
/// screen for the TTL; everything else stays until dismissed or resolved.
pub struct NotificationTray {
    ttl: Duration,
    shown_at: HashMap<AlertId, DateTime<Utc>>,
    dismissed: HashSet<AlertId>,
}

impl NotificationTray {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            shown_at: HashMap::new(),
            dismissed: HashSet::new(),
        }
    }

    pub fn dismissed(&self) -> &HashSet<AlertId> {
        &self.dismissed
    }

    pub fn dismiss(&mut self, id: &AlertId) {
        self.shown_at.remove(id);
        self.dismissed.insert(id.clone());
    }

    /// Records first-shown times for `visible` and dismisses expired
    /// low-priority entries. Returns the ids that expired.
    pub fn sweep(&mut self, visible: &[Alert], now: DateTime<Utc>) -> Vec<AlertId> {
        for alert in visible {
            self.shown_at.entry(alert.id.clone()).or_insert(now);
        }

        let expired: Vec<AlertId> = visible
            .iter()
            .filter(|alert| alert.priority == Priority::Low)
            .filter(|alert| {
                self.shown_at
                    .get(&alert.id)
                    .map_or(false, |shown| now - *shown >= self.ttl)
            })
            .map(|alert| alert.id.clone())
            .collect();
        for id in &expired {
            self.dismiss(id);
        }
        self.shown_at.retain(|id, _| visible.iter().any(|alert| &alert.id == id));
        expired
    }

    /// Forgets dismissals for alerts the engine no longer holds.
    pub fn retain_known(&mut self, alerts: &[Alert]) {
        self.dismissed
            .retain(|id| alerts.iter().any(|alert| &alert.id == id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reliefcore::model::AlertStatus;

    fn alert(id: &str, priority: Priority) -> Alert {
        Alert {
            id: id.into(),
            time: "14:30".into(),
            kind: "Flood".into(),
            location: "Barangay Centro".into(),
            priority,
            status: AlertStatus::Active,
            description: None,
        }
    }

    #[test]
    fn only_low_priority_notifications_expire() {
        let start = Utc::now();
        let mut tray = NotificationTray::new(Duration::seconds(10));
        let visible = vec![alert("a", Priority::Low), alert("b", Priority::Critical)];

        assert!(tray.sweep(&visible, start).is_empty());
        assert!(tray.sweep(&visible, start + Duration::seconds(9)).is_empty());

        let expired = tray.sweep(&visible, start + Duration::seconds(10));
        assert_eq!(expired, vec![AlertId::from("a")]);
        assert!(tray.dismissed().contains(&AlertId::from("a")));
        assert!(!tray.dismissed().contains(&AlertId::from("b")));
    }

    #[test]
    fn expiry_counts_from_first_sighting() {
        let start = Utc::now();
        let mut tray = NotificationTray::new(Duration::seconds(10));
        tray.sweep(&[], start);
        let late = vec![alert("c", Priority::Low)];
        assert!(tray.sweep(&late, start + Duration::seconds(8)).is_empty());
        assert!(tray.sweep(&late, start + Duration::seconds(15)).is_empty());
        assert_eq!(tray.sweep(&late, start + Duration::seconds(18)).len(), 1);
    }

    #[test]
    fn tray_only_remembers_current_alerts() {
        let start = Utc::now();
        let mut tray = NotificationTray::new(Duration::seconds(10));
        let mut history: Vec<Alert> = Vec::new();

        for i in 0..500 {
            let now = start + Duration::seconds(5 * i);
            let fresh = alert(&format!("gen-{}", i), Priority::Low);
            history.insert(0, fresh.clone());
            history.truncate(10);
            tray.sweep(&[fresh], now);
            tray.retain_known(&history);
            assert!(tray.shown_at.len() <= 1);
            assert!(tray.dismissed().len() <= history.len());
        }

        tray.dismiss(&AlertId::from("gen-499"));
        tray.sweep(&[], start + Duration::seconds(5000));
        tray.retain_known(&[]);
        assert!(tray.shown_at.is_empty());
        assert!(tray.dismissed().is_empty());
    }
}
