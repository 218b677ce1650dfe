//! Role consoles attached to the shared engine.
//!
//! Each console owns one [`ConsumerHandle`], keeps its view-local state
//! (dismissed or acknowledged alerts) and re-renders whenever the engine
//! publishes a change.

use crate::views::model::{AdminView, CitizenView, NgoView};
use crate::views::notifications::NotificationTray;
use crate::workflow::config::OperatorAction;
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use reliefcore::model::{AlertDraft, AlertId, IncidentStatus};
use reliefcore::ConsumerHandle;
use std::collections::HashSet;
use tokio::sync::mpsc;

pub trait Console: Send {
    fn role(&self) -> &'static str;
    fn handle_mut(&mut self) -> &mut ConsumerHandle;
    /// Re-projects the latest snapshot and returns a one-line rendering.
    fn render(&mut self, now: DateTime<Utc>) -> String;
    /// Carries out an operator command addressed to this role. Returns false
    /// when the command belongs to another console or names an unknown id.
    fn apply(&mut self, action: &OperatorAction) -> bool;
}

/// Renders `console` on every engine change and applies operator commands as
/// they arrive, until the engine goes away.
pub async fn drive<C: Console>(
    mut console: C,
    mut actions: mpsc::UnboundedReceiver<OperatorAction>,
) {
    let line = console.render(Utc::now());
    info!("[{}] {}", console.role(), line);
    loop {
        tokio::select! {
            changed = console.handle_mut().changed() => {
                if changed.is_none() {
                    break;
                }
                let line = console.render(Utc::now());
                info!("[{}] {}", console.role(), line);
            }
            Some(action) = actions.recv() => {
                if !console.apply(&action) {
                    warn!("[{}] operator command had no effect: {:?}", console.role(), action);
                }
            }
        }
    }
}

pub struct AdminConsole {
    handle: ConsumerHandle,
    tray: NotificationTray,
}

impl AdminConsole {
    pub fn new(handle: ConsumerHandle, notification_ttl: Duration) -> Self {
        Self {
            handle,
            tray: NotificationTray::new(notification_ttl),
        }
    }

    /// Current view after expiring stale low-priority notifications.
    pub fn view(&mut self, now: DateTime<Utc>) -> AdminView {
        let snapshot = self.handle.snapshot();
        self.tray.retain_known(&snapshot.alerts);
        let view = AdminView::project(&snapshot, self.tray.dismissed());
        if self.tray.sweep(&view.notifications, now).is_empty() {
            view
        } else {
            AdminView::project(&snapshot, self.tray.dismissed())
        }
    }

    pub fn dismiss(&mut self, id: &AlertId) {
        self.tray.dismiss(id);
    }

    pub fn add_alert(&self, draft: AlertDraft) -> AlertId {
        self.handle.add_alert(draft)
    }

    /// Resolves the alert for everyone and hides it from this console.
    pub fn resolve(&mut self, id: &AlertId) -> bool {
        let found = self.handle.resolve_alert(id.as_str());
        self.tray.dismiss(id);
        found
    }
}

impl Console for AdminConsole {
    fn role(&self) -> &'static str {
        "admin"
    }

    fn handle_mut(&mut self) -> &mut ConsumerHandle {
        &mut self.handle
    }

    fn render(&mut self, now: DateTime<Utc>) -> String {
        self.view(now).summary()
    }

    fn apply(&mut self, action: &OperatorAction) -> bool {
        match action {
            OperatorAction::AddAlert { alert } => {
                let id = self.add_alert(alert.clone());
                info!("[admin] broadcast alert {}", id);
                true
            }
            OperatorAction::ResolveAlert { id } => self.resolve(&AlertId::from(id.as_str())),
            OperatorAction::DismissAlert { id } => {
                self.dismiss(&AlertId::from(id.as_str()));
                true
            }
            _ => false,
        }
    }
}

pub struct NgoConsole {
    handle: ConsumerHandle,
}

impl NgoConsole {
    pub fn new(handle: ConsumerHandle) -> Self {
        Self { handle }
    }

    pub fn view(&self) -> NgoView {
        NgoView::project(&self.handle.snapshot())
    }

    pub fn update_status(&self, id: u32, status: IncidentStatus) -> bool {
        self.handle.update_incident_status(id, status)
    }
}

impl Console for NgoConsole {
    fn role(&self) -> &'static str {
        "ngo"
    }

    fn handle_mut(&mut self) -> &mut ConsumerHandle {
        &mut self.handle
    }

    fn render(&mut self, _now: DateTime<Utc>) -> String {
        self.view().summary()
    }

    fn apply(&mut self, action: &OperatorAction) -> bool {
        match action {
            OperatorAction::UpdateIncident { id, status } => self.update_status(*id, *status),
            _ => false,
        }
    }
}

pub struct CitizenConsole {
    handle: ConsumerHandle,
    acknowledged: HashSet<AlertId>,
}

impl CitizenConsole {
    pub fn new(handle: ConsumerHandle) -> Self {
        Self {
            handle,
            acknowledged: HashSet::new(),
        }
    }

    pub fn view(&self) -> CitizenView {
        CitizenView::project(&self.handle.snapshot(), &self.acknowledged)
    }

    pub fn acknowledge(&mut self, id: &AlertId) {
        self.acknowledged.insert(id.clone());
    }
}

impl Console for CitizenConsole {
    fn role(&self) -> &'static str {
        "citizen"
    }

    fn handle_mut(&mut self) -> &mut ConsumerHandle {
        &mut self.handle
    }

    fn render(&mut self, _now: DateTime<Utc>) -> String {
        self.view().summary()
    }

    fn apply(&mut self, action: &OperatorAction) -> bool {
        match action {
            OperatorAction::AcknowledgeAlert { id } => {
                self.acknowledge(&AlertId::from(id.as_str()));
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reliefcore::model::AlertStatus;
    use reliefcore::{EngineConfig, EngineService};

    fn service() -> EngineService {
        EngineService::from_config(EngineConfig {
            seed: Some(3),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn admin_resolve_reaches_other_consoles() {
        let service = service();
        let mut admin = AdminConsole::new(service.attach().unwrap(), Duration::seconds(10));
        let citizen = CitizenConsole::new(service.attach().unwrap());

        assert!(admin.resolve(&AlertId::from("1")));
        let snapshot = service.engine().snapshot();
        assert_eq!(snapshot.alert("1").unwrap().status, AlertStatus::Resolved);
        assert_eq!(citizen.view().current_alert.id.as_str(), "4");

        let view = admin.view(Utc::now());
        assert!(view.notifications.iter().all(|a| a.id.as_str() != "1"));
    }

    #[tokio::test(start_paused = true)]
    async fn admin_tray_expires_low_priority_alert() {
        let service = service();
        let mut admin = AdminConsole::new(service.attach().unwrap(), Duration::seconds(10));
        let start = Utc::now();

        admin.dismiss(&AlertId::from("1"));
        let ids = |view: &AdminView| -> Vec<String> {
            view.notifications.iter().map(|a| a.id.to_string()).collect()
        };
        assert_eq!(ids(&admin.view(start)), vec!["2", "3", "4"]);
        assert_eq!(
            ids(&admin.view(start + Duration::seconds(10))),
            vec!["2", "4"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn consoles_only_apply_their_own_commands() {
        let service = service();
        let mut admin = AdminConsole::new(service.attach().unwrap(), Duration::seconds(10));
        let mut ngo = NgoConsole::new(service.attach().unwrap());
        let mut citizen = CitizenConsole::new(service.attach().unwrap());

        let update = OperatorAction::UpdateIncident {
            id: 4,
            status: IncidentStatus::Resolved,
        };
        assert!(!admin.apply(&update));
        assert!(ngo.apply(&update));

        let acknowledge = OperatorAction::AcknowledgeAlert { id: "1".into() };
        assert!(!ngo.apply(&acknowledge));
        assert!(citizen.apply(&acknowledge));
        assert_eq!(citizen.view().current_alert.id.as_str(), "4");

        assert!(!admin.apply(&OperatorAction::ResolveAlert { id: "nope".into() }));
        assert!(admin.apply(&OperatorAction::DismissAlert { id: "2".into() }));
        let view = admin.view(Utc::now());
        assert!(view.notifications.iter().all(|a| a.id.as_str() != "2"));
    }

    #[tokio::test(start_paused = true)]
    async fn driven_console_applies_queued_commands() {
        let service = service();
        let ngo = NgoConsole::new(service.attach().unwrap());
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(drive(ngo, rx));

        tx.send(OperatorAction::UpdateIncident {
            id: 3,
            status: IncidentStatus::Resolved,
        })
        .unwrap();
        let mut updates = service.engine().subscribe();
        updates.changed().await.unwrap();
        assert_eq!(
            service.engine().snapshot().incident(3).unwrap().status,
            IncidentStatus::Resolved
        );

        task.abort();
        let _ = task.await;
        assert!(!service.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn ngo_updates_are_shared() {
        let service = service();
        let ngo = NgoConsole::new(service.attach().unwrap());
        assert!(ngo.update_status(3, IncidentStatus::Responding));
        assert!(!ngo.update_status(42, IncidentStatus::Resolved));
        assert_eq!(ngo.view().active_incidents, 2);
        assert_eq!(
            service.engine().snapshot().incident(3).unwrap().status,
            IncidentStatus::Responding
        );
    }
}
