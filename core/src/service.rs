//! Injectable engine context with attach/detach lifecycle.
//!
//! Views never reach the engine directly: they [`EngineService::attach`] and
//! receive a [`ConsumerHandle`]. The first attachment starts the timers and
//! dropping the last handle stops them.

use crate::engine::RealtimeEngine;
use crate::model::{AlertDraft, AlertId, DashboardSnapshot, IncidentStatus};
use crate::prelude::{EngineConfig, EngineResult};
use crate::scheduler::Scheduler;
use crate::telemetry::LogManager;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

struct ServiceInner {
    engine: RealtimeEngine,
    scheduler: Scheduler,
    consumers: Mutex<usize>,
    logger: LogManager,
}

impl ServiceInner {
    fn consumers(&self) -> MutexGuard<'_, usize> {
        self.consumers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Clone)]
pub struct EngineService {
    inner: Arc<ServiceInner>,
}

impl EngineService {
    pub fn new(engine: RealtimeEngine) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                scheduler: Scheduler::new(engine.clone()),
                engine,
                consumers: Mutex::new(0),
                logger: LogManager::new("service"),
            }),
        }
    }

    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        Ok(Self::new(RealtimeEngine::new(config)?))
    }

    pub fn engine(&self) -> &RealtimeEngine {
        &self.inner.engine
    }

    /// Registers a consumer, starting the timers if it is the first one.
    pub fn attach(&self) -> EngineResult<ConsumerHandle> {
        let mut consumers = self.inner.consumers();
        if *consumers == 0 {
            self.inner.scheduler.start()?;
        }
        *consumers += 1;
        self.inner
            .logger
            .record(&format!("consumer attached ({} total)", *consumers));

        Ok(ConsumerHandle {
            service: Arc::clone(&self.inner),
            updates: self.inner.engine.subscribe(),
        })
    }

    pub fn consumer_count(&self) -> usize {
        *self.inner.consumers()
    }

    pub fn is_running(&self) -> bool {
        self.inner.scheduler.is_running()
    }
}

/// A view's connection to the shared engine: snapshot reads, change
/// notification, and the three commands.
pub struct ConsumerHandle {
    service: Arc<ServiceInner>,
    updates: watch::Receiver<DashboardSnapshot>,
}

impl ConsumerHandle {
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.updates.borrow().clone()
    }

    /// Waits for the next state change and returns the new snapshot.
    pub async fn changed(&mut self) -> Option<DashboardSnapshot> {
        self.updates.changed().await.ok()?;
        Some(self.updates.borrow_and_update().clone())
    }

    pub fn add_alert(&self, draft: AlertDraft) -> AlertId {
        self.service.engine.add_alert(draft)
    }

    pub fn resolve_alert(&self, id: &str) -> bool {
        self.service.engine.resolve_alert(id)
    }

    pub fn update_incident_status(&self, id: u32, status: IncidentStatus) -> bool {
        self.service.engine.update_incident_status(id, status)
    }
}

impl Drop for ConsumerHandle {
    fn drop(&mut self) {
        let mut consumers = self.service.consumers();
        *consumers = consumers.saturating_sub(1);
        if *consumers == 0 {
            self.service.scheduler.stop();
        }
        self.service
            .logger
            .record(&format!("consumer detached ({} left)", *consumers));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AlertStatus, Priority};
    use std::time::Duration;
    use tokio::time;

    fn service() -> EngineService {
        EngineService::from_config(EngineConfig {
            seed: Some(11),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn timers_follow_consumer_lifecycle() {
        let service = service();
        assert!(!service.is_running());

        let admin = service.attach().unwrap();
        let ngo = service.attach().unwrap();
        assert!(service.is_running());
        assert_eq!(service.consumer_count(), 2);

        drop(admin);
        assert!(service.is_running());
        drop(ngo);
        assert!(!service.is_running());
        assert_eq!(service.consumer_count(), 0);

        let again = service.attach().unwrap();
        assert!(service.is_running());
        drop(again);
        assert!(!service.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn all_consumers_share_one_state() {
        let service = service();
        let admin = service.attach().unwrap();
        let mut citizen = service.attach().unwrap();

        let id = admin.add_alert(AlertDraft {
            time: "16:00".into(),
            kind: "Evacuation".into(),
            location: "Barangay Sur".into(),
            priority: Priority::Critical,
            status: AlertStatus::Active,
            description: None,
        });

        let seen = citizen.changed().await.unwrap();
        assert_eq!(seen.alerts[0].id, id);
        assert_eq!(admin.snapshot(), citizen.snapshot());
    }

    #[tokio::test(start_paused = true)]
    async fn consumers_are_woken_by_ticks() {
        let service = service();
        let mut view = service.attach().unwrap();

        time::advance(Duration::from_millis(5_000)).await;
        let snapshot = view.changed().await.unwrap();
        assert_eq!(service.engine().metrics().ticks, 1);
        assert_eq!(snapshot, service.engine().snapshot());
    }
}
