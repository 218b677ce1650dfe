//! The shared simulation engine.
//!
//! One [`RealtimeEngine`] owns the dashboard state. Every mutation, whether a
//! timer tick or a command issued by a view, runs inside a single
//! `watch::Sender` modification, so consumers observe either the state before
//! or after it and are woken once per change.

use crate::clock::{Clock, SystemClock};
use crate::model::{
    Alert, AlertDraft, AlertId, AlertIdSequence, AlertStatus, DashboardSnapshot, IncidentStatus,
};
use crate::passes::{default_passes, ConnectivityCheck};
use crate::prelude::{EngineConfig, EngineResult, TickContext, TickPass};
use crate::random::{RandomSource, SeededRandom};
use crate::seed::demo_snapshot;
use crate::telemetry::{LogManager, MetricsRecorder, TickMetrics};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct EngineInner {
    config: EngineConfig,
    state: watch::Sender<DashboardSnapshot>,
    rng: Mutex<Box<dyn RandomSource>>,
    ids: Mutex<AlertIdSequence>,
    clock: Arc<dyn Clock>,
    passes: Vec<Box<dyn TickPass>>,
    connectivity: ConnectivityCheck,
    metrics: MetricsRecorder,
    logger: LogManager,
}

/// Cheaply cloneable handle; all clones share one state.
#[derive(Clone)]
pub struct RealtimeEngine {
    inner: Arc<EngineInner>,
}

impl RealtimeEngine {
    /// Engine over the demo dataset, wall-clock time, and a generator seeded
    /// from `config.seed` (or entropy when unset).
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> EngineResult<Self> {
        let rng = SeededRandom::from_optional_seed(config.seed);
        let snapshot = demo_snapshot(clock.now());
        Self::with_parts(config, snapshot, Box::new(rng), clock)
    }

    pub fn with_parts(
        config: EngineConfig,
        snapshot: DashboardSnapshot,
        rng: Box<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> EngineResult<Self> {
        config.validate()?;
        let (state, _) = watch::channel(snapshot);
        let logger = LogManager::new("engine");
        logger.record(&format!(
            "engine ready: tick {}ms, connectivity {}ms, history cap {}",
            config.tick_interval_ms, config.connectivity_interval_ms, config.alert_history_cap
        ));

        Ok(Self {
            inner: Arc::new(EngineInner {
                config,
                state,
                rng: Mutex::new(rng),
                ids: Mutex::new(AlertIdSequence::new()),
                clock,
                passes: default_passes(),
                connectivity: ConnectivityCheck,
                metrics: MetricsRecorder::new(),
                logger,
            }),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Receiver that is marked changed after every state mutation.
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.inner.state.subscribe()
    }

    pub fn metrics(&self) -> TickMetrics {
        self.inner.metrics.snapshot()
    }

    /// Runs one data tick: stamps the update time, then gives each pass its
    /// chance to fire.
    pub fn tick(&self) {
        let inner = &self.inner;
        let now = inner.clock.now();
        let mut fired = Vec::with_capacity(inner.passes.len());

        inner.state.send_modify(|state| {
            state.connection.last_update = now;

            let mut rng = lock(&inner.rng);
            let mut ids = lock(&inner.ids);
            let mut ctx = TickContext {
                rng: &mut **rng,
                now,
                ids: &mut *ids,
                config: &inner.config,
            };
            for pass in &inner.passes {
                if ctx.rng.chance(pass.probability(&inner.config)) {
                    pass.apply(state, &mut ctx);
                    fired.push(pass.name());
                }
            }
        });

        inner.metrics.record_tick();
        for name in &fired {
            inner.metrics.record_pass(name);
        }
        inner
            .logger
            .trace(&format!("tick at {} fired {:?}", now.to_rfc3339(), fired));
    }

    /// Runs one connectivity check. Consumers are only notified when the flag
    /// actually changes.
    pub fn connectivity_tick(&self) {
        let inner = &self.inner;
        inner.state.send_if_modified(|state| {
            let before = state.connection.is_connected;
            let mut rng = lock(&inner.rng);
            let healthy =
                inner
                    .connectivity
                    .apply(&mut state.connection, &mut **rng, inner.config.uptime_chance);
            if !healthy {
                inner.logger.trace("connectivity check missed");
            }
            before != state.connection.is_connected
        });
        inner.metrics.record_connectivity_check();
    }

    /// Prepends a new alert. Explicit adds are never truncated.
    pub fn add_alert(&self, draft: AlertDraft) -> AlertId {
        let id = lock(&self.inner.ids).next(self.inner.clock.now());
        let alert = Alert::from_draft(id.clone(), draft);
        self.inner.logger.record(&format!(
            "alert {} added: {} at {} ({})",
            alert.id, alert.kind, alert.location, alert.priority
        ));
        self.inner.state.send_modify(|state| state.alerts.insert(0, alert));
        self.inner.metrics.record_command();
        id
    }

    /// Marks an alert resolved. Returns whether the id was known; unknown ids
    /// leave the state untouched.
    pub fn resolve_alert(&self, id: &str) -> bool {
        let mut found = false;
        self.inner.state.send_if_modified(|state| {
            match state.alerts.iter_mut().find(|alert| alert.id.as_str() == id) {
                Some(alert) => {
                    found = true;
                    let changed = alert.status != AlertStatus::Resolved;
                    alert.status = AlertStatus::Resolved;
                    changed
                }
                None => false,
            }
        });
        if found {
            self.inner.metrics.record_command();
            self.inner.logger.record(&format!("alert {} resolved", id));
        }
        found
    }

    /// Overwrites an incident's status. Returns whether the id was known.
    pub fn update_incident_status(&self, id: u32, status: IncidentStatus) -> bool {
        let mut found = false;
        self.inner.state.send_if_modified(|state| {
            match state.incidents.iter_mut().find(|incident| incident.id == id) {
                Some(incident) => {
                    found = true;
                    let changed = incident.status != status;
                    incident.status = status;
                    changed
                }
                None => false,
            }
        });
        if found {
            self.inner.metrics.record_command();
            self.inner
                .logger
                .record(&format!("incident {} -> {}", id, status));
        }
        found
    }
}
