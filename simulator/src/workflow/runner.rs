use crate::views::bridge::{drive, AdminConsole, CitizenConsole, NgoConsole};
use crate::workflow::config::{OperatorAction, ScheduledAction, SimulationConfig};
use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use reliefcore::clock::ManualClock;
use reliefcore::model::{AlertId, DashboardSnapshot};
use reliefcore::telemetry::TickMetrics;
use reliefcore::{EngineService, RealtimeEngine};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub ticks: usize,
    pub metrics: TickMetrics,
    pub snapshot: DashboardSnapshot,
    /// Alerts the admin operator dismissed locally.
    pub dismissed: BTreeSet<AlertId>,
    /// Alerts the citizen acknowledged locally.
    pub acknowledged: BTreeSet<AlertId>,
}

#[derive(Default)]
struct LocalMarks {
    dismissed: BTreeSet<AlertId>,
    acknowledged: BTreeSet<AlertId>,
}

#[derive(Clone)]
pub struct Runner {
    config: SimulationConfig,
}

impl Runner {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Drives the engine tick by tick on simulated time, without timers.
    pub fn execute(&self, start: DateTime<Utc>) -> anyhow::Result<RunSummary> {
        let clock = ManualClock::new(start);
        let engine = RealtimeEngine::with_clock(self.config.to_engine_config(), Arc::new(clock.clone()))
            .context("building offline engine")?;
        let step = Duration::milliseconds(self.config.engine.tick_interval_ms as i64);
        let per_check = self.config.ticks_per_connectivity_check();
        let mut marks = LocalMarks::default();

        for tick in 1..=self.config.ticks {
            clock.advance(step);
            engine.tick();
            if tick % per_check == 0 {
                engine.connectivity_tick();
            }
            for scheduled in self.config.actions.iter().filter(|a| a.after_tick == tick) {
                apply_action(&engine, &scheduled.action, &mut marks);
            }
        }

        let metrics = engine.metrics();
        info!(
            "offline run: {} ticks, {} occupancy drifts, {} distribution drifts, {} alerts generated",
            metrics.ticks, metrics.occupancy_drifts, metrics.distribution_drifts, metrics.alerts_generated
        );
        Ok(RunSummary {
            ticks: self.config.ticks,
            metrics,
            snapshot: engine.snapshot(),
            dismissed: marks.dismissed,
            acknowledged: marks.acknowledged,
        })
    }

    /// Attaches the three role consoles to a timer-driven engine and keeps
    /// them rendering until `shutdown` resolves. Detaching every console
    /// stops the timers.
    pub async fn run_live<F>(&self, shutdown: F) -> anyhow::Result<TickMetrics>
    where
        F: Future<Output = ()>,
    {
        let service = EngineService::from_config(self.config.to_engine_config())
            .context("building live engine")?;
        let ttl = Duration::seconds(self.config.notification_ttl_secs as i64);

        let (admin_tx, admin_rx) = mpsc::unbounded_channel();
        let (ngo_tx, ngo_rx) = mpsc::unbounded_channel();
        let (citizen_tx, citizen_rx) = mpsc::unbounded_channel();
        let routes = HashMap::from([("admin", admin_tx), ("ngo", ngo_tx), ("citizen", citizen_tx)]);

        let tasks = vec![
            tokio::spawn(drive(
                AdminConsole::new(service.attach().context("attaching admin console")?, ttl),
                admin_rx,
            )),
            tokio::spawn(drive(
                NgoConsole::new(service.attach().context("attaching ngo console")?),
                ngo_rx,
            )),
            tokio::spawn(drive(
                CitizenConsole::new(service.attach().context("attaching citizen console")?),
                citizen_rx,
            )),
            tokio::spawn(dispatch(
                service.engine().clone(),
                self.config.actions.clone(),
                routes,
            )),
        ];

        shutdown.await;

        for task in tasks {
            task.abort();
            // A cancelled join error is the expected outcome here.
            let _ = task.await;
        }
        info!(
            "live run finished with {} consumers attached, timers running: {}",
            service.consumer_count(),
            service.is_running()
        );
        Ok(service.engine().metrics())
    }
}

/// Forwards each scheduled action to the console that owns it once the engine
/// has completed `after_tick` data ticks.
async fn dispatch(
    engine: RealtimeEngine,
    mut actions: Vec<ScheduledAction>,
    routes: HashMap<&'static str, mpsc::UnboundedSender<OperatorAction>>,
) {
    actions.sort_by_key(|scheduled| scheduled.after_tick);
    let mut pending = actions.into_iter().peekable();
    let mut updates = engine.subscribe();
    loop {
        let ticks = engine.metrics().ticks as usize;
        while let Some(scheduled) = pending.next_if(|s| s.after_tick <= ticks) {
            let role = scheduled.action.role();
            let delivered = routes
                .get(role)
                .map_or(false, |route| route.send(scheduled.action).is_ok());
            if !delivered {
                warn!("{} console is not listening; dropped scheduled action", role);
            }
        }
        if pending.peek().is_none() || updates.changed().await.is_err() {
            break;
        }
    }
}

fn apply_action(engine: &RealtimeEngine, action: &OperatorAction, marks: &mut LocalMarks) {
    match action {
        OperatorAction::AddAlert { alert } => {
            let id = engine.add_alert(alert.clone());
            info!("operator added alert {}", id);
        }
        OperatorAction::ResolveAlert { id } => {
            if engine.resolve_alert(id) {
                marks.dismissed.insert(AlertId::from(id.as_str()));
            } else {
                warn!("operator resolved unknown alert {}", id);
            }
        }
        OperatorAction::DismissAlert { id } => {
            marks.dismissed.insert(AlertId::from(id.as_str()));
        }
        OperatorAction::UpdateIncident { id, status } => {
            if !engine.update_incident_status(*id, *status) {
                warn!("operator updated unknown incident {}", id);
            }
        }
        OperatorAction::AcknowledgeAlert { id } => {
            marks.acknowledged.insert(AlertId::from(id.as_str()));
        }
    }
}
