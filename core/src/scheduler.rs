use crate::engine::RealtimeEngine;
use crate::prelude::{EngineError, EngineResult};
use crate::telemetry::LogManager;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

struct PeriodicTasks {
    data: JoinHandle<()>,
    connectivity: JoinHandle<()>,
}

/// Owns the data-tick and connectivity-tick tasks for one engine.
///
/// `start` and `stop` are idempotent, so repeated attach/detach cycles never
/// schedule a second pair of timers.
pub struct Scheduler {
    engine: RealtimeEngine,
    tasks: Mutex<Option<PeriodicTasks>>,
    logger: LogManager,
}

impl Scheduler {
    pub fn new(engine: RealtimeEngine) -> Self {
        Self {
            engine,
            tasks: Mutex::new(None),
            logger: LogManager::new("scheduler"),
        }
    }

    fn tasks(&self) -> MutexGuard<'_, Option<PeriodicTasks>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawns both periodic tasks on the current tokio runtime. Returns false
    /// when they were already running.
    pub fn start(&self) -> EngineResult<bool> {
        let mut tasks = self.tasks();
        if tasks.is_some() {
            return Ok(false);
        }
        let runtime = Handle::try_current().map_err(|_| EngineError::NoRuntime)?;

        let config = self.engine.config();
        let started = Instant::now();
        let data_engine = self.engine.clone();
        let data = runtime.spawn(run_every(started, config.tick_interval(), move || {
            data_engine.tick()
        }));
        let link_engine = self.engine.clone();
        let connectivity = runtime.spawn(run_every(
            started,
            config.connectivity_interval(),
            move || link_engine.connectivity_tick(),
        ));

        *tasks = Some(PeriodicTasks { data, connectivity });
        self.logger.record(&format!(
            "timers started: data every {}ms, connectivity every {}ms",
            config.tick_interval_ms, config.connectivity_interval_ms
        ));
        Ok(true)
    }

    /// Cancels both tasks. Returns false when nothing was running.
    pub fn stop(&self) -> bool {
        match self.tasks().take() {
            Some(tasks) => {
                tasks.data.abort();
                tasks.connectivity.abort();
                self.logger.record("timers stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.tasks().is_some()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Fires `pass` once per `period`, the first time one period after `started`.
/// Late ticks are delayed rather than replayed in a burst.
async fn run_every<F>(started: Instant, period: Duration, mut pass: F)
where
    F: FnMut() + Send + 'static,
{
    let mut interval = time::interval_at(started + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        pass();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::EngineConfig;

    fn engine() -> RealtimeEngine {
        let config = EngineConfig {
            seed: Some(7),
            ..Default::default()
        };
        RealtimeEngine::new(config).unwrap()
    }

    /// Lets spawned tasks observe the clock after a paused-time advance.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn start_without_runtime_fails() {
        let scheduler = Scheduler::new(engine());
        assert!(matches!(scheduler.start(), Err(EngineError::NoRuntime)));
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_follow_configured_cadence() {
        let engine = engine();
        let scheduler = Scheduler::new(engine.clone());
        assert!(scheduler.start().unwrap());
        assert!(!scheduler.start().unwrap());

        settle().await;
        assert_eq!(engine.metrics().ticks, 0);

        time::advance(Duration::from_millis(5_000)).await;
        settle().await;
        assert_eq!(engine.metrics().ticks, 1);
        assert_eq!(engine.metrics().connectivity_checks, 0);

        time::advance(Duration::from_millis(5_000)).await;
        settle().await;
        assert_eq!(engine.metrics().ticks, 2);
        assert_eq!(engine.metrics().connectivity_checks, 1);

        assert!(scheduler.stop());
        assert!(!scheduler.stop());
        time::advance(Duration::from_millis(20_000)).await;
        settle().await;
        assert_eq!(engine.metrics().ticks, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_does_not_double_schedule() {
        let engine = engine();
        let scheduler = Scheduler::new(engine.clone());
        for _ in 0..3 {
            scheduler.start().unwrap();
            scheduler.stop();
        }
        scheduler.start().unwrap();
        scheduler.start().unwrap();

        time::advance(Duration::from_millis(5_000)).await;
        settle().await;
        assert_eq!(engine.metrics().ticks, 1);
    }
}
