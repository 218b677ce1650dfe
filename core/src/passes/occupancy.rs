use crate::model::DashboardSnapshot;
use crate::prelude::{EngineConfig, TickContext, TickPass};
use crate::telemetry::LogManager;

/// Number of equally likely occupancy deltas, `-5..=4`.
const DELTA_SPAN: u32 = 10;
const DELTA_OFFSET: i64 = 5;

/// Random walk of evacuation center headcounts.
pub struct OccupancyDrift {
    logger: LogManager,
}

impl OccupancyDrift {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new("occupancy"),
        }
    }
}

impl Default for OccupancyDrift {
    fn default() -> Self {
        Self::new()
    }
}

impl TickPass for OccupancyDrift {
    fn name(&self) -> &'static str {
        "occupancy"
    }

    fn probability(&self, config: &EngineConfig) -> f64 {
        config.occupancy_drift_chance
    }

    fn apply(&self, state: &mut DashboardSnapshot, ctx: &mut TickContext<'_>) {
        for center in state.evacuation_centers.iter_mut() {
            let delta = i64::from(ctx.rng.below(DELTA_SPAN)) - DELTA_OFFSET;
            center.drift(delta, ctx.now);
            self.logger.trace(&format!(
                "{} {:+} -> {}/{} ({})",
                center.name,
                delta,
                center.occupied(),
                center.capacity,
                center.status()
            ));
        }
    }
}
