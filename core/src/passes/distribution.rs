use crate::model::DashboardSnapshot;
use crate::prelude::{EngineConfig, TickContext, TickPass};
use crate::telemetry::LogManager;

/// Distribution deltas are drawn from `0..=4`.
const DELTA_SPAN: u32 = 5;

/// Steady hand-out of relief goods and deployment of fleet vehicles.
pub struct DistributionDrift {
    logger: LogManager,
}

impl DistributionDrift {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new("distribution"),
        }
    }
}

impl Default for DistributionDrift {
    fn default() -> Self {
        Self::new()
    }
}

impl TickPass for DistributionDrift {
    fn name(&self) -> &'static str {
        "distribution"
    }

    fn probability(&self, config: &EngineConfig) -> f64 {
        config.distribution_drift_chance
    }

    fn apply(&self, state: &mut DashboardSnapshot, ctx: &mut TickContext<'_>) {
        for resource in state.resources.iter_mut() {
            let delta = ctx.rng.below(DELTA_SPAN);
            resource.drift(delta, ctx.now);
            self.logger.trace(&format!(
                "{} +{} -> {}/{} {}",
                resource.item,
                delta,
                resource.usage.count(),
                resource.available,
                resource.unit
            ));
        }
    }
}
