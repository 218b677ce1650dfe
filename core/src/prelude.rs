use crate::model::{AlertIdSequence, DashboardSnapshot};
use crate::random::RandomSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cadence and mutation policy for one engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub tick_interval_ms: u64,
    pub connectivity_interval_ms: u64,
    pub occupancy_drift_chance: f64,
    pub distribution_drift_chance: f64,
    pub alert_chance: f64,
    pub uptime_chance: f64,
    /// Upper bound on alerts kept after a generated alert is prepended.
    pub alert_history_cap: usize,
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 5_000,
            connectivity_interval_ms: 10_000,
            occupancy_drift_chance: 0.3,
            distribution_drift_chance: 0.2,
            alert_chance: 0.1,
            uptime_chance: 0.95,
            alert_history_cap: 10,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "tick_interval_ms must be positive".into(),
            ));
        }
        if self.connectivity_interval_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "connectivity_interval_ms must be positive".into(),
            ));
        }
        if self.alert_history_cap == 0 {
            return Err(EngineError::InvalidConfig(
                "alert_history_cap must be at least 1".into(),
            ));
        }
        let chances = [
            ("occupancy_drift_chance", self.occupancy_drift_chance),
            ("distribution_drift_chance", self.distribution_drift_chance),
            ("alert_chance", self.alert_chance),
            ("uptime_chance", self.uptime_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn connectivity_interval(&self) -> Duration {
        Duration::from_millis(self.connectivity_interval_ms)
    }
}

/// Error type for engine setup. Ticks and commands never fail.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
    #[error("no tokio runtime available to schedule ticks")]
    NoRuntime,
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Everything a pass may draw on while mutating one tick.
pub struct TickContext<'a> {
    pub rng: &'a mut dyn RandomSource,
    pub now: DateTime<Utc>,
    pub ids: &'a mut AlertIdSequence,
    pub config: &'a EngineConfig,
}

/// One randomized mutation kind applied during a data tick.
pub trait TickPass: Send + Sync {
    fn name(&self) -> &'static str;
    fn probability(&self, config: &EngineConfig) -> f64;
    fn apply(&self, state: &mut DashboardSnapshot, ctx: &mut TickContext<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.tick_interval(), Duration::from_secs(5));
        assert_eq!(config.connectivity_interval(), Duration::from_secs(10));
    }

    #[test]
    fn out_of_range_chance_is_rejected() {
        let config = EngineConfig {
            alert_chance: 1.5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("alert_chance"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = EngineConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfig(_))
        ));
    }
}
