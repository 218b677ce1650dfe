use crate::model::{display_time, Alert, AlertStatus, DashboardSnapshot, Priority};
use crate::prelude::{EngineConfig, TickContext, TickPass};
use crate::telemetry::LogManager;

pub const ALERT_TYPES: [&str; 5] = [
    "Flood",
    "Landslide",
    "Power Outage",
    "Road Blocked",
    "Medical Emergency",
];

pub const ALERT_LOCATIONS: [&str; 4] = [
    "Barangay Centro",
    "Barangay Norte",
    "Barangay Sur",
    "Barangay Este",
];

/// Fabricates a field report and keeps only the most recent alerts.
pub struct AlertSynthesis {
    logger: LogManager,
}

impl AlertSynthesis {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new("alerts"),
        }
    }
}

impl Default for AlertSynthesis {
    fn default() -> Self {
        Self::new()
    }
}

fn pick<'a>(ctx: &mut TickContext<'_>, items: &[&'a str]) -> &'a str {
    items[ctx.rng.below(items.len() as u32) as usize]
}

impl TickPass for AlertSynthesis {
    fn name(&self) -> &'static str {
        "alerts"
    }

    fn probability(&self, config: &EngineConfig) -> f64 {
        config.alert_chance
    }

    fn apply(&self, state: &mut DashboardSnapshot, ctx: &mut TickContext<'_>) {
        let kind = pick(ctx, &ALERT_TYPES);
        let location = pick(ctx, &ALERT_LOCATIONS);
        let priority = Priority::ALL[ctx.rng.below(Priority::ALL.len() as u32) as usize];

        let alert = Alert {
            id: ctx.ids.next(ctx.now),
            time: display_time(ctx.now),
            kind: kind.to_string(),
            location: location.to_string(),
            priority,
            status: AlertStatus::Active,
            description: None,
        };
        self.logger.record(&format!(
            "generated {} alert {} at {} ({})",
            alert.priority, alert.kind, alert.location, alert.id
        ));

        state.alerts.insert(0, alert);
        state.alerts.truncate(ctx.config.alert_history_cap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AlertIdSequence;
    use crate::random::ScriptedRandom;
    use crate::seed::demo_snapshot;
    use chrono::{TimeZone, Utc};

    #[test]
    fn synthesized_alert_is_prepended_from_vocabulary() {
        let now = Utc.with_ymd_and_hms(2024, 12, 20, 15, 5, 0).unwrap();
        let mut state = demo_snapshot(now);
        // Medical Emergency, Barangay Sur, critical
        let mut rng = ScriptedRandom::new([0.85, 0.6, 0.8]);
        let mut ids = AlertIdSequence::new();
        let config = EngineConfig::default();
        let mut ctx = TickContext {
            rng: &mut rng,
            now,
            ids: &mut ids,
            config: &config,
        };

        AlertSynthesis::new().apply(&mut state, &mut ctx);

        let newest = &state.alerts[0];
        assert_eq!(state.alerts.len(), 5);
        assert_eq!(newest.kind, "Medical Emergency");
        assert_eq!(newest.location, "Barangay Sur");
        assert_eq!(newest.priority, Priority::Critical);
        assert_eq!(newest.status, AlertStatus::Active);
        assert_eq!(newest.time, "15:05");
        assert_eq!(newest.id.as_str(), now.timestamp_millis().to_string());
    }

    #[test]
    fn history_is_truncated_to_cap() {
        let now = Utc::now();
        let mut state = demo_snapshot(now);
        let mut rng = ScriptedRandom::default();
        let mut ids = AlertIdSequence::new();
        let config = EngineConfig {
            alert_history_cap: 3,
            ..Default::default()
        };
        let mut ctx = TickContext {
            rng: &mut rng,
            now,
            ids: &mut ids,
            config: &config,
        };

        AlertSynthesis::new().apply(&mut state, &mut ctx);

        let ids: Vec<_> = state.alerts.iter().map(|a| a.id.to_string()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(&ids[1..], &["1".to_string(), "2".to_string()]);
    }
}
