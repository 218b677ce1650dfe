use anyhow::Context;
use reliefcore::model::{AlertDraft, IncidentStatus};
use reliefcore::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub engine: EngineConfig,
    /// Data ticks to run in offline mode.
    pub ticks: usize,
    /// Live run length; 0 runs until Ctrl+C.
    pub duration_secs: u64,
    pub notification_ttl_secs: u64,
    /// Operator commands replayed during offline runs.
    pub actions: Vec<ScheduledAction>,
}

/// An operator command issued right after the given data tick.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScheduledAction {
    pub after_tick: usize,
    #[serde(flatten)]
    pub action: OperatorAction,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OperatorAction {
    AddAlert { alert: AlertDraft },
    ResolveAlert { id: String },
    DismissAlert { id: String },
    UpdateIncident { id: u32, status: IncidentStatus },
    AcknowledgeAlert { id: String },
}

impl OperatorAction {
    /// Console that issues this command in a live run.
    pub fn role(&self) -> &'static str {
        match self {
            OperatorAction::AddAlert { .. }
            | OperatorAction::ResolveAlert { .. }
            | OperatorAction::DismissAlert { .. } => "admin",
            OperatorAction::UpdateIncident { .. } => "ngo",
            OperatorAction::AcknowledgeAlert { .. } => "citizen",
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            ticks: 12,
            duration_secs: 60,
            notification_ttl_secs: 10,
            actions: Vec::new(),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub seed: Option<u64>,
    pub tick_ms: Option<u64>,
    pub connectivity_ms: Option<u64>,
    pub ticks: Option<usize>,
    pub duration_secs: Option<u64>,
}

impl SimulationConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading simulation config {}", path_ref.display()))?;
        let config: SimulationConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing simulation config {}", path_ref.display()))?;
        config
            .engine
            .validate()
            .with_context(|| format!("validating simulation config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(overrides: &ConfigOverrides) -> Self {
        Self::default().with_overrides(overrides)
    }

    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if overrides.seed.is_some() {
            self.engine.seed = overrides.seed;
        }
        if let Some(tick_ms) = overrides.tick_ms {
            self.engine.tick_interval_ms = tick_ms;
        }
        if let Some(connectivity_ms) = overrides.connectivity_ms {
            self.engine.connectivity_interval_ms = connectivity_ms;
        }
        if let Some(ticks) = overrides.ticks {
            self.ticks = ticks;
        }
        if let Some(duration_secs) = overrides.duration_secs {
            self.duration_secs = duration_secs;
        }
        self
    }

    pub fn to_engine_config(&self) -> EngineConfig {
        self.engine.clone()
    }

    /// Connectivity checks happen once every this many data ticks in
    /// offline runs.
    pub fn ticks_per_connectivity_check(&self) -> usize {
        let per_check = self.engine.connectivity_interval_ms / self.engine.tick_interval_ms.max(1);
        (per_check as usize).max(1)
    }
}
