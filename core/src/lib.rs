//! Simulated real-time data engine behind the relief operations dashboard.
//!
//! The engine owns alerts, evacuation centers, relief resources, incidents
//! and link status, drifts them on a timer with injectable randomness, and
//! hands consistent snapshots plus a small command surface to every view.

pub mod clock;
pub mod engine;
pub mod model;
pub mod passes;
pub mod prelude;
pub mod random;
pub mod scheduler;
pub mod seed;
pub mod service;
pub mod telemetry;

pub use engine::RealtimeEngine;
pub use prelude::{EngineConfig, EngineError, EngineResult, TickContext, TickPass};
pub use service::{ConsumerHandle, EngineService};
