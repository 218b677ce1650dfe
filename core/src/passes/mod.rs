pub mod alerts;
pub mod connectivity;
pub mod distribution;
pub mod occupancy;

pub use alerts::{AlertSynthesis, ALERT_LOCATIONS, ALERT_TYPES};
pub use connectivity::ConnectivityCheck;
pub use distribution::DistributionDrift;
pub use occupancy::OccupancyDrift;

use crate::prelude::TickPass;

/// Data-tick passes in the order they draw randomness.
pub fn default_passes() -> Vec<Box<dyn TickPass>> {
    vec![
        Box::new(OccupancyDrift::new()),
        Box::new(DistributionDrift::new()),
        Box::new(AlertSynthesis::new()),
    ]
}
