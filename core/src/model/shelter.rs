use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Evacuation center occupancy. `status` is always derived from the counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvacuationCenter {
    pub name: String,
    pub capacity: u32,
    occupied: u32,
    status: String,
    pub last_updated: DateTime<Utc>,
}

impl EvacuationCenter {
    pub fn new(name: impl Into<String>, capacity: u32, occupied: u32, now: DateTime<Utc>) -> Self {
        let occupied = occupied.min(capacity);
        Self {
            name: name.into(),
            capacity,
            occupied,
            status: occupancy_label(occupied, capacity),
            last_updated: now,
        }
    }

    pub fn occupied(&self) -> u32 {
        self.occupied
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Shifts occupancy by `delta`, clamped to `[0, capacity]`.
    pub fn drift(&mut self, delta: i64, now: DateTime<Utc>) {
        let shifted = (i64::from(self.occupied) + delta).clamp(0, i64::from(self.capacity));
        self.occupied = shifted as u32;
        self.status = occupancy_label(self.occupied, self.capacity);
        self.last_updated = now;
    }
}

/// Rounded occupancy percentage; halves round up.
pub fn occupancy_percent(occupied: u32, capacity: u32) -> u32 {
    if capacity == 0 {
        return 0;
    }
    let scaled = u64::from(occupied) * 200 + u64::from(capacity);
    (scaled / (2 * u64::from(capacity))) as u32
}

pub fn occupancy_label(occupied: u32, capacity: u32) -> String {
    format!("{}%", occupancy_percent(occupied, capacity))
}
