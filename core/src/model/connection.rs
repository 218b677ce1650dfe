use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionState {
    pub is_connected: bool,
    pub last_update: DateTime<Utc>,
}

impl ConnectionState {
    pub fn connected(now: DateTime<Utc>) -> Self {
        Self {
            is_connected: true,
            last_update: now,
        }
    }
}
