use crate::model::ConnectionState;
use crate::random::RandomSource;

/// Link-health rule run on its own cadence.
///
/// A successful check forces the link up; a failed check leaves the previous
/// value in place. Nothing here ever marks the link down.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectivityCheck;

impl ConnectivityCheck {
    /// Returns true when the check came back healthy.
    pub fn apply(
        &self,
        connection: &mut ConnectionState,
        rng: &mut dyn RandomSource,
        uptime_chance: f64,
    ) -> bool {
        let healthy = rng.chance(uptime_chance);
        if healthy {
            connection.is_connected = true;
        }
        healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use chrono::Utc;

    #[test]
    fn failed_check_keeps_previous_value() {
        let mut connection = ConnectionState {
            is_connected: false,
            last_update: Utc::now(),
        };
        let mut rng = ScriptedRandom::new([0.97, 0.2]);
        assert!(!ConnectivityCheck.apply(&mut connection, &mut rng, 0.95));
        assert!(!connection.is_connected);
        assert!(ConnectivityCheck.apply(&mut connection, &mut rng, 0.95));
        assert!(connection.is_connected);
    }
}
