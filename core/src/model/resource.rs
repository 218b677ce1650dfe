use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a relief resource is consumed: handed out, or deployed as a fleet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceUsage {
    Distributed(u32),
    Deployed(u32),
}

impl ResourceUsage {
    pub fn count(&self) -> u32 {
        match self {
            ResourceUsage::Distributed(n) | ResourceUsage::Deployed(n) => *n,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    pub item: String,
    pub available: u32,
    #[serde(flatten)]
    pub usage: ResourceUsage,
    pub unit: String,
    pub last_updated: DateTime<Utc>,
}

impl Resource {
    pub fn consumable(
        item: impl Into<String>,
        available: u32,
        distributed: u32,
        unit: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            item: item.into(),
            available,
            usage: ResourceUsage::Distributed(distributed.min(available)),
            unit: unit.into(),
            last_updated: now,
        }
    }

    pub fn fleet(
        item: impl Into<String>,
        available: u32,
        deployed: u32,
        unit: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            item: item.into(),
            available,
            usage: ResourceUsage::Deployed(deployed.min(available)),
            unit: unit.into(),
            last_updated: now,
        }
    }

    /// Advances usage by `delta` (half of it for fleets), capped at `available`.
    pub fn drift(&mut self, delta: u32, now: DateTime<Utc>) {
        self.usage = match self.usage {
            ResourceUsage::Distributed(n) => {
                ResourceUsage::Distributed(n.saturating_add(delta).min(self.available))
            }
            ResourceUsage::Deployed(n) => {
                ResourceUsage::Deployed(n.saturating_add(delta / 2).min(self.available))
            }
        };
        self.last_updated = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fleet_drift_uses_half_delta() {
        let now = Utc::now();
        let mut trucks = Resource::fleet("Relief Trucks", 8, 5, "trucks", now);
        trucks.drift(3, now);
        assert_eq!(trucks.usage, ResourceUsage::Deployed(6));
        trucks.drift(4, now);
        assert_eq!(trucks.usage, ResourceUsage::Deployed(8));
        trucks.drift(4, now);
        assert_eq!(trucks.usage, ResourceUsage::Deployed(8));
    }

    #[test]
    fn usage_flattens_into_resource_json() {
        let now = Utc::now();
        let food = Resource::consumable("Food Packs", 850, 320, "packs", now);
        let json = serde_json::to_value(&food).unwrap();
        assert_eq!(json["distributed"], 320);
        assert!(json.get("deployed").is_none());

        let restored: Resource = serde_json::from_value(json).unwrap();
        assert_eq!(restored.usage, ResourceUsage::Distributed(320));
    }
}
