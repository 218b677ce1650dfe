use reliefcore::model::Priority;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStatus {
    Sent,
    Scheduled,
    Failed,
}

/// A past broadcast and how many recipients acknowledged it.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchRecord {
    pub id: &'static str,
    pub kind: &'static str,
    pub severity: Priority,
    pub message: &'static str,
    pub timestamp: &'static str,
    pub target_areas: &'static [&'static str],
    pub channels: &'static [&'static str],
    pub status: DispatchStatus,
    pub reach: u32,
    pub acknowledged: u32,
}

impl DispatchRecord {
    pub fn acknowledgment_rate(&self) -> u32 {
        if self.reach == 0 {
            return 0;
        }
        (f64::from(self.acknowledged) / f64::from(self.reach) * 100.0).round() as u32
    }
}

pub static DISPATCH_HISTORY: [DispatchRecord; 5] = [
    DispatchRecord {
        id: "alert-001",
        kind: "Typhoon Warning",
        severity: Priority::High,
        message: "TYPHOON ALERT: Strong winds and heavy rains expected. Secure loose objects and stay indoors.",
        timestamp: "2024-12-20T14:30:00Z",
        target_areas: &["All Areas"],
        channels: &["SMS", "Mobile App", "Radio Broadcast"],
        status: DispatchStatus::Sent,
        reach: 45_000,
        acknowledged: 38_000,
    },
    DispatchRecord {
        id: "alert-002",
        kind: "Flood Alert",
        severity: Priority::Critical,
        message: "FLOOD ALERT: Rising water levels in Centro area. Evacuate immediately.",
        timestamp: "2024-12-20T13:15:00Z",
        target_areas: &["Centro"],
        channels: &["SMS", "Mobile App", "Emergency Broadcast"],
        status: DispatchStatus::Sent,
        reach: 8_500,
        acknowledged: 7_200,
    },
    DispatchRecord {
        id: "alert-003",
        kind: "Road Closure",
        severity: Priority::Medium,
        message: "TRAFFIC ALERT: Main highway blocked due to fallen tree. Use alternate routes.",
        timestamp: "2024-12-20T12:00:00Z",
        target_areas: &["Norte", "Sur"],
        channels: &["Mobile App", "Social Media"],
        status: DispatchStatus::Sent,
        reach: 15_000,
        acknowledged: 12_000,
    },
    DispatchRecord {
        id: "alert-004",
        kind: "Evacuation Order",
        severity: Priority::Critical,
        message: "MANDATORY EVACUATION: All residents in flood-prone areas must evacuate now.",
        timestamp: "2024-12-20T15:00:00Z",
        target_areas: &["Centro", "Norte"],
        channels: &["SMS", "Mobile App", "Radio Broadcast", "Emergency Broadcast"],
        status: DispatchStatus::Scheduled,
        reach: 0,
        acknowledged: 0,
    },
    DispatchRecord {
        id: "alert-005",
        kind: "Power Advisory",
        severity: Priority::Medium,
        message: "POWER ADVISORY: Grid repairs in Este area tonight. Expect outages from 18:00 to 22:00.",
        timestamp: "2024-12-20T11:00:00Z",
        target_areas: &["Este"],
        channels: &["SMS", "Radio Broadcast"],
        status: DispatchStatus::Failed,
        reach: 0,
        acknowledged: 0,
    },
];

/// Search and filter settings of the history panel. `None` means "all".
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub search: String,
    pub severity: Option<Priority>,
    pub status: Option<DispatchStatus>,
}

impl HistoryFilter {
    pub fn matches(&self, record: &DispatchRecord) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = record.kind.to_lowercase().contains(&needle)
            || record.message.to_lowercase().contains(&needle);
        let matches_severity = self.severity.map_or(true, |s| s == record.severity);
        let matches_status = self.status.map_or(true, |s| s == record.status);
        matches_search && matches_severity && matches_status
    }

    pub fn apply<'a>(&self, records: &'a [DispatchRecord]) -> Vec<&'a DispatchRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_keeps_everything() {
        assert_eq!(HistoryFilter::default().apply(&DISPATCH_HISTORY).len(), 5);
    }

    #[test]
    fn search_is_case_insensitive_over_type_and_message() {
        let filter = HistoryFilter {
            search: "EVACUATE".into(),
            ..Default::default()
        };
        let ids: Vec<_> = filter.apply(&DISPATCH_HISTORY).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["alert-002", "alert-004"]);
    }

    #[test]
    fn severity_and_status_filters_combine() {
        let filter = HistoryFilter {
            severity: Some(Priority::Critical),
            status: Some(DispatchStatus::Sent),
            ..Default::default()
        };
        let ids: Vec<_> = filter.apply(&DISPATCH_HISTORY).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["alert-002"]);
    }

    #[test]
    fn failed_dispatches_can_be_isolated() {
        let filter = HistoryFilter {
            status: Some(DispatchStatus::Failed),
            ..Default::default()
        };
        let failed = filter.apply(&DISPATCH_HISTORY);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].id, "alert-005");
        assert_eq!(failed[0].acknowledgment_rate(), 0);
    }

    #[test]
    fn acknowledgment_rate_handles_unsent_alerts() {
        assert_eq!(DISPATCH_HISTORY[0].acknowledgment_rate(), 84);
        assert_eq!(DISPATCH_HISTORY[1].acknowledgment_rate(), 85);
        assert_eq!(DISPATCH_HISTORY[3].acknowledgment_rate(), 0);
    }
}
