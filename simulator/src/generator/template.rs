use reliefcore::model::Priority;
use serde::Serialize;

/// Pre-configured broadcast used to fill the alert composer.
#[derive(Debug, Clone, Serialize)]
pub struct AlertTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: &'static str,
    pub severity: Priority,
    pub message: &'static str,
    pub channels: &'static [&'static str],
}

pub const ALL_AREAS: &str = "All Areas";

pub const TARGET_AREAS: [&str; 5] = [ALL_AREAS, "Centro", "Norte", "Sur", "Este"];

pub const CHANNELS: [&str; 6] = [
    "SMS",
    "Mobile App",
    "Social Media",
    "Radio Broadcast",
    "Emergency Broadcast",
    "Public Address",
];

pub static TEMPLATES: [AlertTemplate; 4] = [
    AlertTemplate {
        id: "typhoon-warning",
        name: "Typhoon Warning",
        kind: "Weather",
        severity: Priority::High,
        message: "TYPHOON ALERT: Strong winds and heavy rains expected. Secure loose objects and stay indoors.",
        channels: &["SMS", "App", "Social Media", "Radio"],
    },
    AlertTemplate {
        id: "flood-alert",
        name: "Flood Alert",
        kind: "Flood",
        severity: Priority::Critical,
        message: "FLOOD ALERT: Rising water levels detected. Evacuate to higher ground immediately.",
        channels: &["SMS", "App", "Emergency Broadcast"],
    },
    AlertTemplate {
        id: "evacuation-order",
        name: "Evacuation Order",
        kind: "Evacuation",
        severity: Priority::Critical,
        message: "MANDATORY EVACUATION: Proceed to designated evacuation centers immediately.",
        channels: &["SMS", "App", "Social Media", "Radio", "Emergency Broadcast"],
    },
    AlertTemplate {
        id: "all-clear",
        name: "All Clear",
        kind: "Safety",
        severity: Priority::Low,
        message: "ALL CLEAR: Immediate danger has passed. Continue to monitor official channels for updates.",
        channels: &["SMS", "App", "Social Media"],
    },
];

pub fn find_template(id: &str) -> Option<&'static AlertTemplate> {
    TEMPLATES.iter().find(|template| template.id == id)
}
