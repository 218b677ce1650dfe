//! Local alert composer. Dispatch is simulated: sending only produces a
//! confirmation and never reaches the shared engine.

use crate::generator::template::{find_template, ALL_AREAS};
use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use log::info;
use reliefcore::model::Priority;
use serde::Serialize;

const ALL_AREAS_REACH: f64 = 50_000.0;
const PER_AREA_REACH: f64 = 8_000.0;

#[derive(Debug, Clone)]
pub struct AlertComposer {
    pub selected_template: Option<String>,
    pub kind: String,
    pub severity: Priority,
    pub message: String,
    pub target_areas: Vec<String>,
    pub channels: Vec<String>,
    pub scheduled_for: Option<String>,
}

impl Default for AlertComposer {
    fn default() -> Self {
        Self {
            selected_template: None,
            kind: String::new(),
            severity: Priority::Medium,
            message: String::new(),
            target_areas: vec![ALL_AREAS.to_string()],
            channels: vec!["SMS".to_string(), "Mobile App".to_string()],
            scheduled_for: None,
        }
    }
}

/// What the composer would have broadcast.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReceipt {
    pub template: Option<String>,
    pub kind: String,
    pub severity: Priority,
    pub message: String,
    pub target_areas: Vec<String>,
    pub channels: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub scheduled: Option<String>,
    pub estimated_reach: u64,
    pub confirmation: String,
}

impl AlertComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_template(&mut self, id: &str) -> anyhow::Result<()> {
        let template = find_template(id).with_context(|| format!("unknown template {}", id))?;
        self.selected_template = Some(template.id.to_string());
        self.kind = template.kind.to_string();
        self.severity = template.severity;
        self.message = template.message.to_string();
        self.channels = template.channels.iter().map(|c| c.to_string()).collect();
        Ok(())
    }

    pub fn toggle_channel(&mut self, channel: &str) {
        if let Some(pos) = self.channels.iter().position(|c| c == channel) {
            self.channels.remove(pos);
        } else {
            self.channels.push(channel.to_string());
        }
    }

    /// "All Areas" replaces any specific selection; picking a specific area
    /// clears "All Areas".
    pub fn toggle_area(&mut self, area: &str) {
        if area == ALL_AREAS {
            self.target_areas = vec![ALL_AREAS.to_string()];
            return;
        }
        self.target_areas.retain(|a| a != ALL_AREAS);
        if let Some(pos) = self.target_areas.iter().position(|a| a == area) {
            self.target_areas.remove(pos);
        } else {
            self.target_areas.push(area.to_string());
        }
    }

    pub fn schedule(&mut self, at: Option<String>) {
        self.scheduled_for = at;
    }

    pub fn estimated_reach(&self) -> u64 {
        let base = if self.target_areas.iter().any(|a| a == ALL_AREAS) {
            ALL_AREAS_REACH
        } else {
            self.target_areas.len() as f64 * PER_AREA_REACH
        };
        let multiplier = self.channels.len() as f64 * 0.3 + 0.7;
        (base * multiplier).round() as u64
    }

    pub fn send(&self, now: DateTime<Utc>) -> anyhow::Result<DispatchReceipt> {
        if self.kind.trim().is_empty() || self.message.trim().is_empty() {
            bail!("alert type and message are required before sending");
        }
        let confirmation = if self.scheduled_for.is_some() {
            "Alert scheduled successfully!"
        } else {
            "Alert sent successfully!"
        };
        let receipt = DispatchReceipt {
            template: self.selected_template.clone(),
            kind: self.kind.clone(),
            severity: self.severity,
            message: self.message.clone(),
            target_areas: self.target_areas.clone(),
            channels: self.channels.clone(),
            timestamp: now,
            scheduled: self.scheduled_for.clone(),
            estimated_reach: self.estimated_reach(),
            confirmation: confirmation.to_string(),
        };
        info!(
            "[composer] {} ({} via {} channels, ~{} people)",
            receipt.confirmation,
            receipt.kind,
            receipt.channels.len(),
            receipt.estimated_reach
        );
        Ok(receipt)
    }
}
