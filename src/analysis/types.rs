//! Wire types for the analysis service
//!
//! Field names follow the service's JSON exactly, including the spaced
//! `"Equipment Name"` key on records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Records with health strictly below this value are critical.
pub const CRITICAL_HEALTH_THRESHOLD: f64 = 50.0;

/// Envelope returned by `POST /upload/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub current_analysis: AnalysisResult,
    /// Recent uploads as reported by the service. Shape is server-defined.
    #[serde(default)]
    pub history: Vec<serde_json::Value>,
}

/// Aggregate analysis of one uploaded CSV
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub total_count: u64,
    /// Mean value per numeric column, keyed by column name
    #[serde(default)]
    pub averages: BTreeMap<String, f64>,
    /// Item count per equipment type
    #[serde(default)]
    pub distribution: BTreeMap<String, u64>,
    /// Per-item records in upload order
    #[serde(default)]
    pub full_data: Vec<EquipmentRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_status: Option<SystemStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alerts: Vec<AlertRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub risk_report: Vec<RiskEntry>,
}

impl AnalysisResult {
    /// Number of records with critical health
    pub fn critical_count(&self) -> usize {
        self.full_data.iter().filter(|r| r.is_critical()).count()
    }
}

/// Overall plant status computed by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SystemStatus {
    Optimal,
    Critical,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemStatus::Optimal => write!(f, "OPTIMAL"),
            SystemStatus::Critical => write!(f, "CRITICAL"),
            SystemStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// One equipment row as scored by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    #[serde(rename = "Equipment Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub kind: String,
    /// Health score, 0-100
    #[serde(rename = "Health")]
    pub health: f64,
    #[serde(rename = "Action", default)]
    pub action: String,
    #[serde(rename = "Priority", default)]
    pub priority: String,

    #[serde(rename = "Flowrate", default, skip_serializing_if = "Option::is_none")]
    pub flowrate: Option<f64>,
    #[serde(rename = "Pressure", default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    #[serde(rename = "Temperature", default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl EquipmentRecord {
    pub fn new(name: &str, kind: &str, health: f64) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            health,
            action: String::new(),
            priority: String::new(),
            flowrate: None,
            pressure: None,
            temperature: None,
        }
    }

    /// Set the recommended action
    pub fn action(mut self, action: &str) -> Self {
        self.action = action.to_string();
        self
    }

    /// Set the priority label
    pub fn priority(mut self, priority: &str) -> Self {
        self.priority = priority.to_string();
        self
    }

    pub fn is_critical(&self) -> bool {
        self.health < CRITICAL_HEALTH_THRESHOLD
    }
}

/// Critical item flagged by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    #[serde(rename = "Equipment Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Action", default)]
    pub action: String,
    #[serde(rename = "Health")]
    pub health: f64,
}

/// Entry of the lowest-health ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEntry {
    #[serde(rename = "Equipment Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Health")]
    pub health: f64,
    #[serde(rename = "Action", default)]
    pub action: String,
}
