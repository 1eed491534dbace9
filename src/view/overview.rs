//! Overview view model
//!
//! Stat tiles for the headline numbers plus a bar and a pie chart over the
//! type distribution. Empty `averages` or `distribution` simply yield no
//! tiles or an empty chart.

use chrono::{DateTime, NaiveDateTime};

use crate::analysis::AnalysisResult;

/// Bar fill color
pub const BAR_COLOR: &str = "#3b82f6";

/// Pie slice colors, cycled
pub const PIE_COLORS: [&str; 3] = ["#3b82f6", "#10b981", "#f59e0b"];

#[derive(Debug, Clone, PartialEq)]
pub struct StatTile {
    pub label: String,
    pub value: String,
}

/// Category labels with one value each, in label order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn max(&self) -> u64 {
        self.values.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.values.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
    /// Percentage of the whole, 0-100
    pub share: f64,
    pub color: &'static str,
}

impl PieSlice {
    pub fn share_label(&self) -> String {
        format!("{:.1}%", self.share)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewModel {
    pub tiles: Vec<StatTile>,
    pub bar: ChartSeries,
    pub pie: Vec<PieSlice>,
    /// e.g. "CRITICAL", when the service reports one
    pub status: Option<String>,
    pub alert_count: usize,
    pub generated_at: Option<String>,
}

/// Averages are always shown with exactly one decimal
pub fn format_average(value: f64) -> String {
    format!("{:.1}", value)
}

/// Service timestamps are local "%Y-%m-%d %H:%M:%S"; anything unparseable is shown as-is
pub fn format_timestamp(raw: &str) -> String {
    let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()));

    match parsed {
        Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
        None => raw.to_string(),
    }
}

pub fn overview(analysis: &AnalysisResult) -> OverviewModel {
    let mut tiles = Vec::with_capacity(analysis.averages.len() + 1);
    tiles.push(StatTile {
        label: "Total Units".to_string(),
        value: analysis.total_count.to_string(),
    });
    tiles.extend(analysis.averages.iter().map(|(metric, value)| StatTile {
        label: format!("Avg {}", metric),
        value: format_average(*value),
    }));

    let bar = ChartSeries {
        labels: analysis.distribution.keys().cloned().collect(),
        values: analysis.distribution.values().copied().collect(),
    };

    let total = bar.total();
    let pie = bar
        .labels
        .iter()
        .zip(&bar.values)
        .enumerate()
        .map(|(idx, (label, &value))| PieSlice {
            label: label.clone(),
            value,
            share: if total == 0 {
                0.0
            } else {
                value as f64 / total as f64 * 100.0
            },
            color: PIE_COLORS[idx % PIE_COLORS.len()],
        })
        .collect();

    OverviewModel {
        tiles,
        bar,
        pie,
        status: analysis.system_status.map(|s| s.to_string()),
        alert_count: analysis.alerts.len(),
        generated_at: analysis.timestamp.as_deref().map(format_timestamp),
    }
}
