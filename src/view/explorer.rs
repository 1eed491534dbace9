//! Explorer view model
//!
//! Case-insensitive search over equipment name or type. Matching rows keep
//! their original order; there is no pagination.

use serde::Serialize;

use crate::analysis::{EquipmentRecord, CRITICAL_HEALTH_THRESHOLD};

pub const EMPTY_EXPLORER_MESSAGE: &str = "No matching equipment found.";

/// Row styling, keyed off health alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Normal,
}

impl Severity {
    pub fn of(health: f64) -> Self {
        if health < CRITICAL_HEALTH_THRESHOLD {
            Severity::Critical
        } else {
            Severity::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Normal => "Normal",
        }
    }

    pub fn bar_color(&self) -> &'static str {
        match self {
            Severity::Critical => "#ef4444",
            Severity::Normal => "#10b981",
        }
    }

    /// (background, foreground) of the priority badge
    pub fn badge_colors(&self) -> (&'static str, &'static str) {
        match self {
            Severity::Critical => ("#fee2e2", "#991b1b"),
            Severity::Normal => ("#dcfce7", "#166534"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplorerRow {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub health: f64,
    /// Health bar fill, 0-100
    pub health_pct: f64,
    pub action: String,
    /// Badge text; the severity label when the record has no priority
    pub priority: String,
    pub severity: Severity,
}

impl ExplorerRow {
    fn from_record(record: &EquipmentRecord) -> Self {
        let severity = Severity::of(record.health);
        let priority = if record.priority.trim().is_empty() {
            severity.label().to_string()
        } else {
            record.priority.clone()
        };

        Self {
            name: record.name.clone(),
            kind: record.kind.clone(),
            health: record.health,
            health_pct: record.health.max(0.0).min(100.0),
            action: record.action.clone(),
            priority,
            severity,
        }
    }

    /// Health as shown in the table, e.g. "40%" or "72.5%"
    pub fn health_label(&self) -> String {
        if self.health.fract() == 0.0 {
            format!("{:.0}%", self.health)
        } else {
            format!("{}%", self.health)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerModel {
    pub rows: Vec<ExplorerRow>,
    /// Records before filtering
    pub total: usize,
    /// Set instead of an empty table body
    pub empty_message: Option<&'static str>,
}

fn matches(record: &EquipmentRecord, needle: &str) -> bool {
    record.name.to_lowercase().contains(needle) || record.kind.to_lowercase().contains(needle)
}

/// Records whose name or type contains `term`, ignoring case
pub fn filter_records<'a>(records: &'a [EquipmentRecord], term: &str) -> Vec<&'a EquipmentRecord> {
    let needle = term.to_lowercase();
    records.iter().filter(|r| matches(r, &needle)).collect()
}

pub fn explorer(records: &[EquipmentRecord], search_term: &str) -> ExplorerModel {
    let rows: Vec<ExplorerRow> = filter_records(records, search_term)
        .into_iter()
        .map(ExplorerRow::from_record)
        .collect();

    let empty_message = rows.is_empty().then_some(EMPTY_EXPLORER_MESSAGE);

    ExplorerModel {
        rows,
        total: records.len(),
        empty_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<EquipmentRecord> {
        vec![
            EquipmentRecord::new("Pump A", "Pump", 40.0)
                .action("Replace seal")
                .priority("High"),
            EquipmentRecord::new("Valve 7", "Valve", 88.0).action("Routine Check"),
            EquipmentRecord::new("HX-2", "Heat Exchanger", 50.0),
            EquipmentRecord::new("Booster", "pump", 49.0),
        ]
    }

    fn names(model: &ExplorerModel) -> Vec<&str> {
        model.rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_example_search() {
        let data = vec![EquipmentRecord::new("Pump A", "Pump", 40.0)
            .action("Replace seal")
            .priority("High")];

        let model = explorer(&data, "pump");

        assert_eq!(model.rows.len(), 1);
        assert_eq!(model.rows[0].name, "Pump A");
        assert_eq!(model.rows[0].severity, Severity::Critical);
        assert_eq!(model.rows[0].priority, "High");
        assert!(model.empty_message.is_none());
    }

    #[test]
    fn test_empty_term_shows_all_rows() {
        let data = records();
        let model = explorer(&data, "");

        assert_eq!(names(&model), vec!["Pump A", "Valve 7", "HX-2", "Booster"]);
        assert_eq!(model.total, 4);
    }

    #[test]
    fn test_search_matches_name_or_type_and_keeps_order() {
        let data = records();

        assert_eq!(names(&explorer(&data, "PUMP")), vec!["Pump A", "Booster"]);
        assert_eq!(names(&explorer(&data, "exchanger")), vec!["HX-2"]);
        assert_eq!(names(&explorer(&data, "7")), vec!["Valve 7"]);
        assert_eq!(names(&explorer(&data, "a")), vec!["Pump A", "Valve 7", "HX-2"]);
    }

    #[test]
    fn test_no_match_yields_empty_message() {
        let data = records();
        let model = explorer(&data, "compressor");

        assert!(model.rows.is_empty());
        assert_eq!(model.empty_message, Some(EMPTY_EXPLORER_MESSAGE));
        assert_eq!(model.total, 4);
    }

    #[test]
    fn test_severity_boundary() {
        assert_eq!(Severity::of(49.0), Severity::Critical);
        assert_eq!(Severity::of(50.0), Severity::Normal);
        assert_eq!(Severity::of(49.0).bar_color(), "#ef4444");
        assert_eq!(Severity::of(50.0).badge_colors(), ("#dcfce7", "#166534"));
    }

    #[test]
    fn test_row_derivation() {
        let data = vec![
            EquipmentRecord::new("Over", "Pump", 120.0),
            EquipmentRecord::new("Under", "Pump", -5.0),
            EquipmentRecord::new("Half", "Pump", 72.5),
        ];
        let model = explorer(&data, "");

        assert_eq!(model.rows[0].health_pct, 100.0);
        assert_eq!(model.rows[1].health_pct, 0.0);
        assert_eq!(model.rows[2].health_pct, 72.5);
        assert_eq!(model.rows[2].health_label(), "72.5%");
        assert_eq!(model.rows[0].health_label(), "120%");
        assert_eq!(model.rows[1].priority, "Critical");
        assert_eq!(model.rows[2].priority, "Normal");
    }

    #[test]
    fn test_filter_borrows_original_records() {
        let data = records();
        let filtered = filter_records(&data, "valve");
        assert!(std::ptr::eq(filtered[0], &data[1]));
    }
}
