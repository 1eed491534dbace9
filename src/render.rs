//! Terminal Rendering
//!
//! Draws the view models as plain text: stat tiles, a horizontal bar chart,
//! a pie breakdown and the explorer table. Coloring is optional so output
//! stays stable when piped.

use colored::Colorize;

use crate::config::DisplayConfig;
use crate::session::{Notice, SessionState, Tab};
use crate::view::{self, ExplorerModel, ExplorerRow, OverviewModel, Severity};

pub const PLACEHOLDER: &str = "Upload Data to Begin";

const HEALTH_BAR_CELLS: usize = 10;

/// Text renderer for the dashboard
#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    chart_width: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&DisplayConfig::default())
    }
}

impl Renderer {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            color: config.color,
            chart_width: config.chart_width.max(1),
        }
    }

    pub fn plain() -> Self {
        Self {
            color: false,
            ..Self::default()
        }
    }

    fn severity(&self, text: &str, severity: Severity) -> String {
        if !self.color {
            return text.to_string();
        }
        match severity {
            Severity::Critical => text.red().bold().to_string(),
            Severity::Normal => text.green().to_string(),
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Whole screen for the current session
    pub fn render_session(&self, state: &SessionState) -> String {
        let mut out = String::new();

        out.push_str(&self.heading("ChemViz Pro | Plant Dashboard"));
        out.push('\n');

        let file = state
            .selected_file_name()
            .unwrap_or_else(|| "No file selected".to_string());
        let trigger = if state.loading { "Processing..." } else { "Analyze" };
        out.push_str(&format!("File: {}  [{}]", file, trigger));
        if state.report_available() {
            out.push_str("  [Report]");
        }
        out.push('\n');

        if let Some(notice) = &state.notice {
            out.push_str(&self.render_notice(notice));
            out.push('\n');
        }
        out.push('\n');

        match &state.analysis {
            None => {
                out.push_str(PLACEHOLDER);
                out.push('\n');
            }
            Some(analysis) => {
                out.push_str(&self.render_tabs(state.active_tab));
                out.push_str("\n\n");
                match state.active_tab {
                    Tab::Dashboard => out.push_str(&self.render_overview(&view::overview(analysis))),
                    Tab::Explorer => out.push_str(&self.render_explorer(
                        &view::explorer(&analysis.full_data, &state.search_term),
                        &state.search_term,
                    )),
                }
            }
        }

        out
    }

    pub fn render_notice(&self, notice: &Notice) -> String {
        let text = match notice {
            Notice::Validation(m) => format!("! {}", m),
            Notice::Connectivity(m) => format!("x {}", m),
            Notice::Info(m) => format!("* {}", m),
        };

        if !self.color {
            return text;
        }
        match notice {
            Notice::Validation(_) => text.yellow().to_string(),
            Notice::Connectivity(_) => text.red().to_string(),
            Notice::Info(_) => text.cyan().to_string(),
        }
    }

    fn render_tabs(&self, active: Tab) -> String {
        [Tab::Dashboard, Tab::Explorer]
            .iter()
            .map(|tab| {
                if *tab == active {
                    self.heading(&format!("[{}]", tab.label()))
                } else {
                    format!(" {} ", tab.label())
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    pub fn render_overview(&self, model: &OverviewModel) -> String {
        let mut out = String::new();

        if let Some(status) = &model.status {
            out.push_str(&format!("System status: {}", status));
            if model.alert_count > 0 {
                out.push_str(&format!(" ({} critical alerts)", model.alert_count));
            }
            if let Some(at) = &model.generated_at {
                out.push_str(&format!(" | {}", at));
            }
            out.push_str("\n\n");
        }

        for tile in &model.tiles {
            out.push_str(&format!("{}: {}\n", tile.label, tile.value));
        }
        out.push('\n');

        out.push_str(&self.heading("Equipment Distribution"));
        out.push('\n');
        if model.bar.is_empty() {
            out.push_str("  (no data)\n");
        } else {
            let label_width = model.bar.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
            let max = model.bar.max();
            for (label, value) in model.bar.labels.iter().zip(&model.bar.values) {
                let cells = if max == 0 {
                    0
                } else {
                    ((*value as f64 / max as f64) * self.chart_width as f64).round() as usize
                };
                out.push_str(&format!(
                    "  {:<width$}  {} {}\n",
                    label,
                    "█".repeat(cells),
                    value,
                    width = label_width
                ));
            }
        }
        out.push('\n');

        out.push_str(&self.heading("Composition"));
        out.push('\n');
        if model.pie.is_empty() {
            out.push_str("  (no data)\n");
        } else {
            let label_width = model.pie.iter().map(|s| s.label.chars().count()).max().unwrap_or(0);
            for slice in &model.pie {
                out.push_str(&format!(
                    "  {:<width$}  {:>6}  ({})\n",
                    slice.label,
                    slice.share_label(),
                    slice.value,
                    width = label_width
                ));
            }
        }

        out
    }

    fn health_bar(&self, row: &ExplorerRow) -> String {
        let filled = ((row.health_pct / 100.0) * HEALTH_BAR_CELLS as f64).round() as usize;
        let filled = filled.min(HEALTH_BAR_CELLS);
        let bar = format!(
            "{}{}",
            "█".repeat(filled),
            "░".repeat(HEALTH_BAR_CELLS - filled)
        );
        self.severity(&bar, row.severity)
    }

    pub fn render_explorer(&self, model: &ExplorerModel, search_term: &str) -> String {
        let mut out = String::new();

        let shown_term = if search_term.is_empty() { "(none)" } else { search_term };
        out.push_str(&format!(
            "Search: {}  |  {} of {} rows\n\n",
            shown_term,
            model.rows.len(),
            model.total
        ));

        let headers = ["Name", "Type", "Health", "Action Required", "Status"];
        let name_w = column_width(headers[0], model.rows.iter().map(|r| r.name.as_str()));
        let type_w = column_width(headers[1], model.rows.iter().map(|r| r.kind.as_str()));
        let labels: Vec<String> = model.rows.iter().map(|r| r.health_label()).collect();
        let health_label_w = labels.iter().map(|l| l.len()).max().unwrap_or(0);
        let health_w = (HEALTH_BAR_CELLS + 1 + health_label_w).max(headers[2].len());
        let action_w = column_width(headers[3], model.rows.iter().map(|r| r.action.as_str()));

        out.push_str(&self.heading(&format!(
            "{:<name_w$}  {:<type_w$}  {:<health_w$}  {:<action_w$}  {}",
            headers[0], headers[1], headers[2], headers[3], headers[4],
        )));
        out.push('\n');
        out.push_str(&"-".repeat(name_w + type_w + health_w + action_w + 8 + headers[4].len()));
        out.push('\n');

        if let Some(message) = model.empty_message {
            out.push_str(message);
            out.push('\n');
            return out;
        }

        for (row, label) in model.rows.iter().zip(&labels) {
            // pad before coloring so escape codes don't skew widths
            let health = format!(
                "{} {:<pad$}",
                self.health_bar(row),
                label,
                pad = health_w - HEALTH_BAR_CELLS - 1
            );
            out.push_str(&format!(
                "{:<name_w$}  {:<type_w$}  {}  {:<action_w$}  {}\n",
                row.name,
                row.kind,
                health,
                row.action,
                self.severity(&row.priority, row.severity),
            ));
        }

        out
    }
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}

/// Explorer rows as CSV
pub fn explorer_csv(model: &ExplorerModel) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in &model.rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
