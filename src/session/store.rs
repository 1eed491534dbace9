//! Session store and reducer

use std::path::PathBuf;
use std::str::FromStr;

use crate::analysis::AnalysisResult;

/// Which renderer is active once an analysis is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Explorer,
}

impl Tab {
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Overview",
            Tab::Explorer => "Equipment Explorer",
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dashboard" | "overview" => Ok(Tab::Dashboard),
            "explorer" | "table" => Ok(Tab::Explorer),
            other => Err(format!("Unknown tab: {}. Use: overview, explorer", other)),
        }
    }
}

/// Coarse lifecycle of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Loading,
    Ready,
}

/// User-facing message raised by the last event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Request blocked before anything was sent
    Validation(String),
    /// Upload rejected or the service was unreachable
    Connectivity(String),
    Info(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Validation(m) | Notice::Connectivity(m) | Notice::Info(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::Info(_))
    }
}

/// Everything the views are derived from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub selected_file: Option<PathBuf>,
    pub analysis: Option<AnalysisResult>,
    pub loading: bool,
    pub active_tab: Tab,
    pub search_term: String,
    pub notice: Option<Notice>,
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.analysis.is_some() {
            Phase::Ready
        } else {
            Phase::Empty
        }
    }

    /// The analyze trigger is disabled while an upload is in flight
    pub fn can_submit(&self) -> bool {
        !self.loading
    }

    /// Report export is only offered once an analysis exists
    pub fn report_available(&self) -> bool {
        self.analysis.is_some()
    }

    /// Display name of the selected file
    pub fn selected_file_name(&self) -> Option<String> {
        self.selected_file.as_ref().map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| p.display().to_string())
        })
    }
}

/// Events that mutate the session
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectFile(PathBuf),
    UploadStarted,
    UploadSucceeded(AnalysisResult),
    UploadFailed(Notice),
    /// Blocked submit; only the notice changes
    Rejected(Notice),
    SwitchTab(Tab),
    SetSearch(String),
    DismissNotice,
}

/// Owner of the session state
#[derive(Debug, Default)]
pub struct Store {
    state: SessionState,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Apply one event to the session
    pub fn dispatch(&mut self, action: Action) {
        let state = &mut self.state;

        match action {
            Action::SelectFile(path) => {
                tracing::debug!(file = %path.display(), "File selected");
                state.selected_file = Some(path);
            }
            Action::UploadStarted => {
                if state.loading {
                    tracing::warn!("Upload already in flight; ignoring start");
                    return;
                }
                state.loading = true;
                state.notice = None;
            }
            Action::UploadSucceeded(analysis) => {
                let message = format!("Loaded analysis of {} units", analysis.total_count);
                state.analysis = Some(analysis);
                state.active_tab = Tab::Dashboard;
                state.loading = false;
                state.notice = Some(Notice::Info(message));
            }
            Action::UploadFailed(notice) => {
                state.loading = false;
                state.notice = Some(notice);
            }
            Action::Rejected(notice) => {
                state.notice = Some(notice);
            }
            Action::SwitchTab(tab) => {
                tracing::debug!(tab = tab.label(), "Tab switched");
                state.active_tab = tab;
            }
            Action::SetSearch(term) => {
                tracing::debug!(term = %term, "Search updated");
                state.search_term = term;
            }
            Action::DismissNotice => {
                state.notice = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::EquipmentRecord;
    use std::collections::BTreeMap;

    fn sample_analysis(total: u64) -> AnalysisResult {
        AnalysisResult {
            total_count: total,
            averages: BTreeMap::from([("Health".to_string(), 76.333)]),
            distribution: BTreeMap::from([("Pump".to_string(), 5), ("Valve".to_string(), 7)]),
            full_data: vec![EquipmentRecord::new("Pump A", "Pump", 40.0)],
            timestamp: None,
            system_status: None,
            alerts: Vec::new(),
            risk_report: Vec::new(),
        }
    }

    #[test]
    fn test_initial_state() {
        let store = Store::new();
        let state = store.state();

        assert_eq!(state.phase(), Phase::Empty);
        assert_eq!(state.active_tab, Tab::Dashboard);
        assert!(state.selected_file.is_none());
        assert!(state.search_term.is_empty());
        assert!(state.can_submit());
        assert!(!state.report_available());
    }

    #[test]
    fn test_success_replaces_analysis_and_resets_tab() {
        let mut store = Store::new();
        store.dispatch(Action::UploadStarted);
        store.dispatch(Action::UploadSucceeded(sample_analysis(3)));
        store.dispatch(Action::SwitchTab(Tab::Explorer));

        store.dispatch(Action::UploadStarted);
        assert_eq!(store.state().phase(), Phase::Loading);
        assert!(!store.state().can_submit());

        store.dispatch(Action::UploadSucceeded(sample_analysis(12)));

        let state = store.state();
        assert_eq!(state.analysis, Some(sample_analysis(12)));
        assert_eq!(state.active_tab, Tab::Dashboard);
        assert_eq!(state.phase(), Phase::Ready);
        assert!(state.report_available());
    }

    #[test]
    fn test_failure_keeps_previous_analysis() {
        let mut store = Store::new();
        store.dispatch(Action::UploadStarted);
        store.dispatch(Action::UploadSucceeded(sample_analysis(3)));

        store.dispatch(Action::UploadStarted);
        store.dispatch(Action::UploadFailed(Notice::Connectivity("down".to_string())));

        let state = store.state();
        assert_eq!(state.analysis, Some(sample_analysis(3)));
        assert!(!state.loading);
        assert_eq!(state.phase(), Phase::Ready);
        assert!(state.notice.as_ref().unwrap().is_error());
    }

    #[test]
    fn test_first_failure_returns_to_empty() {
        let mut store = Store::new();
        store.dispatch(Action::UploadStarted);
        store.dispatch(Action::UploadFailed(Notice::Connectivity("down".to_string())));

        assert!(store.state().analysis.is_none());
        assert_eq!(store.state().phase(), Phase::Empty);
    }

    #[test]
    fn test_rejection_only_sets_notice() {
        let mut store = Store::new();
        store.dispatch(Action::SetSearch("pump".to_string()));
        let before = store.state().clone();

        store.dispatch(Action::Rejected(Notice::Validation("Select a file".to_string())));

        let after = store.state();
        assert_eq!(after.notice, Some(Notice::Validation("Select a file".to_string())));
        assert_eq!(after.analysis, before.analysis);
        assert_eq!(after.loading, before.loading);
        assert_eq!(after.search_term, before.search_term);

        store.dispatch(Action::DismissNotice);
        assert!(store.state().notice.is_none());
    }

    #[test]
    fn test_duplicate_start_is_ignored() {
        let mut store = Store::new();
        store.dispatch(Action::UploadStarted);
        store.dispatch(Action::UploadStarted);
        assert!(store.state().loading);
    }

    #[test]
    fn test_selected_file_name() {
        let mut store = Store::new();
        store.dispatch(Action::SelectFile(PathBuf::from("/data/plant.csv")));
        assert_eq!(store.state().selected_file_name().as_deref(), Some("plant.csv"));
    }

    #[test]
    fn test_tab_parsing() {
        assert_eq!("overview".parse::<Tab>().unwrap(), Tab::Dashboard);
        assert_eq!("Dashboard".parse::<Tab>().unwrap(), Tab::Dashboard);
        assert_eq!(" explorer ".parse::<Tab>().unwrap(), Tab::Explorer);
        assert!("history".parse::<Tab>().is_err());
    }
}
