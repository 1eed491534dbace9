//! Report Export
//!
//! The report is generated server-side from the latest upload. Exporting
//! means handing its URL to the system browser and forgetting about it; the
//! CLI can also save the artifact to disk.

use std::path::Path;

use thiserror::Error;

use crate::client::{AnalysisService, ClientError};
use crate::session::SessionState;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("No analysis loaded; upload data first")]
    NotAvailable,

    #[error("Failed to open browser: {0}")]
    Launch(#[source] std::io::Error),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can open a URL in a new browsing context
pub trait UrlOpener {
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Opens URLs with the platform's default handler
pub struct SystemBrowser;

impl UrlOpener for SystemBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        #[cfg(target_os = "windows")]
        {
            std::process::Command::new("cmd")
                .args(["/C", "start", url])
                .spawn()?;
        }

        #[cfg(target_os = "macos")]
        {
            std::process::Command::new("open").arg(url).spawn()?;
        }

        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            std::process::Command::new("xdg-open").arg(url).spawn()?;
        }

        Ok(())
    }
}

/// Open the report for the session's analysis
///
/// Only offered once an analysis is loaded. The session is not modified and
/// the response is never inspected.
pub fn open_report<S, O>(state: &SessionState, service: &S, opener: &O) -> Result<String, ReportError>
where
    S: AnalysisService + ?Sized,
    O: UrlOpener + ?Sized,
{
    if !state.report_available() {
        return Err(ReportError::NotAvailable);
    }

    let url = service.report_url();
    tracing::info!(url = %url, "Opening report");
    opener.open(&url).map_err(ReportError::Launch)?;

    Ok(url)
}

/// Download the latest report to `path`, returning the byte count
pub async fn save_report<S>(service: &S, path: &Path) -> Result<usize, ReportError>
where
    S: AnalysisService + ?Sized,
{
    let bytes = service.download_report().await?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, &bytes).await?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Report saved");
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisResult, UploadResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedService;

    #[async_trait]
    impl AnalysisService for FixedService {
        async fn upload(&self, _: &str, _: Vec<u8>) -> Result<UploadResponse, ClientError> {
            Err(ClientError::Unavailable)
        }

        fn report_url(&self) -> String {
            "http://127.0.0.1:8000/api/report/".to_string()
        }

        async fn download_report(&self) -> Result<Vec<u8>, ClientError> {
            Ok(b"%PDF-1.4".to_vec())
        }
    }

    #[derive(Default)]
    struct RecordingOpener {
        opened: Mutex<Vec<String>>,
    }

    impl UrlOpener for RecordingOpener {
        fn open(&self, url: &str) -> std::io::Result<()> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    fn ready_state() -> SessionState {
        SessionState {
            analysis: Some(AnalysisResult {
                total_count: 0,
                averages: Default::default(),
                distribution: Default::default(),
                full_data: Vec::new(),
                timestamp: None,
                system_status: None,
                alerts: Vec::new(),
                risk_report: Vec::new(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_report_requires_analysis() {
        let opener = RecordingOpener::default();
        let err = open_report(&SessionState::default(), &FixedService, &opener).unwrap_err();

        assert!(matches!(err, ReportError::NotAvailable));
        assert!(opener.opened.lock().unwrap().is_empty());
    }

    #[test]
    fn test_report_opens_url_without_touching_state() {
        let opener = RecordingOpener::default();
        let state = ready_state();
        let before = state.clone();

        let url = open_report(&state, &FixedService, &opener).unwrap();

        assert_eq!(url, "http://127.0.0.1:8000/api/report/");
        assert_eq!(*opener.opened.lock().unwrap(), vec![url]);
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn test_save_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("plant.pdf");

        let written = save_report(&FixedService, &path).await.unwrap();

        assert_eq!(written, 8);
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
    }
}
