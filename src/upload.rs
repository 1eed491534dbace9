//! Upload Controller
//!
//! Submits the selected CSV to the analysis service and folds the outcome
//! back into the session store.
//!
//! The round trip is split in three steps so an event loop can keep handling
//! input while the request is in flight:
//!
//! 1. [`begin_upload`] validates the selection and marks the session loading
//! 2. [`perform_upload`] reads the file and talks to the service (no store access)
//! 3. [`outcome_action`] turns the result into the [`Action`] to dispatch
//!
//! [`submit_upload`] runs all three in sequence. Overlapping uploads are
//! refused while one is in flight; nothing is ever cancelled.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::analysis::AnalysisResult;
use crate::client::{AnalysisService, ClientError};
use crate::session::{Action, Notice, Store};

/// Generic message for any transport or server failure
pub const CONNECTIVITY_MESSAGE: &str = "Error connecting to backend";

pub const NO_FILE_MESSAGE: &str = "Select a file before analyzing";

pub const BUSY_MESSAGE: &str = "Analysis already in progress";

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No file selected")]
    NoFileSelected,

    #[error("Upload already in progress")]
    Busy,

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl UploadError {
    /// What the user is told; service errors are deliberately not distinguished
    pub fn notice(&self) -> Notice {
        match self {
            UploadError::NoFileSelected => Notice::Validation(NO_FILE_MESSAGE.to_string()),
            UploadError::Busy => Notice::Validation(BUSY_MESSAGE.to_string()),
            UploadError::Read { path, .. } => {
                Notice::Validation(format!("Could not read {}", path.display()))
            }
            UploadError::Client(_) => Notice::Connectivity(CONNECTIVITY_MESSAGE.to_string()),
        }
    }

    /// True when the request never left the client
    pub fn is_validation(&self) -> bool {
        matches!(self, UploadError::NoFileSelected | UploadError::Busy)
    }
}

/// An accepted upload, ready to be sent
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub id: Uuid,
    pub path: PathBuf,
}

impl UploadRequest {
    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload.csv".to_string())
    }
}

/// Validate the selection and enter the loading phase
///
/// On rejection the store only gains a notice; no request may be issued.
pub fn begin_upload(store: &mut Store) -> Result<UploadRequest, UploadError> {
    let state = store.state();

    let rejection = if !state.can_submit() {
        Some(UploadError::Busy)
    } else if state.selected_file.is_none() {
        Some(UploadError::NoFileSelected)
    } else {
        None
    };

    if let Some(err) = rejection {
        tracing::warn!(error = %err, "Upload rejected");
        store.dispatch(Action::Rejected(err.notice()));
        return Err(err);
    }

    let path = match store.state().selected_file.clone() {
        Some(path) => path,
        None => return Err(UploadError::NoFileSelected),
    };

    store.dispatch(Action::UploadStarted);

    Ok(UploadRequest {
        id: Uuid::new_v4(),
        path,
    })
}

/// Send one accepted upload to the service
pub async fn perform_upload<S>(
    service: &S,
    request: &UploadRequest,
) -> Result<AnalysisResult, UploadError>
where
    S: AnalysisService + ?Sized,
{
    let request_id = request.id;

    let contents = tokio::fs::read(&request.path)
        .await
        .map_err(|source| UploadError::Read {
            path: request.path.clone(),
            source,
        })?;

    let file_name = request.file_name();
    tracing::info!(%request_id, file = %file_name, bytes = contents.len(), "Uploading dataset");

    match service.upload(&file_name, contents).await {
        Ok(response) => {
            let analysis = response.current_analysis;
            tracing::info!(
                %request_id,
                total_count = analysis.total_count,
                rows = analysis.full_data.len(),
                history = response.history.len(),
                "Analysis received"
            );
            Ok(analysis)
        }
        Err(e) => {
            tracing::error!(%request_id, error = %e, "Upload failed");
            Err(UploadError::Client(e))
        }
    }
}

/// Action that settles an upload
pub fn outcome_action(result: &Result<AnalysisResult, UploadError>) -> Action {
    match result {
        Ok(analysis) => Action::UploadSucceeded(analysis.clone()),
        Err(e) => Action::UploadFailed(e.notice()),
    }
}

/// Full upload round trip against the store
pub async fn submit_upload<S>(store: &mut Store, service: &S) -> Result<AnalysisResult, UploadError>
where
    S: AnalysisService + ?Sized,
{
    let request = begin_upload(store)?;
    let result = perform_upload(service, &request).await;
    store.dispatch(outcome_action(&result));
    result
}
