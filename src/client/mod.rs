//! Analysis Service Client
//!
//! The client talks to one external service exposing two endpoints:
//!
//! - `POST {base}/upload/` - multipart upload of a CSV in field `file`,
//!   answered with an [`UploadResponse`] whose `current_analysis` is the
//!   analysis object
//! - `GET {base}/report/` - a generated report artifact, normally opened in a
//!   browser rather than fetched
//!
//! [`AnalysisService`] is the seam the upload controller and report export
//! depend on, so both can run against an in-memory double in tests.

mod http;

pub use http::ApiClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::analysis::UploadResponse;

/// Remote analysis backend
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Upload a CSV and return the service's analysis of it
    async fn upload(&self, file_name: &str, contents: Vec<u8>)
        -> Result<UploadResponse, ClientError>;

    /// URL of the report artifact for the latest upload
    fn report_url(&self) -> String;

    /// Fetch the report artifact bytes
    async fn download_report(&self) -> Result<Vec<u8>, ClientError>;
}

/// Errors that can occur when communicating with the analysis service
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Analysis service unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ClientError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::Unavailable
        } else {
            ClientError::Request(err)
        }
    }
}
