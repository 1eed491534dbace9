//! Analysis Payload
//!
//! Types for the analysis object returned by the equipment analysis service.
//! The client treats these as read-only: an analysis is replaced wholesale on
//! every successful upload and never merged.

mod types;

pub use types::{
    AlertRecord, AnalysisResult, EquipmentRecord, RiskEntry, SystemStatus, UploadResponse,
    CRITICAL_HEALTH_THRESHOLD,
};
