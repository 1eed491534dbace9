//! View Models
//!
//! Pure transforms from an [`AnalysisResult`](crate::analysis::AnalysisResult)
//! (plus the session's search term) into what the renderers draw. Nothing in
//! here touches the network or the store.

pub mod explorer;
pub mod overview;

pub use explorer::{explorer, filter_records, ExplorerModel, ExplorerRow, Severity, EMPTY_EXPLORER_MESSAGE};
pub use overview::{format_average, format_timestamp, overview, ChartSeries, OverviewModel, PieSlice, StatTile};
