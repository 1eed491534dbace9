//! # ChemViz
//!
//! Terminal dashboard client for an equipment health analysis service.
//! Upload a CSV of equipment readings, then browse the returned analysis as
//! summary charts or as a searchable table.
//!
//! ## Modules
//!
//! - [`analysis`]: Wire types for the analysis payload
//! - [`client`]: HTTP client for the analysis service
//! - [`session`]: Session store and reducer
//! - [`upload`]: Upload controller
//! - [`report`]: Report export
//! - [`view`]: Pure overview/explorer view models
//! - [`render`]: Terminal rendering
//! - [`shell`]: Interactive session loop
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chemviz::client::ApiClient;
//! use chemviz::config::ServerConfig;
//! use chemviz::session::{Action, Store};
//! use chemviz::upload::submit_upload;
//! use chemviz::view;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ServerConfig::default())?;
//!     let mut store = Store::new();
//!
//!     store.dispatch(Action::SelectFile("plant.csv".into()));
//!     let analysis = submit_upload(&mut store, &client).await?;
//!
//!     for tile in view::overview(&analysis).tiles {
//!         println!("{}: {}", tile.label, tile.value);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod client;
pub mod config;
pub mod render;
pub mod report;
pub mod session;
pub mod shell;
pub mod upload;
pub mod view;

pub use analysis::{AnalysisResult, EquipmentRecord, SystemStatus, UploadResponse};

pub use client::{AnalysisService, ApiClient, ClientError};

pub use config::{Config, ConfigError, DisplayConfig, LoggingConfig, ServerConfig};

pub use session::{Action, Notice, Phase, SessionState, Store, Tab};

pub use upload::{submit_upload, UploadError};

pub use report::{ReportError, SystemBrowser, UrlOpener};

pub use render::Renderer;

pub use shell::Shell;
