//! Configuration System
//!
//! Settings come from a TOML file, then `CHEMVIZ_*` environment variables
//! layered on top.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Client settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Analysis service connection
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Unset means requests never time out
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl ServerConfig {
    /// Base URL without trailing slashes
    pub fn normalized_base(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }

    pub fn upload_url(&self) -> String {
        format!("{}/upload/", self.normalized_base())
    }

    pub fn report_url(&self) -> String {
        format!("{}/report/", self.normalized_base())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Terminal rendering options
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_color")]
    pub color: bool,

    /// Width in cells of the longest bar in the distribution chart
    #[serde(default = "default_chart_width")]
    pub chart_width: usize,
}

fn default_color() -> bool {
    true
}

fn default_chart_width() -> usize {
    40
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            chart_width: default_chart_width(),
        }
    }
}

impl Config {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Defaults plus environment overrides, no file
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Parse `path`, then apply environment overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// First config found among the usual locations, else defaults
    ///
    /// A file that exists but cannot be loaded is an error, not a fallback.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("chemviz").join("config.toml")),
            Some(PathBuf::from("./chemviz.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                tracing::debug!("Loaded config from {:?}", path);
                Ok(config)
            }
            None => Ok(Self::from_env()),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("CHEMVIZ_API_URL") {
            self.server.base_url = url;
        }
        if let Ok(secs) = std::env::var("CHEMVIZ_REQUEST_TIMEOUT") {
            if let Ok(s) = secs.parse() {
                self.server.request_timeout_secs = Some(s);
            }
        }

        if let Ok(level) = std::env::var("CHEMVIZ_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("CHEMVIZ_LOG_FORMAT") {
            self.logging.format = format;
        }

        if std::env::var_os("CHEMVIZ_NO_COLOR").is_some() {
            self.display.color = false;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Invalid config {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Commented template written by `chemviz config`
pub fn generate_default_config() -> String {
    r#"# ChemViz Configuration
#
# Environment variables override these settings:
# - CHEMVIZ_API_URL
# - CHEMVIZ_REQUEST_TIMEOUT
# - CHEMVIZ_LOG_LEVEL
# - CHEMVIZ_LOG_FORMAT
# - CHEMVIZ_NO_COLOR

[server]
# Base URL of the analysis service; /upload/ and /report/ are appended
base_url = "http://127.0.0.1:8000/api"

# Request timeout in seconds (omit to wait indefinitely)
# request_timeout_secs = 30

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty or json
format = "pretty"

[display]
# Colorize critical/normal rows
color = true

# Width of the longest bar in the distribution chart
chart_width = 40
"#
    .to_string()
}
