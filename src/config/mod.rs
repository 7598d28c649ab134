//! Configuration module for binnacle
//!
//! Settings are read from a TOML file. Lookup order:
//!
//! 1. An explicit path (the `--config` flag)
//! 2. `config.toml` in the platform config directory:
//!    - **Linux**: `~/.config/binnacle/`
//!    - **macOS**: `~/Library/Application Support/binnacle/`
//!    - **Windows**: `%APPDATA%\binnacle\`
//! 3. Built-in defaults
//!
//! Every field has a default, so a partial file is valid.
//!
//! # Example
//!
//! ```toml
//! [backend]
//! snapshot = "samples.json"
//! max_samples = 200
//!
//! [chart]
//! width = 80
//! sort_by = "value"
//!
//! [logging]
//! filter = "info,binnacle=trace"
//! file = "/tmp/binnacle.log"
//! ```

use crate::error::{BinnacleError, Result};
use crate::query::DEFAULT_MAX_SAMPLES;
use crate::render::ChartSort;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config directories
pub const APP_ID: &str = "binnacle";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// Default chart width in columns
pub const DEFAULT_CHART_WIDTH: usize = 60;

/// Default tracing filter directive
pub const DEFAULT_LOG_FILTER: &str = "info,binnacle=debug";

/// Get the platform config directory for binnacle
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Get the path to the default config file
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

/// Query backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// JSON sample snapshot answering queries
    pub snapshot: Option<PathBuf>,
    /// Cap on samples returned by one query
    pub max_samples: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            snapshot: None,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}

/// Chart rendering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Total chart width in columns
    pub width: usize,
    /// Bar ordering
    pub sort_by: ChartSort,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CHART_WIDTH,
            sort_by: ChartSort::Label,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub filter: String,
    /// Also write logs to this file
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            file: None,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub chart: ChartConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BinnacleError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            BinnacleError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;
        Ok(config.clamped())
    }

    /// Raise values that cannot be zero to their minimum
    fn clamped(mut self) -> Self {
        if self.chart.width == 0 {
            tracing::warn!("chart.width = 0 in config, using 1");
            self.chart.width = 1;
        }
        self
    }

    /// Load from `path`, or the default location when `None`.
    ///
    /// A missing default file yields defaults; an explicit path must exist.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load(path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load configuration, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                BinnacleError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| BinnacleError::Serialization(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            BinnacleError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }
}
