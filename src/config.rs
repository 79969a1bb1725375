//! Run configuration
//!
//! All sections deserialize from TOML with per-field defaults, so a config
//! file only needs the keys it changes:
//!
//! ```toml
//! [anomaly]
//! z_threshold = 3.5
//!
//! [drift]
//! cutover = 350
//!
//! [output]
//! out_dir = "results"
//! ```

use crate::anomaly::AnomalyConfig;
use crate::drift::DriftConfig;
use crate::source::SourceConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading/validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid [{section}] configuration: {reason}")]
    Invalid {
        section: &'static str,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Where the output collaborators write their artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding the alerts table and rendered reports (default: outputs)
    pub out_dir: PathBuf,
    /// Pause between streamed events in milliseconds (default: 0)
    pub sleep_ms: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("outputs"),
            sleep_ms: 0,
        }
    }
}

impl OutputConfig {
    pub fn paths(&self) -> OutputPaths {
        OutputPaths::new(&self.out_dir)
    }
}

/// Artifact locations derived from one output directory
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub alerts_csv: PathBuf,
    pub report_html: PathBuf,
    pub report_json: PathBuf,
    pub plot_html: PathBuf,
}

impl OutputPaths {
    pub fn new(out_dir: &Path) -> Self {
        Self {
            alerts_csv: out_dir.join("alerts.csv"),
            report_html: out_dir.join("drift_report.html"),
            report_json: out_dir.join("drift_report.json"),
            plot_html: out_dir.join("stream_plot.html"),
        }
    }
}

/// Complete configuration of a StreamGuard run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamGuardConfig {
    pub anomaly: AnomalyConfig,
    pub drift: DriftConfig,
    pub source: SourceConfig,
    pub output: OutputConfig,
}

impl StreamGuardConfig {
    /// Load and validate a TOML config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.anomaly.validate().map_err(invalid("anomaly"))?;
        self.drift.validate().map_err(invalid("drift"))?;
        self.source.validate().map_err(invalid("source"))?;
        Ok(())
    }
}

fn invalid(section: &'static str) -> impl Fn(String) -> ConfigError {
    move |reason| ConfigError::Invalid { section, reason }
}
