//! CLI argument parsing for StreamGuard

use crate::config::StreamGuardConfig;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for drift reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Self-contained HTML page (default)
    #[default]
    Html,
    /// JSON for machine parsing
    Json,
    /// Human-readable text on stdout
    Text,
}

#[derive(Parser, Debug)]
#[command(name = "streamguard")]
#[command(version)]
#[command(about = "Online anomaly scoring and windowed drift detection for scalar streams", long_about = None)]
pub struct Cli {
    /// Directory for alerts.csv and rendered reports (overrides config)
    #[arg(long = "out-dir", value_name = "DIR", global = true)]
    pub out_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug tracing on stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a synthetic stream, score it online, write alerts.csv
    Stream(StreamArgs),
    /// Compare reference/current windows of alerts.csv and write a drift report
    Report(ReportArgs),
    /// Plot alerts.csv as an HTML scatter chart
    Plot(PlotArgs),
    /// Stream, report and plot in one go
    Run(RunArgs),
}

/// Synthetic source and scorer overrides
#[derive(Args, Debug, Clone, Default)]
pub struct StreamArgs {
    /// Number of observations to generate
    #[arg(short = 'n', long = "events", value_name = "N")]
    pub events: Option<usize>,

    /// RNG seed for the synthetic source
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Timestamp at which the synthetic mean shifts
    #[arg(long = "drift-at", value_name = "T")]
    pub drift_at: Option<i64>,

    /// Timestamps receiving a spike (e.g. --spikes 120,260)
    #[arg(long = "spikes", value_name = "T,...", value_delimiter = ',')]
    pub spikes: Option<Vec<i64>>,

    /// Anomaly threshold in standard deviations (default: 4.0)
    #[arg(long = "z-threshold", value_name = "SIGMA")]
    pub z_threshold: Option<f64>,

    /// Samples required before anything can be flagged (default: 10)
    #[arg(long = "warmup", value_name = "N")]
    pub warmup: Option<u64>,

    /// Pause between events in milliseconds
    #[arg(long = "sleep-ms", value_name = "MS")]
    pub sleep_ms: Option<u64>,

    /// Print the anomaly summary report after streaming
    #[arg(long = "summary")]
    pub summary: bool,
}

/// Drift comparison overrides
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// First timestamp of the current window (default: 300)
    #[arg(long = "cutover", value_name = "T")]
    pub cutover: Option<i64>,

    /// |d| at or above which drift is flagged (default: 0.5)
    #[arg(long = "effect-threshold", value_name = "D")]
    pub effect_threshold: Option<f64>,

    /// Report format
    #[arg(long = "format", value_enum, default_value = "html")]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PlotArgs {
    /// Timestamp of the drift marker (defaults to the drift cutover)
    #[arg(long = "marker", value_name = "T")]
    pub marker: Option<i64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub stream: StreamArgs,

    #[command(flatten)]
    pub report: ReportArgs,
}

impl StreamArgs {
    /// Overlay command-line values onto a loaded configuration
    pub fn apply(&self, config: &mut StreamGuardConfig) {
        if let Some(n) = self.events {
            config.source.n = n;
        }
        if let Some(seed) = self.seed {
            config.source.seed = seed;
        }
        if let Some(drift_at) = self.drift_at {
            config.source.drift_at = drift_at;
        }
        if let Some(ref spikes) = self.spikes {
            config.source.spike_points = spikes.clone();
        }
        if let Some(z) = self.z_threshold {
            config.anomaly.z_threshold = z;
        }
        if let Some(warmup) = self.warmup {
            config.anomaly.warmup_min_samples = warmup;
        }
        if let Some(ms) = self.sleep_ms {
            config.output.sleep_ms = ms;
        }
    }
}

impl ReportArgs {
    /// Overlay command-line values onto a loaded configuration
    pub fn apply(&self, config: &mut StreamGuardConfig) {
        if let Some(cutover) = self.cutover {
            config.drift.cutover = cutover;
        }
        if let Some(threshold) = self.effect_threshold {
            config.drift.effect_threshold = threshold;
        }
    }
}
