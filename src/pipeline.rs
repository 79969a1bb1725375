//! Stream runner: source → scorer → alert sink
//!
//! Drives one logical stream through an `AnomalyScorer`, handing one row per
//! accepted observation to the sink as soon as it is scored and printing an
//! alert line for every anomaly. Invalid readings are logged and skipped;
//! the stream never halts on a single bad point.

use crate::anomaly::AnomalyScorer;
use crate::csv_output::{AlertRow, AlertSink, AlertsError};
use crate::observation::Observation;
use crate::source::Reading;
use serde::Serialize;
use std::time::Duration;

/// Highest-scoring anomalies kept in a `StreamSummary`
pub const TOP_ANOMALIES: usize = 10;

/// Flagged observation with the baseline it was judged against
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    pub timestamp: i64,
    pub value: f64,
    pub score: f64,
    pub baseline_mean: f64,
    pub baseline_std: f64,
}

/// Counters for one streamed run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamSummary {
    /// Observations scored and persisted
    pub processed: usize,
    /// Readings rejected before scoring
    pub rejected: usize,
    /// Observations flagged as anomalous
    pub anomalies: usize,
    /// At most `TOP_ANOMALIES` anomalies, highest score first
    pub top_anomalies: Vec<Anomaly>,
}

impl StreamSummary {
    /// Count an anomaly, keeping it only if it ranks in the top list
    pub fn record_anomaly(&mut self, anomaly: Anomaly) {
        self.anomalies += 1;

        // Ties keep the earlier anomaly ahead
        let rank = self
            .top_anomalies
            .partition_point(|kept| kept.score >= anomaly.score);
        if rank < TOP_ANOMALIES {
            self.top_anomalies.insert(rank, anomaly);
            self.top_anomalies.truncate(TOP_ANOMALIES);
        }
    }

    /// Print anomaly summary report
    pub fn print_summary(&self) {
        if self.top_anomalies.is_empty() {
            return;
        }

        eprintln!("\n=== Anomaly Detection Report ===");
        eprintln!("Total anomalies detected: {}", self.anomalies);
        eprintln!();

        eprintln!("Top Anomalies (by score):");
        for (i, anomaly) in self.top_anomalies.iter().enumerate() {
            eprintln!(
                "  {}. t={} - {:.1}σ (value {:.3}, baseline: {:.3} ± {:.3})",
                i + 1,
                anomaly.timestamp,
                anomaly.score,
                anomaly.value,
                anomaly.baseline_mean,
                anomaly.baseline_std
            );
        }

        if self.anomalies > self.top_anomalies.len() {
            eprintln!(
                "  ... and {} more",
                self.anomalies - self.top_anomalies.len()
            );
        }
    }
}

/// Score every reading from `source`, appending each result to `sink`
///
/// Rows reach the sink one at a time, in order, as they are scored; the sink
/// is finished once the source is exhausted. `pacing` inserts a pause after
/// each event to mimic a live feed.
pub fn run_stream<I, S>(
    source: I,
    scorer: &mut AnomalyScorer,
    sink: &mut S,
    pacing: Option<Duration>,
) -> Result<StreamSummary, AlertsError>
where
    I: IntoIterator<Item = Reading>,
    S: AlertSink + ?Sized,
{
    let mut summary = StreamSummary::default();

    for (timestamp, value) in source {
        let observation = match Observation::new(timestamp, value) {
            Ok(observation) => observation,
            Err(e) => {
                tracing::warn!(t = timestamp, "skipping observation: {}", e);
                summary.rejected += 1;
                continue;
            }
        };

        let baseline = scorer.snapshot();
        let result = scorer.process(&observation);

        sink.append(&AlertRow::new(&observation, &result))?;
        summary.processed += 1;

        if result.is_anomaly {
            summary.record_anomaly(Anomaly {
                timestamp,
                value,
                score: result.score,
                baseline_mean: baseline.mean,
                baseline_std: baseline.std,
            });
            eprintln!(
                "[ALERT] t={:>3} value={:>6.2} score={:>5.2}",
                timestamp, value, result.score
            );
        }

        if let Some(pause) = pacing {
            std::thread::sleep(pause);
        }
    }

    sink.finish()?;

    tracing::debug!(
        processed = summary.processed,
        rejected = summary.rejected,
        anomalies = summary.anomalies,
        "stream finished"
    );

    Ok(summary)
}
