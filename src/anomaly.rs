//! Causal online anomaly scoring
//!
//! Each observation is scored as a Z-score against the running baseline of
//! everything seen *before* it, and only then folded into that baseline. An
//! observation never influences the statistics used to judge it.

use crate::moments::{MomentSnapshot, MomentTracker};
use crate::observation::{InvalidObservation, Observation};
use serde::{Deserialize, Serialize};

/// Scoring configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Samples required before any observation can be flagged (default: 10)
    pub warmup_min_samples: u64,
    /// |z| at or above which an observation is anomalous (default: 4.0)
    pub z_threshold: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            warmup_min_samples: 10,
            z_threshold: 4.0,
        }
    }
}

impl AnomalyConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.z_threshold.is_finite() || self.z_threshold <= 0.0 {
            return Err(format!(
                "z_threshold must be a positive finite number, got {}",
                self.z_threshold
            ));
        }
        Ok(())
    }
}

/// Outcome of scoring one observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyResult {
    /// |z| against the pre-observation baseline, 0.0 during warm-up
    pub score: f64,
    pub is_anomaly: bool,
}

impl AnomalyResult {
    const QUIET: Self = Self {
        score: 0.0,
        is_anomaly: false,
    };
}

/// Online Z-score scorer for one logical stream
///
/// Holds only the running moments of its stream, so memory stays constant
/// however long the stream runs. Score each stream with its own instance and
/// feed it observations in timestamp order.
#[derive(Debug, Clone, Default)]
pub struct AnomalyScorer {
    tracker: MomentTracker,
    config: AnomalyConfig,
}

impl AnomalyScorer {
    pub fn new(config: AnomalyConfig) -> Self {
        Self {
            tracker: MomentTracker::new(),
            config,
        }
    }

    /// Score an observation, then fold it into the baseline
    pub fn process(&mut self, observation: &Observation) -> AnomalyResult {
        let before = self.tracker.snapshot();
        let result = self.score_against(&before, observation.value());
        self.tracker.update(observation.value());
        result
    }

    /// Validate a raw value and process it
    ///
    /// A rejected value leaves the baseline untouched.
    pub fn process_value(
        &mut self,
        timestamp: i64,
        value: f64,
    ) -> Result<AnomalyResult, InvalidObservation> {
        Ok(self.process(&Observation::new(timestamp, value)?))
    }

    /// Score `value` against a baseline without mutating anything
    fn score_against(&self, baseline: &MomentSnapshot, value: f64) -> AnomalyResult {
        if baseline.count < self.config.warmup_min_samples || baseline.std == 0.0 {
            return AnomalyResult::QUIET;
        }

        let score = ((value - baseline.mean) / baseline.std).abs();
        AnomalyResult {
            score,
            is_anomaly: score >= self.config.z_threshold,
        }
    }

    /// What `process` would return for `value`, without updating the baseline
    pub fn peek(&self, value: f64) -> AnomalyResult {
        self.score_against(&self.tracker.snapshot(), value)
    }

    /// Current baseline statistics
    pub fn snapshot(&self) -> MomentSnapshot {
        self.tracker.snapshot()
    }

    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }
}
