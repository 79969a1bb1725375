//! Incremental moment tracking (Welford's algorithm)
//!
//! Keeps count, mean and the sum of squared deviations for one scalar stream
//! without storing the samples. The textbook `Σx² - n·mean²` shortcut cancels
//! catastrophically once the mean is large relative to the spread, so the
//! update uses the two-delta form.

use serde::Serialize;

/// Running state owned by exactly one tracker
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunningStats {
    pub count: u64,
    pub mean: f64,
    pub sum_sq_dev: f64,
}

/// Point-in-time view of a tracker: (mean, std, count)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MomentSnapshot {
    pub mean: f64,
    /// Sample standard deviation (Bessel-corrected), 0.0 below two samples
    pub std: f64,
    pub count: u64,
}

/// Running mean/variance for a single stream
#[derive(Debug, Clone, Default)]
pub struct MomentTracker {
    stats: RunningStats,
}

impl MomentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tracker from a batch of finite values
    pub fn from_values(values: &[f64]) -> Self {
        let mut tracker = Self::new();
        for &value in values {
            tracker.update(value);
        }
        tracker
    }

    /// Fold one finite value into the running statistics
    pub fn update(&mut self, value: f64) {
        let stats = &mut self.stats;
        stats.count += 1;
        let delta = value - stats.mean;
        stats.mean += delta / stats.count as f64;
        let delta2 = value - stats.mean;
        stats.sum_sq_dev += delta * delta2;
    }

    pub fn snapshot(&self) -> MomentSnapshot {
        MomentSnapshot {
            mean: self.stats.mean,
            std: self.std(),
            count: self.stats.count,
        }
    }

    pub fn count(&self) -> u64 {
        self.stats.count
    }

    pub fn mean(&self) -> f64 {
        self.stats.mean
    }

    /// Sample variance, `sum_sq_dev / (n - 1)`
    pub fn variance(&self) -> f64 {
        if self.stats.count < 2 {
            0.0
        } else {
            self.stats.sum_sq_dev / (self.stats.count - 1) as f64
        }
    }

    pub fn std(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn stats(&self) -> &RunningStats {
        &self.stats
    }
}
