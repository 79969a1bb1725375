// Per-window descriptive statistics
//
// Values are sorted once; count/mean/std come from the same Welford routine
// the online scorer uses, quartiles from linear interpolation between order
// statistics (R-7, the default of most analytics libraries).

use crate::moments::MomentTracker;
use serde::{Deserialize, Serialize};

/// Descriptive summary of one window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation, 0.0 below two observations
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl WindowSummary {
    /// Summarize a window of finite values (order irrelevant)
    ///
    /// An empty window summarizes to all zeros.
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted)
    }

    fn from_sorted(sorted: &[f64]) -> Self {
        let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
            return Self::empty();
        };

        let moments = MomentTracker::from_values(sorted);

        Self {
            count: sorted.len(),
            mean: moments.mean(),
            std: moments.std(),
            min,
            p25: quantile_sorted(sorted, 0.25),
            p50: quantile_sorted(sorted, 0.50),
            p75: quantile_sorted(sorted, 0.75),
            max,
        }
    }

    fn empty() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            std: 0.0,
            min: 0.0,
            p25: 0.0,
            p50: 0.0,
            p75: 0.0,
            max: 0.0,
        }
    }

    /// Too few observations to estimate dispersion
    pub fn is_insufficient(&self) -> bool {
        self.count < 2
    }

    /// Field name/value pairs in report order
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("p25", self.p25),
            ("p50", self.p50),
            ("p75", self.p75),
            ("max", self.max),
        ]
    }
}

/// Quantile of ascending-sorted data by linear interpolation
///
/// Rank `r = p·(n-1)`; the result interpolates between the floor and ceil
/// order statistics by the fractional part of `r`. `p` is clamped to [0, 1].
pub fn quantile_sorted(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }
    if sorted_data.len() == 1 {
        return sorted_data[0];
    }

    let rank = p.clamp(0.0, 1.0) * (sorted_data.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        sorted_data[lower]
    } else {
        let (lo, hi) = (sorted_data[lower], sorted_data[upper]);
        let weight = rank - lower as f64;
        // Rounding must not push the result past its bracketing order statistics
        (lo + (hi - lo) * weight).clamp(lo, hi)
    }
}
