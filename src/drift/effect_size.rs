// Cohen's d over the pooled standard deviation
//
// Works on WindowSummary values only: the pooling term needs the raw window
// sizes and the sample standard deviations, both of which a summary carries.

use crate::drift::summary::WindowSummary;
use serde::{Deserialize, Serialize};

/// Drift verdict for one reference/current comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftDecision {
    /// Cohen's d, positive when the current window's mean is higher
    pub effect_size: f64,
    /// `|effect_size| >= effect_threshold`
    pub flagged: bool,
}

impl DriftDecision {
    /// Decide from two summaries
    pub fn from_summaries(
        reference: &WindowSummary,
        current: &WindowSummary,
        effect_threshold: f64,
    ) -> Self {
        let effect_size = cohens_d(reference, current);
        Self {
            effect_size,
            flagged: effect_size.abs() >= effect_threshold,
        }
    }
}

/// Pooled standard deviation, `None` when either window has < 2 observations
///
/// `sqrt(((n1-1)·s1² + (n2-1)·s2²) / (n1+n2-2))`
pub fn pooled_std(reference: &WindowSummary, current: &WindowSummary) -> Option<f64> {
    if reference.count < 2 || current.count < 2 {
        return None;
    }

    let n1 = reference.count as f64;
    let n2 = current.count as f64;
    let pooled_var = ((n1 - 1.0) * reference.std.powi(2) + (n2 - 1.0) * current.std.powi(2))
        / (n1 + n2 - 2.0);

    Some(pooled_var.sqrt())
}

/// Standardized mean difference `(mean2 - mean1) / pooled`
///
/// Returns 0.0 rather than dividing by zero when the effect size cannot be
/// estimated (insufficient data or zero pooled variance).
pub fn cohens_d(reference: &WindowSummary, current: &WindowSummary) -> f64 {
    match pooled_std(reference, current) {
        Some(pooled) if pooled > 0.0 => (current.mean - reference.mean) / pooled,
        _ => 0.0,
    }
}
