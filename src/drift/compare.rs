// Reference/current window comparison
//
// Pure functions over an immutable observation slice: no shared state, safe
// to run concurrently with each other and with any live scorer.

use crate::drift::config::DriftConfig;
use crate::drift::effect_size::DriftDecision;
use crate::drift::summary::WindowSummary;
use crate::observation::Observation;
use serde::{Deserialize, Serialize};

/// Both window summaries plus the resulting decision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftComparison {
    pub reference: WindowSummary,
    pub current: WindowSummary,
    pub decision: DriftDecision,
}

/// Partition `observations` and compare the two windows
///
/// Observations for which `is_reference` returns true form the reference
/// window; the rest form the current window. Swapping the predicate negates
/// the effect size and leaves the flag unchanged.
pub fn compare<F>(observations: &[Observation], is_reference: F, effect_threshold: f64) -> DriftComparison
where
    F: Fn(&Observation) -> bool,
{
    let mut reference = Vec::new();
    let mut current = Vec::new();
    for obs in observations {
        if is_reference(obs) {
            reference.push(obs.value());
        } else {
            current.push(obs.value());
        }
    }

    tracing::debug!(
        reference = reference.len(),
        current = current.len(),
        "comparing drift windows"
    );

    compare_values(&reference, &current, effect_threshold)
}

/// Compare with the `timestamp < cutover` rule from `config`
pub fn compare_at_cutover(observations: &[Observation], config: &DriftConfig) -> DriftComparison {
    let cutover = config.cutover;
    compare(
        observations,
        |obs| obs.timestamp() < cutover,
        config.effect_threshold,
    )
}

/// Compare two already-partitioned windows of values
pub fn compare_values(reference: &[f64], current: &[f64], effect_threshold: f64) -> DriftComparison {
    let reference = WindowSummary::from_values(reference);
    let current = WindowSummary::from_values(current);
    let decision = DriftDecision::from_summaries(&reference, &current, effect_threshold);

    DriftComparison {
        reference,
        current,
        decision,
    }
}
