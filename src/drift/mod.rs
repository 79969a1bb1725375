// Windowed drift detection with standardized effect sizes
//
// Compares a reference window against a current window of one scalar stream.
// Each window is summarized independently (moments plus linear-interpolated
// quartiles) and the shift between them is expressed as Cohen's d over the
// pooled standard deviation.
//
// Scientific Foundation:
// Cohen, J. (1988). Statistical Power Analysis for the Behavioral Sciences.
//     d = 0.2 small, 0.5 medium, 0.8 large. The default drift cut is "medium".
//
// Degenerate windows never raise: fewer than two observations or zero pooled
// variance yield d = 0 and no flag, so a report can always be produced.

mod compare;
mod config;
mod effect_size;
mod summary;

pub use compare::{compare, compare_at_cutover, compare_values, DriftComparison};
pub use config::DriftConfig;
pub use effect_size::{cohens_d, pooled_std, DriftDecision};
pub use summary::{quantile_sorted, WindowSummary};
