//! Drift report value object and renderer seam
//!
//! Renderers see only the comparison results (window summaries and the
//! decision) plus labels; they never touch observations or scorer state.

use crate::drift::{DriftComparison, DriftConfig};
use serde::Serialize;

/// Everything a renderer needs to describe one drift comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriftReport {
    /// Describes the reference window, e.g. `t < 300`
    pub reference_label: String,
    /// Describes the current window, e.g. `t ≥ 300`
    pub current_label: String,
    pub effect_threshold: f64,
    #[serde(flatten)]
    pub comparison: DriftComparison,
}

impl DriftReport {
    /// Report for a `timestamp < cutover` comparison
    pub fn for_cutover(comparison: DriftComparison, config: &DriftConfig) -> Self {
        Self {
            reference_label: format!("t < {}", config.cutover),
            current_label: format!("t ≥ {}", config.cutover),
            effect_threshold: config.effect_threshold,
            comparison,
        }
    }
}

/// Output format of a rendered drift report
pub trait ReportRenderer {
    fn render(&self, report: &DriftReport) -> anyhow::Result<String>;
}

/// Plain-text report for terminal output
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReport;

impl ReportRenderer for TextReport {
    fn render(&self, report: &DriftReport) -> anyhow::Result<String> {
        let comparison = &report.comparison;
        let mut text = format!(
            "Reference window: {} | Current window: {}\n",
            report.reference_label, report.current_label
        );

        if comparison.decision.flagged {
            text.push_str("❌ DRIFT DETECTED\n\n");
        } else {
            text.push_str("✅ NO DRIFT DETECTED\n\n");
        }
        text.push_str(&format!(
            "Cohen's d (effect size): {:.3}\n",
            comparison.decision.effect_size
        ));
        text.push_str(&format!(
            "Rule: drift if |d| >= {} (medium shift at 0.5)\n",
            report.effect_threshold
        ));

        for (label, summary) in [
            ("reference", &comparison.reference),
            ("current", &comparison.current),
        ] {
            if summary.is_insufficient() {
                text.push_str(&format!(
                    "⚠️  INSUFFICIENT DATA in {} window ({} observations)\n",
                    label, summary.count
                ));
            }
        }

        text.push_str(&format!("\n{:<6} {:>12} {:>12}\n", "", "reference", "current"));
        for ((name, reference), (_, current)) in comparison
            .reference
            .rows()
            .iter()
            .zip(comparison.current.rows().iter())
        {
            text.push_str(&format!("{:<6} {:>12.4} {:>12.4}\n", name, reference, current));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drift::compare_values;

    #[test]
    fn test_labels_from_cutover() {
        let config = DriftConfig {
            cutover: 120,
            ..DriftConfig::default()
        };
        let report = DriftReport::for_cutover(compare_values(&[1.0, 2.0], &[3.0, 4.0], 0.5), &config);
        assert_eq!(report.reference_label, "t < 120");
        assert_eq!(report.current_label, "t ≥ 120");
    }

    #[test]
    fn test_text_report() {
        let report = DriftReport::for_cutover(
            compare_values(&[1.0, 2.0, 3.0], &[11.0, 12.0, 13.0], 0.5),
            &DriftConfig::default(),
        );
        let text = TextReport.render(&report).unwrap();
        assert!(text.contains("Reference window: t < 300"));
        assert!(text.contains("❌ DRIFT DETECTED"));
        assert!(text.contains("10.000"));
    }

    #[test]
    fn test_text_report_mentions_insufficient_window() {
        let report = DriftReport::for_cutover(
            compare_values(&[1.0, 2.0, 3.0], &[4.0], 0.5),
            &DriftConfig::default(),
        );
        let text = TextReport.render(&report).unwrap();

        assert!(text.contains("NO DRIFT DETECTED"));
        assert!(text.contains("INSUFFICIENT DATA in current window (1 observations)"));
        assert!(text.contains("p50"));
    }

    #[test]
    fn test_text_report_uses_report_threshold() {
        let config = DriftConfig {
            effect_threshold: 0.8,
            ..DriftConfig::default()
        };
        let report = DriftReport::for_cutover(compare_values(&[0.0, 1.0], &[0.5, 1.5], 0.8), &config);
        let text = TextReport.render(&report).unwrap();
        assert!(text.contains("drift if |d| >= 0.8"));
    }
}
