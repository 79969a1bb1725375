//! JSON output formats
//!
//! Machine-readable counterpart of the HTML report (the window labels, the
//! threshold, both window summaries and the decision) plus the stream run
//! summary.

use crate::pipeline::StreamSummary;
use crate::report::{DriftReport, ReportRenderer};
use anyhow::Context;
use serde::Serialize;

/// JSON drift report renderer
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDriftReport {
    pub pretty: bool,
}

impl ReportRenderer for JsonDriftReport {
    fn render(&self, report: &DriftReport) -> anyhow::Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        json.context("Failed to serialize drift report")
    }
}

/// Stream run summary, printed to stdout by `streamguard stream`
#[derive(Debug, Clone, Serialize)]
pub struct JsonStreamSummary<'a> {
    pub alerts_csv: &'a str,
    #[serde(flatten)]
    pub summary: &'a StreamSummary,
}

impl JsonStreamSummary<'_> {
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize stream summary")
    }
}
