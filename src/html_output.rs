//! HTML output for drift reports and stream plots
//!
//! Self-contained pages with embedded CSS; the stream plot is an inline SVG
//! scatter so the file opens without any scripts or network access.

use crate::csv_output::AlertRow;
use crate::drift::WindowSummary;
use crate::report::{DriftReport, ReportRenderer};

/// Escape HTML special characters to prevent XSS
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Generate embedded CSS styles
fn generate_styles() -> &'static str {
    r#"
        body {
            font-family: Arial, sans-serif;
            margin: 24px;
        }
        .card {
            border: 1px solid #ddd;
            border-radius: 12px;
            padding: 16px;
            margin-bottom: 16px;
        }
        table {
            border-collapse: collapse;
            width: 100%;
        }
        th, td {
            border: 1px solid #eee;
            padding: 8px;
            text-align: right;
        }
        th {
            background: #fafafa;
        }
        td.label {
            text-align: left;
        }
        .flag-yes {
            color: #b00020;
            font-weight: bold;
        }
        .flag-no {
            color: #0a7a0a;
            font-weight: bold;
        }
        .note {
            color: #666;
        }
        .warning {
            color: #a15c00;
        }
        .mono {
            font-family: ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, monospace;
        }
        "#
}

/// Shared document prologue
fn open_document(html: &mut String, title: &str) {
    html.push_str("<!DOCTYPE html>\n");
    html.push_str("<html lang=\"en\">\n");
    html.push_str("<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(&format!("    <title>{}</title>\n", escape_html(title)));
    html.push_str("    <style>");
    html.push_str(generate_styles());
    html.push_str("</style>\n");
    html.push_str("</head>\n");
    html.push_str("<body>\n");
}

fn close_document(html: &mut String) {
    html.push_str("</body>\n");
    html.push_str("</html>\n");
}

/// HTML drift report renderer
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlDriftReport;

impl HtmlDriftReport {
    /// Summary statistics table, one row per field
    fn render_summary_table(reference: &WindowSummary, current: &WindowSummary) -> String {
        let mut html = String::new();

        html.push_str("    <table>\n");
        html.push_str("        <thead><tr><th></th><th>Reference</th><th>Current</th></tr></thead>\n");
        html.push_str("        <tbody>\n");

        for ((name, reference), (_, current)) in reference.rows().iter().zip(current.rows().iter()) {
            html.push_str(&format!(
                "        <tr><td class=\"label\">{}</td><td>{:.4}</td><td>{:.4}</td></tr>\n",
                name, reference, current
            ));
        }

        html.push_str("        </tbody>\n");
        html.push_str("    </table>\n");
        html
    }

    /// Warn about windows too small for an effect size
    fn render_insufficient_notes(report: &DriftReport) -> String {
        let mut html = String::new();
        let windows = [
            (&report.reference_label, &report.comparison.reference),
            (&report.current_label, &report.comparison.current),
        ];

        for (label, summary) in windows {
            if summary.is_insufficient() {
                html.push_str(&format!(
                    "    <p class=\"warning\">Not enough data in window {} ({} observations); effect size not estimated.</p>\n",
                    escape_html(label),
                    summary.count
                ));
            }
        }
        html
    }
}

impl ReportRenderer for HtmlDriftReport {
    fn render(&self, report: &DriftReport) -> anyhow::Result<String> {
        let decision = &report.comparison.decision;
        let mut html = String::new();

        open_document(&mut html, "streamguard drift report");

        html.push_str("    <h1>StreamGuard Drift Report</h1>\n");
        html.push_str(&format!(
            "    <p class=\"mono\">Reference window: {} | Current window: {}</p>\n",
            escape_html(&report.reference_label),
            escape_html(&report.current_label)
        ));

        html.push_str("    <div class=\"card\">\n");
        html.push_str("    <h2>Drift decision</h2>\n");
        html.push_str(&format!(
            "    <p>Cohen's d (effect size): <span class=\"mono\">{:.3}</span></p>\n",
            decision.effect_size
        ));
        let (class, verdict) = if decision.flagged {
            ("flag-yes", "TRUE")
        } else {
            ("flag-no", "FALSE")
        };
        html.push_str(&format!(
            "    <p>Drift detected: <span class=\"{}\">{}</span></p>\n",
            class, verdict
        ));
        html.push_str(&format!(
            "    <p class=\"note\">Rule: drift if |d| &ge; {} (0.5 is a medium shift). This is a simple, explainable baseline.</p>\n",
            report.effect_threshold
        ));
        html.push_str(&Self::render_insufficient_notes(report));
        html.push_str("    </div>\n");

        html.push_str("    <div class=\"card\">\n");
        html.push_str("    <h2>Summary stats (value)</h2>\n");
        html.push_str(&Self::render_summary_table(
            &report.comparison.reference,
            &report.comparison.current,
        ));
        html.push_str("    </div>\n");

        html.push_str("    <div class=\"card\">\n");
        html.push_str("    <h2>What this means</h2>\n");
        html.push_str("    <ul>\n");
        html.push_str("        <li><b>Anomaly detection</b> flags unusual points live.</li>\n");
        html.push_str("        <li><b>Drift detection</b> checks whether \"normal\" behavior changed over time.</li>\n");
        html.push_str("        <li>This report compares two windows and shows if the distribution shifted.</li>\n");
        html.push_str("    </ul>\n");
        html.push_str("    </div>\n");

        close_document(&mut html);
        Ok(html)
    }
}

/// Scatter plot of a scored stream with anomalies and the drift marker
#[derive(Debug, Clone, Copy)]
pub struct HtmlStreamPlot {
    /// Timestamp of the dashed "Drift starts" marker
    pub drift_marker: i64,
    pub width: f64,
    pub height: f64,
}

impl Default for HtmlStreamPlot {
    fn default() -> Self {
        Self {
            drift_marker: 300,
            width: 900.0,
            height: 420.0,
        }
    }
}

const MARGIN: f64 = 50.0;

impl HtmlStreamPlot {
    pub fn new(drift_marker: i64) -> Self {
        Self {
            drift_marker,
            ..Self::default()
        }
    }

    /// Generate complete HTML document
    pub fn to_html(&self, rows: &[AlertRow]) -> String {
        let mut html = String::new();

        open_document(&mut html, "streamguard stream plot");
        html.push_str("    <h1>StreamGuard — Online Anomaly Detection</h1>\n");

        if rows.is_empty() {
            html.push_str("    <p class=\"note\">No data: the alerts table has no rows.</p>\n");
        }

        html.push_str(&self.render_svg(rows));
        html.push_str(&format!(
            "    <p class=\"note\">{} points, {} anomalies</p>\n",
            rows.len(),
            rows.iter().filter(|r| r.is_anomaly).count()
        ));

        close_document(&mut html);
        html
    }

    fn render_svg(&self, rows: &[AlertRow]) -> String {
        let mut svg = String::new();
        svg.push_str(&format!(
            "    <svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = self.width,
            h = self.height
        ));

        let (left, right) = (MARGIN, self.width - MARGIN / 2.0);
        let (top, bottom) = (MARGIN / 2.0, self.height - MARGIN);

        // Axes
        svg.push_str(&format!(
            "        <line x1=\"{left}\" y1=\"{bottom}\" x2=\"{right}\" y2=\"{bottom}\" stroke=\"#333\"/>\n"
        ));
        svg.push_str(&format!(
            "        <line x1=\"{left}\" y1=\"{top}\" x2=\"{left}\" y2=\"{bottom}\" stroke=\"#333\"/>\n"
        ));
        svg.push_str(&format!(
            "        <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">Time (t)</text>\n",
            (left + right) / 2.0,
            self.height - 10.0
        ));
        svg.push_str(&format!(
            "        <text x=\"15\" y=\"{:.1}\" text-anchor=\"middle\" transform=\"rotate(-90 15 {:.1})\">Value</text>\n",
            (top + bottom) / 2.0,
            (top + bottom) / 2.0
        ));

        if let Some(bounds) = Bounds::of(rows, self.drift_marker) {
            let x = |t: i64| left + bounds.x_frac(t) * (right - left);
            let y = |v: f64| bottom - bounds.y_frac(v) * (bottom - top);

            let marker_x = x(self.drift_marker);
            svg.push_str(&format!(
                "        <line x1=\"{marker_x:.1}\" y1=\"{top}\" x2=\"{marker_x:.1}\" y2=\"{bottom}\" stroke=\"gray\" stroke-dasharray=\"6 4\"/>\n"
            ));
            svg.push_str(&format!(
                "        <text x=\"{marker_x:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"gray\">Drift starts</text>\n",
                top - 5.0
            ));

            for row in rows.iter().filter(|r| !r.is_anomaly) {
                svg.push_str(&format!(
                    "        <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"2.5\" fill=\"steelblue\"/>\n",
                    x(row.t),
                    y(row.value)
                ));
            }

            for row in rows.iter().filter(|r| r.is_anomaly) {
                let (cx, cy) = (x(row.t), y(row.value));
                svg.push_str(&format!(
                    "        <path d=\"M{:.1} {:.1} L{:.1} {:.1} M{:.1} {:.1} L{:.1} {:.1}\" stroke=\"crimson\" stroke-width=\"2\"><title>t={} value={:.3} score={:.2}</title></path>\n",
                    cx - 4.0, cy - 4.0, cx + 4.0, cy + 4.0,
                    cx - 4.0, cy + 4.0, cx + 4.0, cy - 4.0,
                    row.t, row.value, row.score
                ));
            }
        }

        svg.push_str("    </svg>\n");
        svg
    }
}

/// Data extents mapped onto the unit square
#[derive(Debug, Clone, Copy)]
struct Bounds {
    t_min: i64,
    t_max: i64,
    v_min: f64,
    v_max: f64,
}

impl Bounds {
    /// Extents of the rows, widened to include the drift marker
    fn of(rows: &[AlertRow], marker: i64) -> Option<Self> {
        let first = rows.first()?;
        let mut bounds = Self {
            t_min: first.t.min(marker),
            t_max: first.t.max(marker),
            v_min: first.value,
            v_max: first.value,
        };

        for row in rows {
            bounds.t_min = bounds.t_min.min(row.t);
            bounds.t_max = bounds.t_max.max(row.t);
            bounds.v_min = bounds.v_min.min(row.value);
            bounds.v_max = bounds.v_max.max(row.value);
        }
        Some(bounds)
    }

    /// Distances are taken with `abs_diff` so extreme timestamps cannot overflow
    fn x_frac(&self, t: i64) -> f64 {
        let span = self.t_max.abs_diff(self.t_min) as f64;
        if span == 0.0 {
            0.5
        } else {
            t.abs_diff(self.t_min) as f64 / span
        }
    }

    /// Halved operands keep the span finite across the whole f64 range
    fn y_frac(&self, v: f64) -> f64 {
        let span = self.v_max / 2.0 - self.v_min / 2.0;
        if span == 0.0 {
            0.5
        } else {
            (v / 2.0 - self.v_min / 2.0) / span
        }
    }
}
