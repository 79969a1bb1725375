//! StreamGuard - online anomaly scoring and windowed drift detection
//!
//! The statistical core answers two questions about a scalar stream:
//! whether each new observation is anomalous relative to everything seen
//! before it (`anomaly`, built on the Welford tracker in `moments`), and
//! whether the distribution shifted between a reference and a current window
//! (`drift`). The remaining modules are collaborators around that core: a
//! seeded synthetic source, the alerts table, report renderers and the CLI.

pub mod anomaly;
pub mod cli;
pub mod config;
pub mod csv_output;
pub mod drift;
pub mod html_output;
pub mod json_output;
pub mod moments;
pub mod observation;
pub mod pipeline;
pub mod report;
pub mod source;
