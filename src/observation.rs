//! Observations entering a scalar stream
//!
//! Every value is validated here, before it can reach a `MomentTracker`.
//! A single NaN folded into Welford's update poisons the running mean for
//! the rest of the stream, so non-finite input is rejected at construction.

use serde::Serialize;
use thiserror::Error;

/// Rejection reasons for a single observation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidObservation {
    #[error("observation value is missing")]
    Missing,

    #[error("observation value is not numeric: {0:?}")]
    NotNumeric(String),

    #[error("observation value is not finite: {0}")]
    NonFinite(f64),
}

/// A single timestamped scalar observation
///
/// Only constructible through `new`/`parse`, so `value` is always finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    /// Logical time, non-decreasing within one stream
    timestamp: i64,
    value: f64,
}

impl Observation {
    /// Create an observation, rejecting NaN and ±Infinity
    pub fn new(timestamp: i64, value: f64) -> Result<Self, InvalidObservation> {
        Ok(Self {
            timestamp,
            value: validate_value(value)?,
        })
    }

    /// Parse an observation value from raw text (e.g. a CSV field)
    pub fn parse(timestamp: i64, raw: &str) -> Result<Self, InvalidObservation> {
        Self::new(timestamp, parse_value(raw)?)
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl TryFrom<(i64, f64)> for Observation {
    type Error = InvalidObservation;

    fn try_from((timestamp, value): (i64, f64)) -> Result<Self, Self::Error> {
        Self::new(timestamp, value)
    }
}

/// Check that a value may be folded into running statistics
pub fn validate_value(value: f64) -> Result<f64, InvalidObservation> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InvalidObservation::NonFinite(value))
    }
}

/// Parse and validate a raw value field
///
/// Empty fields are `Missing`; text that is not a float is `NotNumeric`;
/// `NaN`/`inf` spellings parse as floats and are then rejected as `NonFinite`.
pub fn parse_value(raw: &str) -> Result<f64, InvalidObservation> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidObservation::Missing);
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| InvalidObservation::NotNumeric(trimmed.to_string()))?;

    validate_value(value)
}
