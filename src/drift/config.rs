// Configuration for windowed drift detection

use serde::{Deserialize, Serialize};

/// Configuration for drift comparison
///
/// # Example
/// ```
/// use streamguard::drift::DriftConfig;
///
/// let config = DriftConfig::default();
/// assert_eq!(config.effect_threshold, 0.5); // medium effect
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// |d| at or above which drift is flagged
    ///
    /// - 0.2: small shift
    /// - 0.5 (default): medium shift
    /// - 0.8: large shift
    pub effect_threshold: f64,

    /// Timestamp splitting the stream: `t < cutover` is the reference window,
    /// everything else the current window
    pub cutover: i64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            effect_threshold: 0.5,
            cutover: 300,
        }
    }
}

impl DriftConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.effect_threshold.is_finite() || self.effect_threshold < 0.0 {
            return Err(format!(
                "effect_threshold must be a non-negative finite number, got {}",
                self.effect_threshold
            ));
        }
        Ok(())
    }
}
