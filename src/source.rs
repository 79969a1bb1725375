//! Seedable synthetic observation source
//!
//! Produces a reproducible stream with Gaussian noise around a baseline
//! level, a sustained mean shift from `drift_at` onwards, and large additive
//! spikes at chosen timestamps. Same config, same seed, same stream.
//!
//! Sources emit raw readings; validation into `Observation`s happens where
//! the readings are consumed.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Raw `(timestamp, value)` pair, not yet validated
pub type Reading = (i64, f64);

/// Synthetic stream parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Number of observations (default: 600)
    pub n: usize,
    /// RNG seed (default: 42)
    pub seed: u64,
    /// First timestamp of the shifted regime (default: 350)
    pub drift_at: i64,
    /// Timestamps receiving an additive spike
    pub spike_points: Vec<i64>,
    /// Noise standard deviation in both regimes (default: 1.0)
    pub base_std: f64,
    /// Mean after `drift_at` (default: 1.5; before it the mean is 0.0)
    pub shifted_mean: f64,
    /// Spike size distribution (default: N(7.0, 0.5))
    pub spike_mean: f64,
    pub spike_std: f64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            n: 600,
            seed: 42,
            drift_at: 350,
            spike_points: vec![120, 260, 420, 510],
            base_std: 1.0,
            shifted_mean: 1.5,
            spike_mean: 7.0,
            spike_std: 0.5,
        }
    }
}

impl SourceConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [("base_std", self.base_std), ("spike_std", self.spike_std)] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "{} must be a non-negative finite number, got {}",
                    name, value
                ));
            }
        }

        for (name, value) in [
            ("shifted_mean", self.shifted_mean),
            ("spike_mean", self.spike_mean),
        ] {
            if !value.is_finite() {
                return Err(format!("{} must be finite, got {}", name, value));
            }
        }

        Ok(())
    }
}

/// Iterator over synthetic readings `t = 0..n`
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    config: SourceConfig,
    rng: StdRng,
    baseline: Normal<f64>,
    shifted: Normal<f64>,
    spike: Normal<f64>,
    next_t: i64,
}

impl SyntheticSource {
    pub fn new(config: SourceConfig) -> Result<Self, String> {
        config.validate()?;

        let normal = |mean: f64, std: f64| {
            Normal::new(mean, std).map_err(|e| format!("invalid normal({}, {}): {}", mean, std, e))
        };

        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            baseline: normal(0.0, config.base_std)?,
            shifted: normal(config.shifted_mean, config.base_std)?,
            spike: normal(config.spike_mean, config.spike_std)?,
            next_t: 0,
            config,
        })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
}

impl Iterator for SyntheticSource {
    type Item = Reading;

    fn next(&mut self) -> Option<Reading> {
        let t = self.next_t;
        if t as usize >= self.config.n {
            return None;
        }
        self.next_t += 1;

        let regime = if t < self.config.drift_at {
            &self.baseline
        } else {
            &self.shifted
        };
        let mut value = regime.sample(&mut self.rng);

        if self.config.spike_points.contains(&t) {
            value += self.spike.sample(&mut self.rng);
        }

        Some((t, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.config.n.saturating_sub(self.next_t as usize);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SyntheticSource {}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(n: usize, seed: u64) -> SyntheticSource {
        SyntheticSource::new(SourceConfig {
            n,
            seed,
            ..SourceConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_stream_length_and_timestamps() {
        let events: Vec<_> = source(50, 1).collect();
        assert_eq!(events.len(), 50);
        assert_eq!(events[0].0, 0);
        assert_eq!(events[49].0, 49);
        assert!(events.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_same_seed_same_stream() {
        let a: Vec<_> = source(100, 9).collect();
        let b: Vec<_> = source(100, 9).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_stream() {
        let a: Vec<_> = source(100, 9).collect();
        let b: Vec<_> = source(100, 10).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_values_are_finite() {
        assert!(source(600, 42).all(|(_, value)| value.is_finite()));
    }

    #[test]
    fn test_spikes_dominate_noise() {
        let config = SourceConfig {
            base_std: 0.0,
            spike_std: 0.0,
            ..SourceConfig::default()
        };
        let events: Vec<_> = SyntheticSource::new(config).unwrap().collect();

        assert_eq!(events[0].1, 0.0);
        assert_eq!(events[120].1, 7.0);
        assert_eq!(events[349].1, 0.0);
        assert_eq!(events[350].1, 1.5);
        assert_eq!(events[420].1, 8.5);
    }

    #[test]
    fn test_size_hint() {
        let mut src = source(10, 0);
        assert_eq!(src.len(), 10);
        src.next();
        assert_eq!(src.len(), 9);
    }

    #[test]
    fn test_invalid_config() {
        let config = SourceConfig {
            base_std: -1.0,
            ..SourceConfig::default()
        };
        assert!(SyntheticSource::new(config).is_err());
    }
}
