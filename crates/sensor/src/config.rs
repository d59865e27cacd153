//! Sensor configuration
//!
//! Construction-time values for the generator: random seed, reading
//! range, window duration, and sampling cadence.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the sensor generator
///
/// All fields have defaults matching a plausible outdoor temperature
/// sensor; an empty `[sensor]` section just works.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Seed for the pseudo-random source
    /// A fixed seed makes the reading sequence reproducible across runs.
    /// Default: 42
    pub seed: u64,

    /// Lower bound of the reading range (inclusive)
    /// Default: -25.0
    pub min_value: f64,

    /// Upper bound of the reading range (inclusive)
    /// Default: 120.0
    pub max_value: f64,

    /// Aggregation window duration in seconds
    /// Default: 2
    pub window_secs: u64,

    /// Interval between readings in milliseconds
    /// Default: 50
    pub sample_interval_ms: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            min_value: -25.0,
            max_value: 120.0,
            window_secs: 2,
            sample_interval_ms: 50,
        }
    }
}

impl SensorConfig {
    /// Window duration as a `Duration`
    #[inline]
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Sampling interval as a `Duration`
    #[inline]
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SensorConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.min_value, -25.0);
        assert_eq!(config.max_value, 120.0);
        assert_eq!(config.window(), Duration::from_secs(2));
        assert_eq!(config.sample_interval(), Duration::from_millis(50));
    }
}
