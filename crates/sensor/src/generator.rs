//! Sensor generator
//!
//! Draws uniformly distributed readings from a seeded pseudo-random
//! source and reduces them window by window. One call to
//! `next_aggregate` spans exactly one window.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::{Instant, MissedTickBehavior, interval};

use crate::config::SensorConfig;
use crate::window::AggregateWindow;

/// Seeded generator of windowed sensor aggregates
///
/// The sequence is lazy and infinite: each `next_aggregate` call opens
/// the next window, samples readings at the configured cadence until the
/// window closes, and returns the window mean. Two generators built from
/// the same configuration produce identical sequences.
///
/// # Example
///
/// ```no_run
/// use thermo_sensor::{SensorConfig, SensorGenerator};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut generator = SensorGenerator::new(SensorConfig::default());
/// let aggregate = generator.next_aggregate().await;
/// assert!((-25.0..=120.0).contains(&aggregate));
/// # }
/// ```
pub struct SensorGenerator {
    config: SensorConfig,
    rng: StdRng,
}

impl SensorGenerator {
    /// Create a generator from the given configuration
    pub fn new(config: SensorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Get the generator configuration
    #[inline]
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Produce the aggregate for the next window
    ///
    /// Opens a window at the current instant, samples one reading per
    /// `sample_interval` while the window is open, and returns the mean
    /// once the window duration elapses. A window that closes with zero
    /// readings yields `0.0`.
    pub async fn next_aggregate(&mut self) -> f64 {
        let mut window = AggregateWindow::open(Instant::now(), self.config.window());

        let close = tokio::time::sleep_until(window.end());
        tokio::pin!(close);

        let mut ticks = interval(self.config.sample_interval());
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut close => break,
                at = ticks.tick() => {
                    // A tick landing on the close instant belongs to the
                    // next window; drawing for it would desync the seeded
                    // sequence across runs.
                    if at >= window.end() {
                        break;
                    }
                    let reading = self.sample();
                    window.record(at, reading);
                }
            }
        }

        let aggregate = window.aggregate();
        tracing::trace!(
            readings = window.len(),
            aggregate,
            "window closed"
        );
        aggregate
    }

    /// Draw one reading uniformly from `[min_value, max_value]`
    fn sample(&mut self) -> f64 {
        self.rng
            .random_range(self.config.min_value..=self.config.max_value)
    }
}
