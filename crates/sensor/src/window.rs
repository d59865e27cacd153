//! Aggregate windows
//!
//! A window is a fixed-duration bucket of readings that reduces to a
//! single mean value when its duration elapses. Window boundaries are
//! wall-clock; readings are ephemeral and not retained past aggregation.

use std::time::Duration;

use tokio::time::Instant;

/// A time-bounded, ordered collection of readings
///
/// Accepts readings stamped strictly inside `[start, start + duration)`
/// and reduces to their arithmetic mean. An empty window aggregates to
/// `0.0` - a documented fallback, not an error.
#[derive(Debug)]
pub struct AggregateWindow {
    start: Instant,
    duration: Duration,
    readings: Vec<f64>,
}

impl AggregateWindow {
    /// Open a window starting at the given instant
    pub fn open(start: Instant, duration: Duration) -> Self {
        Self {
            start,
            duration,
            readings: Vec::new(),
        }
    }

    /// The instant at which this window closes
    #[inline]
    pub fn end(&self) -> Instant {
        self.start + self.duration
    }

    /// Record a reading taken at `at`
    ///
    /// Returns whether the reading fell inside the window and was kept.
    /// Readings at or past the window end belong to a later window and
    /// are rejected.
    pub fn record(&mut self, at: Instant, value: f64) -> bool {
        if at < self.start || at >= self.end() {
            return false;
        }
        self.readings.push(value);
        true
    }

    /// Number of readings recorded so far
    #[inline]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether no readings have been recorded
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Reduce the window to the arithmetic mean of its readings
    ///
    /// An empty window yields `0.0`.
    pub fn aggregate(&self) -> f64 {
        if self.readings.is_empty() {
            return 0.0;
        }
        self.readings.iter().sum::<f64>() / self.readings.len() as f64
    }
}
