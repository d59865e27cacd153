//! Reader configuration

use std::time::Duration;

use serde::Deserialize;

/// Configuration shared by all reader strategies
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Maximum number of events to collect; later events are discarded
    /// Default: 10
    pub max_events: usize,

    /// Wall-clock budget for the whole read in seconds
    /// Default: 10
    pub read_timeout_secs: u64,

    /// Separator used to join collected events into the summary
    /// Default: ", "
    pub delimiter: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_events: 10,
            read_timeout_secs: 10,
            delimiter: ", ".into(),
        }
    }
}

impl ReaderConfig {
    /// Read budget as a `Duration`
    #[inline]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}
