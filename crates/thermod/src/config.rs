//! Daemon configuration
//!
//! TOML-based configuration with sensible defaults - an empty file (or
//! no file at all) runs the standard temperature pipeline.
//!
//! # Example
//!
//! ```toml
//! [sensor]
//! seed = 42
//! window_secs = 2
//!
//! [broker]
//! capacity = 1024
//! overflow = "drop_oldest"
//!
//! [server]
//! port = 8080
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use thermo_broker::BrokerConfig;
use thermo_sensor::SensorConfig;
use thermo_stream::StreamServerConfig;

/// Aggregated daemon configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sensor: SensorConfig,
    pub broker: BrokerConfig,
    pub server: StreamServerConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// A missing file is not an error: the defaults run a complete
    /// pipeline, so the daemon just logs the fallback and continues.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)?;
        let config = Self::from_str(&raw)?;

        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}

impl FromStr for Config {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}
