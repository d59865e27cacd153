//! Stream server configuration

use serde::Deserialize;

use thermo_client::ReaderConfig;

/// Configuration for the stream endpoint
///
/// All fields have defaults - an empty `[server]` section serves on
/// 0.0.0.0:8080 with the standard reader limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamServerConfig {
    /// Address to bind to
    /// Default: "0.0.0.0"
    pub bind_address: String,

    /// Port to listen on (0 picks an ephemeral port)
    /// Default: 8080
    pub port: u16,

    /// Limits for the readback endpoints' own stream reads
    pub reader: ReaderConfig,
}

impl Default for StreamServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".into(),
            port: 8080,
            reader: ReaderConfig::default(),
        }
    }
}

impl StreamServerConfig {
    /// Full bind address as `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
