//! Stream server error types
//!
//! Only server-level failures live here. Session-level failures are
//! terminal for their session alone and never propagate.

use thiserror::Error;

/// Stream server errors
#[derive(Debug, Error)]
pub enum StreamError {
    /// Could not bind the listen address
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP server failed while running
    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Result type for stream server operations
pub type Result<T> = std::result::Result<T, StreamError>;
