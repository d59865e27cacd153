//! Client error types
//!
//! Only failures that happen before any event is read surface as
//! errors; transport failures mid-stream end the read early instead.

use thiserror::Error;

/// Reader errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the connection failed
    #[error("request to {url} failed: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("server returned {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Result type for reader operations
pub type Result<T> = std::result::Result<T, ClientError>;
