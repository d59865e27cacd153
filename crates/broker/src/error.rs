//! Broker error types
//!
//! The broker has exactly one failure mode: a blocking wait that was
//! cancelled before a value arrived. `publish` and `poll` never fail.

use thiserror::Error;

/// Broker errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BrokerError {
    /// A blocking wait was cancelled before a value became available
    #[error("blocking wait cancelled")]
    Cancelled,
}

/// Result type for broker operations
pub type Result<T> = std::result::Result<T, BrokerError>;
