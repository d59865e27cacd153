//! Broker configuration
//!
//! Capacity and overflow behavior are explicit, testable configuration
//! rather than an implicit default.

use serde::Deserialize;

/// What to do with a publish when a bounded queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Suspend the publisher until a consumer frees space
    Block,

    /// Evict the oldest queued value to make room for the new one
    DropOldest,

    /// Discard the incoming value, keeping the queue unchanged
    DropNewest,
}

/// Broker queue configuration
///
/// All fields have defaults - an empty `[broker]` section gives an
/// unbounded queue, matching the contract that `publish` never waits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Maximum number of queued values
    /// Default: None (unbounded)
    pub capacity: Option<usize>,

    /// Overflow behavior when the queue is full
    /// Only consulted for bounded queues.
    /// Default: drop_oldest (keeps the freshest telemetry flowing)
    pub overflow: OverflowPolicy,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            capacity: None,
            overflow: OverflowPolicy::DropOldest,
        }
    }
}

impl BrokerConfig {
    /// Create a bounded configuration with the given capacity and policy
    pub fn bounded(capacity: usize, overflow: OverflowPolicy) -> Self {
        Self {
            capacity: Some(capacity),
            overflow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded() {
        let config = BrokerConfig::default();
        assert_eq!(config.capacity, None);
        assert_eq!(config.overflow, OverflowPolicy::DropOldest);
    }

    #[test]
    fn test_bounded_constructor() {
        let config = BrokerConfig::bounded(16, OverflowPolicy::Block);
        assert_eq!(config.capacity, Some(16));
        assert_eq!(config.overflow, OverflowPolicy::Block);
    }
}
