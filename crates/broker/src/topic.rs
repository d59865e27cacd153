//! Topic identification
//!
//! `Topic` names the logical channel a broker carries. This design is
//! single-topic: one broker instance, one topic.

use std::fmt;

/// Name of the logical channel carried by a broker
///
/// # Example
///
/// ```
/// use thermo_broker::Topic;
///
/// let topic = Topic::new("temperature");
/// assert_eq!(topic.as_str(), "temperature");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    /// Create a new topic
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the topic name as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Topic {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Topic {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
