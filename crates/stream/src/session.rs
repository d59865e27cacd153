//! Stream session lifecycle
//!
//! One `StreamSession` per SSE connection. Sessions move through
//! `Connected → Streaming → {Completed | Error}`; terminal states are
//! sticky and a session is never resumed. A session dropped before
//! reaching a terminal state was cut off by the transport (client
//! disconnect or send failure) and is recorded as an error.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for generating unique session IDs
static SESSION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// How events are pulled from the broker for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStrategy {
    /// Suspend on `Broker::consume` until each value arrives
    BlockingPull,

    /// Wait for readiness, then `poll` (may race with other consumers)
    Polled,
}

impl DeliveryStrategy {
    /// Short name for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStrategy::BlockingPull => "blocking_pull",
            DeliveryStrategy::Polled => "polled",
        }
    }
}

impl fmt::Display for DeliveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connection accepted, nothing sent yet
    Connected,

    /// At least one event delivered
    Streaming,

    /// Stream ended normally
    Completed,

    /// Transport failure or cancelled wait ended the session
    Error,
}

/// One push-delivery connection from the endpoint to one client
pub struct StreamSession {
    id: u64,
    strategy: DeliveryStrategy,
    state: SessionState,
}

impl StreamSession {
    /// Open a session in the `Connected` state
    pub fn new(strategy: DeliveryStrategy) -> Self {
        let id = SESSION_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(session = id, strategy = %strategy, "stream session connected");
        Self {
            id,
            strategy,
            state: SessionState::Connected,
        }
    }

    /// Get the session ID
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the current state
    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the session reached a terminal state
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, SessionState::Completed | SessionState::Error)
    }

    /// Mark the first delivery: `Connected → Streaming`
    ///
    /// Idempotent while streaming; rejected from terminal states.
    pub fn streaming(&mut self) -> bool {
        match self.state {
            SessionState::Connected | SessionState::Streaming => {
                self.state = SessionState::Streaming;
                true
            }
            _ => false,
        }
    }

    /// Mark a normal end of stream: `{Connected, Streaming} → Completed`
    pub fn complete(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.state = SessionState::Completed;
        tracing::debug!(session = self.id, strategy = %self.strategy, "stream session completed");
        true
    }

    /// Mark a terminal failure: `{Connected, Streaming} → Error`
    pub fn fail(&mut self, reason: &str) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.state = SessionState::Error;
        tracing::debug!(
            session = self.id,
            strategy = %self.strategy,
            reason,
            "stream session failed"
        );
        true
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        // Dropped mid-stream means the transport went away under us
        if !self.is_terminal() {
            self.fail("transport closed");
        }
    }
}

impl fmt::Debug for StreamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSession")
            .field("id", &self.id)
            .field("strategy", &self.strategy)
            .field("state", &self.state)
            .finish()
    }
}
