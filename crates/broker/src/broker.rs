//! Broker - mutex-guarded FIFO with publish wakeups
//!
//! The queue is the single shared mutable resource between the producer
//! side and an arbitrary number of consumers. Critical sections never
//! hold the lock across an await point.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::config::{BrokerConfig, OverflowPolicy};
use crate::error::{BrokerError, Result};
use crate::metrics::BrokerMetrics;
use crate::topic::Topic;

/// What happened to a published value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The value was appended to the queue
    Enqueued,

    /// The value was appended after evicting the oldest queued value
    DroppedOldest,

    /// The value was discarded because the queue was full
    DroppedNewest,
}

/// Single-topic decoupling queue between producers and consumers
///
/// # Design
///
/// - `publish` enqueues and wakes one waiting consumer. With the default
///   unbounded capacity it completes immediately; a bounded queue applies
///   the configured [`OverflowPolicy`].
/// - `poll` is non-blocking and returns the oldest pending value.
/// - `consume` suspends until a value is available or the wait is
///   cancelled. It is the only suspension point inside the broker.
/// - Delivery is strictly one-shot: once any caller receives a value, no
///   other caller ever sees it.
///
/// # Example
///
/// ```
/// use thermo_broker::{Broker, BrokerConfig, Topic};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let broker = Broker::new(Topic::new("temperature"), BrokerConfig::default());
/// broker.publish(21.5).await;
/// assert_eq!(broker.poll(), Some(21.5));
/// assert_eq!(broker.poll(), None);
/// # }
/// ```
pub struct Broker {
    /// Topic carried by this broker instance
    topic: Topic,

    /// Pending values, oldest at the front
    queue: Mutex<VecDeque<f64>>,

    /// Signalled once per value that enters the queue
    data_available: Notify,

    /// Signalled once per value that leaves the queue (for blocked publishers)
    space_available: Notify,

    /// Capacity and overflow policy
    config: BrokerConfig,

    /// Publish/consume counters
    metrics: BrokerMetrics,
}

impl Broker {
    /// Create a new broker for the given topic
    pub fn new(topic: Topic, config: BrokerConfig) -> Self {
        tracing::info!(
            topic = %topic,
            capacity = ?config.capacity,
            overflow = ?config.overflow,
            "broker created"
        );

        Self {
            topic,
            queue: Mutex::new(VecDeque::new()),
            data_available: Notify::new(),
            space_available: Notify::new(),
            config,
            metrics: BrokerMetrics::new(),
        }
    }

    /// Get the topic carried by this broker
    #[inline]
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Get the broker metrics
    #[inline]
    pub fn metrics(&self) -> &BrokerMetrics {
        &self.metrics
    }

    /// Publish a value to the queue
    ///
    /// Never fails. With the default unbounded capacity this completes
    /// immediately. On a full bounded queue the outcome depends on the
    /// overflow policy: the drop policies resolve immediately, `Block`
    /// suspends until a consumer frees space.
    pub async fn publish(&self, value: f64) -> PublishOutcome {
        loop {
            let space = self.space_available.notified();
            tokio::pin!(space);
            // Register for a space wakeup before checking, so a consumer
            // freeing space between the check and the await is not missed.
            space.as_mut().enable();

            match self.try_enqueue(value) {
                Some(outcome) => {
                    if outcome != PublishOutcome::DroppedNewest {
                        self.data_available.notify_one();
                    }
                    return outcome;
                }
                // Full queue with OverflowPolicy::Block
                None => space.await,
            }
        }
    }

    /// Remove and return the oldest pending value without blocking
    pub fn poll(&self) -> Option<f64> {
        let value = self.queue.lock().pop_front();
        if value.is_some() {
            self.metrics.record_consumed();
            self.space_available.notify_one();
        }
        value
    }

    /// Wait for the oldest pending value, suspending until one exists
    ///
    /// Resumes exactly once a value becomes available or the token is
    /// cancelled, in which case this fails with [`BrokerError::Cancelled`]
    /// rather than returning a value.
    pub async fn consume(&self, cancel: &CancellationToken) -> Result<f64> {
        loop {
            let notified = self.data_available.notified();
            tokio::pin!(notified);
            // Register before checking the queue to avoid a lost wakeup
            // when a publish lands between the poll and the await.
            notified.as_mut().enable();

            if let Some(value) = self.poll() {
                return Ok(value);
            }

            tokio::select! {
                _ = &mut notified => {}
                _ = cancel.cancelled() => return Err(BrokerError::Cancelled),
            }
        }
    }

    /// Wait until the queue is non-empty
    ///
    /// Serves polled consumption: the caller suspends here instead of
    /// re-checking `has_data` in a hot loop. Readiness is advisory - a
    /// subsequent `poll` may still race with another consumer.
    pub async fn wait_ready(&self, cancel: &CancellationToken) -> Result<()> {
        loop {
            let notified = self.data_available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.has_data() {
                return Ok(());
            }

            tokio::select! {
                _ = &mut notified => {}
                _ = cancel.cancelled() => return Err(BrokerError::Cancelled),
            }
        }
    }

    /// Whether at least one value is queued at the instant of the call
    ///
    /// Advisory only: another consumer may drain the queue between this
    /// check and a subsequent `poll`.
    #[inline]
    pub fn has_data(&self) -> bool {
        !self.queue.lock().is_empty()
    }

    /// Number of values currently queued
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    /// Whether the queue is currently empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Try to append a value, applying the overflow policy
    ///
    /// Returns `None` when the queue is full and the policy is `Block`,
    /// meaning the caller must wait for space and retry.
    fn try_enqueue(&self, value: f64) -> Option<PublishOutcome> {
        let mut queue = self.queue.lock();

        let outcome = match self.config.capacity {
            Some(limit) if queue.len() >= limit => match self.config.overflow {
                OverflowPolicy::Block => return None,
                OverflowPolicy::DropOldest => {
                    queue.pop_front();
                    queue.push_back(value);
                    self.metrics.record_dropped_oldest();
                    self.metrics.record_published();
                    PublishOutcome::DroppedOldest
                }
                OverflowPolicy::DropNewest => {
                    self.metrics.record_dropped_newest();
                    PublishOutcome::DroppedNewest
                }
            },
            _ => {
                queue.push_back(value);
                self.metrics.record_published();
                PublishOutcome::Enqueued
            }
        };

        if outcome != PublishOutcome::Enqueued {
            tracing::trace!(topic = %self.topic, ?outcome, "queue full");
        }

        Some(outcome)
    }
}

impl std::fmt::Debug for Broker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broker")
            .field("topic", &self.topic)
            .field("depth", &self.len())
            .field("capacity", &self.config.capacity)
            .finish()
    }
}
