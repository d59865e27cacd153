//! Thermo Broker - Single-topic decoupling queue
//!
//! The broker sits between the sensor pipeline (producer side) and the
//! stream endpoint (consumer side) so that consumers never have to deal
//! with the producer's cadence directly.
//!
//! # Architecture
//!
//! ```text
//! [Reporter]                  [Broker]                [Consumers]
//!    publish ──→ VecDeque (FIFO, mutex-guarded) ──→ poll / consume
//!                     │                                   ▲
//!                     └── Notify on publish ──────────────┘
//! ```
//!
//! # Key Design
//!
//! - **FIFO, one-shot delivery**: values leave in the exact order they
//!   entered, and each value is handed to at most one consumer call.
//!   This is a shared work queue, not publish/subscribe fan-out.
//! - **Wakeup, not spin**: `consume` and `wait_ready` suspend on a
//!   `tokio::sync::Notify` and resume only when a value is published.
//! - **Explicit overflow policy**: capacity and the behavior on a full
//!   queue (`Block`, `DropOldest`, `DropNewest`) are configuration, not
//!   an implicit default. The default is an unbounded queue, which grows
//!   without limit under sustained publish with no consumer.
//! - **No global state**: a `Broker` is constructed explicitly and shared
//!   via `Arc` by everything that needs it.

mod broker;
mod config;
mod error;
mod metrics;
mod topic;

pub use broker::{Broker, PublishOutcome};
pub use config::{BrokerConfig, OverflowPolicy};
pub use error::{BrokerError, Result};
pub use metrics::{BrokerMetrics, BrokerSnapshot};
pub use topic::Topic;

#[cfg(test)]
mod broker_test;
