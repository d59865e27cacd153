//! Sensor reporter
//!
//! Redirects aggregates from the generator into the broker so consumers
//! of the latter never touch the generation side directly. The reporter
//! runs in a dedicated task, spawned exactly once at process start; if
//! the forwarding loop ends, the generator stops contributing for the
//! rest of the process lifetime.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use thermo_broker::Broker;

use crate::generator::SensorGenerator;

/// Forwards every generated aggregate to `Broker::publish`
pub struct Reporter {
    generator: SensorGenerator,
    broker: Arc<Broker>,
}

impl Reporter {
    /// Create a reporter wiring the generator into the broker
    pub fn new(generator: SensorGenerator, broker: Arc<Broker>) -> Self {
        Self { generator, broker }
    }

    /// Spawn the forwarding loop
    ///
    /// Runs until the token is cancelled. There are no restart
    /// semantics: the returned handle resolving means telemetry
    /// production has stopped.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    async fn run(mut self, cancel: CancellationToken) {
        tracing::info!(
            topic = %self.broker.topic(),
            window = ?self.generator.config().window(),
            "sensor reporter starting"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                aggregate = self.generator.next_aggregate() => {
                    let outcome = self.broker.publish(aggregate).await;
                    tracing::trace!(value = aggregate, ?outcome, "aggregate forwarded");
                }
            }
        }

        let snapshot = self.broker.metrics().snapshot();
        tracing::info!(
            values_published = snapshot.values_published,
            "sensor reporter stopped"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use thermo_broker::{BrokerConfig, Topic};

    use crate::SensorConfig;

    fn fast_config() -> SensorConfig {
        SensorConfig {
            window_secs: 1,
            sample_interval_ms: 100,
            ..SensorConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reporter_forwards_aggregates_in_order() {
        let broker = Arc::new(Broker::new(
            Topic::new("temperature"),
            BrokerConfig::default(),
        ));
        let cancel = CancellationToken::new();

        let reporter = Reporter::new(SensorGenerator::new(fast_config()), Arc::clone(&broker));
        let handle = reporter.spawn(cancel.clone());

        // Three windows' worth of paused time
        tokio::time::sleep(Duration::from_millis(3_100)).await;

        cancel.cancel();
        handle.await.unwrap();

        // The forwarded sequence matches an identically seeded generator
        let mut expected = SensorGenerator::new(fast_config());
        for _ in 0..3 {
            let want = expected.next_aggregate().await;
            assert_eq!(broker.poll(), Some(want));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_forwarding() {
        let broker = Arc::new(Broker::new(
            Topic::new("temperature"),
            BrokerConfig::default(),
        ));
        let cancel = CancellationToken::new();

        let reporter = Reporter::new(SensorGenerator::new(fast_config()), Arc::clone(&broker));
        let handle = reporter.spawn(cancel.clone());

        cancel.cancel();
        handle.await.unwrap();

        let depth = broker.len();
        tokio::time::sleep(Duration::from_secs(5)).await;

        // No production after shutdown
        assert_eq!(broker.len(), depth);
    }
}
