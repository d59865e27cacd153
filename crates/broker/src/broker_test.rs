//! Broker tests
//!
//! Ordering, one-shot delivery, blocking waits, cancellation, and
//! overflow policies.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::{Broker, BrokerConfig, BrokerError, OverflowPolicy, PublishOutcome, Topic};

fn unbounded_broker() -> Broker {
    Broker::new(Topic::new("temperature"), BrokerConfig::default())
}

fn bounded_broker(capacity: usize, overflow: OverflowPolicy) -> Broker {
    Broker::new(
        Topic::new("temperature"),
        BrokerConfig::bounded(capacity, overflow),
    )
}

// ============================================================================
// FIFO ordering and one-shot delivery
// ============================================================================

#[tokio::test]
async fn test_poll_returns_values_in_publish_order() {
    let broker = unbounded_broker();

    for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
        assert_eq!(broker.publish(value).await, PublishOutcome::Enqueued);
    }

    assert_eq!(broker.poll(), Some(1.0));
    assert_eq!(broker.poll(), Some(2.0));
    assert_eq!(broker.poll(), Some(3.0));
    assert_eq!(broker.poll(), Some(4.0));
    assert_eq!(broker.poll(), Some(5.0));

    // The sixth poll finds nothing pending
    assert_eq!(broker.poll(), None);
}

#[tokio::test]
async fn test_consume_returns_values_in_publish_order() {
    let broker = unbounded_broker();
    let cancel = CancellationToken::new();

    for value in [10.0, 20.0, 30.0] {
        broker.publish(value).await;
    }

    assert_eq!(broker.consume(&cancel).await, Ok(10.0));
    assert_eq!(broker.consume(&cancel).await, Ok(20.0));
    assert_eq!(broker.consume(&cancel).await, Ok(30.0));
}

#[tokio::test]
async fn test_poll_on_empty_queue_returns_none() {
    let broker = unbounded_broker();
    assert_eq!(broker.poll(), None);
}

#[tokio::test]
async fn test_has_data_tracks_queue_content() {
    let broker = unbounded_broker();
    assert!(!broker.has_data());
    assert!(broker.is_empty());

    broker.publish(1.5).await;
    assert!(broker.has_data());
    assert_eq!(broker.len(), 1);

    broker.poll();
    assert!(!broker.has_data());
    assert!(broker.is_empty());
}

#[tokio::test]
async fn test_each_value_delivered_to_exactly_one_consumer() {
    const VALUES: usize = 100;

    let broker = Arc::new(unbounded_broker());
    let cancel = CancellationToken::new();

    for i in 0..VALUES {
        broker.publish(i as f64).await;
    }

    // Two consumers race for the same queue; a shared claim counter
    // bounds the total number of consume calls to the published count.
    let claimed = Arc::new(AtomicUsize::new(0));
    let mut handles = Vec::new();

    for _ in 0..2 {
        let broker = Arc::clone(&broker);
        let cancel = cancel.clone();
        let claimed = Arc::clone(&claimed);

        handles.push(tokio::spawn(async move {
            let mut seen = Vec::new();
            while claimed.fetch_add(1, Ordering::SeqCst) < VALUES {
                seen.push(broker.consume(&cancel).await.unwrap());
            }
            seen
        }));
    }

    let mut all = Vec::new();
    for handle in handles {
        all.extend(timeout(Duration::from_secs(5), handle).await.unwrap().unwrap());
    }

    // Every value exactly once across both consumers
    all.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let expected: Vec<f64> = (0..VALUES).map(|i| i as f64).collect();
    assert_eq!(all, expected);
    assert!(broker.is_empty());
}

// ============================================================================
// Blocking waits
// ============================================================================

#[tokio::test]
async fn test_consume_suspends_until_publish() {
    let broker = Arc::new(unbounded_broker());
    let cancel = CancellationToken::new();

    let waiter = tokio::spawn({
        let broker = Arc::clone(&broker);
        let cancel = cancel.clone();
        async move { broker.consume(&cancel).await }
    });

    // Give the consumer time to reach its wait
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!waiter.is_finished());

    broker.publish(7.5).await;

    let value = timeout(Duration::from_secs(1), waiter)
        .await
        .expect("consumer did not wake after publish")
        .unwrap();
    assert_eq!(value, Ok(7.5));
}

#[tokio::test]
async fn test_wait_ready_suspends_until_publish() {
    let broker = Arc::new(unbounded_broker());
    let cancel = CancellationToken::new();

    let waiter = tokio::spawn({
        let broker = Arc::clone(&broker);
        let cancel = cancel.clone();
        async move { broker.wait_ready(&cancel).await }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!waiter.is_finished());

    broker.publish(3.0).await;

    timeout(Duration::from_secs(1), waiter)
        .await
        .expect("waiter did not wake after publish")
        .unwrap()
        .unwrap();
    assert!(broker.has_data());
}

#[tokio::test]
async fn test_cancelled_consume_fails_with_cancellation() {
    let broker = Arc::new(unbounded_broker());
    let cancel = CancellationToken::new();

    let waiter = tokio::spawn({
        let broker = Arc::clone(&broker);
        let cancel = cancel.clone();
        async move { broker.consume(&cancel).await }
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    cancel.cancel();

    let result = timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
    assert_eq!(result, Err(BrokerError::Cancelled));
}

#[tokio::test]
async fn test_cancelled_wait_ready_fails_with_cancellation() {
    let broker = unbounded_broker();
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert_eq!(broker.wait_ready(&cancel).await, Err(BrokerError::Cancelled));
}

#[tokio::test]
async fn test_consume_prefers_queued_value_over_cancellation_check() {
    // A queued value is returned even if the token is already cancelled:
    // the queue check comes first.
    let broker = unbounded_broker();
    let cancel = CancellationToken::new();

    broker.publish(9.0).await;
    cancel.cancel();

    assert_eq!(broker.consume(&cancel).await, Ok(9.0));
}

// ============================================================================
// Capacity and overflow policies
// ============================================================================

#[tokio::test]
async fn test_drop_oldest_evicts_queue_head() {
    let broker = bounded_broker(2, OverflowPolicy::DropOldest);

    assert_eq!(broker.publish(1.0).await, PublishOutcome::Enqueued);
    assert_eq!(broker.publish(2.0).await, PublishOutcome::Enqueued);
    assert_eq!(broker.publish(3.0).await, PublishOutcome::DroppedOldest);

    assert_eq!(broker.poll(), Some(2.0));
    assert_eq!(broker.poll(), Some(3.0));
    assert_eq!(broker.poll(), None);

    let snapshot = broker.metrics().snapshot();
    assert_eq!(snapshot.dropped_oldest, 1);
}

#[tokio::test]
async fn test_drop_newest_discards_incoming_value() {
    let broker = bounded_broker(2, OverflowPolicy::DropNewest);

    assert_eq!(broker.publish(1.0).await, PublishOutcome::Enqueued);
    assert_eq!(broker.publish(2.0).await, PublishOutcome::Enqueued);
    assert_eq!(broker.publish(3.0).await, PublishOutcome::DroppedNewest);

    assert_eq!(broker.poll(), Some(1.0));
    assert_eq!(broker.poll(), Some(2.0));
    assert_eq!(broker.poll(), None);

    let snapshot = broker.metrics().snapshot();
    assert_eq!(snapshot.dropped_newest, 1);
}

#[tokio::test]
async fn test_block_policy_suspends_publisher_until_space() {
    let broker = Arc::new(bounded_broker(1, OverflowPolicy::Block));

    assert_eq!(broker.publish(1.0).await, PublishOutcome::Enqueued);

    let publisher = tokio::spawn({
        let broker = Arc::clone(&broker);
        async move { broker.publish(2.0).await }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!publisher.is_finished());
    assert_eq!(broker.len(), 1);

    // Consuming frees space and unblocks the publisher
    assert_eq!(broker.poll(), Some(1.0));

    let outcome = timeout(Duration::from_secs(1), publisher)
        .await
        .expect("publisher did not unblock")
        .unwrap();
    assert_eq!(outcome, PublishOutcome::Enqueued);
    assert_eq!(broker.poll(), Some(2.0));
}

// ============================================================================
// Metrics
// ============================================================================

#[tokio::test]
async fn test_metrics_count_published_and_consumed() {
    let broker = unbounded_broker();
    let cancel = CancellationToken::new();

    broker.publish(1.0).await;
    broker.publish(2.0).await;
    broker.poll();
    broker.consume(&cancel).await.unwrap();

    let snapshot = broker.metrics().snapshot();
    assert_eq!(snapshot.values_published, 2);
    assert_eq!(snapshot.values_consumed, 2);
    assert_eq!(snapshot.dropped_oldest, 0);
    assert_eq!(snapshot.dropped_newest, 0);
}
