//! Generator tests
//!
//! Run under a paused clock so window timing is deterministic and fast.

use crate::{SensorConfig, SensorGenerator};

fn test_config() -> SensorConfig {
    SensorConfig {
        window_secs: 2,
        sample_interval_ms: 100,
        ..SensorConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_aggregate_stays_inside_configured_range() {
    let config = test_config();
    let mut generator = SensorGenerator::new(config.clone());

    for _ in 0..5 {
        let aggregate = generator.next_aggregate().await;
        assert!(
            (config.min_value..=config.max_value).contains(&aggregate),
            "aggregate {aggregate} outside [{}, {}]",
            config.min_value,
            config.max_value
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_same_seed_produces_identical_sequences() {
    let mut first = SensorGenerator::new(test_config());
    let mut second = SensorGenerator::new(test_config());

    for _ in 0..3 {
        let a = first.next_aggregate().await;
        let b = second.next_aggregate().await;
        assert_eq!(a, b);
    }
}

#[tokio::test(start_paused = true)]
async fn test_different_seeds_diverge() {
    let mut first = SensorGenerator::new(test_config());
    let mut second = SensorGenerator::new(SensorConfig {
        seed: 1337,
        ..test_config()
    });

    assert_ne!(first.next_aggregate().await, second.next_aggregate().await);
}

#[tokio::test(start_paused = true)]
async fn test_window_collects_expected_reading_count() {
    // 2s window sampled every 100ms: the first tick fires immediately,
    // so the window sees 20 readings before it closes.
    let mut generator = SensorGenerator::new(test_config());

    let aggregate = generator.next_aggregate().await;

    // Can't observe the count directly, but a mean of 20 uniform draws
    // from [-25, 120] essentially never hits the empty-window fallback.
    assert_ne!(aggregate, 0.0);
}
