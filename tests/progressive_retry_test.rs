//! Progressive loading and retry tests on a paused clock.
//!
//! Timers auto-advance under `start_paused`, so backoff delays are exact
//! and the tests run instantly.

mod common;

use std::sync::Arc;
use std::time::Duration;

use adaptive_delivery::adapters::{MockDevice, MockNetwork};
use adaptive_delivery::error::{DeliveryError, DeliveryResult};
use adaptive_delivery::progressive::{LoadState, ProgressiveLoader};
use adaptive_delivery::retry::RetryPolicy;
use adaptive_delivery::sensor::Sensor;
use common::{strategy_with_chunk, ScriptedPages};
use tokio_util::sync::CancellationToken;

#[tokio::test(start_paused = true)]
async fn test_failing_page_is_called_max_retries_plus_one_times() {
    let pages = ScriptedPages::new(30).always_failing();
    let policy = RetryPolicy::default();
    let loader = ProgressiveLoader::new(policy);

    let mut partials = 0;
    let result: DeliveryResult<Vec<u32>> = loader
        .run(&pages, Some(30), &strategy_with_chunk(10), |_| partials += 1)
        .await;

    assert!(result.unwrap_err().is_retryable());
    assert_eq!(pages.call_count(), policy.max_retries as usize + 1);
    assert_eq!(partials, 0);

    let gaps = pages.gaps();
    assert_eq!(
        gaps,
        vec![
            Duration::from_millis(500),
            Duration::from_secs(1),
            Duration::from_secs(2)
        ]
    );
    assert!(gaps.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(gaps.iter().all(|gap| *gap <= policy.max_delay));
}

#[tokio::test(start_paused = true)]
async fn test_backoff_caps_at_max_delay() {
    let pages = ScriptedPages::new(10).always_failing();
    let policy = RetryPolicy::new(5, Duration::from_millis(500), Duration::from_secs(2));
    let loader = ProgressiveLoader::new(policy);

    let _: DeliveryResult<Vec<u32>> = loader
        .run(&pages, Some(10), &strategy_with_chunk(10), |_| {})
        .await;

    assert_eq!(pages.call_count(), 6);
    assert_eq!(pages.gaps().last().copied(), Some(Duration::from_secs(2)));
}

#[tokio::test(start_paused = true)]
async fn test_fail_twice_then_succeed() {
    let pages = ScriptedPages::new(10).with_failures(2);
    let loader = ProgressiveLoader::new(RetryPolicy::default());

    let mut partials = Vec::new();
    let items = loader
        .run(&pages, Some(10), &strategy_with_chunk(10), |items| {
            partials.push(items.len())
        })
        .await
        .unwrap();

    assert_eq!(pages.call_count(), 3);
    assert_eq!(items, (0..10).collect::<Vec<u32>>());
    assert_eq!(partials, vec![10]);
}

#[tokio::test(start_paused = true)]
async fn test_partials_grow_in_page_order() {
    let pages = ScriptedPages::new(25).with_latency(Duration::from_millis(50));
    let loader = ProgressiveLoader::new(RetryPolicy::default());

    let mut partials: Vec<Vec<u32>> = Vec::new();
    let items = loader
        .run(&pages, None, &strategy_with_chunk(10), |items| {
            partials.push(items.to_vec())
        })
        .await
        .unwrap();

    let offsets: Vec<usize> = pages.calls().iter().map(|c| c.offset).collect();
    assert_eq!(offsets, vec![0, 10, 20]);
    assert!(pages.calls().iter().all(|c| c.page_size == 10));

    let lengths: Vec<usize> = partials.iter().map(Vec::len).collect();
    assert_eq!(lengths, vec![10, 20, 25]);
    // Each partial extends the previous one
    for pair in partials.windows(2) {
        assert!(pair[1].starts_with(&pair[0]));
    }
    assert_eq!(items, (0..25).collect::<Vec<u32>>());
}

#[tokio::test(start_paused = true)]
async fn test_hint_limits_page_count() {
    let pages = ScriptedPages::new(1_000);
    let loader = ProgressiveLoader::new(RetryPolicy::default());

    let items: Vec<u32> = loader
        .run(&pages, Some(25), &strategy_with_chunk(10), |_| {})
        .await
        .unwrap();

    assert_eq!(pages.call_count(), 3);
    assert_eq!(items.len(), 30);
}

#[tokio::test(start_paused = true)]
async fn test_offline_drops_scheduled_retry() {
    let network = MockNetwork::new("4g");
    let sensor = Arc::new(Sensor::new(
        Some(Arc::new(network.clone())),
        Some(Arc::new(MockDevice::new().with_hardware(8, 8.0))),
    ));

    let pages = {
        let sensor = Arc::clone(&sensor);
        ScriptedPages::new(10)
            .with_failures(1)
            .with_hook(move |call| {
                if call == 0 {
                    network.set_online(false);
                    sensor.handle_connection_change();
                }
            })
    };

    let loader = ProgressiveLoader::new(RetryPolicy::default()).with_connection(sensor.watch());
    let err = loader
        .run::<u32, _, _>(&pages, Some(10), &strategy_with_chunk(10), |_| {})
        .await
        .unwrap_err();

    assert!(err.is_offline());
    assert_eq!(pages.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_partials() {
    let pages = ScriptedPages::new(100).with_latency(Duration::from_millis(100));
    let cancel = CancellationToken::new();
    let loader = ProgressiveLoader::new(RetryPolicy::default()).with_cancellation(cancel.clone());

    let mut partials = Vec::new();
    let strategy = strategy_with_chunk(10);
    let (result, _) = tokio::join!(
        loader.run::<u32, _, _>(&pages, None, &strategy, |items| partials.push(items.len())),
        async {
            tokio::time::sleep(Duration::from_millis(150)).await;
            cancel.cancel();
        }
    );

    assert_eq!(result.unwrap_err(), DeliveryError::Cancelled);
    assert_eq!(partials, vec![10]);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(pages.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_backoff() {
    let pages = ScriptedPages::new(10).always_failing();
    let cancel = CancellationToken::new();
    let loader = ProgressiveLoader::new(RetryPolicy::default()).with_cancellation(cancel.clone());

    let strategy = strategy_with_chunk(10);
    let (result, _) = tokio::join!(
        loader.run::<u32, _, _>(&pages, None, &strategy, |_| {}),
        async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            cancel.cancel();
        }
    );

    assert_eq!(result.unwrap_err(), DeliveryError::Cancelled);
    assert_eq!(pages.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_load_keeps_partial_on_failure() {
    let pages = ScriptedPages::new(30).failing_from(1);
    let loader = ProgressiveLoader::new(RetryPolicy::no_retry());

    let mut states: Vec<LoadState<u32>> = Vec::new();
    let last = loader
        .load(&pages, Some(30), &strategy_with_chunk(10), |state| {
            states.push(state.clone())
        })
        .await;

    assert_eq!(states.len(), 3);
    assert_eq!(states[0], LoadState::default());
    assert_eq!(states[1].items().len(), 10);
    assert!(states[1].is_loading());

    assert!(last.error().is_some());
    assert_eq!(last.items(), &(0..10).collect::<Vec<u32>>()[..]);
    assert_eq!(states[2], last);
}

#[tokio::test(start_paused = true)]
async fn test_load_ready() {
    let pages = ScriptedPages::new(15);
    let loader = ProgressiveLoader::new(RetryPolicy::default());

    let state: LoadState<u32> = loader
        .load(&pages, None, &strategy_with_chunk(10), |_| {})
        .await;

    assert!(state.is_ready());
    assert_eq!(state.items().len(), 15);
}
