// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::{self, FusedStream};
use futures::StreamExt;
use seqmap_core::{Emission, IntoStreamItems, OrderedMapConfig, SeqMapError, StreamItem};
use seqmap_exec::OrderedMapExt;
use seqmap_test_utils::{
    assert_no_element_emitted, assert_stream_ended, delayed, delayed_result,
    test_channel_with_errors, unwrap_stream, unwrap_value, ConcurrencyProbe, ErrorInjectingStream,
    TestError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[tokio::test]
async fn test_random_delays_keep_input_order() -> anyhow::Result<()> {
    for seed in 0..5 {
        // Arrange
        let mut rng = fastrand::Rng::with_seed(seed);
        let delays: Vec<u64> = (0..20).map(|_| rng.u64(0..15)).collect();
        let probe = ConcurrencyProbe::new();
        let transform_probe = probe.clone();

        // Act
        let output: Vec<usize> = stream::iter(delays.into_iter().enumerate())
            .into_stream_items()
            .ordered_map(
                move |(i, delay)| {
                    let probe = transform_probe.clone();
                    async move { probe.track(delayed(i * 2, delay)).await }
                },
                OrderedMapConfig::new(4)?,
            )
            .map(StreamItem::unwrap)
            .collect()
            .await;

        // Assert
        let expected: Vec<usize> = (0..20).map(|i| i * 2).collect();
        assert_eq!(output, expected, "seed {seed}");
        assert!(probe.peak() <= 4);
    }
    Ok(())
}

#[tokio::test]
async fn test_head_of_line_blocking_then_batch_release() -> anyhow::Result<()> {
    // Arrange
    let gate = Arc::new(Notify::new());
    let transform_gate = gate.clone();
    let mut output = stream::iter(0..4u32).into_stream_items().ordered_map(
        move |i| {
            let gate = transform_gate.clone();
            async move {
                if i == 0 {
                    gate.notified().await;
                }
                Ok::<_, TestError>(i)
            }
        },
        OrderedMapConfig::new(4)?,
    );

    // Act & Assert
    assert_no_element_emitted(&mut output, 50).await;
    assert_eq!(output.stats().held, 3);

    gate.notify_one();

    for expected in 0..4 {
        assert_eq!(unwrap_stream(&mut output, 100).await.unwrap(), expected);
    }
    assert_stream_ended(&mut output, 100).await;
    Ok(())
}

#[tokio::test]
async fn test_continue_on_error_emits_every_outcome() -> anyhow::Result<()> {
    // Arrange
    let inputs = stream::iter([("a", 10), ("b", 1), ("c", 5)]).into_stream_items();

    // Act
    let output: Vec<StreamItem<String>> = inputs
        .ordered_map(
            |(name, delay)| {
                let result = if name == "b" {
                    Err(TestError::forbidden(name))
                } else {
                    Ok(name.to_uppercase())
                };
                delayed_result(result, delay)
            },
            OrderedMapConfig::new(3)?,
        )
        .collect()
        .await;

    // Assert
    assert_eq!(output.len(), 3);
    assert_eq!(output[0], StreamItem::Value("A".to_string()));
    let error = output[1].as_error().cloned();
    assert!(error.as_ref().is_some_and(SeqMapError::is_transform_failure));
    assert_eq!(error.as_ref().and_then(SeqMapError::index), Some(1));
    assert_eq!(
        error
            .as_ref()
            .and_then(SeqMapError::cause)
            .and_then(|cause| cause.downcast_ref::<TestError>()),
        Some(&TestError::forbidden("b"))
    );
    assert_eq!(output[2], StreamItem::Value("C".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_fail_fast_drops_later_results() -> anyhow::Result<()> {
    // Arrange
    let probe = ConcurrencyProbe::new();
    let transform_probe = probe.clone();
    let inputs = stream::iter([("a", 5), ("b", 20), ("c", 200)]).into_stream_items();

    // Act
    let output: Vec<StreamItem<&str>> = inputs
        .ordered_map(
            move |(name, delay)| {
                let probe = transform_probe.clone();
                let result = if name == "b" {
                    Err(TestError::forbidden(name))
                } else {
                    Ok(name)
                };
                async move { probe.track(delayed_result(result, delay)).await }
            },
            OrderedMapConfig::new(3)?.fail_fast(),
        )
        .collect()
        .await;

    // Assert
    assert_eq!(output.len(), 2);
    assert_eq!(output[0], StreamItem::Value("a"));
    assert_eq!(output[1].as_error().and_then(SeqMapError::index), Some(1));
    assert_eq!(probe.started(), 3);
    assert_eq!(probe.finished(), 2);
    assert_eq!(probe.current(), 0);
    Ok(())
}

#[tokio::test]
async fn test_upstream_failure_terminates_after_released_values() -> anyhow::Result<()> {
    // Arrange
    let (tx, stream) = test_channel_with_errors::<u32>();
    let mut output = stream.ordered_map(|i| delayed(i + 1, 1), OrderedMapConfig::new(2)?);

    // Act
    tx.send(StreamItem::Value(1))?;
    let first = unwrap_stream(&mut output, 100).await;
    tx.send(StreamItem::Error(SeqMapError::stream_error("feed closed")))?;
    tx.send(StreamItem::Value(2))?;

    // Assert
    assert_eq!(first, StreamItem::Value(2));
    let error = unwrap_stream(&mut output, 100).await.unwrap_err();
    assert!(error.is_upstream_failure());
    assert_eq!(error.index(), Some(1));
    assert_stream_ended(&mut output, 100).await;
    Ok(())
}

#[tokio::test]
async fn test_upstream_failure_drops_unreleased_work() -> anyhow::Result<()> {
    // Arrange
    let inputs = ErrorInjectingStream::new(stream::iter([40u64, 1, 1, 1, 1]), 3);

    // Act
    let output: Vec<StreamItem<u64>> = inputs
        .ordered_map(|delay| delayed(delay, delay), OrderedMapConfig::new(4)?)
        .collect()
        .await;

    // Assert
    assert_eq!(output.len(), 1);
    let error = output[0].as_error().cloned();
    assert!(error.as_ref().is_some_and(SeqMapError::is_upstream_failure));
    assert_eq!(error.and_then(|e| e.index()), Some(3));
    Ok(())
}

#[tokio::test]
async fn test_empty_input_completes_immediately() -> anyhow::Result<()> {
    let mut output = stream::empty::<u32>()
        .into_stream_items()
        .ordered_map(|i| delayed(i, 1), OrderedMapConfig::new(3)?);

    assert_stream_ended(&mut output, 50).await;
    assert!(output.is_terminated());
    assert_eq!(output.stats().sequenced, 0);
    Ok(())
}

#[tokio::test]
async fn test_pulls_upstream_only_when_a_slot_is_free() -> anyhow::Result<()> {
    // Arrange
    let pulled = Arc::new(AtomicUsize::new(0));
    let counter = pulled.clone();
    let gate = Arc::new(Notify::new());
    let transform_gate = gate.clone();
    let inputs = stream::iter(0..10u32)
        .inspect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .into_stream_items();

    let mut output = inputs.ordered_map(
        move |i| {
            let gate = transform_gate.clone();
            async move {
                gate.notified().await;
                Ok::<_, TestError>(i)
            }
        },
        OrderedMapConfig::new(2)?,
    );

    // Act
    assert_no_element_emitted(&mut output, 30).await;

    // Assert
    assert_eq!(pulled.load(Ordering::SeqCst), 2);
    assert_eq!(output.stats().in_flight, 2);
    Ok(())
}

#[tokio::test]
async fn test_completion_refills_slots_before_output_is_consumed() -> anyhow::Result<()> {
    // Arrange
    let delays = [20u64, 5, 50, 50];
    let mut output = stream::iter(delays.into_iter().enumerate())
        .into_stream_items()
        .ordered_map(|(i, delay)| delayed(i, delay), OrderedMapConfig::new(2)?);

    // Act
    let first = unwrap_stream(&mut output, 100).await;
    let stats = output.stats();

    // Assert
    assert_eq!(first, StreamItem::Value(0));
    assert_eq!(stats.dispatched, 4);
    assert_eq!(stats.in_flight, 2);
    Ok(())
}

#[tokio::test]
async fn test_completion_order_emission() -> anyhow::Result<()> {
    // Arrange
    let inputs = stream::iter([("slow", 60), ("fast", 5), ("medium", 30)]).into_stream_items();
    let config = OrderedMapConfig::new(3)?.with_emission(Emission::CompletionOrder);

    // Act
    let output: Vec<&str> = inputs
        .ordered_map(|(name, delay)| delayed(name, delay), config)
        .map(StreamItem::unwrap)
        .collect()
        .await;

    // Assert
    assert_eq!(output, vec!["fast", "medium", "slow"]);
    Ok(())
}

#[tokio::test]
async fn test_max_buffered_pauses_upstream() -> anyhow::Result<()> {
    // Arrange
    let pulled = Arc::new(AtomicUsize::new(0));
    let counter = pulled.clone();
    let gate = Arc::new(Notify::new());
    let transform_gate = gate.clone();
    let inputs = stream::iter(0..10u32)
        .inspect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .into_stream_items();

    let mut output = inputs.ordered_map(
        move |i| {
            let gate = transform_gate.clone();
            async move {
                if i == 0 {
                    gate.notified().await;
                }
                Ok::<_, TestError>(i)
            }
        },
        OrderedMapConfig::new(8)?.with_max_buffered(3),
    );

    // Act
    assert_no_element_emitted(&mut output, 30).await;
    let paused_at = pulled.load(Ordering::SeqCst);
    gate.notify_one();
    let values: Vec<u32> = output.by_ref().map(StreamItem::unwrap).collect().await;

    // Assert
    assert_eq!(paused_at, 4);
    assert_eq!(values, (0..10).collect::<Vec<_>>());
    assert!(output.stats().peak_held <= 3);
    Ok(())
}

#[tokio::test]
async fn test_dropping_stream_drops_running_transforms() -> anyhow::Result<()> {
    // Arrange
    let probe = ConcurrencyProbe::new();
    let transform_probe = probe.clone();
    let mut output = stream::iter(0..5u32).into_stream_items().ordered_map(
        move |i| {
            let probe = transform_probe.clone();
            async move { probe.track(delayed(i, 1_000)).await }
        },
        OrderedMapConfig::new(3)?,
    );
    assert_no_element_emitted(&mut output, 20).await;
    assert_eq!(probe.current(), 3);

    // Act
    drop(output);

    // Assert
    assert_eq!(probe.current(), 0);
    assert_eq!(probe.finished(), 0);
    Ok(())
}

#[tokio::test]
async fn test_stats_after_completion() -> anyhow::Result<()> {
    // Arrange
    let mut output = stream::iter(0..6u32)
        .into_stream_items()
        .ordered_map(|i| delayed(i, u64::from(6 - i)), OrderedMapConfig::new(3)?);

    // Act
    let mut count = 0;
    while output.next().await.is_some() {
        count += 1;
    }
    let stats = output.stats();

    // Assert
    assert_eq!(count, 6);
    assert_eq!(stats.sequenced, 6);
    assert_eq!(stats.dispatched, 6);
    assert_eq!(stats.completed, 6);
    assert_eq!(stats.emitted, 6);
    assert_eq!(stats.peak_in_flight, 3);
    assert_eq!(stats.in_flight, 0);
    assert!(output.is_terminated());
    Ok(())
}

#[tokio::test]
async fn test_output_is_fused() -> anyhow::Result<()> {
    let mut output = stream::iter([1u32])
        .into_stream_items()
        .ordered_map(|i| delayed(i, 0), OrderedMapConfig::new(1)?);

    assert_eq!(unwrap_value(output.next().await), 1);
    assert!(output.next().await.is_none());
    assert!(output.next().await.is_none());
    Ok(())
}
