// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::StreamExt;
use futures::Stream;
use seqmap_core::StreamItem;
use std::time::Duration;
use tokio::time::sleep;

/// Panics if `stream` yields anything (item or end) within `timeout_ms`.
pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _state = stream.next() => {
            panic!(
                "Unexpected element emitted, expected no output."
            );
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {
        }
    }
}

/// Next item of `stream`, panicking if none arrives within `timeout_ms` or the
/// stream ends.
pub async fn unwrap_stream<S, T>(stream: &mut S, timeout_ms: u64) -> StreamItem<T>
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    tokio::select! {
        item = stream.next() => {
            item.expect("stream ended, expected an item")
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {
            panic!("Timeout: no item received within {timeout_ms} ms")
        }
    }
}

/// Unwrap `Some(StreamItem::Value(v))` into `v`.
pub fn unwrap_value<T>(item: Option<StreamItem<T>>) -> T {
    match item {
        Some(StreamItem::Value(value)) => value,
        Some(StreamItem::Error(e)) => panic!("expected a value, got error: {e}"),
        None => panic!("expected a value, stream ended"),
    }
}

/// Panics unless `stream` ends within `timeout_ms`.
pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        item = stream.next() => {
            assert!(item.is_none(), "expected the stream to end, got an item");
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {
            panic!("Timeout: stream did not end within {timeout_ms} ms");
        }
    }
}
