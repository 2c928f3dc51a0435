// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Upstream failures on demand.

use futures::Stream;
use seqmap_core::{SeqMapError, StreamItem};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Wraps a plain stream as `StreamItem`s and yields one upstream error in
/// position `fail_at`, before the element that would have been there.
///
/// ```rust
/// use futures::{stream, StreamExt};
/// use seqmap_core::StreamItem;
/// use seqmap_test_utils::ErrorInjectingStream;
///
/// # async fn example() {
/// let items: Vec<_> = ErrorInjectingStream::new(stream::iter([1, 2]), 1).collect().await;
///
/// assert!(items[0].is_value());
/// assert!(items[1].is_error());
/// assert_eq!(items[2], StreamItem::Value(2));
/// # }
/// ```
#[derive(Debug)]
pub struct ErrorInjectingStream<S> {
    inner: S,
    fail_at: Option<usize>,
    position: usize,
}

impl<S> ErrorInjectingStream<S> {
    pub fn new(inner: S, fail_at: usize) -> Self {
        Self {
            inner,
            fail_at: Some(fail_at),
            position: 0,
        }
    }
}

impl<S> Stream for ErrorInjectingStream<S>
where
    S: Stream + Unpin,
{
    type Item = StreamItem<S::Item>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        if this.fail_at == Some(this.position) {
            let error = SeqMapError::stream_error(format!("injected failure at {}", this.position));
            this.fail_at = None;
            this.position += 1;
            return Poll::Ready(Some(StreamItem::Error(error)));
        }

        Pin::new(&mut this.inner).poll_next(cx).map(|item| {
            item.map(|value| {
                this.position += 1;
                StreamItem::Value(value)
            })
        })
    }
}
