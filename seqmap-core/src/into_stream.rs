// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::StreamItem;
use futures::stream::Map;
use futures::{Stream, StreamExt};

/// Converts a plain stream into a stream of [`StreamItem::Value`]s.
///
/// Ordered operators consume `Stream<Item = StreamItem<T>>` so that an
/// upstream sequence can report failures in-band. Sources that cannot fail
/// use this adapter.
///
/// ```
/// use futures::{stream, StreamExt};
/// use seqmap_core::IntoStreamItems;
///
/// # futures::executor::block_on(async {
/// let items: Vec<_> = stream::iter(vec![1, 2]).into_stream_items().collect().await;
/// assert!(items.iter().all(|item| item.is_value()));
/// # });
/// ```
pub trait IntoStreamItems: Stream + Sized {
    /// Wrap every element in [`StreamItem::Value`].
    fn into_stream_items(self) -> Map<Self, fn(Self::Item) -> StreamItem<Self::Item>>;
}

impl<S> IntoStreamItems for S
where
    S: Stream,
{
    fn into_stream_items(self) -> Map<Self, fn(Self::Item) -> StreamItem<Self::Item>> {
        self.map(StreamItem::Value as fn(S::Item) -> StreamItem<S::Item>)
    }
}
