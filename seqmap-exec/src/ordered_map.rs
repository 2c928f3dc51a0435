// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod implementation;
mod indexed;

pub use implementation::OrderedMap;

use futures::{Stream, TryFuture};
use seqmap_core::{CancellationToken, OrderedMapConfig, StreamItem};
use std::error::Error;

#[cfg(feature = "runtime-tokio")]
use crate::spawned::SpawnedTask;
#[cfg(feature = "runtime-tokio")]
use core::future::Future;

/// Extension trait providing the order-preserving concurrent map operators.
///
/// Implemented for every stream of `StreamItem<T>`. Plain streams can be
/// adapted with [`IntoStreamItems`](seqmap_core::IntoStreamItems).
pub trait OrderedMapExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Apply an async `transform` to every element with at most
    /// `config.concurrency()` transforms running at once, emitting outcomes in
    /// input order.
    ///
    /// # Behavior
    ///
    /// - Elements are pulled from upstream only when a transform slot is free
    /// - A transform `Err(e)` becomes `StreamItem::Error(TransformFailure { index, .. })`
    /// - Under [`ErrorPolicy::ContinueOnError`](seqmap_core::ErrorPolicy) every
    ///   input gets exactly one outcome, in its position
    /// - Under [`ErrorPolicy::FailFast`](seqmap_core::ErrorPolicy) the first
    ///   failure ends the stream; running transforms are dropped
    /// - An upstream `StreamItem::Error` ends the stream with `UpstreamFailure`
    ///   after every outcome already released
    /// - Dropping the stream drops every running transform
    ///
    /// # Examples
    ///
    /// ```
    /// use futures::{stream, StreamExt};
    /// use seqmap_core::{IntoStreamItems, OrderedMapConfig};
    /// use seqmap_exec::OrderedMapExt;
    /// use std::convert::Infallible;
    /// use std::time::Duration;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> seqmap_core::Result<()> {
    /// let delays = stream::iter([("a", 10u64), ("b", 100), ("c", 5)]).into_stream_items();
    ///
    /// let results: Vec<_> = delays
    ///     .ordered_map(
    ///         |(name, delay)| async move {
    ///             tokio::time::sleep(Duration::from_millis(delay)).await;
    ///             Ok::<_, Infallible>(name)
    ///         },
    ///         OrderedMapConfig::new(3)?,
    ///     )
    ///     .map(|item| item.unwrap())
    ///     .collect()
    ///     .await;
    ///
    /// assert_eq!(results, vec!["a", "b", "c"]);
    /// # Ok(())
    /// # }
    /// ```
    fn ordered_map<F, Fut>(
        self,
        transform: F,
        config: OrderedMapConfig,
    ) -> OrderedMap<Self, T, F, Fut>
    where
        F: FnMut(T) -> Fut,
        Fut: TryFuture,
        Fut::Error: Error + Send + Sync + 'static;

    /// [`ordered_map`](Self::ordered_map) that also stops when `token` is
    /// cancelled.
    ///
    /// On cancellation no further transform is started, running transforms
    /// are dropped, outcomes not yet handed out are discarded, and the stream
    /// ends with `StreamItem::Error(Cancelled { emitted })`.
    fn ordered_map_with_cancel<F, Fut>(
        self,
        transform: F,
        config: OrderedMapConfig,
        token: CancellationToken,
    ) -> OrderedMap<Self, T, F, Fut>
    where
        F: FnMut(T) -> Fut,
        Fut: TryFuture,
        Fut::Error: Error + Send + Sync + 'static,
    {
        self.ordered_map(transform, config).with_cancellation(token)
    }

    /// [`ordered_map`](Self::ordered_map) running each transform as its own
    /// tokio task.
    ///
    /// Transforms execute in parallel on a multi-thread runtime. Tasks still
    /// running when the stream ends early or is dropped are aborted. A
    /// transform that panics is reported as a `TransformFailure`.
    ///
    /// Must be polled from within a tokio runtime.
    #[cfg(feature = "runtime-tokio")]
    fn ordered_map_spawned<F, Fut, R, E>(
        self,
        mut transform: F,
        config: OrderedMapConfig,
    ) -> OrderedMap<Self, T, impl FnMut(T) -> SpawnedTask<R, E>, SpawnedTask<R, E>>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        R: Send + 'static,
        E: Error + Send + Sync + 'static,
    {
        self.ordered_map(move |input| SpawnedTask::spawn(transform(input)), config)
    }
}

impl<S, T> OrderedMapExt<T> for S
where
    S: Stream<Item = StreamItem<T>>,
{
    fn ordered_map<F, Fut>(
        self,
        transform: F,
        config: OrderedMapConfig,
    ) -> OrderedMap<Self, T, F, Fut>
    where
        F: FnMut(T) -> Fut,
        Fut: TryFuture,
        Fut::Error: Error + Send + Sync + 'static,
    {
        OrderedMap::new(self, transform, config)
    }
}
