// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::indexed::Indexed;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::stream::{FusedStream, FuturesUnordered};
use futures::{Stream, StreamExt, TryFuture};
use pin_project::pin_project;
use seqmap_core::{
    CancellationToken, CancelledOwned, OrderedMapConfig, OrderedPipeline, PipelineStats,
    StreamItem,
};
use std::error::Error;

/// Stream returned by [`OrderedMapExt`](crate::OrderedMapExt).
///
/// A thin driver around an [`OrderedPipeline`]: every `poll_next` pulls
/// upstream while the pipeline wants input, starts the transforms it hands
/// out, feeds finished transforms back, and yields whatever became
/// deliverable. All state transitions happen here, on the consumer's task.
#[pin_project]
pub struct OrderedMap<S, T, F, Fut>
where
    Fut: TryFuture,
{
    #[pin]
    upstream: S,
    transform: F,
    running: FuturesUnordered<Indexed<Fut>>,
    pipeline: OrderedPipeline<T, Fut::Ok>,
    #[pin]
    cancellation: Option<CancelledOwned>,
}

impl<S, T, F, Fut> OrderedMap<S, T, F, Fut>
where
    S: Stream<Item = StreamItem<T>>,
    F: FnMut(T) -> Fut,
    Fut: TryFuture,
    Fut::Error: Error + Send + Sync + 'static,
{
    pub(crate) fn new(upstream: S, transform: F, config: OrderedMapConfig) -> Self {
        Self {
            upstream,
            transform,
            running: FuturesUnordered::new(),
            pipeline: OrderedPipeline::new(config),
            cancellation: None,
        }
    }

    /// Stop the stream when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token.cancelled_owned());
        self
    }

    /// Progress counters of the underlying pipeline.
    pub fn stats(&self) -> PipelineStats {
        self.pipeline.stats()
    }

    pub fn config(&self) -> &OrderedMapConfig {
        self.pipeline.config()
    }
}

impl<S, T, F, Fut> Stream for OrderedMap<S, T, F, Fut>
where
    S: Stream<Item = StreamItem<T>>,
    F: FnMut(T) -> Fut,
    Fut: TryFuture,
    Fut::Error: Error + Send + Sync + 'static,
{
    type Item = StreamItem<Fut::Ok>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            // 1. External cancellation wins over everything still pending
            let cancelled = this
                .cancellation
                .as_mut()
                .as_pin_mut()
                .is_some_and(|cancelled| cancelled.poll(cx).is_ready());
            if cancelled {
                this.cancellation.set(None);
                if this.pipeline.cancel() {
                    debug!("ordered_map: dropping {} running transforms", this.running.len());
                    this.running.clear();
                }
            }

            // 2. Pull upstream one element at a time while a slot is free, so
            // completions are observed between pulls
            let mut progressed = pull_and_dispatch(
                this.upstream.as_mut(),
                &mut *this.transform,
                &mut *this.running,
                &mut *this.pipeline,
                cx,
                1,
            );

            // 3. Collect finished transforms
            let mut completed = 0;
            while let Poll::Ready(Some((index, outcome))) = this.running.poll_next_unpin(cx) {
                if let Err(e) = this.pipeline.complete(index, outcome) {
                    error!("ordered_map: {e}");
                }
                completed += 1;
            }

            // 4. Refill the slots freed by those completions before handing
            // anything out
            if completed > 0 {
                progressed = true;
                pull_and_dispatch(
                    this.upstream.as_mut(),
                    &mut *this.transform,
                    &mut *this.running,
                    &mut *this.pipeline,
                    cx,
                    completed,
                );
            }

            // 5. A terminated pipeline never completes the remaining transforms
            if this.pipeline.is_terminal() && !this.running.is_empty() {
                debug!("ordered_map: dropping {} running transforms", this.running.len());
                this.running.clear();
            }

            // 6. Deliver whatever is ready
            if let Some(item) = this.pipeline.next_output() {
                return Poll::Ready(Some(item));
            }
            if this.pipeline.is_finished() {
                return Poll::Ready(None);
            }

            if !progressed {
                return Poll::Pending;
            }
        }
    }
}

/// Pull up to `budget` upstream elements while the pipeline wants input,
/// starting a transform for each as soon as it is sequenced.
fn pull_and_dispatch<S, T, F, Fut>(
    mut upstream: Pin<&mut S>,
    transform: &mut F,
    running: &mut FuturesUnordered<Indexed<Fut>>,
    pipeline: &mut OrderedPipeline<T, Fut::Ok>,
    cx: &mut Context<'_>,
    budget: usize,
) -> bool
where
    S: Stream<Item = StreamItem<T>>,
    F: FnMut(T) -> Fut,
    Fut: TryFuture,
{
    let mut pulled = 0;
    let mut progressed = false;

    while pulled < budget && pipeline.wants_input() {
        match upstream.as_mut().poll_next(cx) {
            Poll::Ready(Some(StreamItem::Value(input))) => {
                if let Err(e) = pipeline.offer(input) {
                    error!("ordered_map: upstream element rejected: {e}");
                }
                pulled += 1;
            }
            Poll::Ready(Some(StreamItem::Error(e))) => pipeline.upstream_failed(e),
            Poll::Ready(None) => pipeline.upstream_finished(),
            Poll::Pending => break,
        }
        progressed = true;

        while let Some((index, input)) = pipeline.next_dispatch() {
            running.push(Indexed::new(index, transform(input)));
        }
    }

    progressed
}

impl<S, T, F, Fut> FusedStream for OrderedMap<S, T, F, Fut>
where
    S: Stream<Item = StreamItem<T>>,
    F: FnMut(T) -> Fut,
    Fut: TryFuture,
    Fut::Error: Error + Send + Sync + 'static,
{
    fn is_terminated(&self) -> bool {
        self.pipeline.is_finished()
    }
}
