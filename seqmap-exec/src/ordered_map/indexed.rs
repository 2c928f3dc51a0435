// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::TryFuture;
use pin_project::pin_project;
use seqmap_core::SeqMapError;
use std::error::Error;

/// A running transform tagged with the index of its input.
#[pin_project]
pub(crate) struct Indexed<Fut> {
    index: u64,
    #[pin]
    future: Fut,
}

impl<Fut> Indexed<Fut> {
    pub(crate) const fn new(index: u64, future: Fut) -> Self {
        Self { index, future }
    }
}

impl<Fut> Future for Indexed<Fut>
where
    Fut: TryFuture,
    Fut::Error: Error + Send + Sync + 'static,
{
    type Output = (u64, Result<Fut::Ok, SeqMapError>);

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let index = *this.index;

        this.future.try_poll(cx).map(|outcome| {
            (
                index,
                outcome.map_err(|error| SeqMapError::transform_failure(index, error)),
            )
        })
    }
}
