// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Transforms running as tokio tasks.
//!
//! # Runtime Requirements
//!
//! Available with the `runtime-tokio` feature (default). Spawned transforms
//! must be polled from within a tokio runtime.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::error::Error;
use tokio::task::{JoinError, JoinHandle};

/// Failure of a spawned transform.
#[derive(Debug, thiserror::Error)]
pub enum SpawnFailure<E>
where
    E: Error + 'static,
{
    /// The transform returned an error.
    #[error(transparent)]
    Transform(E),

    /// The task panicked or was aborted by the runtime.
    #[error("Transform task failed: {0}")]
    Join(#[source] JoinError),
}

impl<E> SpawnFailure<E>
where
    E: Error + 'static,
{
    /// Returns `true` when the transform panicked.
    #[must_use]
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Join(join) if join.is_panic())
    }
}

/// Handle to a transform spawned on the tokio runtime.
///
/// Resolves to the transform's result. Dropping the handle aborts the task.
#[derive(Debug)]
pub struct SpawnedTask<R, E> {
    handle: JoinHandle<Result<R, E>>,
}

impl<R, E> SpawnedTask<R, E>
where
    R: Send + 'static,
    E: Send + 'static,
{
    pub(crate) fn spawn<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = Result<R, E>> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }
}

impl<R, E> Future for SpawnedTask<R, E>
where
    E: Error + 'static,
{
    type Output = Result<R, SpawnFailure<E>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|joined| match joined {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => Err(SpawnFailure::Transform(error)),
            Err(join) => Err(SpawnFailure::Join(join)),
        })
    }
}

impl<R, E> Drop for SpawnedTask<R, E> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
