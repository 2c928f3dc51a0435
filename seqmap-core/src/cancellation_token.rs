// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime-agnostic cancellation token.
//!
//! Used to cancel an ordered map from outside the consumer: once the token
//! fires, no further transform is dispatched, in-flight work is abandoned and
//! the output stream terminates with [`SeqMapError::Cancelled`](crate::SeqMapError::Cancelled).

use core::future::Future;
use core::pin::Pin;
use core::sync::atomic::{AtomicBool, Ordering};
use core::task::{Context, Poll};
use event_listener::{Event, EventListener};
use std::sync::Arc;

/// Runtime-agnostic cancellation token.
///
/// A `CancellationToken` can be cloned to create multiple handles to the same
/// cancellation state. When `cancel()` is called on any clone, all waiters on
/// `cancelled()` will be notified.
///
/// # Example
///
/// ```
/// use seqmap_core::CancellationToken;
///
/// # async fn example() {
/// let token = CancellationToken::new();
/// let token_clone = token.clone();
///
/// tokio::spawn(async move {
///     token_clone.cancelled().await;
///     println!("Cancelled!");
/// });
///
/// token.cancel();
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    event: Event,
}

impl CancellationToken {
    /// Create a new cancellation token.
    ///
    /// The token is initially not cancelled.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                event: Event::new(),
            }),
        }
    }

    /// Cancel the token, waking all listeners.
    ///
    /// Idempotent.
    pub fn cancel(&self) {
        // Flag before notify so woken waiters observe it.
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.event.notify(usize::MAX);
    }

    /// Check if the token has been cancelled (non-blocking).
    ///
    /// ```
    /// use seqmap_core::CancellationToken;
    ///
    /// let token = CancellationToken::new();
    /// assert!(!token.is_cancelled());
    ///
    /// token.cancel();
    /// assert!(token.is_cancelled());
    /// ```
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Wait asynchronously until the token is cancelled.
    ///
    /// If the token is already cancelled, this returns immediately.
    pub fn cancelled(&self) -> Cancelled<'_> {
        Cancelled {
            token: self,
            listener: None,
        }
    }

    /// Owned variant of [`cancelled`](Self::cancelled), suitable for storing
    /// inside a stream or task.
    pub fn cancelled_owned(self) -> CancelledOwned {
        CancelledOwned {
            token: self,
            listener: None,
        }
    }

    fn poll_cancelled(&self, listener: &mut Option<EventListener>, cx: &mut Context<'_>) -> Poll<()> {
        if self.is_cancelled() {
            return Poll::Ready(());
        }

        loop {
            if listener.is_none() {
                *listener = Some(self.inner.event.listen());
                // cancel() may have run between the check and listen().
                if self.is_cancelled() {
                    return Poll::Ready(());
                }
            }

            let woken = match listener.as_mut() {
                Some(current) => Pin::new(current).poll(cx).is_ready(),
                None => false,
            };

            if !woken {
                return Poll::Pending;
            }

            *listener = None;
            if self.is_cancelled() {
                return Poll::Ready(());
            }
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Future returned by [`CancellationToken::cancelled()`].
pub struct Cancelled<'a> {
    token: &'a CancellationToken,
    listener: Option<EventListener>,
}

impl Future for Cancelled<'_> {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = &mut *self;
        this.token.poll_cancelled(&mut this.listener, cx)
    }
}

/// Future returned by [`CancellationToken::cancelled_owned()`].
#[derive(Debug)]
pub struct CancelledOwned {
    token: CancellationToken,
    listener: Option<EventListener>,
}

impl CancelledOwned {
    /// The token this future waits on.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Future for CancelledOwned {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = &mut *self;
        this.token.poll_cancelled(&mut this.listener, cx)
    }
}
