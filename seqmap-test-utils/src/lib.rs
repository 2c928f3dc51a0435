// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for the seqmap workspace.
//!
//! Designed for use in development and testing only, not for production code.
//!
//! # Architecture
//!
//! Operators consume their input stream, so tests keep the sending half of a
//! `tokio::sync::mpsc::unbounded_channel` and hand the receiving half to the
//! operator. [`test_channel`] and [`test_channel_with_errors`] do that wiring.
//!
//! # Examples
//!
//! ```rust
//! use seqmap_test_utils::{assert_no_element_emitted, test_channel, unwrap_value};
//! use futures::StreamExt;
//!
//! # async fn example() {
//! let (tx, mut stream) = test_channel::<i32>();
//! assert_no_element_emitted(&mut stream, 10).await;
//!
//! tx.send(7).unwrap();
//! assert_eq!(unwrap_value(stream.next().await), 7);
//! # }
//! ```
//!
//! # Module Organization
//!
//! - `helpers` - Assertions over streams
//! - `probe` - [`ConcurrencyProbe`] for observing how many transforms run at once
//! - `transforms` - Delayed transforms and [`TestError`]
//! - `error_injection` - [`ErrorInjectingStream`]

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod error_injection;
pub mod helpers;
pub mod probe;
pub mod transforms;

use futures::{Stream, StreamExt};
use seqmap_core::StreamItem;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

pub use error_injection::ErrorInjectingStream;
pub use helpers::{assert_no_element_emitted, assert_stream_ended, unwrap_stream, unwrap_value};
pub use probe::{ConcurrencyProbe, ProbeGuard};
pub use transforms::{delayed, delayed_result, TestError};

/// Creates a test channel that automatically wraps values in `StreamItem::Value`.
///
/// ```rust
/// use seqmap_test_utils::test_channel;
/// use futures::StreamExt;
///
/// # async fn example() {
/// let (tx, mut stream) = test_channel();
///
/// tx.send("a").unwrap();
///
/// let item = stream.next().await.unwrap().unwrap(); // Option -> StreamItem -> Value
/// assert_eq!(item, "a");
/// # }
/// ```
pub fn test_channel<T: Send + 'static>() -> (
    mpsc::UnboundedSender<T>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx).map(StreamItem::Value);
    (tx, stream)
}

/// Creates a test channel that accepts `StreamItem<T>`, so tests can inject
/// upstream failures.
///
/// ```rust
/// use seqmap_test_utils::test_channel_with_errors;
/// use seqmap_core::{SeqMapError, StreamItem};
/// use futures::StreamExt;
///
/// # async fn example() {
/// let (tx, mut stream) = test_channel_with_errors();
///
/// tx.send(StreamItem::Value(42)).unwrap();
/// tx.send(StreamItem::Error(SeqMapError::stream_error("feed closed"))).unwrap();
///
/// assert!(stream.next().await.unwrap().is_value());
/// assert!(stream.next().await.unwrap().is_error());
/// # }
/// ```
pub fn test_channel_with_errors<T: Send + 'static>() -> (
    mpsc::UnboundedSender<StreamItem<T>>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx);
    (tx, stream)
}
