// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core state machine of seqmap's bounded-concurrency, order-preserving map.
//!
//! The pieces, leaf to root:
//!
//! - [`Task`], [`InFlight`], [`Completion`]: per-element records
//! - [`Sequencer`]: assigns indices 0, 1, 2, ... to upstream elements
//! - [`Scheduler`]: FIFO dispatch under a [`Concurrency`] cap
//! - [`ReorderBuffer`]: parks out-of-order completions, releases contiguous runs
//! - [`Emitter`]: hands outcomes to the consumer and signals the end
//! - [`OrderedPipeline`]: all of the above behind one push/pull interface
//!
//! Nothing here polls futures or depends on a runtime; `seqmap-exec` drives an
//! [`OrderedPipeline`] from a `Stream`.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

pub mod cancellation_token;
pub mod config;
pub mod emitter;
pub mod error;
pub mod into_stream;
pub mod pipeline;
pub mod reorder_buffer;
pub mod scheduler;
pub mod sequencer;
pub mod stream_item;
pub mod task;

pub use self::cancellation_token::{CancellationToken, Cancelled, CancelledOwned};
pub use self::config::{Concurrency, Emission, ErrorPolicy, OrderedMapConfig};
pub use self::emitter::Emitter;
pub use self::error::{Result, ResultExt, SeqMapError, SharedError};
pub use self::into_stream::IntoStreamItems;
pub use self::pipeline::{OrderedPipeline, PipelineStats};
pub use self::reorder_buffer::{Release, ReorderBuffer};
pub use self::scheduler::Scheduler;
pub use self::sequencer::{Sequencer, SequencerState};
pub use self::stream_item::StreamItem;
pub use self::task::{Completion, InFlight, Task, TaskState};
