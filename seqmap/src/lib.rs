// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # seqmap
//!
//! Apply an async transform to every element of a stream with a bounded
//! number of transforms in flight, and get the results back in input order.
//!
//! ## Overview
//!
//! Running async work one element at a time is slow; running it all at once
//! with `join_all` is unbounded; `buffer_unordered` is bounded but loses the
//! input order. `ordered_map` keeps at most `K` transforms running, starts
//! them in input order, and parks early finishers in a reorder buffer until
//! every predecessor has been emitted.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seqmap::prelude::*;
//! use futures::{stream, StreamExt};
//! use std::time::Duration;
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("{0}/403")]
//! struct Forbidden(&'static str);
//!
//! #[tokio::main]
//! async fn main() -> seqmap::Result<()> {
//!     let urls = stream::iter(["a", "b", "c"]).into_stream_items();
//!
//!     let mut bodies = urls.ordered_map(
//!         |url| async move {
//!             tokio::time::sleep(Duration::from_millis(10)).await;
//!             if url == "b" { Err(Forbidden(url)) } else { Ok(url.to_uppercase()) }
//!         },
//!         OrderedMapConfig::new(3)?,
//!     );
//!
//!     while let Some(item) = bodies.next().await {
//!         match item {
//!             StreamItem::Value(body) => println!("{body}"),
//!             StreamItem::Error(e) => println!("{e}"),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Failure policies
//!
//! - [`ErrorPolicy::ContinueOnError`] (default): every input gets one outcome,
//!   failures included, in its position
//! - [`ErrorPolicy::FailFast`]: the first failure ends the stream
//!
//! ## Crates
//!
//! - `seqmap-core`: the runtime-independent state machine ([`OrderedPipeline`])
//! - `seqmap-exec`: the stream operators ([`OrderedMapExt`])

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

pub use seqmap_core::{
    CancellationToken, Concurrency, Emission, ErrorPolicy, IntoStreamItems, OrderedMapConfig,
    OrderedPipeline, PipelineStats, Result, SeqMapError, StreamItem,
};
pub use seqmap_exec::{OrderedMap, OrderedMapExt};
#[cfg(feature = "runtime-tokio")]
pub use seqmap_exec::{SpawnFailure, SpawnedTask};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CancellationToken, Concurrency, Emission, ErrorPolicy, IntoStreamItems,
        OrderedMapConfig, OrderedMapExt, SeqMapError, StreamItem,
    };
}
