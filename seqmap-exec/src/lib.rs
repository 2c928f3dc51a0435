// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Stream operators for seqmap.
//!
//! [`OrderedMapExt`] adds `ordered_map`, `ordered_map_with_cancel` and (with
//! `runtime-tokio`) `ordered_map_spawned` to every `Stream<Item = StreamItem<T>>`.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

pub mod ordered_map;
#[cfg(feature = "runtime-tokio")]
pub mod spawned;

pub use ordered_map::{OrderedMap, OrderedMapExt};
#[cfg(feature = "runtime-tokio")]
pub use spawned::{SpawnFailure, SpawnedTask};
