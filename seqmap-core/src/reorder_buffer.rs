// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Reorder buffer: parks out-of-order completions and releases the longest
//! contiguous run that starts right after the last released index.
//!
//! ```
//! use seqmap_core::{Concurrency, ErrorPolicy, ReorderBuffer, Release, Scheduler, Sequencer};
//!
//! # fn main() -> seqmap_core::Result<()> {
//! let mut sequencer = Sequencer::new();
//! let mut scheduler = Scheduler::new(Concurrency::new(3)?);
//! let mut buffer = ReorderBuffer::new(ErrorPolicy::ContinueOnError);
//!
//! for input in ["a", "b", "c"] {
//!     scheduler.submit(sequencer.assign(input)?);
//! }
//! while scheduler.next_dispatch().is_some() {}
//!
//! // "c" finishes first and is parked.
//! let parked = buffer.push(scheduler.complete(2, Ok("C"))?)?;
//! assert!(matches!(parked, Release::Ready(ref ready) if ready.is_empty()));
//!
//! // "a" releases itself, "b" then releases itself and "c".
//! buffer.push(scheduler.complete(0, Ok("A"))?)?;
//! let Release::Ready(ready) = buffer.push(scheduler.complete(1, Ok("B"))?)? else {
//!     unreachable!()
//! };
//! assert_eq!(ready.into_iter().map(|item| item.unwrap()).collect::<Vec<_>>(), ["B", "C"]);
//! # Ok(())
//! # }
//! ```

use crate::config::ErrorPolicy;
use crate::task::Completion;
use crate::{Result, SeqMapError, StreamItem};
use std::collections::HashMap;

/// Result of pushing one completion into the [`ReorderBuffer`].
#[derive(Debug)]
pub enum Release<R> {
    /// Outcomes that became contiguous, in ascending index order. Empty when
    /// the completion had to be parked.
    Ready(Vec<StreamItem<R>>),
    /// A failure under [`ErrorPolicy::FailFast`] terminated the buffer.
    Terminated {
        error: SeqMapError,
        /// Held outcomes dropped without emission.
        discarded: usize,
    },
}

#[derive(Debug)]
pub struct ReorderBuffer<R> {
    policy: ErrorPolicy,
    // Always last emitted index + 1.
    next_index: u64,
    held: HashMap<u64, StreamItem<R>>,
    peak_held: usize,
    terminated: bool,
}

impl<R> ReorderBuffer<R> {
    #[must_use]
    pub fn new(policy: ErrorPolicy) -> Self {
        Self {
            policy,
            next_index: 0,
            held: HashMap::new(),
            peak_held: 0,
            terminated: false,
        }
    }

    /// Park `completion` and release whatever became contiguous.
    ///
    /// # Errors
    /// Returns [`SeqMapError::StreamProcessingError`] when the index was already
    /// released or is already held, or when the buffer has terminated. The
    /// buffer is left unchanged in that case.
    pub fn push(&mut self, completion: Completion<R>) -> Result<Release<R>> {
        let (index, outcome) = completion.into_parts();

        if self.terminated {
            return Err(SeqMapError::stream_error(format!(
                "completion for element {index} after the reorder buffer terminated"
            )));
        }
        if index < self.next_index || self.held.contains_key(&index) {
            return Err(SeqMapError::stream_error(format!(
                "element {index} was already released or is already held"
            )));
        }

        if let (ErrorPolicy::FailFast, StreamItem::Error(error)) = (self.policy, &outcome) {
            let error = error.clone();
            let discarded = self.discard();
            return Ok(Release::Terminated { error, discarded });
        }

        self.held.insert(index, outcome);
        let ready = self.drain_contiguous();
        // Only outcomes still parked after the drain count as held.
        self.peak_held = self.peak_held.max(self.held.len());

        Ok(Release::Ready(ready))
    }

    fn drain_contiguous(&mut self) -> Vec<StreamItem<R>> {
        let mut ready = Vec::new();
        while let Some(outcome) = self.held.remove(&self.next_index) {
            ready.push(outcome);
            self.next_index += 1;
        }
        ready
    }

    /// Drop every held outcome and refuse further completions.
    ///
    /// Returns how many outcomes were dropped.
    pub fn discard(&mut self) -> usize {
        self.terminated = true;
        let discarded = self.held.len();
        self.held.clear();
        discarded
    }

    /// Highest index released so far.
    #[must_use]
    pub const fn last_emitted(&self) -> Option<u64> {
        self.next_index.checked_sub(1)
    }

    /// Index that has to complete before anything else is released.
    #[must_use]
    pub const fn next_expected(&self) -> u64 {
        self.next_index
    }

    #[must_use]
    pub fn held_len(&self) -> usize {
        self.held.len()
    }

    #[must_use]
    pub const fn peak_held(&self) -> usize {
        self.peak_held
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        self.terminated
    }

    #[must_use]
    pub const fn policy(&self) -> ErrorPolicy {
        self.policy
    }
}
