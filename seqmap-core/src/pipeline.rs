// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The ordered-map state machine, independent of any stream library.
//!
//! [`OrderedPipeline`] wires a [`Sequencer`], a [`Scheduler`], a
//! [`ReorderBuffer`] and an [`Emitter`] behind a push/pull interface. A driver
//! repeats four steps until [`is_finished`](OrderedPipeline::is_finished):
//!
//! 1. while [`wants_input`](OrderedPipeline::wants_input), pull an upstream
//!    element and [`offer`](OrderedPipeline::offer) it (or report the end or
//!    failure of upstream);
//! 2. start a transform for everything [`next_dispatch`](OrderedPipeline::next_dispatch)
//!    hands out;
//! 3. report each finished transform through [`complete`](OrderedPipeline::complete);
//! 4. deliver everything [`next_output`](OrderedPipeline::next_output) yields.
//!
//! All mutation goes through `&mut self`, so a single driver serializes every
//! state transition even when transforms complete concurrently.
//!
//! ```
//! use seqmap_core::{OrderedMapConfig, OrderedPipeline, StreamItem};
//!
//! # fn main() -> seqmap_core::Result<()> {
//! let mut pipeline = OrderedPipeline::new(OrderedMapConfig::new(2)?);
//! let mut inputs = vec![1, 2, 3].into_iter();
//! let mut running = Vec::new();
//! let mut output = Vec::new();
//!
//! while !pipeline.is_finished() {
//!     while pipeline.wants_input() {
//!         match inputs.next() {
//!             Some(input) => { pipeline.offer(input)?; }
//!             None => pipeline.upstream_finished(),
//!         }
//!     }
//!     while let Some(task) = pipeline.next_dispatch() {
//!         running.push(task);
//!     }
//!     if let Some((index, input)) = running.pop() {
//!         pipeline.complete(index, Ok(input * 10))?;
//!     }
//!     while let Some(StreamItem::Value(value)) = pipeline.next_output() {
//!         output.push(value);
//!     }
//! }
//!
//! assert_eq!(output, vec![10, 20, 30]);
//! # Ok(())
//! # }
//! ```

use crate::config::{Emission, ErrorPolicy, OrderedMapConfig};
use crate::emitter::Emitter;
use crate::reorder_buffer::{Release, ReorderBuffer};
use crate::scheduler::Scheduler;
use crate::sequencer::{Sequencer, SequencerState};
use crate::{Result, SeqMapError, StreamItem};

/// Counters describing a pipeline's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    /// Elements pulled from upstream.
    pub sequenced: u64,
    /// Transforms started.
    pub dispatched: u64,
    /// Transforms that succeeded.
    pub completed: u64,
    /// Transforms that failed.
    pub failed: u64,
    /// Outcomes handed to the consumer.
    pub emitted: u64,
    /// Transforms running right now.
    pub in_flight: usize,
    /// Highest number of transforms ever running at once.
    pub peak_in_flight: usize,
    /// Outcomes parked in the reorder buffer right now.
    pub held: usize,
    /// Highest number of outcomes ever parked at once.
    pub peak_held: usize,
}

#[derive(Debug)]
pub struct OrderedPipeline<T, R> {
    config: OrderedMapConfig,
    sequencer: Sequencer,
    scheduler: Scheduler<T>,
    buffer: ReorderBuffer<R>,
    emitter: Emitter<R>,
    dispatched: u64,
    completed: u64,
    failed: u64,
}

impl<T, R> OrderedPipeline<T, R> {
    #[must_use]
    pub fn new(config: OrderedMapConfig) -> Self {
        Self {
            config,
            sequencer: Sequencer::new(),
            scheduler: Scheduler::new(config.concurrency()),
            buffer: ReorderBuffer::new(config.error_policy()),
            emitter: Emitter::new(),
            dispatched: 0,
            completed: 0,
            failed: 0,
        }
    }

    /// Whether the driver should pull another upstream element now.
    ///
    /// Elements are pulled on demand: only when a transform slot is free,
    /// nothing is queued, and the `max_buffered` bound (if any) is not reached.
    #[must_use]
    pub fn wants_input(&self) -> bool {
        self.sequencer.is_open()
            && !self.emitter.is_terminal()
            && self.scheduler.has_capacity()
            && self.scheduler.pending_count() == 0
            && self
                .config
                .max_buffered()
                .is_none_or(|limit| self.buffered() < limit.get())
    }

    /// Sequence an upstream element and queue it for dispatch.
    ///
    /// Returns the index assigned to `input`.
    ///
    /// # Errors
    /// Returns [`SeqMapError::StreamProcessingError`] once upstream has ended,
    /// failed, or the pipeline has terminated.
    pub fn offer(&mut self, input: T) -> Result<u64> {
        if self.emitter.is_terminal() {
            return Err(SeqMapError::stream_error(
                "element offered to a terminated pipeline",
            ));
        }

        let task = self.sequencer.assign(input)?;
        let index = task.index();
        self.scheduler.submit(task);
        Ok(index)
    }

    /// Record the end of the upstream sequence.
    pub fn upstream_finished(&mut self) {
        let count = self.sequencer.finish();
        debug!("seqmap: upstream exhausted after {count} elements");
        self.check_complete();
    }

    /// Record an upstream failure. Terminates the pipeline: nothing more is
    /// dispatched, held outcomes are discarded, outcomes already released are
    /// still delivered before the error.
    pub fn upstream_failed(&mut self, error: SeqMapError) {
        if self.emitter.is_terminal() {
            return;
        }

        let error = self.sequencer.fail(error);
        warn!("seqmap: terminating pipeline: {error}");
        self.terminate(error);
    }

    /// Next transform to start, if a slot is free.
    pub fn next_dispatch(&mut self) -> Option<(u64, T)> {
        if self.emitter.is_terminal() {
            return None;
        }

        let (index, input) = self.scheduler.next_dispatch()?;
        self.dispatched += 1;
        debug!(
            "seqmap: dispatched element {index} ({} in flight)",
            self.scheduler.active_count()
        );
        Some((index, input))
    }

    /// Report the outcome of the transform started for `index`.
    ///
    /// Completions arriving after the pipeline terminated are ignored.
    ///
    /// # Errors
    /// Returns [`SeqMapError::StreamProcessingError`] when `index` is not in flight.
    pub fn complete(&mut self, index: u64, outcome: Result<R>) -> Result<()> {
        if self.emitter.is_terminal() {
            debug!("seqmap: ignoring completion of element {index} after termination");
            return Ok(());
        }

        let completion = self.scheduler.complete(index, outcome)?;
        if completion.is_failed() {
            self.failed += 1;
        } else {
            self.completed += 1;
        }
        debug!(
            "seqmap: element {index} finished ({} in flight)",
            self.scheduler.active_count()
        );

        match self.config.emission() {
            Emission::InputOrder => match self.buffer.push(completion)? {
                Release::Ready(ready) => self.emitter.extend(ready),
                Release::Terminated { error, discarded } => {
                    warn!("seqmap: fail-fast on {error}; discarded {discarded} held outcomes");
                    self.terminate(error);
                }
            },
            Emission::CompletionOrder => match completion.into_outcome() {
                StreamItem::Error(error) if self.config.error_policy() == ErrorPolicy::FailFast => {
                    warn!("seqmap: fail-fast on {error}");
                    self.terminate(error);
                }
                outcome => self.emitter.extend([outcome]),
            },
        }

        self.check_complete();
        Ok(())
    }

    /// Cancel the pipeline from outside.
    ///
    /// Stops dispatch, discards held and undelivered outcomes, and terminates
    /// with [`SeqMapError::Cancelled`]. Returns `false` if the pipeline had
    /// already ended.
    pub fn cancel(&mut self) -> bool {
        if self.emitter.is_terminal() {
            return false;
        }

        let never_started = self.scheduler.shutdown();
        let held = self.buffer.discard();
        let emitted = self.emitter.emitted();
        let undelivered = self.emitter.abort(SeqMapError::cancelled(emitted));
        warn!(
            "seqmap: cancelled after {emitted} emitted; dropped {never_started} queued, {held} held, {undelivered} undelivered"
        );
        true
    }

    /// Next item for the consumer.
    pub fn next_output(&mut self) -> Option<StreamItem<R>> {
        self.emitter.next()
    }

    /// Every outcome (and terminal error, if any) has been delivered.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.emitter.is_finished()
    }

    /// The pipeline has ended (normally or not); no more transforms will be
    /// started and running ones can be dropped.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.emitter.is_terminal()
    }

    /// Outcomes completed but not yet delivered.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.held_len() + self.emitter.queued()
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.scheduler.active_count()
    }

    #[must_use]
    pub const fn config(&self) -> &OrderedMapConfig {
        &self.config
    }

    #[must_use]
    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            sequenced: self.sequencer.count(),
            dispatched: self.dispatched,
            completed: self.completed,
            failed: self.failed,
            emitted: self.emitter.emitted(),
            in_flight: self.scheduler.active_count(),
            peak_in_flight: self.scheduler.peak_in_flight(),
            held: self.buffer.held_len(),
            peak_held: self.buffer.peak_held(),
        }
    }

    fn terminate(&mut self, error: SeqMapError) {
        self.scheduler.shutdown();
        self.buffer.discard();
        self.emitter.fail(error);
    }

    fn check_complete(&mut self) {
        if matches!(self.sequencer.state(), SequencerState::Exhausted { .. })
            && self.scheduler.is_idle()
            && self.buffer.is_empty()
        {
            self.emitter.complete();
        }
    }
}
