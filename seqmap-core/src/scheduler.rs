// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bounded-concurrency dispatch queue.
//!
//! The scheduler does not run anything itself: it decides *which* task may
//! start and tracks how many are running. The driver (a stream's `poll_next`)
//! starts the transform for every task handed out by [`Scheduler::next_dispatch`]
//! and reports back through [`Scheduler::complete`].

use crate::config::Concurrency;
use crate::task::{Completion, InFlight, Task};
use crate::{Result, SeqMapError};
use std::collections::{HashMap, VecDeque};

#[derive(Debug)]
pub struct Scheduler<T> {
    capacity: Concurrency,
    pending: VecDeque<Task<T>>,
    in_flight: HashMap<u64, InFlight>,
    peak_in_flight: usize,
}

impl<T> Scheduler<T> {
    #[must_use]
    pub fn new(capacity: Concurrency) -> Self {
        Self {
            capacity,
            pending: VecDeque::new(),
            in_flight: HashMap::with_capacity(capacity.get()),
            peak_in_flight: 0,
        }
    }

    /// Queue a task behind every previously submitted one.
    pub fn submit(&mut self, task: Task<T>) {
        debug_assert!(
            self.pending.back().is_none_or(|last| last.index() < task.index()),
            "tasks must be submitted in sequence order"
        );
        self.pending.push_back(task);
    }

    /// Hand out the head of the queue if a slot is free.
    ///
    /// The task is counted as in flight from this point on. Returns its index
    /// and the input to run the transform on.
    pub fn next_dispatch(&mut self) -> Option<(u64, T)> {
        if !self.has_capacity() {
            return None;
        }

        let task = self.pending.pop_front()?;
        let (in_flight, input) = task.dispatch();
        let index = in_flight.index();
        self.in_flight.insert(index, in_flight);
        self.peak_in_flight = self.peak_in_flight.max(self.in_flight.len());
        Some((index, input))
    }

    /// Release the slot held by `index` and record its outcome.
    ///
    /// # Errors
    /// Returns [`SeqMapError::StreamProcessingError`] if `index` is not in flight.
    pub fn complete<R>(&mut self, index: u64, outcome: Result<R>) -> Result<Completion<R>> {
        let in_flight = self.in_flight.remove(&index).ok_or_else(|| {
            SeqMapError::stream_error(format!(
                "completion for element {index} which is not in flight"
            ))
        })?;

        Ok(in_flight.complete(outcome))
    }

    /// Stop all work: forget in-flight slots and drop queued tasks.
    ///
    /// Returns the number of queued tasks that were never dispatched.
    pub fn shutdown(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.in_flight.clear();
        dropped
    }

    #[must_use]
    pub fn has_capacity(&self) -> bool {
        self.in_flight.len() < self.capacity.get()
    }

    #[must_use]
    pub const fn capacity(&self) -> Concurrency {
        self.capacity
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.in_flight.len()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub const fn peak_in_flight(&self) -> usize {
        self.peak_in_flight
    }

    /// Nothing queued and nothing running.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.in_flight.is_empty()
    }
}
