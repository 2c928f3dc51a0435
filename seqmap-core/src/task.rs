// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-element bookkeeping.
//!
//! A task moves `Pending → InFlight → Completed | Failed` exactly once. Each
//! stage is its own type and every transition consumes the previous stage, so
//! a task can neither skip a stage nor go back.

use crate::{SeqMapError, StreamItem};

/// Lifecycle stage of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    Pending,
    InFlight,
    Completed,
    Failed,
}

/// A sequenced element waiting for dispatch.
#[derive(Debug)]
pub struct Task<T> {
    index: u64,
    input: T,
}

impl<T> Task<T> {
    pub(crate) const fn new(index: u64, input: T) -> Self {
        Self { index, input }
    }

    #[must_use]
    pub const fn index(&self) -> u64 {
        self.index
    }

    #[must_use]
    pub const fn state(&self) -> TaskState {
        TaskState::Pending
    }

    pub const fn input(&self) -> &T {
        &self.input
    }

    /// Start the transform: yields the in-flight marker and the input to run it on.
    pub fn dispatch(self) -> (InFlight, T) {
        (InFlight { index: self.index }, self.input)
    }
}

/// A task whose transform is running.
#[derive(Debug, PartialEq, Eq)]
pub struct InFlight {
    index: u64,
}

impl InFlight {
    #[must_use]
    pub const fn index(&self) -> u64 {
        self.index
    }

    #[must_use]
    pub const fn state(&self) -> TaskState {
        TaskState::InFlight
    }

    /// Record the transform's outcome.
    pub fn complete<R>(self, outcome: Result<R, SeqMapError>) -> Completion<R> {
        Completion {
            index: self.index,
            outcome: outcome.into(),
        }
    }
}

/// A finished task carrying its outcome.
#[derive(Debug)]
pub struct Completion<R> {
    index: u64,
    outcome: StreamItem<R>,
}

impl<R> Completion<R> {
    /// Build a completion record directly, e.g. when replaying outcomes into a
    /// [`ReorderBuffer`](crate::ReorderBuffer).
    pub const fn new(index: u64, outcome: StreamItem<R>) -> Self {
        Self { index, outcome }
    }

    #[must_use]
    pub const fn index(&self) -> u64 {
        self.index
    }

    #[must_use]
    pub const fn state(&self) -> TaskState {
        match self.outcome {
            StreamItem::Value(_) => TaskState::Completed,
            StreamItem::Error(_) => TaskState::Failed,
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        self.outcome.is_error()
    }

    pub const fn outcome(&self) -> &StreamItem<R> {
        &self.outcome
    }

    pub fn into_outcome(self) -> StreamItem<R> {
        self.outcome
    }

    pub fn into_parts(self) -> (u64, StreamItem<R>) {
        (self.index, self.outcome)
    }
}
