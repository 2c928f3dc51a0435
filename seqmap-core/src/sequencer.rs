// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::task::Task;
use crate::{Result, SeqMapError};

/// Lifecycle of the upstream sequence as seen by the [`Sequencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// More elements may arrive.
    Open,
    /// Upstream ended after `count` elements.
    Exhausted { count: u64 },
    /// Upstream failed; nothing more is pulled.
    Failed,
}

/// Assigns consecutive indices, starting at 0, to upstream elements.
#[derive(Debug)]
pub struct Sequencer {
    next_index: u64,
    state: SequencerState,
}

impl Sequencer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_index: 0,
            state: SequencerState::Open,
        }
    }

    /// Pair `input` with the next index.
    ///
    /// # Errors
    /// Returns [`SeqMapError::StreamProcessingError`] once upstream has ended or failed.
    pub fn assign<T>(&mut self, input: T) -> Result<Task<T>> {
        if self.state != SequencerState::Open {
            return Err(SeqMapError::stream_error(
                "element received after upstream terminated",
            ));
        }

        let task = Task::new(self.next_index, input);
        self.next_index += 1;
        Ok(task)
    }

    /// Record upstream exhaustion. Returns the final element count.
    pub fn finish(&mut self) -> u64 {
        if self.state == SequencerState::Open {
            self.state = SequencerState::Exhausted {
                count: self.next_index,
            };
        }
        self.next_index
    }

    /// Wrap an upstream error, recording the failure. The error carries the
    /// index the failed element would have received.
    pub fn fail(&mut self, error: SeqMapError) -> SeqMapError {
        self.state = SequencerState::Failed;
        SeqMapError::upstream_failure(self.next_index, error)
    }

    #[must_use]
    pub const fn state(&self) -> SequencerState {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == SequencerState::Open
    }

    /// Number of elements sequenced so far.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.next_index
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}
