// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{SeqMapError, StreamItem};
use std::collections::VecDeque;

#[derive(Debug)]
enum Terminal {
    Open,
    Completed,
    Failed(Option<SeqMapError>),
}

/// Hands released outcomes to the consumer one at a time and signals the end
/// of the stream.
///
/// After [`fail`](Self::fail) the queued outcomes are still delivered, then the
/// error once, then nothing. After [`complete`](Self::complete) the queue
/// drains and the stream ends.
#[derive(Debug)]
pub struct Emitter<R> {
    ready: VecDeque<StreamItem<R>>,
    terminal: Terminal,
    emitted: u64,
}

impl<R> Emitter<R> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ready: VecDeque::new(),
            terminal: Terminal::Open,
            emitted: 0,
        }
    }

    /// Queue released outcomes. Ignored once the emitter is terminal.
    pub fn extend(&mut self, released: impl IntoIterator<Item = StreamItem<R>>) {
        if matches!(self.terminal, Terminal::Open) {
            self.ready.extend(released);
        }
    }

    /// Signal normal completion.
    pub fn complete(&mut self) {
        if matches!(self.terminal, Terminal::Open) {
            self.terminal = Terminal::Completed;
        }
    }

    /// Signal termination with `error`, delivered after the queued outcomes.
    pub fn fail(&mut self, error: SeqMapError) {
        if matches!(self.terminal, Terminal::Open) {
            self.terminal = Terminal::Failed(Some(error));
        }
    }

    /// Drop queued outcomes, then terminate with `error`.
    ///
    /// Returns how many queued outcomes were dropped.
    pub fn abort(&mut self, error: SeqMapError) -> usize {
        if !matches!(self.terminal, Terminal::Open) {
            return 0;
        }
        let dropped = self.ready.len();
        self.ready.clear();
        self.terminal = Terminal::Failed(Some(error));
        dropped
    }

    /// Next item for the consumer, if one is available.
    pub fn next(&mut self) -> Option<StreamItem<R>> {
        if let Some(item) = self.ready.pop_front() {
            self.emitted += 1;
            return Some(item);
        }

        match &mut self.terminal {
            Terminal::Failed(error) => error.take().map(StreamItem::Error),
            Terminal::Open | Terminal::Completed => None,
        }
    }

    /// Nothing left to deliver and the stream has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.ready.is_empty()
            && matches!(
                self.terminal,
                Terminal::Completed | Terminal::Failed(None)
            )
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self.terminal, Terminal::Open)
    }

    /// Outcomes queued but not yet handed out.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.ready.len()
    }

    /// Outcomes handed out so far, not counting a terminal error.
    #[must_use]
    pub const fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl<R> Default for Emitter<R> {
    fn default() -> Self {
        Self::new()
    }
}
