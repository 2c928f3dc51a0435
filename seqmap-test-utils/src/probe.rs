// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Observes how many transforms execute at the same time.

use core::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct ProbeState {
    current: AtomicUsize,
    peak: AtomicUsize,
    started: AtomicUsize,
    finished: AtomicUsize,
}

/// Shared counter of running transforms.
///
/// Clone it into the transform and wrap the work in [`track`](Self::track)
/// (or hold a [`ProbeGuard`] from [`enter`](Self::enter)). A transform that is
/// dropped before finishing still leaves the probe, but does not count as
/// finished.
///
/// ```rust
/// use seqmap_test_utils::ConcurrencyProbe;
///
/// # async fn example() {
/// let probe = ConcurrencyProbe::new();
/// let value = probe.track(async { 42 }).await;
///
/// assert_eq!(value, 42);
/// assert_eq!(probe.peak(), 1);
/// assert_eq!(probe.current(), 0);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConcurrencyProbe {
    state: Arc<ProbeState>,
}

impl ConcurrencyProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one transform as running until the guard is dropped.
    pub fn enter(&self) -> ProbeGuard {
        self.state.started.fetch_add(1, Ordering::SeqCst);
        let now = self.state.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.peak.fetch_max(now, Ordering::SeqCst);
        ProbeGuard {
            state: Arc::clone(&self.state),
            finished: false,
        }
    }

    /// Run `future` while counted as running.
    pub async fn track<F: Future>(&self, future: F) -> F::Output {
        let mut guard = self.enter();
        let output = future.await;
        guard.finish();
        output
    }

    /// Transforms running right now.
    pub fn current(&self) -> usize {
        self.state.current.load(Ordering::SeqCst)
    }

    /// Highest number of transforms observed running at once.
    pub fn peak(&self) -> usize {
        self.state.peak.load(Ordering::SeqCst)
    }

    /// Transforms that were started.
    pub fn started(&self) -> usize {
        self.state.started.load(Ordering::SeqCst)
    }

    /// Transforms that ran to completion.
    pub fn finished(&self) -> usize {
        self.state.finished.load(Ordering::SeqCst)
    }
}

/// Keeps one transform counted as running; see [`ConcurrencyProbe::enter`].
#[derive(Debug)]
pub struct ProbeGuard {
    state: Arc<ProbeState>,
    finished: bool,
}

impl ProbeGuard {
    /// Count the transform as finished once the guard drops.
    pub fn finish(&mut self) {
        self.finished = true;
    }
}

impl Drop for ProbeGuard {
    fn drop(&mut self) {
        self.state.current.fetch_sub(1, Ordering::SeqCst);
        if self.finished {
            self.state.finished.fetch_add(1, Ordering::SeqCst);
        }
    }
}
