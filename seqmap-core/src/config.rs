// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Configuration of an ordered map.
//!
//! The concurrency limit has no default: every pipeline is built from an
//! explicit, validated [`Concurrency`].
//!
//! ```
//! use seqmap_core::{Emission, ErrorPolicy, OrderedMapConfig};
//!
//! let config = OrderedMapConfig::new(3)?
//!     .with_error_policy(ErrorPolicy::FailFast)
//!     .with_max_buffered(64);
//!
//! assert_eq!(config.concurrency().get(), 3);
//! assert_eq!(config.emission(), Emission::InputOrder);
//! # Ok::<(), seqmap_core::SeqMapError>(())
//! ```

use crate::error::{Result, SeqMapError};
use core::num::NonZeroUsize;

/// Maximum number of transforms in flight at once. Always greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "usize", into = "usize")
)]
pub struct Concurrency(NonZeroUsize);

impl Concurrency {
    /// Strictly sequential execution.
    pub const SEQUENTIAL: Self = Self(NonZeroUsize::MIN);

    /// Validate a concurrency limit.
    ///
    /// # Errors
    /// Returns [`SeqMapError::InvalidConcurrency`] when `limit` is zero.
    pub fn new(limit: usize) -> Result<Self> {
        NonZeroUsize::new(limit)
            .map(Self)
            .ok_or(SeqMapError::InvalidConcurrency { requested: limit })
    }

    /// The limit as a plain integer.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for Concurrency {
    type Error = SeqMapError;

    fn try_from(limit: usize) -> Result<Self> {
        Self::new(limit)
    }
}

impl From<NonZeroUsize> for Concurrency {
    fn from(limit: NonZeroUsize) -> Self {
        Self(limit)
    }
}

impl From<Concurrency> for usize {
    fn from(limit: Concurrency) -> Self {
        limit.get()
    }
}

/// What a failed transform does to the rest of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ErrorPolicy {
    /// Deliver the failure in its position and keep going.
    #[default]
    ContinueOnError,
    /// Terminate on the first failure, discarding everything still buffered.
    FailFast,
}

/// Order in which outcomes are handed downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Emission {
    /// Input order, through the reorder buffer.
    #[default]
    InputOrder,
    /// Completion order; the reorder buffer is bypassed.
    CompletionOrder,
}

/// Full configuration of an ordered map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderedMapConfig {
    concurrency: Concurrency,
    #[cfg_attr(feature = "serde", serde(default))]
    error_policy: ErrorPolicy,
    #[cfg_attr(feature = "serde", serde(default))]
    emission: Emission,
    #[cfg_attr(feature = "serde", serde(default))]
    max_buffered: Option<NonZeroUsize>,
}

impl OrderedMapConfig {
    /// Configuration with the given concurrency and default policies.
    ///
    /// # Errors
    /// Returns [`SeqMapError::InvalidConcurrency`] when `concurrency` is zero.
    pub fn new(concurrency: usize) -> Result<Self> {
        Concurrency::new(concurrency).map(Self::with_concurrency)
    }

    /// Configuration from an already validated limit.
    #[must_use]
    pub const fn with_concurrency(concurrency: Concurrency) -> Self {
        Self {
            concurrency,
            error_policy: ErrorPolicy::ContinueOnError,
            emission: Emission::InputOrder,
            max_buffered: None,
        }
    }

    #[must_use]
    pub const fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    /// Shorthand for `with_error_policy(ErrorPolicy::FailFast)`.
    #[must_use]
    pub const fn fail_fast(self) -> Self {
        self.with_error_policy(ErrorPolicy::FailFast)
    }

    #[must_use]
    pub const fn with_emission(mut self, emission: Emission) -> Self {
        self.emission = emission;
        self
    }

    /// Stop pulling upstream while this many outcomes wait for delivery.
    ///
    /// Zero removes the bound.
    #[must_use]
    pub const fn with_max_buffered(mut self, max_buffered: usize) -> Self {
        self.max_buffered = NonZeroUsize::new(max_buffered);
        self
    }

    #[must_use]
    pub const fn concurrency(&self) -> Concurrency {
        self.concurrency
    }

    #[must_use]
    pub const fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    #[must_use]
    pub const fn emission(&self) -> Emission {
        self.emission
    }

    #[must_use]
    pub const fn max_buffered(&self) -> Option<NonZeroUsize> {
        self.max_buffered
    }
}

impl From<Concurrency> for OrderedMapConfig {
    fn from(concurrency: Concurrency) -> Self {
        Self::with_concurrency(concurrency)
    }
}
