// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for seqmap pipelines.
//!
//! [`SeqMapError`] covers the three ways an ordered map can end early
//! (upstream failure, transform failure, cancellation) plus configuration
//! and bookkeeping errors.
//!
//! # Examples
//!
//! ```
//! use seqmap_core::{Result, SeqMapError};
//!
//! fn load() -> Result<()> {
//!     Err(SeqMapError::stream_error("source not ready"))
//! }
//!
//! assert!(load().is_err());
//! ```

use std::error::Error;
use std::sync::Arc;

/// Shared, clonable error source.
pub type SharedError = Arc<dyn Error + Send + Sync + 'static>;

/// Root error type for all seqmap operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SeqMapError {
    /// The input sequence failed to produce the element that would have been
    /// sequenced at `index`.
    #[error("Upstream failure before element {index}: {source}")]
    UpstreamFailure {
        /// Index the failed element would have received.
        index: u64,
        /// Error reported by the upstream sequence.
        #[source]
        source: SharedError,
    },

    /// The transform failed for the element at `index`.
    #[error("Transform failure for element {index}: {source}")]
    TransformFailure {
        /// Index of the element whose transform failed.
        index: u64,
        /// Error returned by the transform.
        #[source]
        source: SharedError,
    },

    /// The pipeline was cancelled externally before completion.
    #[error("Pipeline cancelled after {emitted} emitted items")]
    Cancelled {
        /// Number of items handed downstream before cancellation.
        emitted: u64,
    },

    /// A concurrency limit of zero was requested.
    #[error("Invalid concurrency {requested}: must be greater than zero")]
    InvalidConcurrency {
        /// The rejected value.
        requested: usize,
    },

    /// Stream processing encountered an error
    ///
    /// General bookkeeping error, e.g. a completion for an index that is not
    /// in flight.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong during stream processing
        context: String,
    },
}

impl SeqMapError {
    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Wrap an upstream error observed where element `index` was expected.
    pub fn upstream_failure(index: u64, error: impl Error + Send + Sync + 'static) -> Self {
        Self::UpstreamFailure {
            index,
            source: Arc::new(error),
        }
    }

    /// Wrap a transform error for element `index`.
    pub fn transform_failure(index: u64, error: impl Error + Send + Sync + 'static) -> Self {
        Self::TransformFailure {
            index,
            source: Arc::new(error),
        }
    }

    /// Cancellation after `emitted` items reached the consumer.
    pub const fn cancelled(emitted: u64) -> Self {
        Self::Cancelled { emitted }
    }

    /// Returns `true` for [`SeqMapError::TransformFailure`].
    #[must_use]
    pub const fn is_transform_failure(&self) -> bool {
        matches!(self, Self::TransformFailure { .. })
    }

    /// Returns `true` for [`SeqMapError::UpstreamFailure`].
    #[must_use]
    pub const fn is_upstream_failure(&self) -> bool {
        matches!(self, Self::UpstreamFailure { .. })
    }

    /// Returns `true` for [`SeqMapError::Cancelled`].
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Returns `true` for errors that end a pipeline regardless of its
    /// [`ErrorPolicy`](crate::ErrorPolicy).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::UpstreamFailure { .. } | Self::Cancelled { .. })
    }

    /// The wrapped upstream or transform error, for downcasting.
    ///
    /// ```
    /// use seqmap_core::SeqMapError;
    ///
    /// let error = SeqMapError::transform_failure(0, std::fmt::Error);
    /// assert!(error.cause().is_some_and(|e| e.is::<std::fmt::Error>()));
    /// ```
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        match self {
            Self::UpstreamFailure { source, .. } | Self::TransformFailure { source, .. } => {
                Some(source.as_ref())
            }
            _ => None,
        }
    }

    /// Element index the error is attached to, if any.
    #[must_use]
    pub const fn index(&self) -> Option<u64> {
        match self {
            Self::UpstreamFailure { index, .. } | Self::TransformFailure { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }
}

/// Specialized Result type for seqmap operations
///
/// # Examples
///
/// ```
/// use seqmap_core::Result;
///
/// fn process() -> Result<String> {
///     Ok("processed".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, SeqMapError>;

/// Helper trait for adding context to `Result`s
pub trait ResultExt<T> {
    /// Replace the error with a [`SeqMapError::StreamProcessingError`] carrying
    /// `context` and the original message.
    ///
    /// # Errors
    /// Returns `Err(SeqMapError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: core::fmt::Display,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| SeqMapError::StreamProcessingError {
            context: format!("{}: {e}", context.into()),
        })
    }
}
