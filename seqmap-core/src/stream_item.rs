// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::SeqMapError;

/// One element of an ordered-map stream, in or out.
///
/// Upstream sequences report failures in-band as `Error`. On the output side
/// an `Error` is either a per-element transform failure (continue-on-error)
/// or the terminal error of the pipeline.
#[derive(Debug, Clone)]
pub enum StreamItem<T> {
    Value(T),
    Error(SeqMapError),
}

// Errors carry opaque sources, so two errors never compare equal.
impl<T: PartialEq> PartialEq for StreamItem<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            _ => false,
        }
    }
}

impl<T> StreamItem<T> {
    #[must_use]
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The value, if any.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    pub const fn as_error(&self) -> Option<&SeqMapError> {
        match self {
            Self::Value(_) => None,
            Self::Error(error) => Some(error),
        }
    }

    /// # Panics
    /// Panics on `Error`.
    pub fn unwrap(self) -> T {
        match self {
            Self::Value(value) => value,
            Self::Error(error) => panic!("called `StreamItem::unwrap()` on an error: {error}"),
        }
    }

    /// # Panics
    /// Panics on `Value`.
    pub fn unwrap_err(self) -> SeqMapError {
        match self {
            Self::Value(_) => panic!("called `StreamItem::unwrap_err()` on a value"),
            Self::Error(error) => error,
        }
    }
}

impl<T> From<Result<T, SeqMapError>> for StreamItem<T> {
    fn from(outcome: Result<T, SeqMapError>) -> Self {
        match outcome {
            Ok(value) => Self::Value(value),
            Err(error) => Self::Error(error),
        }
    }
}
