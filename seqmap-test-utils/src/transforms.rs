// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Ready-made transform bodies for ordered-map tests.

use std::time::Duration;
use tokio::time::sleep;

/// Error returned by test transforms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TestError {
    /// Mimics a rejected request for `resource`.
    #[error("{0}/403")]
    Forbidden(String),
}

impl TestError {
    pub fn forbidden(resource: impl Into<String>) -> Self {
        Self::Forbidden(resource.into())
    }
}

/// Resolve to `value` after `delay_ms`.
pub async fn delayed<T>(value: T, delay_ms: u64) -> Result<T, TestError> {
    sleep(Duration::from_millis(delay_ms)).await;
    Ok(value)
}

/// Resolve to `result` after `delay_ms`.
pub async fn delayed_result<T>(
    result: Result<T, TestError>,
    delay_ms: u64,
) -> Result<T, TestError> {
    sleep(Duration::from_millis(delay_ms)).await;
    result
}
