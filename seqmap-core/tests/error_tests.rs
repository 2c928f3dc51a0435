// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use seqmap_core::{ResultExt, SeqMapError, StreamItem};
use std::error::Error;
use std::fmt;

#[derive(Debug)]
struct Forbidden(&'static str);

impl fmt::Display for Forbidden {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/403", self.0)
    }
}

impl Error for Forbidden {}

#[test]
fn test_transform_failure_display_and_source() {
    let error = SeqMapError::transform_failure(1, Forbidden("b"));

    assert_eq!(error.to_string(), "Transform failure for element 1: b/403");
    assert_eq!(error.index(), Some(1));
    assert!(error.is_transform_failure());
    assert!(!error.is_terminal());
    assert_eq!(error.source().map(ToString::to_string), Some("b/403".to_string()));
}

#[test]
fn test_cause_downcasts_to_original_error() {
    let error = SeqMapError::transform_failure(1, Forbidden("b"));

    let forbidden = error.cause().and_then(|cause| cause.downcast_ref::<Forbidden>());

    assert_eq!(forbidden.map(|f| f.0), Some("b"));
    assert!(SeqMapError::cancelled(0).cause().is_none());
}

#[test]
fn test_upstream_failure_display() {
    let error = SeqMapError::upstream_failure(4, Forbidden("feed"));

    assert_eq!(error.to_string(), "Upstream failure before element 4: feed/403");
    assert!(error.is_upstream_failure());
    assert!(error.is_terminal());
    assert!(!error.is_transform_failure());
}

#[test]
fn test_cancelled_display() {
    let error = SeqMapError::cancelled(3);

    assert_eq!(error.to_string(), "Pipeline cancelled after 3 emitted items");
    assert!(error.is_cancelled());
    assert_eq!(error.index(), None);
}

#[test]
fn test_invalid_concurrency_display() {
    let error = SeqMapError::InvalidConcurrency { requested: 0 };

    assert_eq!(
        error.to_string(),
        "Invalid concurrency 0: must be greater than zero"
    );
}

#[test]
fn test_clone_shares_source() {
    let error = SeqMapError::transform_failure(0, Forbidden("a"));
    let cloned = error.clone();

    assert_eq!(error.to_string(), cloned.to_string());
    assert!(cloned.source().is_some());
}

#[test]
fn test_context_wraps_foreign_error() {
    let result: Result<(), Forbidden> = Err(Forbidden("config"));

    let error = result.context("loading pipeline").unwrap_err();

    assert_eq!(
        error.to_string(),
        "Stream processing error: loading pipeline: config/403"
    );
}

#[test]
fn test_stream_item_from_result() {
    let ok: StreamItem<i32> = Ok(7).into();
    let err: StreamItem<i32> = Err(SeqMapError::stream_error("nope")).into();

    assert_eq!(ok.ok(), Some(7));
    assert!(err.is_error());
}

#[test]
fn test_stream_item_errors_never_compare_equal() {
    let left: StreamItem<i32> = StreamItem::Error(SeqMapError::cancelled(0));
    let right: StreamItem<i32> = StreamItem::Error(SeqMapError::cancelled(0));

    assert_ne!(left, right);
    assert_eq!(StreamItem::Value(1), StreamItem::Value(1));
}
