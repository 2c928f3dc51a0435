// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::StreamExt;
use seqmap_core::{SeqMapError, StreamItem};
use seqmap_test_utils::{
    assert_no_element_emitted, assert_stream_ended, delayed, delayed_result, test_channel,
    test_channel_with_errors, unwrap_stream, unwrap_value, TestError,
};

#[tokio::test]
async fn test_channel_wraps_values() -> anyhow::Result<()> {
    // Arrange
    let (tx, mut stream) = test_channel();

    // Act
    tx.send("a")?;

    // Assert
    assert_eq!(unwrap_value(stream.next().await), "a");
    assert_no_element_emitted(&mut stream, 10).await;
    Ok(())
}

#[tokio::test]
async fn test_channel_with_errors_passes_errors_through() -> anyhow::Result<()> {
    // Arrange
    let (tx, mut stream) = test_channel_with_errors::<i32>();

    // Act
    tx.send(StreamItem::Error(SeqMapError::stream_error("feed closed")))?;
    drop(tx);

    // Assert
    assert!(unwrap_stream(&mut stream, 100).await.is_error());
    assert_stream_ended(&mut stream, 100).await;
    Ok(())
}

#[tokio::test]
#[should_panic(expected = "Unexpected element emitted")]
async fn test_assert_no_element_emitted_panics_on_item() {
    let (tx, mut stream) = test_channel();
    tx.send(1).unwrap();

    assert_no_element_emitted(&mut stream, 50).await;
}

#[tokio::test]
async fn test_delayed_transforms() {
    assert_eq!(delayed("x", 5).await, Ok("x"));
    assert_eq!(
        delayed_result::<()>(Err(TestError::forbidden("b")), 5).await,
        Err(TestError::forbidden("b"))
    );
    assert_eq!(TestError::forbidden("b").to_string(), "b/403");
}
