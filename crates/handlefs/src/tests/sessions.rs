// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::new_store;
use crate::{ErrorKind, MemoryBackend, Store, WriteOptions};

#[tokio::test]
async fn test_appendable_commits_on_close() {
    let store = new_store().await;
    store
        .write_file("s", "head\n", WriteOptions::default())
        .await
        .unwrap();

    let mut appendable = store.create_appendable("s").await.unwrap();
    appendable.write("a\n").await.unwrap();
    appendable.write(b"b\n").await.unwrap();

    // Nothing is visible before close
    assert_eq!(store.read_text("s").await.unwrap(), "head\n");

    appendable.close().await.unwrap();
    assert_eq!(store.read_text("s").await.unwrap(), "head\na\nb\n");
}

#[tokio::test]
async fn test_appendable_abort_discards() {
    let store = new_store().await;
    let mut appendable = store.create_appendable("new/file").await.unwrap();
    appendable.write("discard me").await.unwrap();
    appendable.abort().await.unwrap();

    assert!(store.exists("new/file").await);
    assert!(store.read_binary("new/file").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_appendable_seek_past_end_zero_fills() {
    let store = new_store().await;
    let mut appendable = store.create_appendable("gap").await.unwrap();
    appendable.write("ab").await.unwrap();
    appendable.seek(4).await.unwrap();
    appendable.write("c").await.unwrap();
    appendable.close().await.unwrap();

    assert_eq!(store.read_binary("gap").await.unwrap(), b"ab\0\0c");
}

#[tokio::test]
async fn test_appendable_write_over_quota_can_be_aborted() {
    let store = Store::with_backend(MemoryBackend::new(Some(4)))
        .await
        .unwrap();
    let mut appendable = store.create_appendable("q").await.unwrap();
    appendable.write("abc").await.unwrap();

    let err = appendable.write("def").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::QuotaExceeded);

    appendable.abort().await.unwrap();
    assert!(store.read_binary("q").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let store = new_store().await;
    let mut first = store.create_appendable("f").await.unwrap();
    let mut second = store.create_appendable("f").await.unwrap();
    first.write("1").await.unwrap();
    second.write("22").await.unwrap();

    first.close().await.unwrap();
    assert_eq!(store.read_text("f").await.unwrap(), "1");

    // Last close wins
    second.close().await.unwrap();
    assert_eq!(store.read_text("f").await.unwrap(), "22");
}

#[tokio::test]
async fn test_contract_rejects_use_after_finalize() {
    let store = new_store().await;
    let file = store.file_handle("raw", true).await.unwrap();

    let mut session = file.open_session(false).await.unwrap();
    session.write(b"x").await.unwrap();
    session.close().await.unwrap();
    let err = session.write(b"y").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Aborted);
    assert_eq!(session.close().await.unwrap_err().kind(), ErrorKind::Aborted);

    let mut session = file.open_session(true).await.unwrap();
    session.abort().await.unwrap();
    assert_eq!(session.abort().await.unwrap_err().kind(), ErrorKind::Aborted);

    assert_eq!(file.content().await.unwrap(), b"x");
}

#[tokio::test]
async fn test_unaddressable_truncate_fails_cleanly() {
    let store = new_store().await;
    store
        .write_file("huge", "small", WriteOptions::default())
        .await
        .unwrap();

    let err = store.truncate("huge", u64::MAX).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::QuotaExceeded);

    let err = store.truncate("fresh", 1 << 63).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::QuotaExceeded);

    assert_eq!(store.read_text("huge").await.unwrap(), "small");
    assert!(store.read_binary("fresh").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_write_at_unaddressable_offset_fails_cleanly() {
    let store = new_store().await;
    let mut appendable = store.create_appendable("s").await.unwrap();
    appendable.write("kept").await.unwrap();

    appendable.seek(u64::MAX).await.unwrap();
    let err = appendable.write("x").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::QuotaExceeded);

    appendable.seek(u64::MAX / 2).await.unwrap();
    let err = appendable.write("x").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::QuotaExceeded);

    // The session survives the failed writes
    appendable.seek(4).await.unwrap();
    appendable.write("!").await.unwrap();
    appendable.close().await.unwrap();
    assert_eq!(store.read_text("s").await.unwrap(), "kept!");
}
