// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Tests for the host directory backend and the store on top of it.

use crate::backend::Backend;
use crate::hostmount::HostBackend;
use crate::{EntryKind, ErrorKind, Store, WriteOptions};
use std::time::Instant;
use tempfile::TempDir;

/// Create a temp directory with some test content
fn create_test_tree() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");

    std::fs::write(dir.path().join("hello.txt"), b"Hello, World!").unwrap();
    std::fs::create_dir(dir.path().join("subdir")).unwrap();
    std::fs::write(dir.path().join("subdir/nested.txt"), b"nested content").unwrap();

    dir
}

async fn host_store(dir: &TempDir, quota: Option<u64>) -> Store {
    let backend = HostBackend::new(dir.path().to_path_buf(), quota).unwrap();
    Store::with_backend(backend).await.unwrap()
}

#[tokio::test]
async fn test_backend_new_creates_root() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("a/b/store");
    let backend = HostBackend::new(root.clone(), None).unwrap();
    assert!(root.is_dir());
    assert_eq!(backend.root_path(), root.canonicalize().unwrap());
}

#[tokio::test]
async fn test_backend_new_file_not_dir() {
    let dir = create_test_tree();
    let result = HostBackend::new(dir.path().join("hello.txt"), None);
    assert!(result.is_err());
}

#[tokio::test]
async fn test_reads_existing_tree() {
    let dir = create_test_tree();
    let store = host_store(&dir, None).await;

    assert_eq!(store.read_text("hello.txt").await.unwrap(), "Hello, World!");
    assert_eq!(
        store.read_text("/subdir/../subdir/nested.txt").await.unwrap(),
        "nested content"
    );

    let mut names = store.readdir("").await.unwrap();
    names.sort();
    assert_eq!(names, ["hello.txt", "subdir"]);

    let entries = store.readdir_handles("/").await.unwrap();
    let subdir = entries.iter().find(|e| e.name == "subdir").unwrap();
    assert_eq!(subdir.kind(), EntryKind::Directory);
}

#[tokio::test]
async fn test_kind_mismatch() {
    let dir = create_test_tree();
    let store = host_store(&dir, None).await;

    let err = store.read_binary("subdir").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);

    let err = store.readdir("hello.txt").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);

    let err = store.read_binary("missing.txt").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_writes_land_on_host() {
    let dir = TempDir::new().unwrap();
    let store = host_store(&dir, None).await;

    store
        .write_file("x/y/data.txt", "payload", WriteOptions::default())
        .await
        .unwrap();
    let host_file = dir.path().join("x/y/data.txt");
    assert_eq!(std::fs::read(&host_file).unwrap(), b"payload");

    store.append_file("x/y/data.txt", "+more").await.unwrap();
    assert_eq!(std::fs::read(&host_file).unwrap(), b"payload+more");

    store.truncate("x/y/data.txt", 3).await.unwrap();
    assert_eq!(std::fs::read(&host_file).unwrap(), b"pay");

    // Only the addressed tree exists: no staging files are left behind
    let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("x/y"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, ["data.txt"]);
}

#[tokio::test]
async fn test_abort_leaves_host_file_untouched() {
    let dir = create_test_tree();
    let store = host_store(&dir, None).await;

    let mut appendable = store.create_appendable("hello.txt").await.unwrap();
    appendable.write(" and more").await.unwrap();
    appendable.abort().await.unwrap();

    assert_eq!(
        std::fs::read(dir.path().join("hello.txt")).unwrap(),
        b"Hello, World!"
    );
}

#[tokio::test]
async fn test_remove_and_empty_dir() {
    let dir = create_test_tree();
    let store = host_store(&dir, None).await;

    store.empty_dir("/").await.unwrap();
    assert!(store.readdir("/").await.unwrap().is_empty());
    assert!(dir.path().is_dir());

    store.mkdir("a/b").await.unwrap();
    store.remove("a").await.unwrap();
    assert!(!dir.path().join("a").exists());
    store.remove("a").await.unwrap();
}

#[tokio::test]
async fn test_estimate_counts_files() {
    let dir = create_test_tree();
    let backend = HostBackend::new(dir.path().to_path_buf(), Some(1 << 20)).unwrap();
    let estimate = backend.estimate().await.unwrap();
    assert_eq!(estimate.usage, 13 + 14);
    assert_eq!(estimate.quota, 1 << 20);

    let store = Store::with_backend(backend).await.unwrap();
    store
        .write_file("more.bin", vec![0u8; 100], WriteOptions::default())
        .await
        .unwrap();
    assert_eq!(store.estimate().await.usage, 13 + 14 + 100);
}

#[tokio::test]
async fn test_appendable_outpaces_repeated_appends() {
    diagnostics::init();
    const LINES: usize = 200;
    let dir = TempDir::new().unwrap();
    let store = host_store(&dir, None).await;
    let line = format!("{}\n", "x".repeat(63));

    let started = Instant::now();
    for _ in 0..LINES {
        store.append_file("repeated.log", &line).await.unwrap();
    }
    let repeated = started.elapsed();

    let started = Instant::now();
    let mut appendable = store.create_appendable("batched.log").await.unwrap();
    for _ in 0..LINES {
        appendable.write(&line).await.unwrap();
    }
    appendable.close().await.unwrap();
    let batched = started.elapsed();

    let expected = line.repeat(LINES);
    assert_eq!(store.read_text("repeated.log").await.unwrap(), expected);
    assert_eq!(store.read_text("batched.log").await.unwrap(), expected);
    assert!(
        batched < repeated,
        "batched {batched:?} should beat repeated {repeated:?}"
    );
}

#[tokio::test]
async fn test_staging_files_are_not_entries() {
    let dir = create_test_tree();
    let store = host_store(&dir, None).await;

    // A commit in flight leaves a staging sibling for a moment
    let staging = dir
        .path()
        .join(format!("{}inflight", super::STAGING_PREFIX));
    std::fs::write(&staging, b"half written").unwrap();

    let mut names = store.readdir("/").await.unwrap();
    names.sort();
    assert_eq!(names, ["hello.txt", "subdir"]);
    assert_eq!(store.readdir_handles("/").await.unwrap().len(), 2);
    assert_eq!(store.estimate().await.usage, 13 + 14);

    let name = staging.file_name().unwrap().to_string_lossy().to_string();
    let err = store.read_binary(&name).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[cfg(unix)]
#[tokio::test]
async fn test_commit_keeps_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = create_test_tree();
    let store = host_store(&dir, None).await;
    let host_file = dir.path().join("hello.txt");
    std::fs::set_permissions(&host_file, std::fs::Permissions::from_mode(0o640)).unwrap();

    store.append_file("hello.txt", "!").await.unwrap();

    let mode = std::fs::metadata(&host_file).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o640);
    assert_eq!(std::fs::read(&host_file).unwrap(), b"Hello, World!!");
}

#[tokio::test]
async fn test_unaddressable_sizes_fail_on_host() {
    let dir = create_test_tree();
    let store = host_store(&dir, None).await;

    let err = store.truncate("hello.txt", u64::MAX).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::QuotaExceeded);

    let mut appendable = store.create_appendable("hello.txt").await.unwrap();
    appendable.seek(u64::MAX).await.unwrap();
    let err = appendable.write("x").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::QuotaExceeded);
    appendable.abort().await.unwrap();

    assert_eq!(
        std::fs::read(dir.path().join("hello.txt")).unwrap(),
        b"Hello, World!"
    );
}
