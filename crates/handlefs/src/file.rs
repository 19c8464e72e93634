// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Represents a file-like node holding a byte sequence
#[async_trait]
pub trait File: Send + Sync {
    /// The committed content, in full
    async fn content(&self) -> Result<Vec<u8>>;

    /// Length of the committed content
    async fn size(&self) -> Result<u64>;

    /// Start a write session.
    ///
    /// With `keep_existing` the session starts from a copy of the current
    /// content, otherwise from empty. Nothing is visible to readers until
    /// the session is closed.
    async fn open_session(&self, keep_existing: bool) -> Result<Box<dyn WriteSession>>;
}

/// A single-use cursor over a private copy of one file's bytes.
///
/// Writes land at the cursor and advance it; writing past the end
/// zero-fills any gap. `truncate` resizes (zero-filling growth) and pulls
/// the cursor back if it was beyond the new end. The session ends with
/// exactly one of `close` (commit) or `abort` (discard); implementations
/// reject any call after that. Dropping an unfinished session discards it.
#[async_trait]
pub trait WriteSession: Send {
    async fn seek(&mut self, offset: u64) -> Result<()>;

    async fn write(&mut self, data: &[u8]) -> Result<()>;

    async fn truncate(&mut self, size: u64) -> Result<()>;

    async fn close(&mut self) -> Result<()>;

    async fn abort(&mut self) -> Result<()>;
}

/// A handle for a refcounted file.
#[derive(Clone)]
pub struct Handle(Arc<Mutex<Box<dyn File>>>);

impl Handle {
    pub fn new(r: Arc<Mutex<Box<dyn File>>>) -> Self {
        Self(r)
    }

    pub async fn content(&self) -> Result<Vec<u8>> {
        self.0.lock().await.content().await
    }

    pub async fn size(&self) -> Result<u64> {
        self.0.lock().await.size().await
    }

    pub async fn open_session(&self, keep_existing: bool) -> Result<Box<dyn WriteSession>> {
        self.0.lock().await.open_session(keep_existing).await
    }

    /// Whether two handles share the same underlying file object
    #[must_use]
    pub fn same_as(&self, other: &Handle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "file::Handle")
    }
}

/// Where a write of `len` bytes at `cursor` ends.
///
/// Fails with quota-exceeded when the end is not addressable.
pub(crate) fn write_end(cursor: u64, len: usize) -> Result<u64> {
    cursor
        .checked_add(len as u64)
        .ok_or_else(|| Error::quota_exceeded(u64::MAX, 0))
}

/// Resize a session buffer to `len` bytes, zero-filling growth.
///
/// The allocation is fallible: a size that cannot be held in memory fails
/// with quota-exceeded instead of aborting the process.
pub(crate) fn resize_to(buffer: &mut Vec<u8>, len: u64) -> Result<()> {
    let current = buffer.len() as u64;
    let too_large = || Error::quota_exceeded(len.saturating_sub(current), 0);
    let len = usize::try_from(len).map_err(|_| too_large())?;
    if let Some(additional) = len.checked_sub(buffer.len()) {
        buffer.try_reserve_exact(additional).map_err(|_| too_large())?;
    }
    buffer.resize(len, 0);
    Ok(())
}

/// Apply a write at `cursor` to an in-memory session buffer.
///
/// Shared by the bundled backends, which both stage session writes in a
/// private buffer. Returns the new cursor.
pub(crate) fn write_at(buffer: &mut Vec<u8>, cursor: u64, data: &[u8]) -> Result<u64> {
    let end = write_end(cursor, data.len())?;
    if end > buffer.len() as u64 {
        resize_to(buffer, end)?;
    }
    // `end` fits in the buffer, so both bounds fit in usize
    let start = (end - data.len() as u64) as usize;
    buffer[start..start + data.len()].copy_from_slice(data);
    Ok(end)
}
