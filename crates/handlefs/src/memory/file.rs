// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::Usage;
use crate::error::{Error, Result};
use crate::file::{File, Handle, WriteSession};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Committed bytes of one memory file.
///
/// Returns its bytes to the quota when the last reference goes away.
struct Blob {
    bytes: Vec<u8>,
    usage: Arc<Usage>,
}

impl Drop for Blob {
    fn drop(&mut self) {
        self.usage.release(self.bytes.len() as u64);
    }
}

/// Represents a file backed by memory
/// This implementation stores file content in a Vec<u8> and is suitable for
/// testing, development, and lightweight filesystem operations.
pub struct MemoryFile {
    blob: Arc<Mutex<Blob>>,
}

impl MemoryFile {
    /// Create a new, empty MemoryFile handle
    pub(crate) fn new_handle(usage: Arc<Usage>) -> Handle {
        let blob = Blob {
            bytes: Vec::new(),
            usage,
        };
        Handle::new(Arc::new(Mutex::new(Box::new(MemoryFile {
            blob: Arc::new(Mutex::new(blob)),
        }))))
    }
}

#[async_trait]
impl File for MemoryFile {
    async fn content(&self) -> Result<Vec<u8>> {
        Ok(self.blob.lock().await.bytes.clone())
    }

    async fn size(&self) -> Result<u64> {
        Ok(self.blob.lock().await.bytes.len() as u64)
    }

    async fn open_session(&self, keep_existing: bool) -> Result<Box<dyn WriteSession>> {
        let blob = self.blob.lock().await;
        let committed = blob.bytes.len() as u64;
        let buffer = if keep_existing {
            blob.bytes.clone()
        } else {
            Vec::new()
        };
        Ok(Box::new(MemorySession {
            target: Some(self.blob.clone()),
            usage: blob.usage.clone(),
            committed,
            buffer,
            cursor: 0,
        }))
    }
}

/// Stages writes in a private buffer; `close` swaps it into the file.
struct MemorySession {
    /// None once closed or aborted
    target: Option<Arc<Mutex<Blob>>>,
    usage: Arc<Usage>,
    /// File length when the session opened, the baseline for write-time
    /// quota checks. `close` checks again against the live total.
    committed: u64,
    buffer: Vec<u8>,
    cursor: u64,
}

impl MemorySession {
    fn live(&self) -> Result<()> {
        if self.target.is_none() {
            return Err(Error::aborted("write session already finalized"));
        }
        Ok(())
    }
}

#[async_trait]
impl WriteSession for MemorySession {
    async fn seek(&mut self, offset: u64) -> Result<()> {
        self.live()?;
        self.cursor = offset;
        Ok(())
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        self.live()?;
        let end = crate::file::write_end(self.cursor, data.len())?;
        let len = end.max(self.buffer.len() as u64);
        self.usage.check(self.committed, len)?;
        self.cursor = crate::file::write_at(&mut self.buffer, self.cursor, data)?;
        Ok(())
    }

    async fn truncate(&mut self, size: u64) -> Result<()> {
        self.live()?;
        self.usage.check(self.committed, size)?;
        crate::file::resize_to(&mut self.buffer, size)?;
        self.cursor = self.cursor.min(size);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        let target = self
            .target
            .take()
            .ok_or_else(|| Error::aborted("write session already finalized"))?;
        let mut blob = target.lock().await;
        let bytes = std::mem::take(&mut self.buffer);
        // Other sessions may have committed since this one opened
        self.usage
            .commit(blob.bytes.len() as u64, bytes.len() as u64)?;
        blob.bytes = bytes;
        Ok(())
    }

    async fn abort(&mut self) -> Result<()> {
        self.live()?;
        self.target = None;
        self.buffer = Vec::new();
        Ok(())
    }
}
