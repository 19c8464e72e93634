// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use crate::file::{File, Handle, WriteSession};
use async_trait::async_trait;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Represents a file backed by a host filesystem file.
///
/// Reads go directly to the host file. Writes go through a [`WriteSession`]
/// that replaces the host file atomically on close.
pub struct HostFile {
    /// Absolute host path
    host_path: PathBuf,
}

impl HostFile {
    #[must_use]
    pub fn new(host_path: PathBuf) -> Self {
        Self { host_path }
    }

    /// Create a new HostFile handle
    #[must_use]
    pub fn new_handle(host_path: PathBuf) -> Handle {
        Handle::new(Arc::new(Mutex::new(Box::new(Self::new(host_path)))))
    }
}

#[async_trait]
impl File for HostFile {
    async fn content(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.host_path)
            .await
            .map_err(|e| Error::from_io(e, &self.host_path))
    }

    async fn size(&self) -> Result<u64> {
        let metadata = tokio::fs::metadata(&self.host_path)
            .await
            .map_err(|e| Error::from_io(e, &self.host_path))?;
        Ok(metadata.len())
    }

    async fn open_session(&self, keep_existing: bool) -> Result<Box<dyn WriteSession>> {
        let buffer = if keep_existing {
            self.content().await?
        } else {
            Vec::new()
        };
        Ok(Box::new(HostSession {
            host_path: self.host_path.clone(),
            buffer,
            cursor: 0,
            finalized: false,
        }))
    }
}

/// A session staging writes in memory until close.
struct HostSession {
    host_path: PathBuf,
    buffer: Vec<u8>,
    cursor: u64,
    finalized: bool,
}

impl HostSession {
    fn live(&self) -> Result<()> {
        if self.finalized {
            return Err(Error::aborted("write session already finalized"));
        }
        Ok(())
    }
}

/// Replace `path` with `bytes` via a sibling staging file and a rename.
///
/// The staging file carries [`super::STAGING_PREFIX`], which directory
/// listings skip, and takes over the permissions of the file it replaces.
fn commit(path: &std::path::Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Other(format!("'{}' has no parent", path.display())))?;
    let mut staged = tempfile::Builder::new()
        .prefix(super::STAGING_PREFIX)
        .tempfile_in(parent)
        .map_err(|e| Error::from_io(e, parent))?;
    staged
        .write_all(bytes)
        .map_err(|e| Error::from_io(e, path))?;
    match std::fs::metadata(path) {
        Ok(existing) => staged
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| Error::from_io(e, path))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::from_io(e, path)),
    }
    _ = staged
        .persist(path)
        .map_err(|e| Error::from_io(e.error, path))?;
    Ok(())
}

#[async_trait]
impl WriteSession for HostSession {
    async fn seek(&mut self, offset: u64) -> Result<()> {
        self.live()?;
        self.cursor = offset;
        Ok(())
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        self.live()?;
        self.cursor = crate::file::write_at(&mut self.buffer, self.cursor, data)?;
        Ok(())
    }

    async fn truncate(&mut self, size: u64) -> Result<()> {
        self.live()?;
        crate::file::resize_to(&mut self.buffer, size)?;
        self.cursor = self.cursor.min(size);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.live()?;
        self.finalized = true;
        let path = self.host_path.clone();
        let bytes = std::mem::take(&mut self.buffer);
        tokio::task::spawn_blocking(move || commit(&path, &bytes))
            .await
            .map_err(|e| Error::Other(format!("Commit task failed: {e}")))?
    }

    async fn abort(&mut self) -> Result<()> {
        self.live()?;
        self.finalized = true;
        self.buffer = Vec::new();
        Ok(())
    }
}
