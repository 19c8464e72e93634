// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Memory-based backing store
//!
//! This module contains in-memory implementations of the Directory, File and
//! WriteSession contracts. The tree lives as long as the `MemoryBackend`
//! (or any handle into it) is alive.
//!
//! The memory implementations provide:
//! - Fast, non-persistent handle operations
//! - Simple data structures (BTreeMap for directories, Vec<u8> for files)
//! - An optional byte quota, enforced while sessions write

mod directory;
mod file;

pub use directory::MemoryDirectory;
pub use file::MemoryFile;

use crate::backend::{Backend, StorageEstimate};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Committed-byte accounting shared by every node of one memory tree
#[derive(Debug, Default)]
pub(crate) struct Usage {
    used: AtomicU64,
    limit: Option<u64>,
}

impl Usage {
    pub(crate) fn new(limit: Option<u64>) -> Self {
        Self {
            used: AtomicU64::new(0),
            limit,
        }
    }

    pub(crate) fn used(&self) -> u64 {
        self.used.load(Ordering::SeqCst)
    }

    /// Check that a file may grow from `committed` to `len` bytes.
    pub(crate) fn check(&self, committed: u64, len: u64) -> Result<()> {
        let Some(limit) = self.limit else {
            return Ok(());
        };
        let requested = len.saturating_sub(committed);
        let available = limit.saturating_sub(self.used());
        if requested > available {
            return Err(Error::quota_exceeded(requested, available));
        }
        Ok(())
    }

    /// Account for a file changing from `old` to `new` committed bytes.
    ///
    /// Growth is checked against the limit and the usage at this moment, in
    /// one atomic step. On failure nothing is accounted.
    pub(crate) fn commit(&self, old: u64, new: u64) -> Result<()> {
        if new <= old {
            self.release(old - new);
            return Ok(());
        }
        let grow = new - old;
        let limit = self.limit.unwrap_or(u64::MAX);
        self.used
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |used| {
                used.checked_add(grow).filter(|total| *total <= limit)
            })
            .map(|_| ())
            .map_err(|used| Error::quota_exceeded(grow, limit.saturating_sub(used)))
    }

    pub(crate) fn release(&self, bytes: u64) {
        _ = self
            .used
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |used| {
                Some(used.saturating_sub(bytes))
            });
    }
}

/// Memory-based backing store for testing and lightweight use
pub struct MemoryBackend {
    root: crate::dir::Handle,
    usage: Arc<Usage>,
}

impl MemoryBackend {
    /// Create an empty tree, optionally limited to `quota` committed bytes
    #[must_use]
    pub fn new(quota: Option<u64>) -> Self {
        let usage = Arc::new(Usage::new(quota));
        Self {
            root: MemoryDirectory::new_handle(usage.clone()),
            usage,
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    /// The same root on every call: the tree outlives any one store wrapper
    async fn root_directory(&self) -> Result<crate::dir::Handle> {
        Ok(self.root.clone())
    }

    async fn estimate(&self) -> Result<StorageEstimate> {
        Ok(StorageEstimate {
            usage: self.usage.used(),
            quota: self.usage.limit.unwrap_or(0),
        })
    }
}
