// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Hostmount -- a host directory as a backing store
//!
//! This module maps a host directory tree onto the handle contracts,
//! backed by `tokio::fs`. It is a peer of the `memory` module.
//!
//! Each handle holds the absolute host path of its node; handles are never
//! cached, so a handle whose host entry was removed simply fails with
//! not-found on next use. Write sessions stage bytes in memory and commit
//! with a write-to-temporary-then-rename, so readers never observe a
//! half-written file.

mod directory;
mod file;

#[cfg(test)]
mod tests;

pub use directory::HostDirectory;
pub use file::HostFile;

use crate::backend::{Backend, StorageEstimate};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Name prefix of the in-flight staging files written next to a file while
/// a session commits. Entries with this prefix are not part of the store:
/// listings and the usage estimate skip them, and they cannot be addressed.
pub(crate) const STAGING_PREFIX: &str = ".handlefs-staging-";

pub(crate) fn is_staging_name(name: &str) -> bool {
    name.starts_with(STAGING_PREFIX)
}

/// Host filesystem backing store rooted at one directory
pub struct HostBackend {
    /// The host directory that maps to the store root
    root_path: PathBuf,
    quota: Option<u64>,
}

impl HostBackend {
    /// Create a backend rooted at `root_path`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be created or is not a directory.
    pub fn new(root_path: PathBuf, quota: Option<u64>) -> Result<Self> {
        std::fs::create_dir_all(&root_path).map_err(|e| {
            Error::Other(format!(
                "Hostmount root '{}' cannot be created: {}",
                root_path.display(),
                e
            ))
        })?;
        let canonical = root_path.canonicalize().map_err(|e| {
            Error::Other(format!(
                "Hostmount root '{}' cannot be resolved: {}",
                root_path.display(),
                e
            ))
        })?;

        if !canonical.is_dir() {
            return Err(Error::Other(format!(
                "Hostmount root '{}' is not a directory",
                canonical.display()
            )));
        }

        Ok(Self {
            root_path: canonical,
            quota,
        })
    }

    /// Get the hostmount root path
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

#[async_trait]
impl Backend for HostBackend {
    async fn root_directory(&self) -> Result<crate::dir::Handle> {
        Ok(HostDirectory::new_handle(self.root_path.clone()))
    }

    async fn estimate(&self) -> Result<StorageEstimate> {
        Ok(StorageEstimate {
            usage: tree_size(&self.root_path).await?,
            quota: self.quota.unwrap_or(0),
        })
    }
}

/// Total size of the regular files under `root`
async fn tree_size(root: &Path) -> Result<u64> {
    let mut total = 0;
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let mut read_dir = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| Error::from_io(e, &dir))?;
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| Error::from_io(e, &dir))?
        {
            if is_staging_name(&entry.file_name().to_string_lossy()) {
                continue;
            }
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| Error::from_io(e, entry.path()))?;
            if metadata.is_dir() {
                pending.push(entry.path());
            } else {
                total += metadata.len();
            }
        }
    }
    Ok(total)
}
