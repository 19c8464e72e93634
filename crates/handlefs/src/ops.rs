// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Directory operations and the existence probe

use crate::error::Result;
use crate::navigate;
use crate::node::DirEntry;
use crate::path;
use crate::store::Store;
use futures::TryStreamExt;

impl Store {
    /// Create the directory at `path` along with any missing parents
    pub async fn mkdir(&self, path: &str) -> Result<()> {
        _ = navigate::directory_for(self.root(), path, true).await?;
        Ok(())
    }

    /// Names of the immediate children of `path`, in enumeration order
    pub async fn readdir(&self, path: &str) -> Result<Vec<String>> {
        let dir = navigate::directory_for(self.root(), path, false).await?;
        dir.names().await?.try_collect().await
    }

    /// Live handles of the immediate children of `path`
    pub async fn readdir_handles(&self, path: &str) -> Result<Vec<DirEntry>> {
        let dir = navigate::directory_for(self.root(), path, false).await?;
        dir.entries().await?.try_collect().await
    }

    /// Remove every child of `path`, creating `path` if it is absent.
    ///
    /// The directory itself is kept.
    pub async fn empty_dir(&self, path: &str) -> Result<()> {
        let dir = navigate::directory_for(self.root(), path, true).await?;
        let names: Vec<String> = dir.names().await?.try_collect().await?;
        for name in &names {
            dir.remove(name, true).await?;
        }
        log::debug!("Emptied '{path}' ({} entries)", names.len());
        Ok(())
    }

    /// Remove `path` recursively.
    ///
    /// Removing something that does not exist succeeds. The root is never
    /// removed; paths that resolve to it are ignored.
    pub async fn remove(&self, path: &str) -> Result<()> {
        let segments = path::resolve(path);
        let Some(name) = segments.last() else {
            log::debug!("Ignoring removal of the root ('{path}')");
            return Ok(());
        };

        let removed = match navigate::container_at(self.root(), &segments, false).await {
            Ok(parent) => parent.remove(name, true).await,
            Err(err) => Err(err),
        };
        match removed {
            Err(err) if err.is_not_found() => {
                log::debug!("Nothing to remove at '{path}'");
                Ok(())
            }
            other => other,
        }
    }

    /// Whether anything exists at `path`.
    ///
    /// Probes for a file, then for a directory; any failure of a probe
    /// counts as absent.
    pub async fn exists(&self, path: &str) -> bool {
        let segments = path::resolve(path);
        if segments.is_empty() {
            return true;
        }
        if navigate::file_at(self.root(), &segments, false).await.is_ok() {
            return true;
        }
        navigate::directory_at(self.root(), &segments, false)
            .await
            .is_ok()
    }
}
