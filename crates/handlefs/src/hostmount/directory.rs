// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::dir::{Directory, EntryStream, Handle, NameStream};
use crate::error::{Error, Result};
use crate::node::{DirEntry, Node};
use async_trait::async_trait;
use futures::stream;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A directory backed by a host filesystem directory.
///
/// Lookups map to `metadata`, creation to `create_dir` / an empty file,
/// enumeration to `read_dir` and removal to `remove_file` / `remove_dir` /
/// `remove_dir_all`.
pub struct HostDirectory {
    /// Absolute host path this directory maps to
    host_path: PathBuf,
}

impl HostDirectory {
    #[must_use]
    pub fn new(host_path: PathBuf) -> Self {
        Self { host_path }
    }

    /// Create a Handle for this directory
    #[must_use]
    pub fn new_handle(host_path: PathBuf) -> Handle {
        Handle::new(Arc::new(Mutex::new(Box::new(Self::new(host_path)))))
    }

    /// Host path of a child, after checking the name cannot leave this directory
    fn child_path(&self, name: &str) -> Result<PathBuf> {
        if !crate::path::is_valid_name(name) || super::is_staging_name(name) {
            return Err(Error::invalid_name(name));
        }
        Ok(self.host_path.join(name))
    }

    /// Stat a child; `Ok(None)` when absent
    async fn stat(&self, name: &str) -> Result<Option<(PathBuf, std::fs::Metadata)>> {
        let child = self.child_path(name)?;
        match tokio::fs::metadata(&child).await {
            Ok(metadata) => Ok(Some((child, metadata))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::from_io(e, name)),
        }
    }

    async fn read_children(&self) -> Result<Vec<(String, std::fs::FileType)>> {
        let mut read_dir = tokio::fs::read_dir(&self.host_path)
            .await
            .map_err(|e| Error::from_io(e, &self.host_path))?;
        let mut children = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| Error::from_io(e, &self.host_path))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if super::is_staging_name(&name) {
                continue;
            }
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| Error::from_io(e, &name))?;
            children.push((name, file_type));
        }
        Ok(children)
    }
}

#[async_trait]
impl Directory for HostDirectory {
    async fn get_directory(&mut self, name: &str, create: bool) -> Result<Handle> {
        match self.stat(name).await? {
            Some((child, metadata)) if metadata.is_dir() => Ok(HostDirectory::new_handle(child)),
            Some(_) => Err(Error::not_a_directory(name)),
            None if create => {
                let child = self.child_path(name)?;
                match tokio::fs::create_dir(&child).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && child.is_dir() => {}
                    Err(e) => return Err(Error::from_io(e, name)),
                }
                log::debug!("Created host directory '{}'", child.display());
                Ok(HostDirectory::new_handle(child))
            }
            None => Err(Error::not_found(name)),
        }
    }

    async fn get_file(&mut self, name: &str, create: bool) -> Result<crate::file::Handle> {
        match self.stat(name).await? {
            Some((_, metadata)) if metadata.is_dir() => Err(Error::not_a_file(name)),
            Some((child, _)) => Ok(super::HostFile::new_handle(child)),
            None if create => {
                let child = self.child_path(name)?;
                // Create an empty file without clobbering a racing writer
                _ = tokio::fs::OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(false)
                    .open(&child)
                    .await
                    .map_err(|e| Error::from_io(e, name))?;
                log::debug!("Created host file '{}'", child.display());
                Ok(super::HostFile::new_handle(child))
            }
            None => Err(Error::not_found(name)),
        }
    }

    async fn names(&self) -> Result<NameStream> {
        let items: Vec<_> = self
            .read_children()
            .await?
            .into_iter()
            .map(|(name, _)| Ok(name))
            .collect();
        Ok(Box::pin(stream::iter(items)))
    }

    async fn entries(&self) -> Result<EntryStream> {
        let items: Vec<_> = self
            .read_children()
            .await?
            .into_iter()
            .map(|(name, file_type)| {
                let host_child = self.host_path.join(&name);
                let node = if file_type.is_dir() {
                    Node::Directory(HostDirectory::new_handle(host_child))
                } else {
                    Node::File(super::HostFile::new_handle(host_child))
                };
                Ok(DirEntry::new(name, node))
            })
            .collect();
        Ok(Box::pin(stream::iter(items)))
    }

    async fn remove(&mut self, name: &str, recursive: bool) -> Result<()> {
        let Some((child, metadata)) = self.stat(name).await? else {
            return Err(Error::not_found(name));
        };

        let removed = if !metadata.is_dir() {
            tokio::fs::remove_file(&child).await
        } else if recursive {
            tokio::fs::remove_dir_all(&child).await
        } else {
            tokio::fs::remove_dir(&child).await
        };
        removed.map_err(|e| Error::from_io(e, name))?;

        log::debug!("Removed host entry '{}'", child.display());
        Ok(())
    }
}
