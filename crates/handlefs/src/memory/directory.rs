// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::{MemoryFile, Usage};
use crate::dir::{Directory, EntryStream, Handle, NameStream};
use crate::error::{Error, Result};
use crate::node::{DirEntry, Node};
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Represents a directory backed by a BTreeMap
/// This implementation stores directory entries in memory and is suitable for
/// testing, development, and lightweight filesystem operations.
pub struct MemoryDirectory {
    entries: BTreeMap<String, Node>,
    usage: Arc<Usage>,
}

impl MemoryDirectory {
    /// Create a new MemoryDirectory handle
    pub(crate) fn new_handle(usage: Arc<Usage>) -> Handle {
        Handle::new(Arc::new(Mutex::new(Box::new(MemoryDirectory {
            entries: BTreeMap::new(),
            usage,
        }))))
    }

    fn check_name(name: &str) -> Result<()> {
        if crate::path::is_valid_name(name) {
            Ok(())
        } else {
            Err(Error::invalid_name(name))
        }
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn get_directory(&mut self, name: &str, create: bool) -> Result<Handle> {
        Self::check_name(name)?;
        match self.entries.get(name) {
            Some(Node::Directory(handle)) => Ok(handle.clone()),
            Some(Node::File(_)) => Err(Error::not_a_directory(name)),
            None if create => {
                let handle = MemoryDirectory::new_handle(self.usage.clone());
                _ = self
                    .entries
                    .insert(name.to_string(), Node::Directory(handle.clone()));
                Ok(handle)
            }
            None => Err(Error::not_found(name)),
        }
    }

    async fn get_file(&mut self, name: &str, create: bool) -> Result<crate::file::Handle> {
        Self::check_name(name)?;
        match self.entries.get(name) {
            Some(Node::File(handle)) => Ok(handle.clone()),
            Some(Node::Directory(_)) => Err(Error::not_a_file(name)),
            None if create => {
                let handle = MemoryFile::new_handle(self.usage.clone());
                _ = self
                    .entries
                    .insert(name.to_string(), Node::File(handle.clone()));
                Ok(handle)
            }
            None => Err(Error::not_found(name)),
        }
    }

    async fn names(&self) -> Result<NameStream> {
        let items: Vec<_> = self.entries.keys().map(|name| Ok(name.clone())).collect();
        Ok(Box::pin(stream::iter(items)))
    }

    async fn entries(&self) -> Result<EntryStream> {
        let items: Vec<_> = self
            .entries
            .iter()
            .map(|(name, node)| Ok(DirEntry::new(name.clone(), node.clone())))
            .collect();
        Ok(Box::pin(stream::iter(items)))
    }

    async fn remove(&mut self, name: &str, recursive: bool) -> Result<()> {
        Self::check_name(name)?;
        match self.entries.get(name) {
            None => return Err(Error::not_found(name)),
            Some(Node::Directory(child)) if !recursive => {
                if child.names().await?.next().await.is_some() {
                    return Err(Error::not_empty(name));
                }
            }
            Some(_) => {}
        }
        _ = self.entries.remove(name);
        Ok(())
    }
}
