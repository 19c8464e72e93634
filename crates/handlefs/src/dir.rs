// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::Result;
use crate::node::DirEntry;
use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type NameStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;
pub type EntryStream = Pin<Box<dyn Stream<Item = Result<DirEntry>> + Send>>;

/// Represents a directory-like node in a backing store.
///
/// Children are reached only by name, one level at a time. Lookups are
/// typed: asking for a directory where a file lives (or the reverse) fails
/// with a type mismatch, and asking for an absent name fails with not-found
/// unless `create` is set.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn get_directory(&mut self, name: &str, create: bool) -> Result<Handle>;

    async fn get_file(&mut self, name: &str, create: bool) -> Result<crate::file::Handle>;

    /// Child names, in whatever order the store enumerates them
    async fn names(&self) -> Result<NameStream>;

    /// Child handles, tagged by kind
    async fn entries(&self) -> Result<EntryStream>;

    /// Remove a child. A non-empty directory is only removed when `recursive`.
    async fn remove(&mut self, name: &str, recursive: bool) -> Result<()>;
}

/// A handle for a refcounted directory.
#[derive(Clone)]
pub struct Handle(Arc<Mutex<Box<dyn Directory>>>);

impl Handle {
    pub fn new(r: Arc<Mutex<Box<dyn Directory>>>) -> Self {
        Self(r)
    }

    pub async fn get_directory(&self, name: &str, create: bool) -> Result<Handle> {
        self.0.lock().await.get_directory(name, create).await
    }

    pub async fn get_file(&self, name: &str, create: bool) -> Result<crate::file::Handle> {
        self.0.lock().await.get_file(name, create).await
    }

    pub async fn names(&self) -> Result<NameStream> {
        self.0.lock().await.names().await
    }

    pub async fn entries(&self) -> Result<EntryStream> {
        self.0.lock().await.entries().await
    }

    pub async fn remove(&self, name: &str, recursive: bool) -> Result<()> {
        self.0.lock().await.remove(name, recursive).await
    }

    /// Whether two handles share the same underlying directory object
    #[must_use]
    pub fn same_as(&self, other: &Handle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dir::Handle")
    }
}
