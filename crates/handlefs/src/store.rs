// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The path-addressed store
//!
//! A [`Store`] owns the root directory handle of one backend and exposes
//! every operation by path. Paths are resolved from the root on each call.
//! The operations themselves live beside their engines: reads in `read`,
//! writes in `session`, directory operations in `ops`.

use crate::backend::{Backend, StorageEstimate};
use crate::config::{BackendKind, StoreConfig};
use crate::dir;
use crate::error::Result;
use crate::file;
use crate::hostmount::HostBackend;
use crate::memory::MemoryBackend;
use crate::navigate;
use std::sync::Arc;
use tokio::sync::OnceCell;

static STORE: OnceCell<Store> = OnceCell::const_new();

#[derive(Clone)]
pub struct Store {
    root: dir::Handle,
    backend: Arc<dyn Backend>,
}

impl Store {
    /// The process-wide store, built from [`StoreConfig::from_env`] on first use.
    ///
    /// Concurrent first callers all wait for the one initialization. If it
    /// fails, the error is returned and the next call tries again.
    pub async fn open() -> Result<&'static Store> {
        STORE
            .get_or_try_init(|| async {
                let config = StoreConfig::from_env()?;
                log::debug!("Opening process store with {config:?}");
                Store::from_config(&config).await
            })
            .await
    }

    /// A store over `backend`, independent of the process-wide one
    pub async fn with_backend<B: Backend + 'static>(backend: B) -> Result<Self> {
        let backend: Arc<dyn Backend> = Arc::new(backend);
        let root = backend.root_directory().await?;
        Ok(Self { root, backend })
    }

    pub async fn from_config(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        match (config.backend, &config.root) {
            (BackendKind::Host, Some(root)) => {
                Self::with_backend(HostBackend::new(root.clone(), config.quota_bytes)?).await
            }
            _ => Self::with_backend(MemoryBackend::new(config.quota_bytes)).await,
        }
    }

    /// The root directory handle, for direct handle-level use
    #[must_use]
    pub fn root(&self) -> &dir::Handle {
        &self.root
    }

    /// Storage usage and quota; zeros when the backend cannot say
    pub async fn estimate(&self) -> StorageEstimate {
        match self.backend.estimate().await {
            Ok(estimate) => estimate,
            Err(err) => {
                log::warn!("Storage estimate unavailable: {err}");
                StorageEstimate::default()
            }
        }
    }

    /// The file handle at `path`, optionally creating it and its parents
    pub async fn file_handle(&self, path: &str, create: bool) -> Result<file::Handle> {
        navigate::file_for(&self.root, path, create).await
    }

    /// The directory handle at `path`; the empty path is the root
    pub async fn directory_handle(&self, path: &str, create: bool) -> Result<dir::Handle> {
        navigate::directory_for(&self.root, path, create).await
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
