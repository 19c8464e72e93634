// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Storage usage and quota, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEstimate {
    pub usage: u64,
    pub quota: u64,
}

/// A capability-handle backing store
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the root directory handle for this backend
    async fn root_directory(&self) -> Result<crate::dir::Handle>;

    async fn estimate(&self) -> Result<StorageEstimate>;
}
