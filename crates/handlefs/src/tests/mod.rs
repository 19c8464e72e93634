// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Store behavior tests, run against the memory backend

mod sessions;

use crate::{MemoryBackend, Store};

pub(crate) async fn new_store() -> Store {
    Store::with_backend(MemoryBackend::default())
        .await
        .expect("memory store")
}
