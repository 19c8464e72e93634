// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Path-addressed file storage over capability-handle backing stores.
//!
//! A backing store hands out a root directory handle and nothing else:
//! children are reached one name at a time, and files change only through
//! write sessions that commit on close. [`Store`] layers ordinary path
//! operations on top of that:
//!
//! - paths are normalized (`.`, `..`, repeated `/`) and clamped at the root
//! - reads of bytes, text, JSON and JSON lines
//! - writes, appends and truncation, each in its own session that commits
//!   on success and aborts on failure
//! - `mkdir`, `readdir`, `empty_dir`, idempotent `remove`, and `exists`
//!
//! Two backends are included: [`MemoryBackend`] and [`HostBackend`].

pub mod backend;
pub mod config;
pub mod dir;
pub mod error;
pub mod file;
pub mod hostmount;
pub mod jsonl;
pub mod memory;
mod navigate;
pub mod node;
mod ops;
pub mod path;
pub mod read;
pub mod session;
mod store;

pub use backend::{Backend, StorageEstimate};
pub use config::{BackendKind, StoreConfig};
pub use error::{Error, ErrorKind, Result};
pub use hostmount::HostBackend;
pub use memory::MemoryBackend;
pub use node::{DirEntry, EntryKind, Node};
pub use session::{Appendable, JsonWriteOptions, WriteOptions};
pub use store::Store;

#[cfg(test)]
mod tests;
