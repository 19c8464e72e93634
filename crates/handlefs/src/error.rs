// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::node::EntryKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
///
/// The store's own recovery decisions (idempotent removal, the existence
/// probe) match on kinds rather than on concrete variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The path resolved to the root where an entry name was required
    InvalidPath,
    /// A caller-supplied name, encoding label or configuration was unusable
    InvalidArgument,
    NotFound,
    TypeMismatch,
    Parse,
    QuotaExceeded,
    Aborted,
    /// Anything else raised by the backing store
    Underlying,
}

/// Represents errors that can occur in store operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("File path is not valid: '{0}'")]
    InvalidPath(String),

    #[error("Invalid entry name: '{0}'")]
    InvalidName(String),

    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a {expected}: {}", .path.display())]
    TypeMismatch { path: PathBuf, expected: EntryKind },

    #[error("Directory not empty: {}", .0.display())]
    NotEmpty(PathBuf),

    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown text encoding: '{0}'")]
    Encoding(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Quota exceeded: requested {requested} bytes, {available} available")]
    QuotaExceeded { requested: u64, available: u64 },

    #[error("Write session aborted: {0}")]
    Aborted(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn invalid_path<S: AsRef<str>>(path: S) -> Self {
        Error::InvalidPath(path.as_ref().to_string())
    }

    pub fn invalid_name<S: AsRef<str>>(name: S) -> Self {
        Error::InvalidName(name.as_ref().to_string())
    }

    pub fn not_found<P: AsRef<Path>>(path: P) -> Self {
        Error::NotFound(path.as_ref().to_path_buf())
    }

    pub fn not_a_file<P: AsRef<Path>>(path: P) -> Self {
        Error::TypeMismatch {
            path: path.as_ref().to_path_buf(),
            expected: EntryKind::File,
        }
    }

    pub fn not_a_directory<P: AsRef<Path>>(path: P) -> Self {
        Error::TypeMismatch {
            path: path.as_ref().to_path_buf(),
            expected: EntryKind::Directory,
        }
    }

    pub fn not_empty<P: AsRef<Path>>(path: P) -> Self {
        Error::NotEmpty(path.as_ref().to_path_buf())
    }

    pub fn quota_exceeded(requested: u64, available: u64) -> Self {
        Error::QuotaExceeded {
            requested,
            available,
        }
    }

    pub fn aborted<S: AsRef<str>>(reason: S) -> Self {
        Error::Aborted(reason.as_ref().to_string())
    }

    /// Translate a host I/O failure on `path` into the store taxonomy.
    pub fn from_io<P: AsRef<Path>>(err: std::io::Error, path: P) -> Self {
        use std::io::ErrorKind as Io;
        match err.kind() {
            Io::NotFound => Error::not_found(path),
            Io::NotADirectory => Error::not_a_directory(path),
            Io::IsADirectory => Error::not_a_file(path),
            Io::DirectoryNotEmpty => Error::not_empty(path),
            Io::StorageFull => Error::quota_exceeded(0, 0),
            _ => Error::Io(err),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidPath(_) => ErrorKind::InvalidPath,
            Error::InvalidName(_) | Error::Encoding(_) | Error::Config(_) => {
                ErrorKind::InvalidArgument
            }
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::Parse(_) => ErrorKind::Parse,
            Error::QuotaExceeded { .. } => ErrorKind::QuotaExceeded,
            Error::Aborted(_) => ErrorKind::Aborted,
            Error::NotEmpty(_) | Error::Io(_) | Error::Other(_) => ErrorKind::Underlying,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
