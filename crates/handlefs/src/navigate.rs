// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Handle navigation from the root, one segment at a time.
//!
//! Nothing is cached: every call re-walks from the root handle it is given,
//! so a handle that went stale between calls is never reused.

use crate::dir;
use crate::error::{Error, Result};
use crate::file;
use crate::path;

/// Walk through every segment except the last, returning the parent container.
///
/// Intermediate containers are created when `create` is set; otherwise the
/// first absent one fails with not-found.
pub(crate) async fn container_at(
    root: &dir::Handle,
    segments: &[String],
    create: bool,
) -> Result<dir::Handle> {
    let mut current = root.clone();
    let parents = segments.split_last().map_or(&[][..], |(_, rest)| rest);
    for segment in parents {
        log::debug!("Descending into '{segment}' (create={create})");
        current = current.get_directory(segment, create).await?;
    }
    Ok(current)
}

/// The file named by a non-empty segment list
pub(crate) async fn file_at(
    root: &dir::Handle,
    segments: &[String],
    create: bool,
) -> Result<file::Handle> {
    let Some(name) = segments.last() else {
        return Err(Error::invalid_path(path::display(segments)));
    };
    let parent = container_at(root, segments, create).await?;
    parent.get_file(name, create).await
}

/// The directory named by a segment list; the empty list is the root itself
pub(crate) async fn directory_at(
    root: &dir::Handle,
    segments: &[String],
    create: bool,
) -> Result<dir::Handle> {
    let Some(name) = segments.last() else {
        return Ok(root.clone());
    };
    let parent = container_at(root, segments, create).await?;
    parent.get_directory(name, create).await
}

/// Resolve `path` to a file handle.
///
/// Fails with an invalid-path error when `path` denotes the root.
pub(crate) async fn file_for(root: &dir::Handle, path: &str, create: bool) -> Result<file::Handle> {
    let segments = path::resolve(path);
    if segments.is_empty() {
        return Err(Error::invalid_path(path));
    }
    file_at(root, &segments, create).await
}

/// Resolve `path` to a directory handle
pub(crate) async fn directory_for(
    root: &dir::Handle,
    path: &str,
    create: bool,
) -> Result<dir::Handle> {
    directory_at(root, &path::resolve(path), create).await
}
