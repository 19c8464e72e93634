// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Write-session management
//!
//! Every mutating operation opens exactly one session on one file, applies
//! one step (a write or a truncate), and then finalizes it: close when the
//! step succeeded, abort when anything failed. A failed write therefore
//! never commits partial bytes.
//!
//! [`Store::create_appendable`] is the exception: the open session is handed
//! to the caller as an [`Appendable`], which must be closed or aborted by
//! them. Batching many writes in one session avoids the per-call open and
//! commit cost of [`Store::append_file`].

use crate::error::{Error, Result};
use crate::file::{self, WriteSession};
use crate::jsonl;
use crate::navigate;
use crate::store::Store;
use serde::Serialize;

/// Options for [`Store::write_file`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Start from the current content instead of an empty file.
    ///
    /// The payload is still written at offset 0, so a short payload only
    /// overwrites a prefix: "new" over "original" leaves "newginal".
    pub keep_existing: bool,
}

/// Options for [`Store::write_json`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonWriteOptions {
    /// Indent with two spaces
    pub pretty: bool,
    pub keep_existing: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SessionOptions {
    pub keep_existing: bool,
    pub seek_to_end: bool,
}

/// The single step a managed session performs
#[derive(Debug, Clone, Copy)]
pub(crate) enum SessionOp<'a> {
    Write(&'a [u8]),
    Truncate(u64),
}

/// Open a session on `file`, apply `op`, then close or abort.
pub(crate) async fn with_session(
    file: &file::Handle,
    path: &str,
    options: SessionOptions,
    op: SessionOp<'_>,
) -> Result<()> {
    // The end offset is taken before this call changes anything
    let start = if options.seek_to_end {
        Some(file.size().await?)
    } else {
        None
    };

    let mut session = file.open_session(options.keep_existing).await?;
    log::debug!(
        "Opened write session on '{path}' (keep_existing={})",
        options.keep_existing
    );
    let outcome = apply(session.as_mut(), start, op).await;
    finish(session, path, outcome).await
}

async fn apply(session: &mut dyn WriteSession, start: Option<u64>, op: SessionOp<'_>) -> Result<()> {
    if let Some(offset) = start {
        session.seek(offset).await?;
    }
    match op {
        SessionOp::Write(data) => session.write(data).await,
        SessionOp::Truncate(size) => session.truncate(size).await,
    }
}

/// Commit on success; on failure abort and return the original error.
async fn finish(
    mut session: Box<dyn WriteSession>,
    path: &str,
    outcome: Result<()>,
) -> Result<()> {
    match outcome {
        Ok(()) => {
            session.close().await?;
            log::debug!("Committed write session on '{path}'");
            Ok(())
        }
        Err(err) => {
            if let Err(abort_err) = session.abort().await {
                log::warn!("Abort of write session on '{path}' failed: {abort_err}");
            }
            log::debug!("Aborted write session on '{path}': {err}");
            Err(err)
        }
    }
}

/// A caller-owned write session returned by [`Store::create_appendable`].
///
/// The cursor starts at the end of the file as it was when the session
/// opened. Nothing is visible to readers until [`Appendable::close`].
/// Dropping an `Appendable` without closing it discards its writes.
pub struct Appendable {
    inner: Option<Box<dyn WriteSession>>,
    path: String,
}

impl Appendable {
    fn session(&mut self) -> Result<&mut Box<dyn WriteSession>> {
        let path = &self.path;
        self.inner
            .as_mut()
            .ok_or_else(|| Error::aborted(format!("session on '{path}' finalized")))
    }

    /// The path this session was opened for
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Write at the cursor and advance it
    pub async fn write(&mut self, data: impl AsRef<[u8]>) -> Result<()> {
        self.session()?.write(data.as_ref()).await
    }

    pub async fn seek(&mut self, offset: u64) -> Result<()> {
        self.session()?.seek(offset).await
    }

    /// Resize the staged content, zero-filling any growth
    pub async fn truncate(&mut self, size: u64) -> Result<()> {
        self.session()?.truncate(size).await
    }

    /// Commit everything written through this session
    pub async fn close(mut self) -> Result<()> {
        let mut session = self.take()?;
        session.close().await?;
        log::debug!("Committed appendable session on '{}'", self.path);
        Ok(())
    }

    /// Discard everything written through this session
    pub async fn abort(mut self) -> Result<()> {
        let mut session = self.take()?;
        session.abort().await?;
        log::debug!("Aborted appendable session on '{}'", self.path);
        Ok(())
    }

    fn take(&mut self) -> Result<Box<dyn WriteSession>> {
        self.inner
            .take()
            .ok_or_else(|| Error::aborted(format!("session on '{}' finalized", self.path)))
    }
}

impl Drop for Appendable {
    fn drop(&mut self) {
        if self.inner.is_some() {
            log::warn!(
                "Appendable session on '{}' dropped without close; writes discarded",
                self.path
            );
        }
    }
}

impl std::fmt::Debug for Appendable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Appendable")
            .field("path", &self.path)
            .field("open", &self.inner.is_some())
            .finish()
    }
}

impl Store {
    /// Write `data` as the content of `path`, creating it and its parents.
    pub async fn write_file(
        &self,
        path: &str,
        data: impl AsRef<[u8]>,
        options: WriteOptions,
    ) -> Result<()> {
        let file = navigate::file_for(self.root(), path, true).await?;
        let options = SessionOptions {
            keep_existing: options.keep_existing,
            seek_to_end: false,
        };
        with_session(&file, path, options, SessionOp::Write(data.as_ref())).await
    }

    /// Append `data` to `path`, creating it and its parents.
    ///
    /// Each call opens and commits its own session; use
    /// [`Store::create_appendable`] for many small appends.
    pub async fn append_file(&self, path: &str, data: impl AsRef<[u8]>) -> Result<()> {
        let file = navigate::file_for(self.root(), path, true).await?;
        let options = SessionOptions {
            keep_existing: true,
            seek_to_end: true,
        };
        with_session(&file, path, options, SessionOp::Write(data.as_ref())).await
    }

    /// Append `value` as one JSON line
    pub async fn append_jsonl<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> Result<()> {
        let line = jsonl::encode_line(value)?;
        self.append_file(path, line).await
    }

    pub async fn write_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        value: &T,
        options: JsonWriteOptions,
    ) -> Result<()> {
        let text = if options.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        let write_options = WriteOptions {
            keep_existing: options.keep_existing,
        };
        self.write_file(path, text, write_options).await
    }

    /// Resize `path` to `size` bytes, zero-filling growth and creating it if absent.
    pub async fn truncate(&self, path: &str, size: u64) -> Result<()> {
        let file = navigate::file_for(self.root(), path, true).await?;
        let options = SessionOptions {
            keep_existing: true,
            seek_to_end: false,
        };
        with_session(&file, path, options, SessionOp::Truncate(size)).await
    }

    /// Open a long-lived session positioned at the end of `path`.
    ///
    /// The caller must finish it with [`Appendable::close`] or
    /// [`Appendable::abort`].
    pub async fn create_appendable(&self, path: &str) -> Result<Appendable> {
        let file = navigate::file_for(self.root(), path, true).await?;
        let end = file.size().await?;
        let mut appendable = Appendable {
            inner: Some(file.open_session(true).await?),
            path: path.to_string(),
        };
        if let Err(err) = appendable.seek(end).await {
            if let Err(abort_err) = appendable.abort().await {
                log::warn!("Abort of appendable session on '{path}' failed: {abort_err}");
            }
            return Err(err);
        }
        log::debug!("Opened appendable session on '{path}' at offset {end}");
        Ok(appendable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;

    #[tokio::test]
    async fn test_failed_step_aborts() {
        let store = Store::with_backend(MemoryBackend::new(Some(8))).await.unwrap();
        store
            .write_file("f", "1234", WriteOptions::default())
            .await
            .unwrap();

        let err = store.append_file("f", "56789").await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::QuotaExceeded);
        assert_eq!(store.read_text("f").await.unwrap(), "1234");
    }

    #[tokio::test]
    async fn test_appendable_drop_discards() {
        let _ = env_logger::try_init();
        let store = Store::with_backend(MemoryBackend::default()).await.unwrap();
        store
            .write_file("log", "a\n", WriteOptions::default())
            .await
            .unwrap();

        {
            let mut appendable = store.create_appendable("log").await.unwrap();
            appendable.write("b\n").await.unwrap();
        }
        assert_eq!(store.read_text("log").await.unwrap(), "a\n");
    }

    #[tokio::test]
    async fn test_appendable_seek_and_truncate() {
        let store = Store::with_backend(MemoryBackend::default()).await.unwrap();
        store
            .write_file("f", "abcdef", WriteOptions::default())
            .await
            .unwrap();

        let mut appendable = store.create_appendable("f").await.unwrap();
        assert_eq!(appendable.path(), "f");
        appendable.truncate(3).await.unwrap();
        appendable.write("XY").await.unwrap();
        appendable.seek(0).await.unwrap();
        appendable.write("z").await.unwrap();
        appendable.close().await.unwrap();

        assert_eq!(store.read_text("f").await.unwrap(), "zbcXY");
    }
}
