// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Whole-file reads: bytes, text, JSON and JSON lines.

use crate::error::{Error, Result};
use crate::jsonl;
use crate::navigate;
use crate::store::Store;
use encoding_rs::Encoding;
use serde::de::DeserializeOwned;

/// Decode `bytes` as text, leniently.
///
/// `label` is a WHATWG encoding label such as `"utf-8"`, `"utf-16le"` or
/// `"latin1"`; `None` means UTF-8. A leading byte order mark for the chosen
/// encoding is stripped and malformed sequences become U+FFFD.
pub fn decode_text(bytes: &[u8], label: Option<&str>) -> Result<String> {
    let encoding = match label {
        None => encoding_rs::UTF_8,
        Some(label) => Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| Error::Encoding(label.to_string()))?,
    };
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        log::debug!("Replaced malformed {} sequences", encoding.name());
    }
    Ok(text.into_owned())
}

impl Store {
    /// The full committed content of the file at `path`
    pub async fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let file = navigate::file_for(self.root(), path, false).await?;
        file.content().await
    }

    /// The file at `path` decoded as UTF-8
    pub async fn read_text(&self, path: &str) -> Result<String> {
        self.read_text_with_encoding(path, None).await
    }

    pub async fn read_text_with_encoding(&self, path: &str, label: Option<&str>) -> Result<String> {
        let bytes = self.read_binary(path).await?;
        decode_text(&bytes, label)
    }

    /// Parse the file at `path` as a single JSON document
    pub async fn read_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.read_json_with_encoding(path, None).await
    }

    pub async fn read_json_with_encoding<T: DeserializeOwned>(
        &self,
        path: &str,
        label: Option<&str>,
    ) -> Result<T> {
        let text = self.read_text_with_encoding(path, label).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Parse the file at `path` as JSON lines.
    ///
    /// Blank lines are skipped. One malformed line fails the whole read.
    pub async fn read_jsonl<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        self.read_jsonl_with_encoding(path, None).await
    }

    pub async fn read_jsonl_with_encoding<T: DeserializeOwned>(
        &self,
        path: &str,
        label: Option<&str>,
    ) -> Result<Vec<T>> {
        let text = self.read_text_with_encoding(path, label).await?;
        jsonl::parse(&text)
    }
}
