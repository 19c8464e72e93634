// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! JSON-lines framing: one JSON document per LF-terminated line.

use crate::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// End of line sequence written after each record
pub const EOL: &str = "\n";

/// Serialize `value` as one compact line, including the terminator.
pub fn encode_line<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut line = serde_json::to_string(value)?;
    line.push_str(EOL);
    Ok(line)
}

/// Parse every non-blank line of `text`.
///
/// Accepts LF and CRLF line endings. Any malformed line fails the whole
/// parse; no partial result is returned.
pub fn parse<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    text.trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).map_err(Into::into))
        .collect()
}
