// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Path normalization
//!
//! Store paths are always relative to the store root: a leading `/` is
//! accepted and ignored, and `..` is clamped at the root instead of failing.
//!
//! Examples:
//! - "/foo/bar/baz.txt" -> ["foo", "bar", "baz.txt"]
//! - "/foo/bar/" -> ["foo", "bar"]
//! - "foo///./bar" -> ["foo", "bar"]
//! - "foo/bar/../../baz" -> ["baz"]
//! - "/", ".", "./", "..", "" -> [] (root)

pub const SEPARATOR: char = '/';

/// Split a path into normalized segments.
///
/// Empty, whitespace-only and `.` tokens are dropped. A `..` token pops the
/// previous segment, or is dropped when nothing precedes it. Never fails.
#[must_use]
pub fn resolve(path: &str) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    for token in path.trim().split(SEPARATOR) {
        match token {
            "." => {}
            ".." => {
                _ = segments.pop();
            }
            t if t.trim().is_empty() => {}
            t => segments.push(t.to_string()),
        }
    }
    segments
}

/// Render segments back into a rooted display path, e.g. `/a/b`.
#[must_use]
pub fn display(segments: &[String]) -> String {
    let mut out = String::with_capacity(segments.iter().map(|s| s.len() + 1).sum());
    for segment in segments {
        out.push(SEPARATOR);
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push(SEPARATOR);
    }
    out
}

/// Whether `name` can be used verbatim as a single entry name.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}
