// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// The two kinds of entry a directory can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Directory => write!(f, "directory"),
        }
    }
}

/// A live handle of either kind
#[derive(Clone)]
pub enum Node {
    File(crate::file::Handle),
    Directory(crate::dir::Handle),
}

impl Node {
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        match self {
            Node::File(_) => EntryKind::File,
            Node::Directory(_) => EntryKind::Directory,
        }
    }

    #[must_use]
    pub fn as_file(&self) -> Option<&crate::file::Handle> {
        match self {
            Node::File(f) => Some(f),
            Node::Directory(_) => None,
        }
    }

    #[must_use]
    pub fn as_dir(&self) -> Option<&crate::dir::Handle> {
        match self {
            Node::Directory(d) => Some(d),
            Node::File(_) => None,
        }
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::File(_) => write!(f, "(file)"),
            Node::Directory(_) => write!(f, "(directory)"),
        }
    }
}

/// One child of a directory, as yielded by handle enumeration
#[derive(Clone, Debug)]
pub struct DirEntry {
    pub name: String,
    pub node: Node,
}

impl DirEntry {
    #[must_use]
    pub fn new(name: String, node: Node) -> Self {
        Self { name, node }
    }

    #[must_use]
    pub fn kind(&self) -> EntryKind {
        self.node.kind()
    }
}
