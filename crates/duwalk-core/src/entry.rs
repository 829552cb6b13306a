//! Walk entries and their kinds.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ScanWarning;

/// Whether the walker descends into an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// A directory; its children are listed after it is visited.
    Directory,
    /// Anything else: regular files, symlinks, sockets, devices.
    Leaf,
}

impl EntryKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// Check if this is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, EntryKind::Leaf)
    }
}

/// A child name as returned by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedEntry {
    /// Name relative to the listed directory.
    pub name: OsString,
    /// Kind decided by the lister.
    pub kind: EntryKind,
}

impl ListedEntry {
    /// Create a listed entry.
    pub fn new(name: impl Into<OsString>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Listed directory.
    pub fn dir(name: impl Into<OsString>) -> Self {
        Self::new(name, EntryKind::Directory)
    }

    /// Listed leaf.
    pub fn leaf(name: impl Into<OsString>) -> Self {
        Self::new(name, EntryKind::Leaf)
    }
}

/// A path handed to the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    path: PathBuf,
    kind: EntryKind,
    depth: u32,
    listing_error: Option<ScanWarning>,
}

impl Entry {
    /// Root of a walk. Always a directory at depth 0.
    pub fn root(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            depth: 0,
            listing_error: None,
        }
    }

    /// Entry with an explicit kind at depth 0.
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
            depth: 0,
            listing_error: None,
        }
    }

    /// Join a listed name onto this entry's path.
    pub fn child(&self, listed: &ListedEntry) -> Self {
        Self {
            path: self.path.join(&listed.name),
            kind: listed.kind,
            depth: self.depth + 1,
            listing_error: None,
        }
    }

    /// Copy of this entry marked with the failure to list its children.
    pub fn with_listing_error(&self, warning: ScanWarning) -> Self {
        Self {
            listing_error: Some(warning),
            ..self.clone()
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Distance from the walk root.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Set only on the second visit of a directory that could not be listed.
    pub fn listing_error(&self) -> Option<&ScanWarning> {
        self.listing_error.as_ref()
    }
}
