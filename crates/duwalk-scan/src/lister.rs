//! Directory listing collaborators.

use std::io;
use std::path::Path;

use duwalk_core::{EntryKind, ListedEntry};

/// Lists the immediate children of one directory.
///
/// Names are relative to `dir`. Each child's kind is decided here, once; the
/// walker uses it as the only signal for whether to descend. Order is
/// whatever the implementation returns.
pub trait DirLister {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<ListedEntry>>;
}

impl<L: DirLister + ?Sized> DirLister for &L {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<ListedEntry>> {
        (**self).read_dir(dir)
    }
}

/// Lists directories with `std::fs::read_dir`.
///
/// Symbolic links are never followed: a link to a directory is a leaf, so
/// the walker does not descend into it and its target is not accounted.
/// A storage tree that mounts drives or buckets through directory symlinks
/// is only partly walked. Hosts that need those subtrees should supply a
/// [`DirLister`] that classifies such links by their target's type.
///
/// Any error while iterating fails the whole listing. Entries are not sorted.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLister;

impl DirLister for FsLister {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<ListedEntry>> {
        let mut listed = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let kind = if entry.file_type()?.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::Leaf
            };
            listed.push(ListedEntry::new(entry.file_name(), kind));
        }
        Ok(listed)
    }
}
