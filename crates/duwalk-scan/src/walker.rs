//! Depth-first usage walker.

use std::path::PathBuf;

use duwalk_core::{Entry, ScanError, ScanWarning};
use tokio_util::sync::CancellationToken;

use crate::lister::{DirLister, FsLister};

/// Visits a root and every entry beneath it, parents before children.
///
/// The walk uses an explicit worklist, so tree depth costs heap rather than
/// call stack. The walker keeps no state between walks.
#[derive(Debug, Clone)]
pub struct Walker<L = FsLister> {
    lister: L,
    cancel: Option<CancellationToken>,
}

impl Walker<FsLister> {
    /// Walker over the local filesystem.
    pub fn fs() -> Self {
        Self::new(FsLister)
    }
}

impl Default for Walker<FsLister> {
    fn default() -> Self {
        Self::fs()
    }
}

impl<L: DirLister> Walker<L> {
    /// Create a walker over the given lister.
    pub fn new(lister: L) -> Self {
        Self {
            lister,
            cancel: None,
        }
    }

    /// Stop the walk with [`ScanError::Interrupted`] once `token` is cancelled.
    ///
    /// The token is checked before each entry is visited, which is also
    /// before the entry's directory is listed.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Walk `root` in pre-order, calling `visit` on every entry.
    ///
    /// The first error returned by `visit` ends the walk and is returned
    /// unchanged. Children of a directory are visited in listing order.
    ///
    /// A directory that cannot be listed is visited a second time, with the
    /// listing failure attached (see [`Entry::listing_error`]); the result of
    /// that second call stands in for the directory's whole subtree. Visitors
    /// that count every call therefore count such a directory twice.
    pub fn walk<F, E>(&self, root: Entry, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&Entry) -> Result<(), E>,
        E: From<ScanError>,
    {
        let mut pending = vec![root];

        while let Some(entry) = pending.pop() {
            if self.is_cancelled() {
                return Err(ScanError::Interrupted.into());
            }

            visit(&entry)?;

            if !entry.is_dir() {
                continue;
            }

            let children = match self.lister.read_dir(entry.path()) {
                Ok(children) => children,
                Err(err) => {
                    tracing::debug!(
                        path = %entry.path().display(),
                        error = %err,
                        "cannot list directory, visiting it again"
                    );
                    let warning = ScanWarning::read_error(entry.path(), &err);
                    visit(&entry.with_listing_error(warning))?;
                    continue;
                }
            };

            tracing::trace!(
                path = %entry.path().display(),
                children = children.len(),
                "listed directory"
            );

            // Reversed so the first listed child is popped first.
            pending.extend(children.iter().rev().map(|listed| entry.child(listed)));
        }

        Ok(())
    }

    /// Walk `root` as a directory, whatever it actually is.
    pub fn disk_usage<F, E>(&self, root: impl Into<PathBuf>, visit: F) -> Result<(), E>
    where
        F: FnMut(&Entry) -> Result<(), E>,
        E: From<ScanError>,
    {
        self.walk(Entry::root(root), visit)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}

/// Walk the filesystem tree rooted at `root`, calling `visit` for the root
/// and every file or directory beneath it.
pub fn get_disk_usage<F, E>(root: impl Into<PathBuf>, visit: F) -> Result<(), E>
where
    F: FnMut(&Entry) -> Result<(), E>,
    E: From<ScanError>,
{
    Walker::fs().disk_usage(root, visit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world world").unwrap();
        fs::write(root.join("dir1/subdir/file3.txt"), "test").unwrap();
        fs::write(root.join("dir2/file4.txt"), "another file here").unwrap();

        temp
    }

    #[test]
    fn test_visits_every_entry_once() {
        let temp = create_test_tree();
        let mut seen = Vec::new();

        get_disk_usage(temp.path(), |entry: &Entry| -> Result<(), ScanError> {
            seen.push(entry.path().to_path_buf());
            Ok(())
        })
        .unwrap();

        // root + 3 dirs + 4 files
        assert_eq!(seen.len(), 8);
        assert_eq!(seen[0], temp.path());
        let mut unique = seen.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), seen.len());
    }

    #[test]
    fn test_parents_before_children() {
        let temp = create_test_tree();
        let mut seen: Vec<PathBuf> = Vec::new();

        get_disk_usage(temp.path(), |entry: &Entry| -> Result<(), ScanError> {
            if let Some(parent) = entry.path().parent() {
                if entry.depth() > 0 {
                    assert!(seen.iter().any(|p| p == parent));
                }
            }
            seen.push(entry.path().to_path_buf());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_depth_and_kind_from_listing() {
        let temp = create_test_tree();
        let mut deepest: Option<(PathBuf, u32)> = None;

        get_disk_usage(temp.path(), |entry: &Entry| -> Result<(), ScanError> {
            if entry.path().ends_with("subdir") {
                assert!(entry.is_dir());
            }
            if entry.path().ends_with("file3.txt") {
                assert!(!entry.is_dir());
                deepest = Some((entry.path().to_path_buf(), entry.depth()));
            }
            Ok(())
        })
        .unwrap();

        let (path, depth) = deepest.unwrap();
        assert_eq!(path, temp.path().join("dir1/subdir/file3.txt"));
        assert_eq!(depth, 3);
    }

    #[test]
    fn test_missing_root_visited_twice() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let mut calls = Vec::new();

        get_disk_usage(&missing, |entry: &Entry| -> Result<(), ScanError> {
            calls.push(entry.listing_error().is_some());
            Ok(())
        })
        .unwrap();

        assert_eq!(calls, vec![false, true]);
    }

    #[test]
    fn test_cancelled_token_stops_walk() {
        let temp = create_test_tree();
        let token = CancellationToken::new();
        token.cancel();

        let mut visits = 0;
        let walker = Walker::fs().with_cancellation(token);
        let result = walker.disk_usage(temp.path(), |_: &Entry| -> Result<(), ScanError> {
            visits += 1;
            Ok(())
        });

        assert!(matches!(result, Err(ScanError::Interrupted)));
        assert_eq!(visits, 0);
    }

    #[test]
    fn test_root_path_is_kept_verbatim() {
        let temp = TempDir::new().unwrap();
        let mut root_seen = None;
        get_disk_usage(temp.path(), |entry: &Entry| -> Result<(), ScanError> {
            root_seen.get_or_insert_with(|| entry.path().to_path_buf());
            Ok(())
        })
        .unwrap();
        assert_eq!(root_seen.as_deref(), Some(Path::new(temp.path())));
    }
}
