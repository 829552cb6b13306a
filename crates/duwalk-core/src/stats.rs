//! Usage totals and scan reports.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::error::ScanWarning;

/// Accumulated usage for a walked subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Total size in bytes.
    pub total_size: u64,
    /// Number of regular files.
    pub file_count: u64,
    /// Number of directories, including the root.
    pub dir_count: u64,
    /// Number of symbolic links.
    pub symlink_count: u64,
    /// Number of other entries (sockets, fifos, devices).
    pub other_count: u64,
    /// Maximum depth reached.
    pub max_depth: u32,
    /// Largest file (path, size).
    pub largest_file: Option<(PathBuf, u64)>,
}

impl UsageStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats with a file entry.
    pub fn record_file(&mut self, path: PathBuf, size: u64, depth: u32) {
        self.file_count += 1;
        self.total_size += size;
        self.max_depth = self.max_depth.max(depth);

        if self.largest_file.as_ref().is_none_or(|(_, s)| size > *s) {
            self.largest_file = Some((path, size));
        }
    }

    /// Record a directory.
    pub fn record_dir(&mut self, depth: u32) {
        self.dir_count += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a symlink.
    pub fn record_symlink(&mut self, depth: u32) {
        self.symlink_count += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a special file.
    pub fn record_other(&mut self, depth: u32) {
        self.other_count += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Total number of accounted entries.
    pub fn total_entries(&self) -> u64 {
        self.file_count + self.dir_count + self.symlink_count + self.other_count
    }

    /// Total size in binary units.
    pub fn human_size(&self) -> String {
        humansize::format_size(self.total_size, humansize::BINARY)
    }
}

/// Result of one accounting pass over a subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageReport {
    /// Root path that was walked.
    pub root: PathBuf,
    /// When the walk finished.
    pub scanned_at: SystemTime,
    /// How long the walk took.
    pub scan_duration: Duration,
    /// Accumulated totals.
    pub stats: UsageStats,
    /// Non-fatal problems encountered.
    pub warnings: Vec<ScanWarning>,
}

impl UsageReport {
    /// Create a new report stamped with the current time.
    pub fn new(
        root: PathBuf,
        stats: UsageStats,
        scan_duration: Duration,
        warnings: Vec<ScanWarning>,
    ) -> Self {
        Self {
            root,
            scanned_at: SystemTime::now(),
            scan_duration,
            stats,
            warnings,
        }
    }

    pub fn total_size(&self) -> u64 {
        self.stats.total_size
    }

    /// Check if there were any warnings during the walk.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
