//! Usage scan progress reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Progress snapshot published while a collector runs.
#[derive(Debug, Clone, Default)]
pub struct ScanProgress {
    /// Number of files accounted so far.
    pub files_scanned: u64,
    /// Number of directories accounted so far.
    pub dirs_scanned: u64,
    /// Total bytes accounted so far.
    pub bytes_scanned: u64,
    /// Entry most recently visited.
    pub current_path: PathBuf,
    /// Number of warnings recorded.
    pub errors_count: u64,
    /// Time elapsed since the collector started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Calculate scan rate in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.files_scanned as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Get total items scanned (files + dirs).
    pub fn total_items(&self) -> u64 {
        self.files_scanned + self.dirs_scanned
    }
}
