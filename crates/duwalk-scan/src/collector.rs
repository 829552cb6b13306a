//! Accounting visitor that turns a walk into usage totals.

use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

use derive_builder::Builder;
use duwalk_core::{Entry, ScanError, ScanWarning, UsageReport, UsageStats, WarningKind};
use tokio::sync::broadcast;

use crate::inode::{InodeInfo, InodeTracker};
use crate::lister::DirLister;
use crate::progress::ScanProgress;
use crate::walker::Walker;

/// Configuration for a [`UsageCollector`].
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct CollectorConfig {
    /// Use apparent size (file length) instead of allocated blocks.
    #[builder(default = "false")]
    pub apparent_size: bool,

    /// Count each hardlinked inode only once.
    #[builder(default = "true")]
    pub dedupe_hardlinks: bool,

    /// Publish a progress snapshot every this many accounted entries.
    #[builder(default = "1000")]
    pub progress_every: u64,
}

impl CollectorConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.progress_every == Some(0) {
            return Err("progress_every must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl CollectorConfig {
    /// Create a new collector config builder.
    pub fn builder() -> CollectorConfigBuilder {
        CollectorConfigBuilder::default()
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            apparent_size: false,
            dedupe_hardlinks: true,
            progress_every: 1000,
        }
    }
}

/// Visitor that stats every walked entry and accumulates [`UsageStats`].
///
/// Entries that vanish between listing and stat, and directories that could
/// not be listed, become warnings. Any other stat failure aborts the walk.
/// The second visit of an unlistable directory is not counted again, and
/// adds no warning when the directory had already vanished.
pub struct UsageCollector {
    config: CollectorConfig,
    stats: UsageStats,
    warnings: Vec<ScanWarning>,
    inodes: Arc<InodeTracker>,
    progress_tx: broadcast::Sender<ScanProgress>,
    started: Instant,
    accounted: u64,
}

impl UsageCollector {
    /// Create a collector with its own inode tracker.
    pub fn new(config: CollectorConfig) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            config,
            stats: UsageStats::new(),
            warnings: Vec::new(),
            inodes: Arc::new(InodeTracker::new()),
            progress_tx,
            started: Instant::now(),
            accounted: 0,
        }
    }

    /// Share hardlink deduplication with other collectors.
    pub fn with_inode_tracker(mut self, inodes: Arc<InodeTracker>) -> Self {
        self.inodes = inodes;
        self
    }

    /// Subscribe to progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    pub fn stats(&self) -> &UsageStats {
        &self.stats
    }

    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    /// Account one entry. Suitable as a walker visitor.
    pub fn visit(&mut self, entry: &Entry) -> Result<(), ScanError> {
        if let Some(warning) = entry.listing_error() {
            if !self.just_vanished(&warning.path) {
                self.warnings.push(warning.clone());
            }
            return Ok(());
        }

        let metadata = match std::fs::symlink_metadata(entry.path()) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound && entry.depth() > 0 => {
                tracing::debug!(path = %entry.path().display(), "entry vanished before stat");
                self.warnings.push(ScanWarning::vanished(entry.path()));
                return Ok(());
            }
            Err(err) => return Err(ScanError::io(entry.path(), err)),
        };

        let depth = entry.depth();
        let file_type = metadata.file_type();
        if file_type.is_dir() {
            self.stats.record_dir(depth);
        } else if file_type.is_file() {
            let size = self.file_size(&metadata);
            let path = entry.path().to_path_buf();
            self.stats.record_file(path, size, depth);
        } else if file_type.is_symlink() {
            self.stats.record_symlink(depth);
        } else {
            self.stats.record_other(depth);
        }

        self.accounted += 1;
        if self.accounted % self.config.progress_every == 0 {
            self.publish(entry.path());
        }

        Ok(())
    }

    /// Walk `root` with this collector and produce a report.
    pub fn collect<L: DirLister>(
        mut self,
        walker: &Walker<L>,
        root: impl Into<PathBuf>,
    ) -> Result<UsageReport, ScanError> {
        let root = root.into();
        walker.disk_usage(root.clone(), |entry: &Entry| self.visit(entry))?;
        Ok(self.finish(root))
    }

    /// Publish a final snapshot and build the report.
    pub fn finish(self, root: impl Into<PathBuf>) -> UsageReport {
        let root = root.into();
        self.publish(&root);
        UsageReport::new(root, self.stats, self.started.elapsed(), self.warnings)
    }

    /// Current progress snapshot.
    pub fn progress(&self, current_path: &Path) -> ScanProgress {
        ScanProgress {
            files_scanned: self.stats.file_count,
            dirs_scanned: self.stats.dir_count,
            bytes_scanned: self.stats.total_size,
            current_path: current_path.to_path_buf(),
            errors_count: self.warnings.len() as u64,
            elapsed: self.started.elapsed(),
        }
    }

    // The revisit of an unlistable directory directly follows its first visit.
    fn just_vanished(&self, path: &Path) -> bool {
        self.warnings
            .last()
            .is_some_and(|last| last.kind == WarningKind::Vanished && last.path == path)
    }

    fn publish(&self, current_path: &Path) {
        // No receivers is fine.
        let _ = self.progress_tx.send(self.progress(current_path));
    }

    fn file_size(&self, metadata: &Metadata) -> u64 {
        if self.config.dedupe_hardlinks
            && get_nlink(metadata) > 1
            && !self
                .inodes
                .track(InodeInfo::new(get_ino(metadata), get_dev(metadata)))
        {
            return 0;
        }

        if self.config.apparent_size {
            metadata.len()
        } else {
            get_blocks(metadata) * 512
        }
    }
}

/// Walk the filesystem under `root` and total its usage.
pub fn scan_usage(
    root: impl Into<PathBuf>,
    config: CollectorConfig,
) -> Result<UsageReport, ScanError> {
    UsageCollector::new(config).collect(&Walker::fs(), root)
}

// Cross-platform metadata helpers

#[cfg(unix)]
fn get_dev(metadata: &Metadata) -> u64 {
    metadata.dev()
}

#[cfg(not(unix))]
fn get_dev(_metadata: &Metadata) -> u64 {
    0
}

#[cfg(unix)]
fn get_ino(metadata: &Metadata) -> u64 {
    metadata.ino()
}

#[cfg(not(unix))]
fn get_ino(_metadata: &Metadata) -> u64 {
    0
}

#[cfg(unix)]
fn get_nlink(metadata: &Metadata) -> u64 {
    metadata.nlink()
}

#[cfg(not(unix))]
fn get_nlink(_metadata: &Metadata) -> u64 {
    1
}

/// Number of 512-byte blocks allocated.
#[cfg(unix)]
fn get_blocks(metadata: &Metadata) -> u64 {
    metadata.blocks()
}

#[cfg(not(unix))]
fn get_blocks(metadata: &Metadata) -> u64 {
    metadata.len().div_ceil(512)
}
