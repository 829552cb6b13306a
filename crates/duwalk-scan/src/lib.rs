//! Disk usage walking for duwalk.
//!
//! This crate visits a root and every file and directory beneath it,
//! handing each entry to a caller-supplied visitor that does the
//! accounting. Key pieces:
//!
//! - **[`Walker`]** - depth-first, pre-order, fail-fast traversal on an
//!   explicit worklist, with optional cancellation
//! - **[`DirLister`]** - the listing collaborator; [`FsLister`] reads the
//!   local filesystem
//! - **[`UsageCollector`]** - a ready-made visitor that totals sizes and
//!   counts, deduplicates hardlinks and publishes progress
//!
//! # Example
//!
//! ```rust,no_run
//! use duwalk_scan::{Entry, ScanError, get_disk_usage};
//!
//! let mut entries = 0u64;
//! get_disk_usage("/var/lib/data", |_entry: &Entry| -> Result<(), ScanError> {
//!     entries += 1;
//!     Ok(())
//! })
//! .unwrap();
//!
//! println!("{entries} entries");
//! ```
//!
//! # Collecting usage
//!
//! ```rust,no_run
//! use duwalk_scan::{CollectorConfig, scan_usage};
//!
//! let report = scan_usage("/var/lib/data", CollectorConfig::default()).unwrap();
//! println!("Total size: {}", report.stats.human_size());
//! ```
//!
//! # Unreadable directories
//!
//! A directory that cannot be listed does not fail the walk by itself. The
//! visitor is called on it a second time with [`Entry::listing_error`] set,
//! and that second call decides the outcome for the subtree.

mod collector;
mod inode;
mod lister;
mod progress;
mod walker;

pub use collector::{CollectorConfig, CollectorConfigBuilder, UsageCollector, scan_usage};
pub use inode::{InodeInfo, InodeTracker};
pub use lister::{DirLister, FsLister};
pub use progress::ScanProgress;
pub use walker::{Walker, get_disk_usage};

pub use tokio_util::sync::CancellationToken;

// Re-export core types for convenience
pub use duwalk_core::{
    Entry, EntryKind, ListedEntry, ScanError, ScanWarning, UsageReport, UsageStats, WarningKind,
};
