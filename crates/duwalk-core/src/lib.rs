//! Core types for duwalk.
//!
//! This crate provides the data structures shared by the walker and its
//! callers: walk entries, the usage-check interval configuration, error
//! types and accumulated usage statistics.

mod config;
mod entry;
mod error;
mod stats;

pub use config::{IntervalPolicy, UsageConfig, UsageConfigSeed, parse_interval};
pub use entry::{Entry, EntryKind, ListedEntry};
pub use error::{ConfigError, ScanError, ScanWarning, WarningKind};
pub use stats::{UsageReport, UsageStats};
