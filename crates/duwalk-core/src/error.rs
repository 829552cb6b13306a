//! Error types for walking and configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while walking a tree or accounting an entry.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The walk was cancelled by the caller.
    #[error("Operation interrupted")]
    Interrupted,
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Errors produced while parsing or decoding the usage interval.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The duration text could not be parsed.
    #[error("{message}")]
    InvalidDuration { message: String },

    /// The duration parsed but is shorter than the allowed minimum.
    #[error(
        "interval {} is not allowed, minimum required value is {}",
        humantime::format_duration(*interval),
        humantime::format_duration(*minimum)
    )]
    BelowMinimum {
        interval: Duration,
        minimum: Duration,
    },

    /// The surrounding JSON document is malformed.
    #[error("invalid usage config: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// True for the range failure, false for malformed input.
    pub fn is_below_minimum(&self) -> bool {
        matches!(self, Self::BelowMinimum { .. })
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// Entry disappeared between listing and accounting.
    Vanished,
    /// Error listing a directory.
    ReadError,
}

/// Non-fatal warning encountered during a walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a warning for a directory whose children could not be listed.
    pub fn read_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        let kind = match error.kind() {
            std::io::ErrorKind::PermissionDenied => WarningKind::PermissionDenied,
            _ => WarningKind::ReadError,
        };
        Self {
            message: format!("Read error: {error}"),
            path,
            kind,
        }
    }

    /// Create a warning for an entry that no longer exists.
    pub fn vanished(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Vanished during scan: {}", path.display()),
            path,
            kind: WarningKind::Vanished,
        }
    }
}
