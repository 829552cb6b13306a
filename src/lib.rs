//! duwalk - disk usage accounting for storage nodes.
//!
//! Re-exports the walker and accounting visitor from `duwalk-scan` and the
//! usage-check interval configuration from `duwalk-core`.
//!
//! ```rust,no_run
//! use duwalk::{CollectorConfig, IntervalPolicy, UsageConfig, scan_usage};
//!
//! let policy = IntervalPolicy::default();
//! let config = UsageConfig::decode(r#"{"interval":"6h"}"#, &policy).unwrap();
//!
//! let report = scan_usage("/var/lib/data", CollectorConfig::default()).unwrap();
//! println!(
//!     "{} in {} files, next scan in {}",
//!     report.stats.human_size(),
//!     report.stats.file_count,
//!     config.interval_string()
//! );
//! ```

pub use duwalk_core::{ConfigError, IntervalPolicy, UsageConfig, UsageConfigSeed, parse_interval};
pub use duwalk_scan::*;
