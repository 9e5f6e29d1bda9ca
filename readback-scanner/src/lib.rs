//! Readback Scanner Library
//!
//! Extracts calibration readback measurements from plaintext instrument test
//! logs. Only data under a fixed set of report headings is collected, and it is
//! returned as ordered sections, groups and per-channel records.
//!
//! # Architecture
//!
//! - [`SectionScanner`] walks the lines once, tracking which target section it
//!   is in and which group is being accumulated
//! - Two extraction variants: `Readback values` lines (one line per group) and
//!   `Meas VAL/ANGLE Check` lines (fields arrive per channel)
//! - [`GroupStatistics`] reduces a group to cohort averages, maxima and minima
//!
//! The library does NOT:
//! - Discover input files
//! - Lay out or write spreadsheets
//! - Prompt the user
//!
//! All of that lives in the application layer (readback-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use readback_scanner::{scan_file, ExtractionVariant, GroupStatistics, ScannerConfig};
//! use std::path::Path;
//!
//! let config = ScannerConfig::new().with_variant(ExtractionVariant::Readback);
//! let report = scan_file(Path::new("bench_01.txt"), &config).unwrap();
//!
//! for section in &report.sections {
//!     for group in &section.groups {
//!         let stats = GroupStatistics::from_group(group);
//!         println!("{}: VAL avg {:?}", section.name(), stats.val_all.map(|a| a.avg));
//!     }
//! }
//! ```

// Public modules
pub mod config;
pub mod extract;
pub mod reader;
pub mod scanner;
pub mod sections;
pub mod stats;
pub mod types;

// Re-export main types for convenience
pub use config::{ExtractionVariant, ScannerConfig};
pub use reader::{read_log_text, scan_file};
pub use scanner::SectionScanner;
pub use sections::TargetSection;
pub use stats::{Aggregate, Cohort, GroupStatistics, STATISTICS_HEADERS};
pub use types::{
    Channel, ChannelRecord, Group, ParseIssue, Result, ScanReport, ScannerError, Section,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
