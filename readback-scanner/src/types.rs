//! Core types for the readback scanner library
//!
//! This module defines the structured output of a scan: sections, the groups
//! inside them, and the per-channel records inside each group. The scanner
//! only builds these values - flattening them into spreadsheet rows happens in
//! the application layer.

use crate::sections::TargetSection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Result type for scanner operations
pub type Result<T> = std::result::Result<T, ScannerError>;

/// Channel number as printed in the log (`ch: 3`, `CH3`)
pub type Channel = u32;

/// Errors that can occur while loading or scanning a log file
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    #[error("File not found: {0:?}")]
    FileNotFound(PathBuf),

    #[error("Failed to read file {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One channel's readings inside a group
///
/// Readback lines always populate all four fields. Meas-check lines deliver
/// VAL and ANGLE on separate lines, so either may still be `None` when the
/// group closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    /// Channel number
    pub channel: Channel,
    /// Measured value
    pub val: Option<f64>,
    /// Measured angle
    pub angle: Option<f64>,
    /// Digital gain (readback only)
    pub dg: Option<i64>,
    /// Offset angle (readback only)
    pub oang: Option<f64>,
}

impl ChannelRecord {
    /// Create a fully populated record from a readback line
    pub fn readback(channel: Channel, val: f64, angle: f64, dg: i64, oang: f64) -> Self {
        Self {
            channel,
            val: Some(val),
            angle: Some(angle),
            dg: Some(dg),
            oang: Some(oang),
        }
    }

    /// Create an empty record for a channel
    pub fn empty(channel: Channel) -> Self {
        Self {
            channel,
            val: None,
            angle: None,
            dg: None,
            oang: None,
        }
    }

    /// Spreadsheet label for this channel (`CH0`, `CH11`, ...)
    pub fn label(&self) -> String {
        format!("CH{}", self.channel)
    }
}

/// One measurement pass: records keyed by channel number
///
/// Iteration is always in ascending channel order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    records: BTreeMap<Channel, ChannelRecord>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any existing record for the same channel
    pub fn insert(&mut self, record: ChannelRecord) {
        self.records.insert(record.channel, record);
    }

    pub fn get(&self, channel: Channel) -> Option<&ChannelRecord> {
        self.records.get(&channel)
    }

    pub fn get_mut(&mut self, channel: Channel) -> Option<&mut ChannelRecord> {
        self.records.get_mut(&channel)
    }

    /// Records in ascending channel order
    pub fn records(&self) -> impl Iterator<Item = &ChannelRecord> {
        self.records.values()
    }

    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.records.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<ChannelRecord> for Group {
    fn from_iter<T: IntoIterator<Item = ChannelRecord>>(iter: T) -> Self {
        let mut group = Group::new();
        for record in iter {
            group.insert(record);
        }
        group
    }
}

/// One occurrence of a target heading and the groups found beneath it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Which heading opened this section
    pub target: TargetSection,
    /// Groups in the order they were closed
    pub groups: Vec<Group>,
}

impl Section {
    pub fn new(target: TargetSection) -> Self {
        Self {
            target,
            groups: Vec::new(),
        }
    }

    /// Canonical display name, e.g. `8.4 60Hz Verification1`
    pub fn name(&self) -> &'static str {
        self.target.display_name()
    }

    pub fn has_data(&self) -> bool {
        !self.groups.is_empty()
    }
}

/// A numeric field that could not be parsed; the match it belonged to was dropped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseIssue {
    /// 1-based line number in the input
    pub line: usize,
    /// Field name as it appears in the log (`Val`, `DG`, `CH`, ...)
    pub field: String,
    /// The text that failed to parse
    pub text: String,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: could not parse {} value {:?}",
            self.line, self.field, self.text
        )
    }
}

/// Everything a single scan produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Sections with at least one group, in file order
    pub sections: Vec<Section>,
    /// Dropped matches, in file order
    pub issues: Vec<ParseIssue>,
    /// Number of lines examined
    pub lines_read: usize,
}

impl ScanReport {
    /// Total number of groups across all sections
    pub fn group_count(&self) -> usize {
        self.sections.iter().map(|s| s.groups.len()).sum()
    }
}
