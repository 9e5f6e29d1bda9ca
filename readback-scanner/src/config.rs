//! Scanner configuration types
//!
//! This module defines the minimal configuration needed by the scanner library.
//! Anything about output layout or file discovery belongs to the application layer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Channel;

/// How a group's records are assembled from the log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionVariant {
    /// One `Readback values` line carries every channel of one group
    #[default]
    Readback,
    /// `Meas VAL Check` and `Meas ANGLE Check` lines arrive per channel
    MeasCheck,
}

impl fmt::Display for ExtractionVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionVariant::Readback => write!(f, "readback"),
            ExtractionVariant::MeasCheck => write!(f, "meas-check"),
        }
    }
}

/// Configuration for the section scanner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Which extraction variant to run inside target sections
    #[serde(default)]
    pub variant: ExtractionVariant,

    /// Meas-check only: a VAL line for this channel starts a new group
    /// once the current group holds any record (default: 0)
    #[serde(default)]
    pub group_start_channel: Channel,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            variant: ExtractionVariant::default(),
            group_start_channel: 0,
        }
    }
}

impl ScannerConfig {
    /// Create a new scanner configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: choose the extraction variant
    pub fn with_variant(mut self, variant: ExtractionVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Builder method: set the channel that restarts a meas-check group
    pub fn with_group_start_channel(mut self, channel: Channel) -> Self {
        self.group_start_channel = channel;
        self
    }
}
