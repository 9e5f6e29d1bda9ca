//! Data-line extractors
//!
//! Inside a target section every line is offered to the extractor for the
//! configured variant. An extractor only interprets a single line; grouping
//! across lines is the scanner's job.

use crate::config::ExtractionVariant;
use crate::types::{Channel, Group, ParseIssue};
use regex::Captures;
use std::str::FromStr;

pub mod meas_check;
pub mod readback;

pub use meas_check::MeasCheckExtractor;
pub use readback::ReadbackExtractor;

/// Which half of a meas-check record a line carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasField {
    Val,
    Angle,
}

/// What a single data line contributed
#[derive(Debug, Clone, PartialEq)]
pub enum LineEvent {
    /// Every channel of one group, taken from one line
    Group(Group),
    /// One field for one channel; the scanner accumulates these into a group
    Field {
        channel: Channel,
        field: MeasField,
        value: f64,
    },
}

/// Common trait for all data-line extractors
pub trait LineExtractor: Send + Sync {
    /// Interpret one line from inside a target section
    ///
    /// Lines that carry no data return `None`. Matches with unparseable numbers
    /// are dropped and recorded in `issues`; they never abort the line.
    fn extract(
        &self,
        line: &str,
        line_no: usize,
        issues: &mut Vec<ParseIssue>,
    ) -> Option<LineEvent>;
}

/// Build the extractor for a variant
pub fn extractor_for(variant: ExtractionVariant) -> Box<dyn LineExtractor> {
    match variant {
        ExtractionVariant::Readback => Box::new(ReadbackExtractor),
        ExtractionVariant::MeasCheck => Box::new(MeasCheckExtractor),
    }
}

/// Parse capture group `index` as `T`, describing the failure as a [`ParseIssue`]
pub(crate) fn parse_capture<T: FromStr>(
    caps: &Captures<'_>,
    index: usize,
    field: &str,
    line_no: usize,
) -> std::result::Result<T, ParseIssue> {
    let text = caps.get(index).map(|m| m.as_str()).unwrap_or_default();
    text.parse::<T>().map_err(|_| ParseIssue {
        line: line_no,
        field: field.to_string(),
        text: text.to_string(),
    })
}

/// Log a dropped match and keep it for the scan report
pub(crate) fn record_issue(issues: &mut Vec<ParseIssue>, issue: ParseIssue) {
    log::warn!("Dropping malformed match at {}", issue);
    issues.push(issue);
}
