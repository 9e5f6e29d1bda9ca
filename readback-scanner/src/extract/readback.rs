//! Single-line, multi-channel extraction
//!
//! A readback line looks like:
//!
//! ```text
//! Readback values ch: 0 Val: 1.234 Ang: 0.5 DG: 1 OAng: -0.1  ch: 1 Val: 2.0 ...
//! ```
//!
//! Every channel found on the line belongs to the same group.

use super::{parse_capture, record_issue, LineEvent, LineExtractor};
use crate::types::{ChannelRecord, Group, ParseIssue};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Marker text every readback line carries
const MARKER: &str = "Readback values";
/// Per-channel tag; lines without it have nothing to extract
const CHANNEL_TAG: &str = "ch:";

static CHANNEL_DATA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"ch:\s*(\d+)\s+Val:\s*([-\d.]+)\s+Ang:\s*([-\d.]+)\s+DG:\s*(\d+)\s+OAng:\s*([-\d.]+)",
    )
    .expect("readback pattern is valid regex")
});

/// Extractor for `Readback values` lines
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadbackExtractor;

impl ReadbackExtractor {
    /// True if the line is a readback data line at all
    pub fn is_data_line(line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.contains(MARKER) && trimmed.contains(CHANNEL_TAG)
    }

    fn parse_record(caps: &Captures<'_>, line_no: usize) -> Result<ChannelRecord, ParseIssue> {
        let channel = parse_capture(caps, 1, "ch", line_no)?;
        let val = parse_capture(caps, 2, "Val", line_no)?;
        let angle = parse_capture(caps, 3, "Ang", line_no)?;
        let dg = parse_capture(caps, 4, "DG", line_no)?;
        let oang = parse_capture(caps, 5, "OAng", line_no)?;
        Ok(ChannelRecord::readback(channel, val, angle, dg, oang))
    }
}

impl LineExtractor for ReadbackExtractor {
    fn extract(
        &self,
        line: &str,
        line_no: usize,
        issues: &mut Vec<ParseIssue>,
    ) -> Option<LineEvent> {
        if !Self::is_data_line(line) {
            return None;
        }

        let mut group = Group::new();
        for caps in CHANNEL_DATA.captures_iter(line) {
            match Self::parse_record(&caps, line_no) {
                Ok(record) => group.insert(record),
                Err(issue) => record_issue(issues, issue),
            }
        }

        if group.is_empty() {
            log::trace!("Readback line {} had no parseable channels", line_no);
            None
        } else {
            log::trace!("Readback line {}: {} channel(s)", line_no, group.len());
            Some(LineEvent::Group(group))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(line: &str) -> (Option<LineEvent>, Vec<ParseIssue>) {
        let mut issues = Vec::new();
        let event = ReadbackExtractor.extract(line, 1, &mut issues);
        (event, issues)
    }

    fn group_of(event: Option<LineEvent>) -> Group {
        match event {
            Some(LineEvent::Group(group)) => group,
            other => panic!("expected a group, got {:?}", other),
        }
    }

    #[test]
    fn test_two_channels_one_group() {
        let (event, issues) = extract(
            "Readback values ch: 0 Val: 1.234 Ang: 0.5 DG: 1 OAng: -0.1  ch: 1 Val: 2.0 Ang: 0.0 DG: 1 OAng: 0.0",
        );
        let group = group_of(event);

        assert!(issues.is_empty());
        assert_eq!(group.len(), 2);
        assert_eq!(group.get(0), Some(&ChannelRecord::readback(0, 1.234, 0.5, 1, -0.1)));
        assert_eq!(group.get(1), Some(&ChannelRecord::readback(1, 2.0, 0.0, 1, 0.0)));
    }

    #[test]
    fn test_twelve_channels() {
        let mut line = String::from("[12:00:01] Readback values");
        for ch in 0..12 {
            line.push_str(&format!(
                " ch: {} Val: {}.5 Ang: -0.{} DG: {} OAng: 0.0{}",
                ch,
                ch,
                ch,
                ch + 1,
                ch
            ));
        }

        let group = group_of(extract(&line).0);
        assert_eq!(group.len(), 12);
        assert_eq!(group.get(7).unwrap().val, Some(7.5));
        assert_eq!(group.get(7).unwrap().dg, Some(8));
        assert_eq!(group.get(11).unwrap().oang, Some(0.011));
    }

    #[test]
    fn test_malformed_match_is_dropped() {
        let (event, issues) = extract(
            "Readback values ch: 0 Val: 1.2.3 Ang: 0.5 DG: 1 OAng: 0.0 ch: 1 Val: 2.0 Ang: 0.1 DG: 2 OAng: 0.2",
        );
        let group = group_of(event);

        assert_eq!(group.len(), 1);
        assert!(group.get(0).is_none());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "Val");
        assert_eq!(issues[0].text, "1.2.3");
    }

    #[test]
    fn test_all_matches_malformed_yields_nothing() {
        let (event, issues) = extract("Readback values ch: 0 Val: - Ang: 0.5 DG: 1 OAng: 0.0");
        assert!(event.is_none());
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_requires_marker_and_tag() {
        assert!(extract("ch: 0 Val: 1.0 Ang: 0.5 DG: 1 OAng: 0.0").0.is_none());
        assert!(extract("Readback values pending").0.is_none());
        assert!(extract("Readback values ch: none").0.is_none());
    }
}
