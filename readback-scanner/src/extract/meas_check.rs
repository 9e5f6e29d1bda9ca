//! Two-pass, per-channel extraction
//!
//! Value and angle arrive on separate lines:
//!
//! ```text
//! Meas VAL Check<<C>> CH2: 57.73115 ...
//! Meas ANGLE Check<<C>> CH2: -0.029 ...
//! ```
//!
//! This extractor only reports each field; pairing them into records and
//! closing groups happens in the scanner.

use super::{parse_capture, record_issue, LineEvent, LineExtractor, MeasField};
use crate::types::{Channel, ParseIssue};
use once_cell::sync::Lazy;
use regex::Regex;

static VAL_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Meas VAL Check<<C>> CH(\d+):\s*([-\d.]+)").expect("VAL pattern is valid regex")
});

static ANGLE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Meas ANGLE Check<<C>> CH(\d+):\s*([-\d.]+)").expect("ANGLE pattern is valid regex")
});

/// Extractor for `Meas VAL Check` / `Meas ANGLE Check` lines
#[derive(Debug, Clone, Copy, Default)]
pub struct MeasCheckExtractor;

impl MeasCheckExtractor {
    fn field_event(
        regex: &Regex,
        field: MeasField,
        line: &str,
        line_no: usize,
        issues: &mut Vec<ParseIssue>,
    ) -> Option<Option<LineEvent>> {
        let caps = regex.captures(line)?;
        let name = match field {
            MeasField::Val => "VAL",
            MeasField::Angle => "ANGLE",
        };

        let parsed: Result<(Channel, f64), ParseIssue> = parse_capture(&caps, 1, "CH", line_no)
            .and_then(|channel| {
                parse_capture(&caps, 2, name, line_no).map(|value| (channel, value))
            });

        match parsed {
            Ok((channel, value)) => Some(Some(LineEvent::Field {
                channel,
                field,
                value,
            })),
            Err(issue) => {
                record_issue(issues, issue);
                Some(None)
            }
        }
    }
}

impl LineExtractor for MeasCheckExtractor {
    fn extract(
        &self,
        line: &str,
        line_no: usize,
        issues: &mut Vec<ParseIssue>,
    ) -> Option<LineEvent> {
        // A VAL match settles the line, even when its number is malformed
        if let Some(event) = Self::field_event(&VAL_LINE, MeasField::Val, line, line_no, issues) {
            return event;
        }
        Self::field_event(&ANGLE_LINE, MeasField::Angle, line, line_no, issues).flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(line: &str) -> (Option<LineEvent>, Vec<ParseIssue>) {
        let mut issues = Vec::new();
        let event = MeasCheckExtractor.extract(line, 7, &mut issues);
        (event, issues)
    }

    #[test]
    fn test_val_line() {
        let (event, issues) = extract("12:00:01 Meas VAL Check<<C>> CH2: 57.73115 PASS");
        assert!(issues.is_empty());
        assert_eq!(
            event,
            Some(LineEvent::Field {
                channel: 2,
                field: MeasField::Val,
                value: 57.73115,
            })
        );
    }

    #[test]
    fn test_angle_line() {
        let (event, _) = extract("Meas ANGLE Check<<C>> CH11:-0.029");
        assert_eq!(
            event,
            Some(LineEvent::Field {
                channel: 11,
                field: MeasField::Angle,
                value: -0.029,
            })
        );
    }

    #[test]
    fn test_malformed_value_reported() {
        let (event, issues) = extract("Meas VAL Check<<C>> CH3: 1..2");
        assert!(event.is_none());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 7);
        assert_eq!(issues[0].field, "VAL");
    }

    #[test]
    fn test_unrelated_lines_ignored() {
        for line in ["", "Meas VAL Check CH2: 1.0", "Readback values ch: 0", "Result: PASS"] {
            let (event, issues) = extract(line);
            assert!(event.is_none(), "line {:?}", line);
            assert!(issues.is_empty());
        }
    }
}
