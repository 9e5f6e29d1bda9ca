//! Target section headings
//!
//! The report headings whose bodies carry calibration data are a fixed, closed
//! set. Each variant owns both its matcher and its display name, so the two can
//! never drift apart.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the fixed report headings the scanner extracts data from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetSection {
    /// `8.1.3 P3Y CTVT Cali 10A`
    CtvtCali10A,
    /// `8.1.6 P3Y CTVT Cali 1A`
    CtvtCali1A,
    /// `8.4 50Hz Verification2`
    Verification50Hz2,
    /// `8.4 60Hz Verification1`
    Verification60Hz1,
    /// `8.4 60Hz Verification2`
    Verification60Hz2,
}

/// Compiled heading matchers in priority order
static MATCHERS: Lazy<Vec<(TargetSection, Regex)>> = Lazy::new(|| {
    TargetSection::ALL
        .iter()
        .map(|&target| {
            let regex = Regex::new(target.pattern()).expect("section patterns are valid regex");
            (target, regex)
        })
        .collect()
});

/// Start of any numbered heading: `8.4 `, `8.1.3 `, `12.10 `
static NUMBERED_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+(?:\.\d+)?\s").expect("heading pattern is valid regex"));

impl TargetSection {
    /// All target sections, in match priority order
    pub const ALL: [TargetSection; 5] = [
        TargetSection::CtvtCali10A,
        TargetSection::CtvtCali1A,
        TargetSection::Verification50Hz2,
        TargetSection::Verification60Hz1,
        TargetSection::Verification60Hz2,
    ];

    /// Regex recognizing this heading anywhere in a trimmed line
    pub fn pattern(self) -> &'static str {
        match self {
            TargetSection::CtvtCali10A => r"8\.1\.3\s+P3Y\s+CTVT\s+Cali\s+10A",
            TargetSection::CtvtCali1A => r"8\.1\.6\s+P3Y\s+CTVT\s+Cali\s+1A",
            TargetSection::Verification50Hz2 => r"8\.4\s+50Hz\s+Verification2",
            TargetSection::Verification60Hz1 => r"8\.4\s+60Hz\s+Verification1",
            TargetSection::Verification60Hz2 => r"8\.4\s+60Hz\s+Verification2",
        }
    }

    /// Canonical heading text used in reports
    pub fn display_name(self) -> &'static str {
        match self {
            TargetSection::CtvtCali10A => "8.1.3 P3Y CTVT Cali 10A",
            TargetSection::CtvtCali1A => "8.1.6 P3Y CTVT Cali 1A",
            TargetSection::Verification50Hz2 => "8.4 50Hz Verification2",
            TargetSection::Verification60Hz1 => "8.4 60Hz Verification1",
            TargetSection::Verification60Hz2 => "8.4 60Hz Verification2",
        }
    }

    /// Find the first target heading present in `line`
    pub fn match_line(line: &str) -> Option<TargetSection> {
        MATCHERS
            .iter()
            .find(|(_, regex)| regex.is_match(line))
            .map(|(target, _)| *target)
    }
}

impl fmt::Display for TargetSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// True if `line` (already trimmed) starts a numbered heading of any kind
pub fn is_numbered_heading(line: &str) -> bool {
    NUMBERED_HEADING.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_each_heading() {
        assert_eq!(
            TargetSection::match_line("8.1.3 P3Y CTVT Cali 10A"),
            Some(TargetSection::CtvtCali10A)
        );
        assert_eq!(
            TargetSection::match_line("8.1.6   P3Y CTVT  Cali\t1A"),
            Some(TargetSection::CtvtCali1A)
        );
        assert_eq!(
            TargetSection::match_line("8.4 50Hz Verification2"),
            Some(TargetSection::Verification50Hz2)
        );
        assert_eq!(
            TargetSection::match_line("8.4 60Hz Verification1"),
            Some(TargetSection::Verification60Hz1)
        );
        assert_eq!(
            TargetSection::match_line("8.4 60Hz Verification2"),
            Some(TargetSection::Verification60Hz2)
        );
    }

    #[test]
    fn test_match_anywhere_in_line() {
        assert_eq!(
            TargetSection::match_line("==== 8.4 60Hz Verification1 (retest) ===="),
            Some(TargetSection::Verification60Hz1)
        );
    }

    #[test]
    fn test_no_match() {
        assert_eq!(TargetSection::match_line("8.4 50Hz Verification1"), None);
        assert_eq!(TargetSection::match_line("8.1.3 P3Y CTVT Cali 5A"), None);
        assert_eq!(TargetSection::match_line(""), None);
    }

    #[test]
    fn test_display_names_are_normalized_patterns() {
        for target in TargetSection::ALL {
            let name = target.display_name();
            assert!(!name.contains('\\'));
            // The canonical name must itself be recognized as the same heading
            assert_eq!(TargetSection::match_line(name), Some(target));
        }
    }

    #[test]
    fn test_numbered_heading() {
        assert!(is_numbered_heading("8.4 60Hz Verification1"));
        assert!(is_numbered_heading("8.1.3 P3Y CTVT Cali 10A"));
        assert!(is_numbered_heading("9.1 Summary"));
        assert!(is_numbered_heading("12.10\tNext"));

        assert!(!is_numbered_heading("8 Overview"));
        assert!(!is_numbered_heading("8.4"));
        assert!(!is_numbered_heading("8.1.3.1 Detail"));
        assert!(!is_numbered_heading("Readback values ch: 0 Val: 1.0"));
    }
}
