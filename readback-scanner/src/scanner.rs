//! Section scanner
//!
//! A single-pass line scanner. It recognizes target headings, closes a section
//! on the next numbered heading, and hands every line in between to the
//! variant's extractor. Group boundaries are tracked explicitly:
//!
//! ```text
//!            target heading                 field line
//!   Idle ─────────────────────► InSection ──────────────► AccumulatingGroup
//!    ▲                            │   ▲                       │
//!    │   numbered heading / EOF   │   └── numbered heading ───┘
//!    └────────────────────────────┘       (pending group flushed)
//! ```
//!
//! A target heading seen in any state first closes the current section and then
//! opens a new one.

use crate::config::ScannerConfig;
use crate::extract::{extractor_for, LineEvent, LineExtractor, MeasField};
use crate::sections::{is_numbered_heading, TargetSection};
use crate::types::{Channel, ChannelRecord, Group, ScanReport, Section};

/// Where the scanner is relative to the target sections
#[derive(Debug)]
enum ScanState {
    /// Outside every target section; lines are skipped
    Idle,
    /// Inside a target section with no group in progress
    InSection(Section),
    /// Inside a target section while a meas-check group is being assembled.
    /// `pending` always holds at least one record.
    AccumulatingGroup { section: Section, pending: Group },
}

/// Stateful, single-pass scanner over the lines of one log file
pub struct SectionScanner {
    config: ScannerConfig,
    extractor: Box<dyn LineExtractor>,
    state: ScanState,
    report: ScanReport,
}

impl SectionScanner {
    /// Create a scanner for the configured extraction variant
    pub fn new(config: ScannerConfig) -> Self {
        let extractor = extractor_for(config.variant);
        Self {
            config,
            extractor,
            state: ScanState::Idle,
            report: ScanReport::default(),
        }
    }

    /// Scan a whole line sequence and return the sections found, in order
    ///
    /// # Example
    /// ```
    /// use readback_scanner::{ScannerConfig, SectionScanner};
    ///
    /// let lines = [
    ///     "8.4 60Hz Verification1",
    ///     "Readback values ch: 0 Val: 1.234 Ang: 0.5 DG: 1 OAng: -0.1",
    /// ];
    /// let sections = SectionScanner::new(ScannerConfig::new()).scan(lines);
    /// assert_eq!(sections.len(), 1);
    /// assert_eq!(sections[0].name(), "8.4 60Hz Verification1");
    /// ```
    pub fn scan<I, S>(self, lines: I) -> Vec<Section>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.scan_report(lines).sections
    }

    /// Like [`scan`](Self::scan), but also returns parse issues and line counts
    pub fn scan_report<I, S>(mut self, lines: I) -> ScanReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.feed_line(line.as_ref());
        }
        self.finish()
    }

    /// Process one line
    pub fn feed_line(&mut self, line: &str) {
        self.report.lines_read += 1;
        let line_no = self.report.lines_read;
        let trimmed = line.trim();

        if let Some(target) = TargetSection::match_line(trimmed) {
            self.close_section();
            log::debug!("Line {}: entering section '{}'", line_no, target);
            self.state = ScanState::InSection(Section::new(target));
            return;
        }

        if !self.is_in_section() {
            return;
        }

        if is_numbered_heading(trimmed) {
            log::debug!("Line {}: numbered heading ends the current section", line_no);
            self.close_section();
            return;
        }

        if let Some(event) = self.extractor.extract(line, line_no, &mut self.report.issues) {
            self.apply(event);
        }
    }

    /// Flush anything still open and return the report
    pub fn finish(mut self) -> ScanReport {
        self.close_section();
        self.report
    }

    /// True while inside a target section
    pub fn is_in_section(&self) -> bool {
        !matches!(self.state, ScanState::Idle)
    }

    /// Merge one extracted line into the current section
    fn apply(&mut self, event: LineEvent) {
        let group_start = self.config.group_start_channel;
        let state = std::mem::replace(&mut self.state, ScanState::Idle);

        self.state = match (state, event) {
            (ScanState::Idle, _) => ScanState::Idle,

            (ScanState::InSection(mut section), LineEvent::Group(group)) => {
                section.groups.push(group);
                ScanState::InSection(section)
            }

            (ScanState::AccumulatingGroup { mut section, pending }, LineEvent::Group(group)) => {
                section.groups.push(pending);
                section.groups.push(group);
                ScanState::InSection(section)
            }

            (ScanState::InSection(section), LineEvent::Field { channel, field, value }) => {
                let mut pending = Group::new();
                merge_field(&mut pending, channel, field, value);
                ScanState::AccumulatingGroup { section, pending }
            }

            (
                ScanState::AccumulatingGroup {
                    mut section,
                    mut pending,
                },
                LineEvent::Field { channel, field, value },
            ) => {
                // Heuristic: a VAL for the group-start channel means the
                // previous pass is complete. Assumes that channel leads every pass.
                if field == MeasField::Val && channel == group_start && !pending.is_empty() {
                    log::trace!("CH{} VAL restarts group {}", channel, section.groups.len() + 1);
                    section.groups.push(std::mem::take(&mut pending));
                }
                merge_field(&mut pending, channel, field, value);
                ScanState::AccumulatingGroup { section, pending }
            }
        };
    }

    /// Flush the pending group, emit the section if it has data, and go idle
    fn close_section(&mut self) {
        let section = match std::mem::replace(&mut self.state, ScanState::Idle) {
            ScanState::Idle => return,
            ScanState::InSection(section) => section,
            ScanState::AccumulatingGroup {
                mut section,
                pending,
            } => {
                section.groups.push(pending);
                section
            }
        };

        if section.has_data() {
            log::debug!(
                "Closing section '{}' with {} group(s)",
                section.name(),
                section.groups.len()
            );
            self.report.sections.push(section);
        } else {
            log::debug!("Section '{}' had no data, dropping it", section.name());
        }
    }
}

/// Set one field of a channel's record, creating the record if needed
fn merge_field(group: &mut Group, channel: Channel, field: MeasField, value: f64) {
    if group.get(channel).is_none() {
        group.insert(ChannelRecord::empty(channel));
    }
    if let Some(record) = group.get_mut(channel) {
        match field {
            MeasField::Val => record.val = Some(value),
            MeasField::Angle => record.angle = Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionVariant;

    const READBACK_LINE: &str =
        "Readback values ch: 0 Val: 1.234 Ang: 0.5 DG: 1 OAng: -0.1  ch: 1 Val: 2.0 Ang: 0.0 DG: 1 OAng: 0.0";

    fn readback(lines: &[&str]) -> ScanReport {
        SectionScanner::new(ScannerConfig::new()).scan_report(lines.iter())
    }

    fn meas_check(lines: &[&str]) -> Vec<Section> {
        SectionScanner::new(ScannerConfig::new().with_variant(ExtractionVariant::MeasCheck))
            .scan(lines.iter())
    }

    #[test]
    fn test_no_target_headings() {
        let report = readback(&["1.1 Intro", READBACK_LINE, "9.1 Summary"]);
        assert!(report.sections.is_empty());
        assert_eq!(report.lines_read, 3);
    }

    #[test]
    fn test_round_trip_example() {
        let report = readback(&["8.4 60Hz Verification1", READBACK_LINE]);

        assert_eq!(report.sections.len(), 1);
        let section = &report.sections[0];
        assert_eq!(section.name(), "8.4 60Hz Verification1");
        assert_eq!(section.groups.len(), 1);

        let group = &section.groups[0];
        assert_eq!(group.len(), 2);
        assert_eq!(group.get(0), Some(&ChannelRecord::readback(0, 1.234, 0.5, 1, -0.1)));
        assert_eq!(group.get(1), Some(&ChannelRecord::readback(1, 2.0, 0.0, 1, 0.0)));
    }

    #[test]
    fn test_one_group_per_readback_line() {
        let report = readback(&[
            "8.1.3 P3Y CTVT Cali 10A",
            READBACK_LINE,
            "",
            "some chatter",
            READBACK_LINE,
            READBACK_LINE,
        ]);
        assert_eq!(report.sections.len(), 1);
        assert_eq!(report.sections[0].groups.len(), 3);
    }

    #[test]
    fn test_numbered_heading_closes_section() {
        let report = readback(&[
            "8.4 50Hz Verification2",
            READBACK_LINE,
            "8.5 Other test",
            READBACK_LINE,
        ]);
        assert_eq!(report.sections.len(), 1);
        assert_eq!(report.sections[0].groups.len(), 1);
    }

    #[test]
    fn test_heading_line_is_not_data() {
        let report = readback(&[
            "8.4 60Hz Verification1 Readback values ch: 0 Val: 1.0 Ang: 0.0 DG: 1 OAng: 0.0",
        ]);
        assert!(report.sections.is_empty());
    }

    #[test]
    fn test_new_target_finalizes_previous() {
        let report = readback(&[
            "8.4 60Hz Verification1",
            READBACK_LINE,
            "8.4 60Hz Verification2",
            READBACK_LINE,
            READBACK_LINE,
        ]);
        let names: Vec<_> = report.sections.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["8.4 60Hz Verification1", "8.4 60Hz Verification2"]);
        assert_eq!(report.sections[1].groups.len(), 2);
    }

    #[test]
    fn test_empty_section_dropped() {
        let report = readback(&[
            "8.1.6 P3Y CTVT Cali 1A",
            "no data here",
            "8.2 Next",
            "8.4 60Hz Verification1",
            READBACK_LINE,
        ]);
        assert_eq!(report.sections.len(), 1);
        assert_eq!(report.sections[0].target, TargetSection::Verification60Hz1);
    }

    #[test]
    fn test_parse_issue_collected() {
        let report = readback(&[
            "8.4 60Hz Verification1",
            "Readback values ch: 0 Val: 1.2.3 Ang: 0.5 DG: 1 OAng: 0.0 ch: 1 Val: 2.0 Ang: 0.1 DG: 2 OAng: 0.2",
        ]);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].line, 2);
        assert_eq!(report.sections[0].groups[0].len(), 1);
    }

    #[test]
    fn test_meas_check_groups_restart_on_channel_zero() {
        let sections = meas_check(&[
            "8.1.3 P3Y CTVT Cali 10A",
            "Meas VAL Check<<C>> CH0: 10.0",
            "Meas ANGLE Check<<C>> CH0: 0.1",
            "Meas VAL Check<<C>> CH1: 11.0",
            "Meas ANGLE Check<<C>> CH1: 0.2",
            "Meas VAL Check<<C>> CH0: 20.0",
            "Meas ANGLE Check<<C>> CH0: 0.3",
        ]);

        assert_eq!(sections.len(), 1);
        let groups = &sections[0].groups;
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[0].get(1).unwrap().angle, Some(0.2));
        assert_eq!(groups[1].len(), 1);
        assert_eq!(groups[1].get(0).unwrap().val, Some(20.0));
    }

    #[test]
    fn test_meas_check_angle_before_val() {
        let sections = meas_check(&[
            "8.4 60Hz Verification2",
            "Meas ANGLE Check<<C>> CH3: -0.5",
        ]);
        let record = sections[0].groups[0].get(3).unwrap();
        assert_eq!(record.val, None);
        assert_eq!(record.angle, Some(-0.5));
    }

    #[test]
    fn test_meas_check_val_keeps_earlier_angle() {
        let sections = meas_check(&[
            "8.4 60Hz Verification2",
            "Meas VAL Check<<C>> CH0: 1.0",
            "Meas ANGLE Check<<C>> CH4: 0.7",
            "Meas VAL Check<<C>> CH4: 4.0",
        ]);
        let record = sections[0].groups[0].get(4).unwrap();
        assert_eq!(record.val, Some(4.0));
        assert_eq!(record.angle, Some(0.7));
    }

    #[test]
    fn test_meas_check_heading_flushes_pending_group() {
        let sections = meas_check(&[
            "8.4 60Hz Verification1",
            "Meas VAL Check<<C>> CH0: 1.0",
            "Meas VAL Check<<C>> CH1: 2.0",
            "9.1 Results",
            "Meas VAL Check<<C>> CH0: 99.0",
        ]);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].groups.len(), 1);
        assert_eq!(sections[0].groups[0].len(), 2);
        assert_eq!(sections[0].groups[0].get(1).unwrap().angle, None);
    }

    #[test]
    fn test_meas_check_without_channel_zero_is_one_group() {
        let sections = meas_check(&[
            "8.4 60Hz Verification1",
            "Meas VAL Check<<C>> CH1: 1.0",
            "Meas VAL Check<<C>> CH2: 2.0",
            "Meas VAL Check<<C>> CH1: 3.0",
        ]);
        assert_eq!(sections[0].groups.len(), 1);
        assert_eq!(sections[0].groups[0].get(1).unwrap().val, Some(3.0));
    }

    #[test]
    fn test_meas_check_custom_group_start() {
        let config = ScannerConfig::new()
            .with_variant(ExtractionVariant::MeasCheck)
            .with_group_start_channel(1);
        let sections = SectionScanner::new(config).scan([
            "8.4 60Hz Verification1",
            "Meas VAL Check<<C>> CH1: 1.0",
            "Meas VAL Check<<C>> CH2: 2.0",
            "Meas VAL Check<<C>> CH1: 3.0",
        ]);
        assert_eq!(sections[0].groups.len(), 2);
    }

    #[test]
    fn test_end_of_input_flushes() {
        let config = ScannerConfig::new().with_variant(ExtractionVariant::MeasCheck);
        let mut scanner = SectionScanner::new(config);
        scanner.feed_line("8.4 60Hz Verification1");
        scanner.feed_line("Meas VAL Check<<C>> CH0: 1.0");
        assert!(scanner.is_in_section());

        let report = scanner.finish();
        assert_eq!(report.group_count(), 1);
    }
}
