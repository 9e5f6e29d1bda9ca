//! Sheet layout
//!
//! Flattens one file's scan results into rows of cells. The layout is built in
//! memory first so the workbook writer stays a dumb renderer and the row
//! structure can be tested without touching an xlsx file.

use readback_scanner::{ExtractionVariant, Group, GroupStatistics, Section, STATISTICS_HEADERS};

/// Column headers for readback data rows
pub const READBACK_HEADERS: [&str; 7] =
    ["Source_File", "Section", "CH_Label", "VAL", "ANGLE", "DG", "OANG"];

/// Column headers for meas-check data rows
pub const MEAS_CHECK_HEADERS: [&str; 5] = ["Source_File", "Section", "CH_Label", "VAL", "ANGLE"];

/// Label in the first column of every statistics row
pub const STATISTICS_LABEL: &str = "Statistics";

/// Widest column the auto-fit will produce
const MAX_COLUMN_WIDTH: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    fn number(value: Option<f64>) -> Self {
        value.map_or(Cell::Empty, Cell::Number)
    }

    /// Length of the cell as it would be displayed
    fn display_len(&self) -> usize {
        match self {
            Cell::Empty => 0,
            Cell::Text(text) => text.chars().count(),
            Cell::Number(value) => value.to_string().len(),
        }
    }
}

/// Rows of one worksheet; blank rows are empty vectors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetLayout {
    rows: Vec<Vec<Cell>>,
}

impl SheetLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    fn push_headers(&mut self, headers: &[&str]) {
        self.push(headers.iter().map(|h| Cell::text(*h)).collect());
    }

    fn push_blank(&mut self, count: usize) {
        for _ in 0..count {
            self.rows.push(Vec::new());
        }
    }

    /// Column widths: longest displayed value plus 2, capped at 50
    pub fn column_widths(&self) -> Vec<f64> {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        (0..columns)
            .map(|col| {
                let longest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(Cell::display_len)
                    .max()
                    .unwrap_or(0);
                (longest + 2).min(MAX_COLUMN_WIDTH) as f64
            })
            .collect()
    }
}

/// Lay out every section of one file
///
/// A file without sections gets a single "no data" marker cell.
pub fn layout_sheet(
    source_file: &str,
    sections: &[Section],
    variant: ExtractionVariant,
) -> SheetLayout {
    let mut layout = SheetLayout::new();

    if sections.is_empty() {
        layout.push(vec![Cell::text(no_data_marker(source_file))]);
        return layout;
    }

    for section in sections {
        match variant {
            ExtractionVariant::Readback => {
                layout_readback_section(&mut layout, source_file, section)
            }
            ExtractionVariant::MeasCheck => {
                layout_meas_check_section(&mut layout, source_file, section)
            }
        }
    }
    layout
}

/// Text written to sheets of files without any target data
pub fn no_data_marker(source_file: &str) -> String {
    format!("No target data found in {}", source_file)
}

fn section_title(source_file: &str, section: &Section) -> Vec<Cell> {
    vec![Cell::text(source_file), Cell::text(section.name())]
}

fn layout_readback_section(layout: &mut SheetLayout, source_file: &str, section: &Section) {
    layout.push(section_title(source_file, section));
    layout.push_headers(&READBACK_HEADERS);

    for group in &section.groups {
        push_channel_rows(layout, group, true);
        layout.push_blank(2);
    }

    layout.push_blank(2);
    layout.push_headers(&STATISTICS_HEADERS);

    for group in &section.groups {
        let stats = GroupStatistics::from_group(group);
        let mut row = vec![Cell::text(STATISTICS_LABEL)];
        row.extend(stats.flatten().into_iter().map(Cell::number));
        layout.push(row);
        layout.push_blank(1);
    }
}

fn layout_meas_check_section(layout: &mut SheetLayout, source_file: &str, section: &Section) {
    layout.push(section_title(source_file, section));
    layout.push_headers(&MEAS_CHECK_HEADERS);

    for group in &section.groups {
        push_channel_rows(layout, group, false);
        layout.push_blank(1);
    }
}

fn push_channel_rows(layout: &mut SheetLayout, group: &Group, with_gain: bool) {
    for record in group.records() {
        let mut row = vec![
            Cell::Empty,
            Cell::Empty,
            Cell::text(record.label()),
            Cell::number(record.val),
            Cell::number(record.angle),
        ];
        if with_gain {
            row.push(Cell::number(record.dg.map(|dg| dg as f64)));
            row.push(Cell::number(record.oang));
        }
        layout.push(row);
    }
}
