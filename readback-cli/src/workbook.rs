//! Workbook and JSON output
//!
//! Renders prepared sheet layouts into a single xlsx file. All sheets are
//! collected in memory first and the file is written once.

use crate::layout::{Cell, SheetLayout};
use readback_scanner::ScanReport;
use rust_xlsxwriter::{Workbook, XlsxError};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Errors that can occur while writing output files
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to write workbook")]
    Xlsx(#[from] XlsxError),

    #[error("Failed to write JSON")]
    Json(#[from] serde_json::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),
}

/// One input file's results, ready to be written
#[derive(Debug, Clone, Serialize)]
pub struct SheetData {
    /// Input file name, e.g. `bench_01.txt`
    pub source_file: String,
    /// Unique, sanitized worksheet name
    pub sheet_name: String,
    /// Structured scan output
    pub report: ScanReport,
    #[serde(skip)]
    pub layout: SheetLayout,
}

/// Write every sheet into one workbook at `path`
pub fn write_workbook(sheets: &[SheetData], path: &Path) -> Result<(), OutputError> {
    let mut workbook = Workbook::new();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.sheet_name.as_str())?;

        for (row_index, row) in sheet.layout.rows().iter().enumerate() {
            let row_num = row_index as u32;
            for (col_index, cell) in row.iter().enumerate() {
                let col_num = col_index as u16;
                match cell {
                    Cell::Empty => {}
                    Cell::Text(text) => {
                        worksheet.write_string(row_num, col_num, text.as_str())?;
                    }
                    Cell::Number(value) => {
                        worksheet.write_number(row_num, col_num, *value)?;
                    }
                }
            }
        }

        for (col_index, width) in sheet.layout.column_widths().into_iter().enumerate() {
            worksheet.set_column_width(col_index as u16, width)?;
        }
    }

    workbook.save(path)?;
    log::debug!("Workbook written: {:?} ({} sheet(s))", path, sheets.len());
    Ok(())
}

/// Write the scan results of every sheet as pretty-printed JSON
pub fn write_json(sheets: &[SheetData], path: &Path) -> Result<(), OutputError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, sheets)?;
    log::debug!("JSON written: {:?}", path);
    Ok(())
}
