//! Batch processing of one input folder
//!
//! Finds the `.txt` files, scans each one independently, lays out one sheet per
//! file, and writes everything once at the end.

use crate::config::BatchSettings;
use crate::layout::layout_sheet;
use crate::sheet_name::SheetNamer;
use crate::workbook::{write_json, write_workbook, SheetData};
use anyhow::{Context, Result};
use rayon::prelude::*;
use readback_scanner::{scan_file, ScanReport, ScannerConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// What a finished batch produced
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub workbook_path: PathBuf,
    pub json_path: Option<PathBuf>,
    pub sheet_count: usize,
    pub files_with_data: usize,
    pub issue_count: usize,
}

/// List the `.txt` files directly inside `folder`, sorted by file name
pub fn discover_txt_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(folder)
        .with_context(|| format!("Failed to list directory: {:?}", folder))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read entry in {:?}", folder))?
            .path();

        let is_txt = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("txt"))
            .unwrap_or(false);

        if is_txt && path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Scan one file; a file that cannot be read contributes an empty report
fn scan_or_empty(path: &Path, config: &ScannerConfig) -> ScanReport {
    match scan_file(path, config) {
        Ok(report) => report,
        Err(e) => {
            let e = anyhow::Error::new(e);
            log::error!("{:#}", e);
            println!("  Error: {:#}", e);
            ScanReport::default()
        }
    }
}

/// Scan every file, keeping discovery order even when scanning in parallel
pub fn scan_files(files: &[PathBuf], config: &ScannerConfig, parallel: bool) -> Vec<ScanReport> {
    if parallel {
        files.par_iter().map(|path| scan_or_empty(path, config)).collect()
    } else {
        files.iter().map(|path| scan_or_empty(path, config)).collect()
    }
}

/// Pair each file with its report, a unique sheet name, and its layout
pub fn build_sheets(
    files: &[PathBuf],
    reports: Vec<ScanReport>,
    settings: &BatchSettings,
) -> Vec<SheetData> {
    let mut namer = SheetNamer::new();

    files
        .iter()
        .zip(reports)
        .map(|(path, report)| {
            let source_file = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();

            let sheet_name = namer.assign(&stem);
            let layout = layout_sheet(&source_file, &report.sections, settings.scanner.variant);

            if report.sections.is_empty() {
                println!("  Note: No target data found in {}. Empty sheet created.", source_file);
            } else {
                println!("  Data for {} written to sheet '{}'.", source_file, sheet_name);
            }
            for issue in &report.issues {
                println!("  Warning: {}: {}", source_file, issue);
            }

            SheetData {
                source_file,
                sheet_name,
                report,
                layout,
            }
        })
        .collect()
}

/// Process every `.txt` file in `folder` into one workbook inside that folder
pub fn run_batch(folder: &Path, settings: &BatchSettings) -> Result<BatchSummary> {
    let files = discover_txt_files(folder)?;
    if files.is_empty() {
        anyhow::bail!("No .txt files found in directory: {}", folder.display());
    }

    println!(
        "\nFound {} .txt file(s) in '{}'. Starting processing...\n",
        files.len(),
        folder.display()
    );

    let reports = scan_files(&files, &settings.scanner, settings.parallel);
    let sheets = build_sheets(&files, reports, settings);

    let workbook_path = folder.join(&settings.output_name);
    write_workbook(&sheets, &workbook_path)
        .with_context(|| format!("Failed to save Excel file '{}'", workbook_path.display()))?;

    let json_path = if settings.json {
        let path = workbook_path.with_extension("json");
        write_json(&sheets, &path)
            .with_context(|| format!("Failed to save JSON file '{}'", path.display()))?;
        Some(path)
    } else {
        None
    };

    Ok(BatchSummary {
        workbook_path,
        json_path,
        sheet_count: sheets.len(),
        files_with_data: sheets.iter().filter(|s| !s.report.sections.is_empty()).count(),
        issue_count: sheets.iter().map(|s| s.report.issues.len()).sum(),
    })
}
