//! Readback Extractor CLI Application
//!
//! This is the command-line front end for the readback scanner. It uses the
//! readback-scanner library and adds:
//! - Interactive folder prompt (or a one-shot folder argument)
//! - `.txt` file discovery
//! - Sheet layout with per-group statistics
//! - Workbook (xlsx) and optional JSON output

use anyhow::Result;
use clap::{Parser, ValueEnum};
use readback_scanner::{ExtractionVariant, TargetSection};
use std::io;
use std::path::PathBuf;

mod batch;
mod config;
mod layout;
mod prompt;
mod sheet_name;
mod workbook;

use config::{AppConfig, BatchSettings};

/// Readback Extractor - Collect calibration readbacks from test logs into a workbook
#[derive(Parser, Debug)]
#[command(name = "readback-extract")]
#[command(about = "Extract calibration readbacks from .txt test logs into a multi-sheet workbook")]
#[command(long_about = None)]
#[command(version)]
struct Args {
    /// Folder to process once; without it the tool prompts for folders
    #[arg(value_name = "FOLDER")]
    folder: Option<PathBuf>,

    /// Which log line format to extract
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Workbook file name written inside the folder
    #[arg(long, value_name = "NAME")]
    output_name: Option<String>,

    /// Also write the scan results as JSON next to the workbook
    #[arg(long)]
    json: bool,

    /// Scan files in parallel
    #[arg(long)]
    parallel: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    /// `Readback values` lines with Val/Ang/DG/OAng per channel
    Readback,
    /// `Meas VAL Check` / `Meas ANGLE Check` lines
    MeasCheck,
}

impl From<VariantArg> for ExtractionVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Readback => ExtractionVariant::Readback,
            VariantArg::MeasCheck => ExtractionVariant::MeasCheck,
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Readback Extractor v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using scanner library v{}", readback_scanner::VERSION);

    let settings = resolve_settings(&args)?;
    print_banner(&settings);

    match &args.folder {
        Some(folder) => process_folder(folder, &settings),
        None => {
            let stdin = io::stdin();
            prompt::run_prompt_loop(stdin.lock(), io::stdout(), |folder| {
                process_folder(folder, &settings)
            })
        }
    }
}

/// Merge config file and flags; flags win
fn resolve_settings(args: &Args) -> Result<BatchSettings> {
    let mut app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(variant) = args.variant {
        app_config.scanner.variant = variant.into();
    }
    if let Some(name) = &args.output_name {
        app_config.output.file_name = Some(name.clone());
    }
    app_config.output.json |= args.json;
    app_config.output.parallel |= args.parallel;

    Ok(app_config.batch_settings())
}

/// Run one batch and print its outcome
fn process_folder(folder: &std::path::Path, settings: &BatchSettings) -> Result<()> {
    let summary = batch::run_batch(folder, settings)?;

    println!(
        "\nSuccess: All data saved to '{}' with {} sheet(s).",
        summary.workbook_path.display(),
        summary.sheet_count
    );
    if let Some(json_path) = &summary.json_path {
        println!("JSON written to '{}'.", json_path.display());
    }
    if summary.issue_count > 0 {
        println!("{} malformed value(s) were skipped.", summary.issue_count);
    }
    println!(
        "{} of {} file(s) contained target data.\n",
        summary.files_with_data, summary.sheet_count
    );
    Ok(())
}

fn print_banner(settings: &BatchSettings) {
    match settings.scanner.variant {
        ExtractionVariant::Readback => {
            println!("Val/Ang/DG/OAng Data Extractor for Specific Sections (Batch Mode - Excel Multi-Sheet)");
            println!("Extracts CHx Val, Ang, DG, OAng from lines containing Readback values.");
        }
        ExtractionVariant::MeasCheck => {
            println!("Meas VAL/ANGLE Data Extractor for Specific Sections (Batch Mode - Excel Multi-Sheet)");
            println!("Extracts CHx VAL and ANGLE from lines like:");
            println!("  Meas VAL Check<<C>> CH2: 57.73115 ...");
            println!("  Meas ANGLE Check<<C>> CH2: -0.029 ...");
        }
    }
    println!("Processes all .txt files in a given folder.");
    println!("Only processes data under these sections:");
    for section in TargetSection::ALL {
        println!("  - {}", section);
    }
    println!(
        "Output is a single .xlsx file ('{}') with one sheet per .txt file.",
        settings.output_name
    );
    println!("{}", "-".repeat(20));
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
