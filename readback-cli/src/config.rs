//! Configuration loading and parsing
//!
//! Settings come from an optional `config.toml`; command-line flags override it.

use anyhow::{Context, Result};
use readback_scanner::{ExtractionVariant, ScannerConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Workbook file name inside the input folder (default depends on the variant)
    pub file_name: Option<String>,
    /// Also write the scan results as JSON next to the workbook
    #[serde(default)]
    pub json: bool,
    /// Scan files on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,
}

/// Settings for one batch run, after flags and config file are merged
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub scanner: ScannerConfig,
    pub output_name: String,
    pub json: bool,
    pub parallel: bool,
}

impl AppConfig {
    /// Resolve the batch settings, falling back to the variant's workbook name
    pub fn batch_settings(&self) -> BatchSettings {
        let output_name = self
            .output
            .file_name
            .clone()
            .unwrap_or_else(|| default_output_name(self.scanner.variant).to_string());

        BatchSettings {
            scanner: self.scanner.clone(),
            output_name,
            json: self.output.json,
            parallel: self.output.parallel,
        }
    }
}

/// Fixed workbook name written into the input folder
pub fn default_output_name(variant: ExtractionVariant) -> &'static str {
    match variant {
        ExtractionVariant::Readback => "ALL_VAL_ANGLE_By_Section_statistic.xlsx",
        ExtractionVariant::MeasCheck => "ALL_VAL_ANGLE_By_Section.xlsx",
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if let Some(name) = &config.output.file_name {
        if name.trim().is_empty() {
            anyhow::bail!("output.file_name in {:?} must not be empty", path);
        }
    }

    Ok(config)
}
