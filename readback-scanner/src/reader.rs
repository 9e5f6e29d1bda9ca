//! Log file loading
//!
//! Test logs are usually UTF-8, but some bench PCs write Windows-1252. The file
//! is read fully into memory, decoded, and released before scanning starts.

use crate::config::ScannerConfig;
use crate::scanner::SectionScanner;
use crate::types::{Result, ScanReport, ScannerError};
use std::path::Path;

/// Read a log file as text
///
/// UTF-8 is tried first; anything else is decoded as Latin-1, which maps every
/// byte to a char and so never fails.
pub fn read_log_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ScannerError::FileNotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| ScannerError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            log::warn!("{:?} is not UTF-8, decoding as Latin-1", path);
            Ok(err.into_bytes().iter().map(|&b| b as char).collect())
        }
    }
}

/// Read and scan one log file
///
/// # Example
/// ```no_run
/// use readback_scanner::{scan_file, ScannerConfig};
/// use std::path::Path;
///
/// let report = scan_file(Path::new("bench_01.txt"), &ScannerConfig::new()).unwrap();
/// for section in &report.sections {
///     println!("{}: {} group(s)", section.name(), section.groups.len());
/// }
/// ```
pub fn scan_file(path: &Path, config: &ScannerConfig) -> Result<ScanReport> {
    log::info!("Reading file: {:?}", path);

    let text = read_log_text(path)?;
    let report = SectionScanner::new(config.clone()).scan_report(text.lines());

    log::debug!(
        "{:?}: {} line(s), {} section(s), {} group(s), {} issue(s)",
        path,
        report.lines_read,
        report.sections.len(),
        report.group_count(),
        report.issues.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file() {
        let result = read_log_text(Path::new("/definitely/not/here.txt"));
        assert!(matches!(result, Err(ScannerError::FileNotFound(_))));
    }

    #[test]
    fn test_read_error_keeps_cause_as_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_log_text(dir.path()).unwrap_err();

        assert!(matches!(err, ScannerError::ReadError { .. }));
        let source = std::error::Error::source(&err).unwrap().to_string();
        assert!(!err.to_string().contains(&source));
    }

    #[test]
    fn test_latin1_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Temp: 25\xb0C\n").unwrap();

        let text = read_log_text(file.path()).unwrap();
        assert_eq!(text, "Temp: 25°C\n");
    }

    #[test]
    fn test_utf8_passthrough() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("温度 25°C\r\n".as_bytes()).unwrap();

        let text = read_log_text(file.path()).unwrap();
        assert_eq!(text, "温度 25°C\r\n");
    }
}
