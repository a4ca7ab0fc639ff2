//! JSON output writer.
//!
//! Writes analysis reports and collector data to JSON files, and reads
//! them back for the report phase and for validation.

use super::report::AnalysisReport;
use crate::collector::CollectorData;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Write an analysis report to a JSON file
///
/// **Public** - main entry point for report output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report(report: &AnalysisReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    info!("Writing report to: {}", output_path.display());
    write_json(report, output_path)
}

/// Read a report from a JSON file
pub fn read_report(input_path: impl AsRef<Path>) -> Result<AnalysisReport, OutputError> {
    let report: AnalysisReport = read_json(input_path.as_ref())?;
    debug!("Report loaded: version {}, {} templates", report.version, report.template_count);
    Ok(report)
}

/// Persist collector data so a later process can analyze it
///
/// **Public** - the capture side of the phase boundary
pub fn write_collector_data(data: &CollectorData, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    info!("Writing collector data to: {}", output_path.display());
    write_json(data, output_path)
}

/// Load collector data written by `write_collector_data`
pub fn read_collector_data(input_path: impl AsRef<Path>) -> Result<CollectorData, OutputError> {
    let data: CollectorData = read_json(input_path.as_ref())?;
    debug!(
        "Collector data loaded: version {}, snapshot {}",
        data.version,
        if data.snapshot.is_some() { "present" } else { "missing" }
    );
    Ok(data)
}

fn write_json<T: Serialize>(value: &T, output_path: &Path) -> Result<(), OutputError> {
    validate_output_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, value).map_err(OutputError::SerializationFailed)?;

    info!("Written successfully ({} bytes)", calculate_file_size(output_path));
    Ok(())
}

fn read_json<T: DeserializeOwned>(input_path: &Path) -> Result<T, OutputError> {
    debug!("Reading JSON from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::ReadFailed)?;
    let value = serde_json::from_reader(BufReader::new(file)).map_err(OutputError::SerializationFailed)?;

    Ok(value)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
pub(crate) fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Check if we're trying to overwrite a directory
    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::NamedTempFile;

    fn create_test_report() -> AnalysisReport {
        AnalysisReport {
            version: "1.0.0".to_string(),
            collector: "template".to_string(),
            time_ms: 12,
            template_count: 2,
            block_count: 1,
            macro_count: 1,
            templates: BTreeMap::from([("a.tpl".to_string(), 1), ("b.tpl".to_string(), 1)]),
            template_paths: BTreeMap::new(),
            generated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_write_and_read_report() {
        let report = create_test_report();
        let temp_file = NamedTempFile::new().unwrap();

        write_report(&report, temp_file.path()).unwrap();
        let loaded = read_report(temp_file.path()).unwrap();

        assert_eq!(loaded, report);
    }

    #[test]
    fn test_validate_output_path_empty() {
        assert!(validate_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(validate_output_path(temp_dir.path()).is_err());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/report.json");

        write_report(&create_test_report(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_read_missing_file_is_read_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("missing.json");

        let err = read_collector_data(&missing).unwrap_err();
        assert!(matches!(err, OutputError::ReadFailed(_)));
        assert!(err.to_string().starts_with("Failed to read file"));

        assert!(matches!(read_report(&missing), Err(OutputError::ReadFailed(_))));
    }

    #[test]
    fn test_read_collector_data_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "{}").unwrap();

        let data = read_collector_data(temp_file.path()).unwrap();
        assert!(data.snapshot.is_none());
        assert!(data.template_paths.is_empty());
        assert_eq!(data.version, crate::utils::config::SCHEMA_VERSION);
    }
}
