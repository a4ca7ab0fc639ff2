//! HTML call graph output writer.

use super::json::validate_output_path;
use crate::callgraph::Markup;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const PAGE_HEADER: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>Template call graph</title>
<style>
.status-warning { background-color: #ffd; }
.status-error { color: #d44; }
.status-success { background-color: #dfd; }
.status-info { background-color: #ddf; }
</style>
</head>
<body>
"#;

const PAGE_FOOTER: &str = "\n</body>\n</html>\n";

/// Write a rendered call graph as a standalone HTML page
///
/// **Public** - main entry point for call graph output
///
/// The page carries a default stylesheet for the status classes; the
/// markup itself is written verbatim.
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is invalid
pub fn write_call_graph(markup: &Markup, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing call graph to: {}", output_path.display());

    validate_output_path(output_path)?;

    if let Some(ext) = output_path.extension() {
        if ext != "html" && ext != "htm" {
            debug!("Warning: File does not have .html extension: {}", output_path.display());
        }
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent)
                .map_err(|e| OutputError::InvalidPath(format!("Cannot create directory: {}", e)))?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    writer.write_all(PAGE_HEADER.as_bytes())?;
    writer.write_all(markup.as_str().as_bytes())?;
    writer.write_all(PAGE_FOOTER.as_bytes())?;
    writer.flush()?;

    let file_size = PAGE_HEADER.len() + markup.as_str().len() + PAGE_FOOTER.len();
    info!(
        "Call graph written successfully ({} bytes, {:.2} KB)",
        file_size,
        file_size as f64 / 1024.0
    );

    Ok(())
}
