use crate::collector::TemplateDataCollector;
use crate::output::read_collector_data;
use crate::utils::config::{SCHEMA_VERSION, SNAPSHOT_VERSION};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a collector data file by fully restoring its snapshot
pub fn validate_data_file(file_path: PathBuf) -> Result<()> {
    println!("Validating collector data: {}", file_path.display());

    let data = read_collector_data(&file_path)?;
    let version = data.version.clone();
    let collector = TemplateDataCollector::from_data(data);
    let profile = collector.profile().context("Snapshot rejected")?;

    println!("✓ Valid collector data");
    println!("  Version: {}", version);
    println!("  Spans: {}", profile.len());
    println!("  Templates: {}", collector.template_count()?);
    println!("  Blocks: {}", collector.block_count()?);
    println!("  Macros: {}", collector.macro_count()?);
    println!("  Template Paths: {}", collector.template_paths().len());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Template Trace Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!("Snapshot Codec: v{}", SNAPSHOT_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  collector: string        - Collector name");
        println!("  time_ms: number          - Total render time in milliseconds");
        println!("  template_count: number   - Template renders (root excluded)");
        println!("  block_count: number      - Block renders");
        println!("  macro_count: number      - Macro calls");
        println!("  templates: object        - Invocation count per template");
        println!("  template_paths: object   - Source path per template (best effort)");
        println!("  generated_at: string     - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Template Trace v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!("Snapshot Codec: v{}", SNAPSHOT_VERSION);
    println!();
    println!("Post-hoc analysis of template engine profiles.");
}
