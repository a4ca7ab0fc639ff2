//! Capture command implementation.
//!
//! The capture command:
//! 1. Reads the raw profiler trace
//! 2. Builds the trace tree
//! 3. Freezes it into a snapshot and resolves template paths
//! 4. Writes collector data for a later `analyze`

use super::models::CaptureArgs;
use crate::collector::TemplateDataCollector;
use crate::output::write_collector_data;
use crate::parser::read_trace;
use crate::resolver::{FilesystemLoader, TemplateLoader};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the capture command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Trace file missing or malformed
/// * Snapshot encoding failures
/// * File write errors
pub fn execute_capture(args: CaptureArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting capture from trace: {}", args.trace_file.display());

    // Step 1: Parse trace
    info!("Step 1/3: Parsing trace...");
    let profile = read_trace(&args.trace_file)
        .with_context(|| format!("Failed to parse trace {}", args.trace_file.display()))?;

    debug!("Parsed trace with {} spans", profile.len());

    // Step 2: Late collection
    info!("Step 2/3: Collecting snapshot and template paths...");
    let mut collector = TemplateDataCollector::new(profile, build_loader(&args));
    collector.collect();
    collector
        .late_collect()
        .context("Failed to collect trace data")?;

    // Step 3: Write outputs
    info!("Step 3/3: Writing collector data...");
    write_collector_data(collector.data(), &args.output_data)
        .context("Failed to write collector data")?;

    info!("✓ Collector data written to: {}", args.output_data.display());

    let elapsed = start_time.elapsed();
    info!("Capture completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Validate capture arguments
///
/// **Public** - can be called before execute_capture for early validation
pub fn validate_capture_args(args: &CaptureArgs) -> Result<()> {
    if args.trace_file.as_os_str().is_empty() {
        anyhow::bail!("Trace file path cannot be empty");
    }

    if !args.trace_file.is_file() {
        anyhow::bail!("Trace file not found: {}", args.trace_file.display());
    }

    for dir in args
        .template_dirs
        .iter()
        .chain(args.namespaced_dirs.iter().map(|(_, dir)| dir))
    {
        if !dir.is_dir() {
            anyhow::bail!("Template directory not found: {}", dir.display());
        }
    }

    for (namespace, _) in &args.namespaced_dirs {
        if namespace.is_empty() || namespace.contains('/') {
            anyhow::bail!("Invalid template namespace: '{}'", namespace);
        }
    }

    Ok(())
}

/// Build a filesystem loader when any template directory was given
///
/// **Private** - internal helper for execute_capture
fn build_loader(args: &CaptureArgs) -> Option<Box<dyn TemplateLoader>> {
    if args.template_dirs.is_empty() && args.namespaced_dirs.is_empty() {
        info!("No template directories given, template paths will be empty");
        return None;
    }

    let mut loader = FilesystemLoader::new(args.template_dirs.iter().cloned());
    for (namespace, dir) in &args.namespaced_dirs {
        loader.add_path(dir.clone(), namespace);
    }

    Some(Box::new(loader))
}
