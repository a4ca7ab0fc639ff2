//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads collector data written by `capture`
//! 2. Restores the session (the snapshot is decoded on first query)
//! 3. Builds the report and, if requested, the call graph
//! 4. Writes output files

use super::models::AnalyzeArgs;
use crate::collector::TemplateDataCollector;
use crate::output::{read_collector_data, write_call_graph, write_report, AnalysisReport};
use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Collector data missing or unreadable
/// * Snapshot rejected by the decoder
/// * File write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting analysis of: {}", args.data_file.display());

    // Step 1: Load collector data
    info!("Step 1/3: Loading collector data...");
    let data = read_collector_data(&args.data_file).context("Failed to read collector data")?;
    let collector = TemplateDataCollector::from_data(data);

    // Step 2: Build report
    info!("Step 2/3: Aggregating trace...");
    let report = AnalysisReport::from_collector(&collector).context("Failed to analyze snapshot")?;

    info!(
        "Templates: {} | Blocks: {} | Macros: {} | Time: {}ms",
        report.template_count, report.block_count, report.macro_count, report.time_ms
    );

    // Step 3: Write outputs
    info!("Step 3/3: Writing output files...");
    write_report(&report, &args.output_report).context("Failed to write report JSON")?;
    info!("✓ Report written to: {}", args.output_report.display());

    if let Some(call_graph_path) = &args.output_call_graph {
        let markup = collector
            .html_call_graph()
            .context("Failed to render call graph")?;
        write_call_graph(&markup, call_graph_path).context("Failed to write call graph")?;
        info!("✓ Call graph written to: {}", call_graph_path.display());
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(60));
        println!("TEMPLATE PROFILE SUMMARY");
        println!("{}", "=".repeat(60));
        println!("{}", format_summary(&report, 10));
        println!("{}", "=".repeat(60));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_analyze_args(args: &AnalyzeArgs) -> Result<()> {
    if !args.data_file.is_file() {
        anyhow::bail!("Collector data not found: {}", args.data_file.display());
    }

    if args.output_call_graph.as_ref() == Some(&args.output_report) {
        anyhow::bail!("Report and call graph cannot be written to the same file");
    }

    Ok(())
}

/// Create a text summary: totals, then the most rendered templates
pub fn format_summary(report: &AnalysisReport, max_lines: usize) -> String {
    let mut lines = vec![
        format!("Render Time:   {} ms", report.time_ms),
        format!("Templates:     {}", report.template_count),
        format!("Blocks:        {}", report.block_count),
        format!("Macros:        {}", report.macro_count),
        String::new(),
        format!("  {:<40} {:>8}  {}", "Template", "Calls", "Path"),
    ];

    let mut templates: Vec<(&String, &u64)> = report.templates.iter().collect();
    templates.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (name, calls) in templates.iter().take(max_lines) {
        let path = report
            .template_paths
            .get(*name)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!("  {:<40} {:>8}  {}", name, calls, path));
    }

    if templates.len() > max_lines {
        lines.push(String::new());
        lines.push(format!(
            "   (Showing top {} of {} templates)",
            max_lines,
            templates.len()
        ));
    }

    lines.join("\n")
}
