//! Template Trace CLI
//!
//! Captures template engine profiles into snapshots and analyzes them:
//! render counts, per-template tallies, source paths and call graphs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use template_trace::commands::{
    display_schema, display_version, execute_analyze, execute_capture, validate_analyze_args,
    validate_capture_args, validate_data_file, AnalyzeArgs, CaptureArgs,
};

/// Template Trace - analysis for template engine profiles
#[derive(Parser, Debug)]
#[command(name = "template-trace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Snapshot a raw profiler trace and resolve template paths
    Capture {
        /// Raw trace JSON emitted by the profiler
        #[arg(short, long)]
        trace: PathBuf,

        /// Output path for collector data
        #[arg(short, long, default_value = "collector.json")]
        output: PathBuf,

        /// Template directory (repeatable, searched in order)
        #[arg(long = "templates", env = "TEMPLATE_TRACE_PATHS", value_delimiter = ',')]
        templates: Vec<PathBuf>,

        /// Namespaced template directory as NAMESPACE=DIR (repeatable)
        #[arg(long = "namespace", value_parser = parse_namespace)]
        namespaces: Vec<(String, PathBuf)>,
    },

    /// Analyze collector data and write a report
    Analyze {
        /// Collector data written by `capture`
        #[arg(short, long, default_value = "collector.json")]
        data: PathBuf,

        /// Output path for JSON report
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Output path for HTML call graph (optional)
        #[arg(short, long)]
        call_graph: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a collector data file
    Validate {
        /// Path to collector data JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Capture {
            trace,
            output,
            templates,
            namespaces,
        } => {
            let args = CaptureArgs {
                trace_file: trace,
                output_data: output,
                template_dirs: templates,
                namespaced_dirs: namespaces,
            };

            validate_capture_args(&args)?;
            execute_capture(args)?;
        }

        Commands::Analyze {
            data,
            output,
            call_graph,
            summary,
        } => {
            let args = AnalyzeArgs {
                data_file: data,
                output_report: output,
                output_call_graph: call_graph,
                print_summary: summary,
            };

            validate_analyze_args(&args)?;
            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_data_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Parse a `NAMESPACE=DIR` pair
fn parse_namespace(value: &str) -> Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((namespace, dir)) if !namespace.is_empty() && !dir.is_empty() => {
            Ok((namespace.to_string(), PathBuf::from(dir)))
        }
        _ => Err(format!("expected NAMESPACE=DIR, got '{}'", value)),
    }
}
