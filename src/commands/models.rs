use std::path::PathBuf;

/// Arguments for the capture command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct CaptureArgs {
    /// Raw profiler trace (nested JSON spans)
    pub trace_file: PathBuf,

    /// Output path for collector data JSON
    pub output_data: PathBuf,

    /// Template search directories for path resolution
    pub template_dirs: Vec<PathBuf>,

    /// Namespaced template directories (`namespace`, `dir`)
    pub namespaced_dirs: Vec<(String, PathBuf)>,
}

impl Default for CaptureArgs {
    fn default() -> Self {
        Self {
            trace_file: PathBuf::from("trace.json"),
            output_data: PathBuf::from("collector.json"),
            template_dirs: Vec::new(),
            namespaced_dirs: Vec::new(),
        }
    }
}

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Collector data written by `capture`
    pub data_file: PathBuf,

    /// Output path for the JSON report
    pub output_report: PathBuf,

    /// Output path for the HTML call graph (optional)
    pub output_call_graph: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("collector.json"),
            output_report: PathBuf::from("report.json"),
            output_call_graph: None,
            print_summary: false,
        }
    }
}
