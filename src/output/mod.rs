//! Output writers for reports, collector data and call graphs.
//!
//! This module handles writing data to disk in various formats:
//! - JSON analysis reports
//! - JSON collector data (the persisted snapshot)
//! - HTML call graphs

pub mod html;
pub mod json;
pub mod report;

// Re-export main functions
pub use html::write_call_graph;
pub use json::{read_collector_data, read_report, write_collector_data, write_report};
pub use report::AnalysisReport;
