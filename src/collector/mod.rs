//! Collector session lifecycle.
//!
//! Capture hands over a tree, `late_collect` freezes it into
//! `CollectorData`, and a restored session analyzes that data on demand.

pub mod data;
pub mod session;

// Re-export main types
pub use data::CollectorData;
pub use session::TemplateDataCollector;
