//! Aggregation of trace data into counts and per-template tallies.
//!
//! This module transforms a trace tree into:
//! - Template, block and macro counts
//! - Invocation counts per template name

pub mod counts;

// Re-export main types and functions
pub use counts::{aggregate, AggregateResult};
