//! Raw trace parsing.
//!
//! This module handles:
//! - Parsing nested JSON span trees emitted by template profilers
//! - Validating span kinds and required fields
//! - Building the arena-backed `TraceTree`

pub mod raw_trace;

// Re-export main types
pub use raw_trace::{parse_trace, read_trace, RawSpan};
