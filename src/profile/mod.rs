//! Trace tree model.
//!
//! One `TraceTree` holds a recorded template execution: a root span plus
//! nested template, block and macro spans. The tree is built during
//! capture and treated as read-only input by every analysis pass.

pub mod tree;

// Re-export main types
pub use tree::{NodeId, ProfileKind, ProfileMetrics, TraceNode, TraceTree};
