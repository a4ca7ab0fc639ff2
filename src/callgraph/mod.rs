//! Call graph rendering.
//!
//! This module converts a trace tree into HTML markup:
//! - `dumper` draws the tree with inline styles
//! - `presenter` rewrites those styles into status classes

pub mod dumper;
pub mod presenter;

// Re-export main types
pub use dumper::{escape_html, CallGraphDumper, HtmlDumper};
pub use presenter::{apply_style_substitutions, render_call_graph, Markup};
