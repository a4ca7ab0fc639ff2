//! Template path resolution.
//!
//! This module handles:
//! - The loader interface and the bundled loaders
//! - Mapping template names found in a trace to their source files

pub mod loader;
pub mod paths;

// Re-export main types
pub use loader::{ArrayLoader, FilesystemLoader, TemplateLoader, TemplateSource, MAIN_NAMESPACE};
pub use paths::{resolve_template_paths, TemplatePathIndex};
