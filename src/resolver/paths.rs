//! Build the template name -> source path index.
//!
//! Resolution is best-effort: a template the loader cannot find is left
//! out of the index and the pass carries on.

use super::loader::TemplateLoader;
use crate::profile::TraceTree;
use log::{debug, info};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Source path per logical template name
pub type TemplatePathIndex = BTreeMap<String, PathBuf>;

/// Resolve every template span of `tree` through `loader`
///
/// **Public** - main entry point for path resolution
///
/// Without a loader no lookup is attempted and the index is empty.
/// When a name appears more than once, the last successful lookup in
/// pre-order wins.
pub fn resolve_template_paths(
    tree: &TraceTree,
    loader: Option<&dyn TemplateLoader>,
) -> TemplatePathIndex {
    let mut index = TemplatePathIndex::new();

    let Some(loader) = loader else {
        debug!("No template loader attached, skipping path resolution");
        return index;
    };

    let mut failures = 0usize;
    for id in tree.preorder() {
        let node = tree.node(id);
        if !node.is_template() {
            continue;
        }

        match loader.load(node.name()) {
            Ok(source) if !source.path.as_os_str().is_empty() => {
                index.insert(node.name().to_string(), source.path);
            }
            Ok(_) => {
                debug!("Template '{}' has no source path", node.name());
            }
            Err(e) => {
                debug!("Template lookup failed: {}", e);
                failures += 1;
            }
        }
    }

    info!(
        "Resolved {} template paths ({} failed lookups)",
        index.len(),
        failures
    );

    index
}
