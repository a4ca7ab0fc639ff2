//! Count templates, blocks and macros over a trace tree.
//!
//! Each subtree is reduced to its own `AggregateResult`, and results are
//! folded upwards: a parent adds one for each child of the matching kind,
//! then sums the child's tallies key by key. A template rendered from
//! several places therefore ends up with its global invocation count.

use crate::profile::{NodeId, TraceTree};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counters computed once per analysis session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Number of template spans (root excluded)
    pub template_count: u64,

    /// Number of block spans
    pub block_count: u64,

    /// Number of macro spans
    pub macro_count: u64,

    /// Invocation count per template name
    pub templates: BTreeMap<String, u64>,
}

impl AggregateResult {
    /// Fold another subtree's result into this one
    fn merge(&mut self, mut other: AggregateResult) {
        self.template_count += other.template_count;
        self.block_count += other.block_count;
        self.macro_count += other.macro_count;

        // Walk the smaller tally
        if other.templates.len() > self.templates.len() {
            std::mem::swap(&mut self.templates, &mut other.templates);
        }

        for (template, count) in other.templates {
            *self.templates.entry(template).or_insert(0) += count;
        }
    }

    /// Get human-readable summary
    ///
    /// **Public** - for logging and the CLI
    pub fn summary(&self) -> String {
        format!(
            "Templates: {} ({} distinct) | Blocks: {} | Macros: {}",
            self.template_count,
            self.templates.len(),
            self.block_count,
            self.macro_count
        )
    }
}

/// Aggregate the whole tree
///
/// **Public** - main entry point for counting
///
/// The root span stands for the session itself and is never counted.
pub fn aggregate(tree: &TraceTree) -> AggregateResult {
    let result = fold_subtrees(tree);
    debug!("Aggregated {} spans: {}", tree.len(), result.summary());
    result
}

/// Post-order reduction without recursion.
///
/// Every child is stored after its parent, so sweeping the node table
/// backwards finishes each subtree before its parent is reached.
///
/// **Private** - internal helper
fn fold_subtrees(tree: &TraceTree) -> AggregateResult {
    let mut partial = vec![AggregateResult::default(); tree.len()];

    for index in (1..tree.len()).rev() {
        let node = tree.node(NodeId(index));
        let mut below = std::mem::take(&mut partial[index]);

        below.template_count += u64::from(node.is_template());
        below.block_count += u64::from(node.is_block());
        below.macro_count += u64::from(node.is_macro());

        if node.is_template() {
            *below.templates.entry(node.template().to_string()).or_insert(0) += 1;
        }

        if let Some(parent) = node.parent() {
            partial[parent.index()].merge(below);
        }
    }

    partial.swap_remove(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileMetrics;

    #[test]
    fn test_empty_tree_counts_nothing() {
        let result = aggregate(&TraceTree::new());
        assert_eq!(result, AggregateResult::default());
    }

    #[test]
    fn test_repeated_template_accumulates() {
        let mut tree = TraceTree::new();
        let root = tree.root();
        let layout = tree.add_template(root, "layout.tpl", ProfileMetrics::default());
        tree.add_template(layout, "row.tpl", ProfileMetrics::default());
        tree.add_template(layout, "row.tpl", ProfileMetrics::default());
        let other = tree.add_template(root, "sidebar.tpl", ProfileMetrics::default());
        tree.add_template(other, "row.tpl", ProfileMetrics::default());

        let result = aggregate(&tree);

        assert_eq!(result.template_count, 5);
        assert_eq!(result.templates["row.tpl"], 3);
        assert_eq!(result.templates["layout.tpl"], 1);
        assert_eq!(result.templates["sidebar.tpl"], 1);
    }

    #[test]
    fn test_blocks_and_macros_do_not_enter_template_tally() {
        let mut tree = TraceTree::new();
        let page = tree.add_template(tree.root(), "page.tpl", ProfileMetrics::default());
        tree.add_block(page, "page.tpl", "body", ProfileMetrics::default());
        tree.add_macro(page, "forms.tpl", "input", ProfileMetrics::default());

        let result = aggregate(&tree);

        assert_eq!(result.block_count, 1);
        assert_eq!(result.macro_count, 1);
        assert_eq!(result.templates.len(), 1);
        assert!(!result.templates.contains_key("forms.tpl"));
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let mut tree = TraceTree::new();
        let mut parent = tree.root();
        for depth in 0..200_000 {
            parent = tree.add_template(parent, format!("t{}.tpl", depth % 7), ProfileMetrics::default());
        }

        let result = aggregate(&tree);

        assert_eq!(result.template_count, 200_000);
        assert_eq!(result.templates.values().sum::<u64>(), 200_000);
        assert_eq!(result.templates.len(), 7);
    }

    #[test]
    fn test_summary() {
        let mut tree = TraceTree::new();
        tree.add_template(tree.root(), "a.tpl", ProfileMetrics::default());
        assert_eq!(
            aggregate(&tree).summary(),
            "Templates: 1 (1 distinct) | Blocks: 0 | Macros: 0"
        );
    }
}
