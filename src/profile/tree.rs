//! Arena-backed trace tree.
//!
//! Nodes live in a flat table and reference each other by `NodeId`.
//! The root is always stored at index 0, every node is stored after its
//! parent, and children are kept in the chronological order their spans
//! were opened.

use crate::utils::config::ROOT_NAME;
use serde::{Deserialize, Serialize};

/// Classification of a span. Set once when the span is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Root,
    Template,
    Block,
    Macro,
}

impl ProfileKind {
    /// Lowercase label, as used by dumpers and the raw trace format
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::Root => "root",
            ProfileKind::Template => "template",
            ProfileKind::Block => "block",
            ProfileKind::Macro => "macro",
        }
    }
}

/// Opaque measurements recorded by the profiler
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetrics {
    /// Wall time of the span in seconds
    #[serde(default)]
    pub duration_secs: f64,

    /// Memory delta over the span in bytes
    #[serde(default)]
    pub memory_usage: u64,

    /// Peak memory delta over the span in bytes
    #[serde(default)]
    pub peak_memory_usage: u64,
}

impl ProfileMetrics {
    pub fn new(duration_secs: f64, memory_usage: u64, peak_memory_usage: u64) -> Self {
        Self {
            duration_secs,
            memory_usage,
            peak_memory_usage,
        }
    }
}

/// Index of a node inside its `TraceTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One recorded span
#[derive(Debug, Clone, PartialEq)]
pub struct TraceNode {
    kind: ProfileKind,
    template: String,
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    metrics: ProfileMetrics,
}

impl TraceNode {
    pub(crate) fn new(
        kind: ProfileKind,
        template: impl Into<String>,
        name: impl Into<String>,
        parent: Option<NodeId>,
        metrics: ProfileMetrics,
    ) -> Self {
        Self {
            kind,
            template: template.into(),
            name: name.into(),
            parent,
            children: Vec::new(),
            metrics,
        }
    }

    pub(crate) fn with_children(mut self, children: Vec<NodeId>) -> Self {
        self.children = children;
        self
    }

    pub fn kind(&self) -> ProfileKind {
        self.kind
    }

    /// Logical template this span belongs to
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children in start order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn metrics(&self) -> &ProfileMetrics {
        &self.metrics
    }

    pub fn is_root(&self) -> bool {
        self.kind == ProfileKind::Root
    }

    pub fn is_template(&self) -> bool {
        self.kind == ProfileKind::Template
    }

    pub fn is_block(&self) -> bool {
        self.kind == ProfileKind::Block
    }

    pub fn is_macro(&self) -> bool {
        self.kind == ProfileKind::Macro
    }
}

/// A recorded execution: exactly one root plus its descendants
#[derive(Debug, Clone, PartialEq)]
pub struct TraceTree {
    nodes: Vec<TraceNode>,
}

impl Default for TraceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceTree {
    /// Create a tree holding only a fresh root span
    pub fn new() -> Self {
        Self {
            nodes: vec![TraceNode::new(
                ProfileKind::Root,
                ROOT_NAME,
                ROOT_NAME,
                None,
                ProfileMetrics::default(),
            )],
        }
    }

    /// Build a tree from an already validated node table.
    ///
    /// Callers must guarantee the root sits at index 0, that every
    /// parent/child link is consistent and that children come after
    /// their parent.
    pub(crate) fn from_nodes(nodes: Vec<TraceNode>) -> Self {
        debug_assert!(nodes.first().map(TraceNode::is_root).unwrap_or(false));
        Self { nodes }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// # Panics
    /// If `id` was not produced by this tree.
    pub fn node(&self, id: NodeId) -> &TraceNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing but the root was recorded
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Node ids in pre-order (parent before children, children in order)
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];

        while let Some(id) = stack.pop() {
            order.push(id);
            // Reverse so the first child is visited first
            stack.extend(self.children(id).iter().rev().copied());
        }

        order
    }

    /// Duration of a span in seconds.
    ///
    /// A root that has children reports the sum of its children, since the
    /// profiler never closes the root span itself.
    pub fn duration(&self, id: NodeId) -> f64 {
        let node = self.node(id);
        if node.is_root() && !node.children.is_empty() {
            node.children
                .iter()
                .map(|&child| self.node(child).metrics.duration_secs)
                .sum()
        } else {
            node.metrics.duration_secs
        }
    }

    /// Record a template render under `parent`
    pub fn add_template(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        metrics: ProfileMetrics,
    ) -> NodeId {
        let name = name.into();
        self.push(parent, ProfileKind::Template, name.clone(), name, metrics)
    }

    /// Record a block render owned by `template`
    pub fn add_block(
        &mut self,
        parent: NodeId,
        template: impl Into<String>,
        name: impl Into<String>,
        metrics: ProfileMetrics,
    ) -> NodeId {
        self.push(parent, ProfileKind::Block, template.into(), name.into(), metrics)
    }

    /// Record a macro call owned by `template`
    pub fn add_macro(
        &mut self,
        parent: NodeId,
        template: impl Into<String>,
        name: impl Into<String>,
        metrics: ProfileMetrics,
    ) -> NodeId {
        self.push(parent, ProfileKind::Macro, template.into(), name.into(), metrics)
    }

    /// Update the metrics of a span once it closes
    pub fn set_metrics(&mut self, id: NodeId, metrics: ProfileMetrics) {
        self.nodes[id.0].metrics = metrics;
    }

    /// Drop every recorded span and start again from a fresh root
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn push(
        &mut self,
        parent: NodeId,
        kind: ProfileKind,
        template: String,
        name: String,
        metrics: ProfileMetrics,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(TraceNode::new(kind, template, name, Some(parent), metrics));
        self.nodes[parent.0].children.push(id);
        id
    }
}
