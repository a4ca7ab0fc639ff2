//! Encode a trace tree into a snapshot and restore it with a type allow-list.
//!
//! Wire format: a JSON envelope holding a flat node table in pre-order.
//! Each node record carries an embedded `type` tag and the indices of its
//! children inside the table:
//!
//! ```text
//! {"format":"template-trace-snapshot","version":1,"nodes":[
//!   {"type":"trace.profile","kind":"root","template":"main","name":"main","metrics":{..},"children":[1]},
//!   {"type":"trace.profile","kind":"template","template":"a.tpl","name":"a.tpl","metrics":{..},"children":[]}
//! ]}
//! ```

use crate::profile::{NodeId, ProfileKind, ProfileMetrics, TraceNode, TraceTree};
use crate::utils::config::{ALLOWED_TYPE_TAGS, SNAPSHOT_FORMAT, SNAPSHOT_VERSION};
use crate::utils::error::DeserializationError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque serialized trace tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(String);

impl Snapshot {
    /// Wrap a blob received from storage; it is only checked on decode
    pub fn from_blob(blob: impl Into<String>) -> Self {
        Self(blob.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEnvelope {
    format: String,
    version: u32,
    nodes: Vec<NodeRecord>,
}

/// Tagged node record. Only these two tags can ever be instantiated.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
enum NodeRecord {
    #[serde(rename = "trace.profile")]
    Current(NodeFields),

    #[serde(rename = "trace.legacy_profile")]
    Legacy(NodeFields),
}

impl NodeRecord {
    fn into_fields(self) -> NodeFields {
        match self {
            NodeRecord::Current(fields) | NodeRecord::Legacy(fields) => fields,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeFields {
    kind: ProfileKind,
    template: String,
    name: String,
    #[serde(default)]
    metrics: ProfileMetrics,
    #[serde(default)]
    children: Vec<usize>,
}

/// Serialize the full tree.
///
/// Nodes are written in pre-order so the output only depends on the
/// tree's shape, never on the order spans were appended in.
pub fn encode(tree: &TraceTree) -> Result<Snapshot, serde_json::Error> {
    let order = tree.preorder();
    let positions: HashMap<NodeId, usize> = order
        .iter()
        .enumerate()
        .map(|(position, &id)| (id, position))
        .collect();

    let nodes = order
        .iter()
        .map(|&id| {
            let node = tree.node(id);
            NodeRecord::Current(NodeFields {
                kind: node.kind(),
                template: node.template().to_string(),
                name: node.name().to_string(),
                metrics: *node.metrics(),
                children: node.children().iter().map(|child| positions[child]).collect(),
            })
        })
        .collect();

    let envelope = SnapshotEnvelope {
        format: SNAPSHOT_FORMAT.to_string(),
        version: SNAPSHOT_VERSION,
        nodes,
    };

    let blob = serde_json::to_string(&envelope)?;
    debug!("Encoded snapshot: {} nodes, {} bytes", tree.len(), blob.len());

    Ok(Snapshot(blob))
}

/// Restore a tree from a snapshot.
///
/// # Errors
/// * `DeserializationError::Malformed` - not JSON, or fields of the wrong shape
/// * `DeserializationError::DisallowedType` - a node tag outside the allow-list
/// * `DeserializationError::UnsupportedVersion` - envelope from another codec version
/// * `DeserializationError::InvalidStructure` - the node table does not form one rooted tree
pub fn decode(snapshot: &Snapshot) -> Result<TraceTree, DeserializationError> {
    let value: serde_json::Value = serde_json::from_str(snapshot.as_str())?;

    // Reject foreign types before anything is instantiated from them
    check_type_tags(&value)?;

    let envelope: SnapshotEnvelope = serde_json::from_value(value)?;

    if envelope.format != SNAPSHOT_FORMAT {
        return Err(DeserializationError::InvalidStructure(format!(
            "unknown snapshot format '{}'",
            envelope.format
        )));
    }
    if envelope.version != SNAPSHOT_VERSION {
        return Err(DeserializationError::UnsupportedVersion(envelope.version));
    }

    let tree = build_tree(envelope.nodes)?;
    debug!("Decoded snapshot: {} nodes", tree.len());

    Ok(tree)
}

fn check_type_tags(value: &serde_json::Value) -> Result<(), DeserializationError> {
    let nodes = value
        .get("nodes")
        .and_then(|nodes| nodes.as_array())
        .ok_or_else(|| DeserializationError::InvalidStructure("missing node table".to_string()))?;

    for (index, node) in nodes.iter().enumerate() {
        match node.get("type").and_then(|tag| tag.as_str()) {
            Some(tag) if ALLOWED_TYPE_TAGS.contains(&tag) => {}
            Some(tag) => return Err(DeserializationError::DisallowedType(tag.to_string())),
            None => {
                return Err(DeserializationError::InvalidStructure(format!(
                    "node {} has no type tag",
                    index
                )))
            }
        }
    }

    Ok(())
}

/// Turn the flat table back into a tree, checking every link.
///
/// Children must point forward (pre-order), and every node except the
/// root must be claimed by exactly one parent. Together this rules out
/// cycles, orphans and shared subtrees. A template node must belong to
/// the template it names.
fn build_tree(records: Vec<NodeRecord>) -> Result<TraceTree, DeserializationError> {
    let fields: Vec<NodeFields> = records.into_iter().map(NodeRecord::into_fields).collect();

    match fields.first() {
        None => {
            return Err(DeserializationError::InvalidStructure(
                "node table is empty".to_string(),
            ))
        }
        Some(first) if first.kind != ProfileKind::Root => {
            return Err(DeserializationError::InvalidStructure(
                "first node is not the root".to_string(),
            ))
        }
        Some(_) => {}
    }

    let count = fields.len();
    let mut parents: Vec<Option<usize>> = vec![None; count];

    for (index, node) in fields.iter().enumerate() {
        if index > 0 && node.kind == ProfileKind::Root {
            return Err(DeserializationError::InvalidStructure(format!(
                "node {} is a second root",
                index
            )));
        }
        if node.kind == ProfileKind::Template && node.template != node.name {
            return Err(DeserializationError::InvalidStructure(format!(
                "template node {} is named '{}' but belongs to '{}'",
                index, node.name, node.template
            )));
        }

        for &child in &node.children {
            if child >= count {
                return Err(DeserializationError::InvalidStructure(format!(
                    "node {} references missing child {}",
                    index, child
                )));
            }
            if child <= index {
                return Err(DeserializationError::InvalidStructure(format!(
                    "node {} references earlier node {}",
                    index, child
                )));
            }
            if let Some(previous) = parents[child] {
                return Err(DeserializationError::InvalidStructure(format!(
                    "node {} claimed by both {} and {}",
                    child, previous, index
                )));
            }
            parents[child] = Some(index);
        }
    }

    if let Some(orphan) = (1..count).find(|&index| parents[index].is_none()) {
        return Err(DeserializationError::InvalidStructure(format!(
            "node {} has no parent",
            orphan
        )));
    }

    let nodes = fields
        .into_iter()
        .zip(parents)
        .map(|(fields, parent)| {
            TraceNode::new(
                fields.kind,
                fields.template,
                fields.name,
                parent.map(NodeId),
                fields.metrics,
            )
            .with_children(fields.children.into_iter().map(NodeId).collect())
        })
        .collect();

    Ok(TraceTree::from_nodes(nodes))
}
