//! Parser for raw profiler traces.
//!
//! A profiler dumps the span tree as nested JSON:
//!
//! ```json
//! {"type": "root", "duration": 0.0, "profiles": [
//!   {"type": "template", "name": "a.tpl", "duration": 0.012, "memory": 2048,
//!    "profiles": [{"type": "block", "template": "a.tpl", "name": "header"}]}
//! ]}
//! ```
//!
//! A bare array of top-level spans is accepted too and gets wrapped in a root.

use crate::profile::{NodeId, ProfileKind, ProfileMetrics, TraceTree};
use crate::utils::error::ParseError;
use log::debug;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One span as emitted by the profiler
#[derive(Debug, Clone, Deserialize)]
pub struct RawSpan {
    #[serde(rename = "type")]
    pub kind: ProfileKind,

    /// Owning template (required for blocks and macros)
    #[serde(default)]
    pub template: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Wall time in seconds
    #[serde(default)]
    pub duration: f64,

    #[serde(default)]
    pub memory: u64,

    #[serde(default, alias = "peakMemory")]
    pub peak_memory: u64,

    #[serde(default, alias = "children")]
    pub profiles: Vec<RawSpan>,
}

impl RawSpan {
    fn metrics(&self) -> ProfileMetrics {
        ProfileMetrics::new(self.duration, self.memory, self.peak_memory)
    }
}

/// Parse a raw trace into a tree
///
/// **Public** - main entry point for parsing
///
/// # Errors
/// * `ParseError::JsonError` - spans of the wrong shape
/// * `ParseError::InvalidFormat` - not a root object or span array, nested roots,
///   spans missing their name or owning template
pub fn parse_trace(raw_trace: &serde_json::Value) -> Result<TraceTree, ParseError> {
    let root = match raw_trace {
        serde_json::Value::Object(_) => {
            let root: RawSpan = serde_json::from_value(raw_trace.clone())?;
            if root.kind != ProfileKind::Root {
                return Err(ParseError::InvalidFormat(format!(
                    "top-level span must be the root, found {}",
                    root.kind.as_str()
                )));
            }
            root
        }

        serde_json::Value::Array(_) => {
            debug!("Trace is a span array, wrapping in a root");
            RawSpan {
                kind: ProfileKind::Root,
                template: None,
                name: None,
                duration: 0.0,
                memory: 0,
                peak_memory: 0,
                profiles: serde_json::from_value(raw_trace.clone())?,
            }
        }

        _ => {
            return Err(ParseError::InvalidFormat(
                "Trace must be a JSON object or array".to_string(),
            ))
        }
    };

    let mut tree = TraceTree::new();
    let root_id = tree.root();
    tree.set_metrics(root_id, root.metrics());
    add_spans(&mut tree, root_id, root.profiles)?;

    debug!("Parsed trace with {} spans", tree.len());
    Ok(tree)
}

/// Read and parse a raw trace file
pub fn read_trace(input_path: impl AsRef<Path>) -> Result<TraceTree, ParseError> {
    let input_path = input_path.as_ref();
    debug!("Reading trace from: {}", input_path.display());

    let file = File::open(input_path)?;
    let raw: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;
    parse_trace(&raw)
}

fn add_spans(tree: &mut TraceTree, parent: NodeId, spans: Vec<RawSpan>) -> Result<(), ParseError> {
    for span in spans {
        let metrics = span.metrics();
        let id = match span.kind {
            ProfileKind::Root => {
                return Err(ParseError::InvalidFormat(
                    "root span nested inside the trace".to_string(),
                ))
            }
            ProfileKind::Template => {
                let name = span
                    .name
                    .clone()
                    .or_else(|| span.template.clone())
                    .ok_or_else(|| {
                        ParseError::InvalidFormat("template span without a name".to_string())
                    })?;
                tree.add_template(parent, name, metrics)
            }
            ProfileKind::Block | ProfileKind::Macro => {
                let kind = span.kind.as_str();
                let template = span.template.clone().ok_or_else(|| {
                    ParseError::InvalidFormat(format!("{} span without a template", kind))
                })?;
                let name = span.name.clone().ok_or_else(|| {
                    ParseError::InvalidFormat(format!("{} span without a name", kind))
                })?;

                if span.kind == ProfileKind::Block {
                    tree.add_block(parent, template, name, metrics)
                } else {
                    tree.add_macro(parent, template, name, metrics)
                }
            }
        };

        add_spans(tree, id, span.profiles)?;
    }

    Ok(())
}
