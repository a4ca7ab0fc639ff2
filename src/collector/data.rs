//! Persisted collector state.
//!
//! This is what survives between the collection phase and the report
//! phase: the frozen snapshot and the template paths resolved while the
//! loader was still around.

use crate::resolver::TemplatePathIndex;
use crate::snapshot::Snapshot;
use crate::utils::config::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

/// Data written by `late_collect`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorData {
    /// Schema version for compatibility checking
    #[serde(default = "default_version")]
    pub version: String,

    /// Frozen trace tree, absent until `late_collect` runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Snapshot>,

    /// Source path per template name
    #[serde(default)]
    pub template_paths: TemplatePathIndex,
}

impl Default for CollectorData {
    fn default() -> Self {
        Self {
            version: default_version(),
            snapshot: None,
            template_paths: TemplatePathIndex::new(),
        }
    }
}

fn default_version() -> String {
    SCHEMA_VERSION.to_string()
}
