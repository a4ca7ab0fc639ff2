//! Output JSON schema for analysis reports.
//!
//! Schema is versioned to allow future evolution.

use crate::collector::TemplateDataCollector;
use crate::resolver::TemplatePathIndex;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::DeserializationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Name of the collector that produced the data
    pub collector: String,

    /// Total rendering time in milliseconds
    pub time_ms: u64,

    pub template_count: u64,
    pub block_count: u64,
    pub macro_count: u64,

    /// Invocation count per template name
    pub templates: BTreeMap<String, u64>,

    /// Source path per template name (best effort)
    pub template_paths: TemplatePathIndex,

    /// Timestamp when report was generated
    pub generated_at: String,
}

impl AnalysisReport {
    /// Query every accessor of `collector` and gather the answers
    ///
    /// # Errors
    /// Fails when the collector's snapshot cannot be restored.
    pub fn from_collector(collector: &TemplateDataCollector) -> Result<Self, DeserializationError> {
        Ok(Self {
            version: SCHEMA_VERSION.to_string(),
            collector: collector.name().to_string(),
            time_ms: collector.time_millis()?,
            template_count: collector.template_count()?,
            block_count: collector.block_count()?,
            macro_count: collector.macro_count()?,
            templates: collector.templates()?.clone(),
            template_paths: collector.template_paths().clone(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}
