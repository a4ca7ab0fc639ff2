//! Analysis session for one captured trace.
//!
//! The session answers the host's queries lazily. The tree is decoded from
//! the snapshot on first use, counts are aggregated on first use, and both
//! are kept until `reset`.

use super::data::CollectorData;
use crate::aggregator::{aggregate, AggregateResult};
use crate::callgraph::{render_call_graph, CallGraphDumper, HtmlDumper, Markup};
use crate::profile::TraceTree;
use crate::resolver::{resolve_template_paths, TemplateLoader, TemplatePathIndex};
use crate::snapshot::{decode, encode};
use crate::utils::config::COLLECTOR_NAME;
use crate::utils::error::{CollectError, DeserializationError};
use log::{debug, info};
use std::cell::OnceCell;
use std::collections::BTreeMap;

/// Collector for template engine profiles
///
/// **Public** - driven by the host through its lifecycle hooks
pub struct TemplateDataCollector {
    profile: OnceCell<TraceTree>,
    loader: Option<Box<dyn TemplateLoader>>,
    dumper: Box<dyn CallGraphDumper>,
    data: CollectorData,
    computed: OnceCell<AggregateResult>,
}

impl TemplateDataCollector {
    /// Create a session around a live capture.
    ///
    /// Without a loader, path resolution yields an empty index.
    pub fn new(profile: TraceTree, loader: Option<Box<dyn TemplateLoader>>) -> Self {
        Self {
            profile: OnceCell::from(profile),
            loader,
            dumper: Box::new(HtmlDumper::new()),
            data: CollectorData::default(),
            computed: OnceCell::new(),
        }
    }

    /// Restore a report-phase session from persisted data.
    ///
    /// The snapshot is decoded on the first query that needs the tree.
    pub fn from_data(data: CollectorData) -> Self {
        Self {
            profile: OnceCell::new(),
            loader: None,
            dumper: Box::new(HtmlDumper::new()),
            data,
            computed: OnceCell::new(),
        }
    }

    /// Use another call graph dumper
    pub fn with_dumper(mut self, dumper: Box<dyn CallGraphDumper>) -> Self {
        self.dumper = dumper;
        self
    }

    /// Take over a finalized capture, dropping everything derived from the previous one
    pub fn attach(&mut self, profile: TraceTree) {
        self.profile = OnceCell::from(profile);
        self.computed = OnceCell::new();
        self.data = CollectorData::default();
    }

    /// Request-time hook. Nothing is gathered before the late phase.
    pub fn collect(&mut self) {}

    /// Freeze the trace into a snapshot and resolve template paths.
    ///
    /// Runs once the capture is final and the loader is consistent.
    ///
    /// # Errors
    /// * `CollectError::Restore` - the session holds only a snapshot that does not decode
    /// * `CollectError::Encode` - the tree could not be serialized
    pub fn late_collect(&mut self) -> Result<(), CollectError> {
        let (snapshot, template_paths) = {
            let profile = self.profile()?;
            let snapshot = encode(profile).map_err(CollectError::Encode)?;
            let template_paths = resolve_template_paths(profile, self.loader.as_deref());
            (snapshot, template_paths)
        };

        info!(
            "Collected snapshot ({} bytes) with {} template paths",
            snapshot.len(),
            template_paths.len()
        );

        self.data.snapshot = Some(snapshot);
        self.data.template_paths = template_paths;
        Ok(())
    }

    /// Start over with an empty trace. Decoded tree, caches and data go together.
    pub fn reset(&mut self) {
        debug!("Resetting {} collector", COLLECTOR_NAME);
        self.profile = OnceCell::from(TraceTree::new());
        self.computed = OnceCell::new();
        self.data = CollectorData::default();
    }

    /// The trace tree, decoded from the snapshot at most once
    ///
    /// # Errors
    /// * `DeserializationError::MissingSnapshot` - restored session without a snapshot
    /// * any decode failure of the stored snapshot
    pub fn profile(&self) -> Result<&TraceTree, DeserializationError> {
        if let Some(profile) = self.profile.get() {
            return Ok(profile);
        }

        let snapshot = self
            .data
            .snapshot
            .as_ref()
            .ok_or(DeserializationError::MissingSnapshot)?;
        let profile = decode(snapshot)?;
        info!("Restored trace with {} spans from snapshot", profile.len());

        Ok(self.profile.get_or_init(|| profile))
    }

    /// Total rendering time in milliseconds
    pub fn time_millis(&self) -> Result<u64, DeserializationError> {
        let profile = self.profile()?;
        Ok((profile.duration(profile.root()) * 1000.0) as u64)
    }

    pub fn template_count(&self) -> Result<u64, DeserializationError> {
        Ok(self.computed()?.template_count)
    }

    pub fn block_count(&self) -> Result<u64, DeserializationError> {
        Ok(self.computed()?.block_count)
    }

    pub fn macro_count(&self) -> Result<u64, DeserializationError> {
        Ok(self.computed()?.macro_count)
    }

    /// Invocation count per template name
    pub fn templates(&self) -> Result<&BTreeMap<String, u64>, DeserializationError> {
        Ok(&self.computed()?.templates)
    }

    /// Paths resolved during `late_collect`; empty before it ran
    pub fn template_paths(&self) -> &TemplatePathIndex {
        &self.data.template_paths
    }

    /// Rendered call graph with themeable status classes
    pub fn html_call_graph(&self) -> Result<Markup, DeserializationError> {
        Ok(render_call_graph(self.profile()?, self.dumper.as_ref()))
    }

    /// The full aggregate, computed on first request
    pub fn aggregate(&self) -> Result<&AggregateResult, DeserializationError> {
        self.computed()
    }

    /// State to persist across the phase boundary
    pub fn data(&self) -> &CollectorData {
        &self.data
    }

    pub fn name(&self) -> &'static str {
        COLLECTOR_NAME
    }

    fn computed(&self) -> Result<&AggregateResult, DeserializationError> {
        if let Some(computed) = self.computed.get() {
            return Ok(computed);
        }

        let computed = aggregate(self.profile()?);
        Ok(self.computed.get_or_init(|| computed))
    }
}
