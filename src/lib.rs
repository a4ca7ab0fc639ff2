//! Template Trace
//!
//! Post-hoc analysis of template engine profiles: a recorded tree of
//! template, block and macro spans is turned into render counts,
//! per-template invocation tallies, a template name to source path map,
//! and a themeable HTML call graph.
//!
//! The analysis runs in two phases. At capture time the tree is frozen
//! into a snapshot together with the resolved template paths; at report
//! time the snapshot is restored and everything else is computed lazily.
//!
//! ```ignore
//! let mut collector = TemplateDataCollector::new(tree, Some(Box::new(loader)));
//! collector.late_collect()?;
//! let data = collector.data().clone();
//!
//! // later, possibly in another process
//! let collector = TemplateDataCollector::from_data(data);
//! println!("{} templates", collector.template_count()?);
//! ```

pub mod aggregator;
pub mod callgraph;
pub mod collector;
pub mod commands;
pub mod output;
pub mod parser;
pub mod profile;
pub mod resolver;
pub mod snapshot;
pub mod utils;
