//! Themeable call graph rendering.
//!
//! Dumpers emit hardcoded inline styles. Those are swapped for semantic
//! status classes so the page stylesheet decides what they look like.

use super::dumper::CallGraphDumper;
use crate::profile::TraceTree;
use crate::utils::config::STYLE_SUBSTITUTIONS;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTML that is already escaped and must be emitted verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Markup(String);

impl Markup {
    /// Mark `html` as safe. The caller vouches for its escaping.
    pub fn from_trusted(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Dump `tree` and replace inline styles with status classes
///
/// **Public** - main entry point for call graph rendering
pub fn render_call_graph(tree: &TraceTree, dumper: &dyn CallGraphDumper) -> Markup {
    let dump = dumper.dump(tree);
    debug!("Call graph dumped ({} bytes)", dump.len());
    Markup::from_trusted(apply_style_substitutions(dump))
}

/// Replace every known inline style token, in table order.
/// Unknown styles are left alone.
pub fn apply_style_substitutions(dump: String) -> String {
    STYLE_SUBSTITUTIONS
        .iter()
        .fold(dump, |acc, &(style, class)| acc.replace(style, class))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_styles_pass_through() {
        let input = r#"<span style="color: auto">1.00ms/5%</span>"#.to_string();
        assert_eq!(apply_style_substitutions(input.clone()), input);
    }

    #[test]
    fn test_every_occurrence_replaced() {
        let input = r#"<span style="color: #d44">a</span><span style="color: #d44">b</span>"#;
        assert_eq!(
            apply_style_substitutions(input.to_string()),
            r#"<span class="status-error">a</span><span class="status-error">b</span>"#
        );
    }

    #[test]
    fn test_markup_display() {
        let markup = Markup::from_trusted("<pre>main</pre>");
        assert_eq!(markup.to_string(), "<pre>main</pre>");
        assert_eq!(markup.into_string(), "<pre>main</pre>");
    }
}
