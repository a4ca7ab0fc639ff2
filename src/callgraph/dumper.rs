//! HTML call graph dumper.
//!
//! Renders the tree as indented text inside `<pre>`, one line per span,
//! with hardcoded inline colours. The presenter rewrites those colours
//! into CSS classes afterwards.
//!
//! ```text
//! main 12.00ms/100%
//! └ <span style="background-color: #ffd">a.tpl</span> 12.00ms/100%
//!   └ a.tpl::block(<span style="background-color: #dfd">header</span>)
//! ```

use crate::profile::{NodeId, TraceNode, TraceTree};
use crate::utils::config::{
    BIG_COLOR, BIG_PERCENT_THRESHOLD, BLOCK_COLOR, MACRO_COLOR, TEMPLATE_COLOR,
};

/// Anything turning a trace tree into call graph markup
pub trait CallGraphDumper {
    fn dump(&self, tree: &TraceTree) -> String;
}

/// Default dumper producing `<pre>` wrapped HTML
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlDumper;

impl HtmlDumper {
    pub fn new() -> Self {
        Self
    }

    /// Render one span line, without children
    fn dump_line(&self, tree: &TraceTree, id: NodeId, prefix: &str, root_duration: f64) -> String {
        let node = tree.node(id);

        let start = if node.is_root() {
            escape_html(node.name())
        } else if node.is_template() {
            format_template(node, prefix)
        } else {
            format_non_template(node, prefix)
        };

        let duration = tree.duration(id);
        let percent = if root_duration > 0.0 {
            duration / root_duration * 100.0
        } else {
            0.0
        };

        // Sub-millisecond spans are listed without timing
        if duration * 1000.0 < 1.0 {
            format!("{}\n", start)
        } else {
            format!("{} {}\n", start, format_time(duration, percent))
        }
    }
}

impl CallGraphDumper for HtmlDumper {
    fn dump(&self, tree: &TraceTree) -> String {
        let root = tree.root();
        let root_duration = tree.duration(root);
        let mut out = String::from("<pre>");

        // Explicit stack of (span, line prefix, followed by a sibling)
        let mut stack = vec![(root, String::new(), false)];
        while let Some((id, prefix, has_sibling)) = stack.pop() {
            out.push_str(&self.dump_line(tree, id, &prefix, root_duration));

            let child_prefix = if tree.node(id).is_root() {
                prefix
            } else {
                let branch = if has_sibling { "│ " } else { "  " };
                format!("{}{}", prefix, branch)
            };

            let children = tree.children(id);
            for (i, &child) in children.iter().enumerate().rev() {
                stack.push((child, child_prefix.clone(), i + 1 != children.len()));
            }
        }

        out.push_str("</pre>");
        out
    }
}

fn format_template(node: &TraceNode, prefix: &str) -> String {
    format!(
        r#"{}└ <span style="background-color: {}">{}</span>"#,
        prefix,
        TEMPLATE_COLOR,
        escape_html(node.template())
    )
}

fn format_non_template(node: &TraceNode, prefix: &str) -> String {
    let color = if node.is_macro() {
        MACRO_COLOR
    } else if node.is_block() {
        BLOCK_COLOR
    } else {
        "auto"
    };

    format!(
        r#"{}└ {}::{}(<span style="background-color: {}">{}</span>)"#,
        prefix,
        escape_html(node.template()),
        node.kind().as_str(),
        color,
        escape_html(node.name())
    )
}

fn format_time(duration_secs: f64, percent: f64) -> String {
    let color = if percent > BIG_PERCENT_THRESHOLD {
        BIG_COLOR
    } else {
        "auto"
    };

    format!(
        r#"<span style="color: {}">{:.2}ms/{:.0}%</span>"#,
        color,
        duration_secs * 1000.0,
        percent
    )
}

/// Escape text for inclusion in HTML
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
