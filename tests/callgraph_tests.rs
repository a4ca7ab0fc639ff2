use template_trace::callgraph::{render_call_graph, CallGraphDumper, HtmlDumper};
use template_trace::profile::{ProfileMetrics, TraceTree};
use template_trace::utils::config::STYLE_SUBSTITUTIONS;

/// Stand-in rendering engine emitting a fixed string
struct FixedDumper(&'static str);

impl CallGraphDumper for FixedDumper {
    fn dump(&self, _tree: &TraceTree) -> String {
        self.0.to_string()
    }
}

const ENGINE_OUTPUT: &str = concat!(
    r#"<pre><span style="background-color: #ffd">a.tpl</span>"#,
    r#"<span style="color: #d44">9ms</span>"#,
    r#"<span style="background-color: #dfd">header</span>"#,
    r#"<span style="background-color: #ddf">m</span>"#,
    r#"<span style="color: auto">1ms</span></pre>"#,
);

#[test]
fn test_known_tokens_become_classes() {
    let markup = render_call_graph(&TraceTree::new(), &FixedDumper(ENGINE_OUTPUT));
    let html = markup.as_str();

    for class in ["status-warning", "status-error", "status-success", "status-info"] {
        assert!(html.contains(&format!(r#"<span class="{}">"#, class)), "missing {}", class);
    }
    for (style, _) in STYLE_SUBSTITUTIONS {
        assert!(!html.contains(style), "style {} survived", style);
    }

    // Unknown inline style untouched
    assert!(html.contains(r#"<span style="color: auto">1ms</span>"#));
}

#[test]
fn test_html_dumper_output_is_themeable() {
    let mut tree = TraceTree::new();
    let root = tree.root();
    let a = tree.add_template(root, "a.tpl", ProfileMetrics::new(0.010, 0, 0));
    tree.add_block(a, "a.tpl", "header", ProfileMetrics::new(0.001, 0, 0));
    let b = tree.add_template(a, "b.tpl", ProfileMetrics::new(0.002, 0, 0));
    tree.add_macro(b, "b.tpl", "m", ProfileMetrics::default());

    let html = render_call_graph(&tree, &HtmlDumper::new()).into_string();

    assert!(html.starts_with("<pre>main"));
    assert!(html.contains(r#"<span class="status-warning">a.tpl</span>"#));
    assert!(html.contains(r#"a.tpl::block(<span class="status-success">header</span>)"#));
    assert!(html.contains(r#"b.tpl::macro(<span class="status-info">m</span>)"#));
    assert!(html.contains(r#"<span class="status-error">10.00ms/100%</span>"#));
    assert!(!html.contains("background-color"));
}
