//! Configuration and constants for the analyzer and CLI.

/// Current report / collector data schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Snapshot envelope format marker and version
pub const SNAPSHOT_FORMAT: &str = "template-trace-snapshot";
pub const SNAPSHOT_VERSION: u32 = 1;

// Embedded node types accepted by the snapshot decoder.
// Anything else is rejected before typed decoding happens.
pub const PROFILE_TYPE_TAG: &str = "trace.profile";
pub const LEGACY_PROFILE_TYPE_TAG: &str = "trace.legacy_profile";
pub const ALLOWED_TYPE_TAGS: &[&str] = &[PROFILE_TYPE_TAG, LEGACY_PROFILE_TYPE_TAG];

/// Name and template of a freshly created root span
pub const ROOT_NAME: &str = "main";

/// Collector identifier reported to the host
pub const COLLECTOR_NAME: &str = "template";

// Inline styles emitted by the HTML dumper
pub const TEMPLATE_COLOR: &str = "#ffd";
pub const BLOCK_COLOR: &str = "#dfd";
pub const MACRO_COLOR: &str = "#ddf";
pub const BIG_COLOR: &str = "#d44";

/// Spans taking more than this share of the root are highlighted
pub const BIG_PERCENT_THRESHOLD: f64 = 20.0;

/// Hardcoded dumper styles and the semantic classes replacing them.
/// Applied in order.
pub const STYLE_SUBSTITUTIONS: &[(&str, &str)] = &[
    (
        r#"<span style="background-color: #ffd">"#,
        r#"<span class="status-warning">"#,
    ),
    (
        r#"<span style="color: #d44">"#,
        r#"<span class="status-error">"#,
    ),
    (
        r#"<span style="background-color: #dfd">"#,
        r#"<span class="status-success">"#,
    ),
    (
        r#"<span style="background-color: #ddf">"#,
        r#"<span class="status-info">"#,
    ),
];
