use serde_json::json;
use template_trace::profile::{NodeId, ProfileMetrics, TraceTree};
use template_trace::snapshot::{decode, encode, Snapshot};
use template_trace::utils::error::DeserializationError;

fn sample_tree() -> TraceTree {
    let mut tree = TraceTree::new();
    let root = tree.root();
    let a = tree.add_template(root, "a.tpl", ProfileMetrics::new(0.012, 4096, 8192));
    tree.add_block(a, "a.tpl", "header", ProfileMetrics::new(0.001, 0, 0));
    let b = tree.add_template(a, "b.tpl", ProfileMetrics::new(0.003, 128, 256));
    tree.add_macro(b, "b.tpl", "m", ProfileMetrics::default());
    // Appended after the nested spans: shape still decides the encoding
    tree.add_template(root, "c.tpl", ProfileMetrics::new(0.0005, 0, 0));
    tree
}

/// Walk both trees in parallel comparing every node
fn assert_same_shape(left: &TraceTree, l: NodeId, right: &TraceTree, r: NodeId) {
    let (ln, rn) = (left.node(l), right.node(r));
    assert_eq!(ln.kind(), rn.kind());
    assert_eq!(ln.template(), rn.template());
    assert_eq!(ln.name(), rn.name());
    assert_eq!(ln.metrics(), rn.metrics());
    assert_eq!(ln.children().len(), rn.children().len());

    for (&lc, &rc) in ln.children().iter().zip(rn.children()) {
        assert_eq!(right.node(rc).parent(), Some(r));
        assert_same_shape(left, lc, right, rc);
    }
}

#[test]
fn test_round_trip_preserves_tree() {
    let tree = sample_tree();
    let decoded = decode(&encode(&tree).unwrap()).unwrap();

    assert_eq!(decoded.len(), tree.len());
    assert_same_shape(&tree, tree.root(), &decoded, decoded.root());
}

#[test]
fn test_encoding_is_deterministic() {
    let tree = sample_tree();
    assert_eq!(encode(&tree).unwrap(), encode(&tree).unwrap());

    // Re-encoding a decoded tree gives the same blob
    let snapshot = encode(&tree).unwrap();
    assert_eq!(encode(&decode(&snapshot).unwrap()).unwrap(), snapshot);
}

#[test]
fn test_injected_type_is_rejected() {
    let snapshot = encode(&sample_tree()).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(snapshot.as_str()).unwrap();
    value["nodes"][2]["type"] = json!("std.process.Command");

    let result = decode(&Snapshot::from_blob(value.to_string()));

    match result {
        Err(DeserializationError::DisallowedType(tag)) => assert_eq!(tag, "std.process.Command"),
        other => panic!("expected DisallowedType, got {:?}", other),
    }
}

#[test]
fn test_legacy_alias_decodes_like_current() {
    let snapshot = encode(&sample_tree()).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(snapshot.as_str()).unwrap();
    for node in value["nodes"].as_array_mut().unwrap() {
        node["type"] = json!("trace.legacy_profile");
    }

    let legacy = decode(&Snapshot::from_blob(value.to_string())).unwrap();
    let current = decode(&snapshot).unwrap();
    assert_eq!(legacy, current);
}

#[test]
fn test_garbage_is_malformed() {
    for blob in ["", "not json", "[1, 2, 3]", r#"{"nodes": "nope"}"#] {
        let result = decode(&Snapshot::from_blob(blob));
        assert!(result.is_err(), "blob {:?} should not decode", blob);
    }

    assert!(matches!(
        decode(&Snapshot::from_blob("{oops")),
        Err(DeserializationError::Malformed(_))
    ));
}

#[test]
fn test_wrong_field_types_are_malformed() {
    let snapshot = Snapshot::from_blob(
        json!({
            "format": "template-trace-snapshot",
            "version": 1,
            "nodes": [{ "type": "trace.profile", "kind": "root", "template": 5, "name": "main" }]
        })
        .to_string(),
    );

    assert!(matches!(decode(&snapshot), Err(DeserializationError::Malformed(_))));
}

#[test]
fn test_unknown_kind_is_malformed() {
    let snapshot = Snapshot::from_blob(
        json!({
            "format": "template-trace-snapshot",
            "version": 1,
            "nodes": [{ "type": "trace.profile", "kind": "filter", "template": "main", "name": "main" }]
        })
        .to_string(),
    );

    assert!(matches!(decode(&snapshot), Err(DeserializationError::Malformed(_))));
}

#[test]
fn test_template_node_must_belong_to_itself() {
    let snapshot = encode(&sample_tree()).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(snapshot.as_str()).unwrap();
    assert_eq!(value["nodes"][1]["kind"], "template");
    value["nodes"][1]["template"] = json!("other.tpl");

    assert!(matches!(
        decode(&Snapshot::from_blob(value.to_string())),
        Err(DeserializationError::InvalidStructure(_))
    ));
}
