use std::io::Cursor;

use readiness_core::model::MetricPolicy;
use readiness_core::store::{
    load_config, parse_records, read_records, DatasetLayout, ReadinessConfig, StoreError,
};
use tempfile::tempdir;

const STORE: &str = r#"
{"scheme":"ecdsa","bench_name":"envelope","security_equiv_bits":128,"ts_utc":"2024-01-01T00:00:00Z"}
not json at all
[1,2,3]

{"gas_verify": 5000}
{"scheme":"falcon","bench_name":"e2e","security_metric_type":"lambda_eff","security_metric_value":256,"depends_on":["ecdsa::envelope"]}
"#;

#[test]
fn parse_records_skips_malformed_and_idless_rows() {
    let loaded = parse_records(Cursor::new(STORE), &MetricPolicy::Pooled).expect("parse");
    assert_eq!(loaded.records.len(), 2);
    assert_eq!(loaded.stats.lines, 5);
    assert_eq!(loaded.stats.malformed, 2);
    assert_eq!(loaded.stats.rejected, 1);
    assert_eq!(loaded.records[0].id, "ecdsa::envelope");
    assert_eq!(loaded.records[1].id, "falcon::e2e");
    assert_eq!(loaded.records[1].own_bits, Some(256));
}

#[test]
fn read_records_reports_missing_store() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("data").join("results.jsonl");
    match read_records(&path, &MetricPolicy::Pooled) {
        Err(StoreError::Missing(p)) => assert_eq!(p, path),
        other => panic!("expected Missing error, got {other:?}"),
    }
}

#[test]
fn read_records_reads_store_from_layout() {
    let tmp = tempdir().expect("tempdir");
    let layout = DatasetLayout::new(tmp.path());
    std::fs::create_dir_all(&layout.data_dir).expect("create data dir");
    std::fs::write(&layout.results_path, STORE).expect("write store");

    let loaded = read_records(&layout.results_path, &MetricPolicy::Pooled).expect("read");
    assert_eq!(loaded.records.len(), 2);
}

#[test]
fn layout_resolves_relative_and_default_inputs() {
    let layout = DatasetLayout::new("/srv/bench");
    assert_eq!(layout.results_path_or(None), layout.results_path);
    assert_eq!(layout.results_path_or(Some("other.jsonl")), layout.root.join("other.jsonl"));
    assert!(layout.results_path.ends_with("data/results.jsonl"));
    assert!(layout.config_path.ends_with("readiness.yaml"));
}

#[test]
fn missing_config_yields_defaults() {
    let tmp = tempdir().expect("tempdir");
    let layout = DatasetLayout::new(tmp.path());
    let config = load_config(&layout).expect("config");
    assert_eq!(config, ReadinessConfig::default());
    assert_eq!(config.target_for("mldsa65"), Some(192));
    assert!(config.known_prefixes.iter().any(|p| p == "ecdsa"));
}

#[test]
fn partial_config_overrides_only_named_fields() {
    let tmp = tempdir().expect("tempdir");
    let layout = DatasetLayout::new(tmp.path());
    std::fs::write(
        &layout.config_path,
        "known_prefixes: [sig]\nmetric_types: [security_equiv_bits]\n",
    )
    .expect("write config");

    let config = load_config(&layout).expect("config");
    assert_eq!(config.known_prefixes, vec!["sig".to_string()]);
    assert_eq!(config.metric_policy(), MetricPolicy::Only(vec!["security_equiv_bits".into()]));
    assert_eq!(config.target_for("falcon"), Some(256));
}

#[test]
fn corrupt_config_is_an_error() {
    let tmp = tempdir().expect("tempdir");
    let layout = DatasetLayout::new(tmp.path());
    std::fs::write(&layout.config_path, "known_prefixes: {not: [a list").expect("write config");
    let err = load_config(&layout).unwrap_err();
    assert!(err.to_string().contains("Failed to parse readiness config YAML"));
}

#[test]
fn blocker_text_uses_hint_prefixes() {
    let config = ReadinessConfig::default();
    assert!(config.blocker_text("ecdsa::l1_envelope_assumption").contains("L1 ECDSA envelope"));
    assert_eq!(config.blocker_text("sig::p256::verify"), "Capped by dependency: sig::p256::verify");
}

#[test]
fn invalid_utf8_line_is_skipped_not_fatal() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(br#"{"scheme":"ecdsa","bench_name":"envelope","security_equiv_bits":128}"#);
    bytes.push(b'\n');
    bytes.extend_from_slice(&[0xff, 0xfe, b'x', b'\n']);
    bytes.extend_from_slice(br#"{"scheme":"falcon","bench_name":"e2e","security_equiv_bits":256}"#);

    let loaded = parse_records(Cursor::new(bytes), &MetricPolicy::Pooled).expect("parse");
    assert_eq!(loaded.records.len(), 2);
    assert_eq!(loaded.stats.lines, 3);
    assert_eq!(loaded.stats.malformed, 1);
    assert_eq!(loaded.records[1].id, "falcon::e2e");
}

#[test]
fn invalid_utf8_in_store_file_keeps_valid_records() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("results.jsonl");
    let mut bytes = b"\xc3\x28 broken\n".to_vec();
    bytes.extend_from_slice(br#"{"id":"sig::verify","security_equiv_bits":128}"#);
    bytes.push(b'\n');
    std::fs::write(&path, bytes).expect("write store");

    let loaded = read_records(&path, &MetricPolicy::Pooled).expect("read");
    assert_eq!(loaded.records.len(), 1);
    assert_eq!(loaded.stats.malformed, 1);
}

#[test]
fn layout_names_data_dir_and_config_only() {
    let layout = DatasetLayout::new("/srv/bench");
    assert_eq!(layout.data_dir, layout.root.join("data"));
    assert_eq!(layout.results_path, layout.data_dir.join("results.jsonl"));
    assert_eq!(layout.config_path, layout.root.join("readiness.yaml"));
}
