use readiness_core::analysis::{CapReason, RecordSet, TokenResolution};
use readiness_core::model::Record;
use readiness_core::services::{explain_record, ReadinessReport};
use readiness_core::store::ReadinessConfig;
use serde_json::json;

fn dataset() -> Vec<Record> {
    [
        json!({"scheme":"ecdsa","bench_name":"l1_envelope_assumption","security_equiv_bits":128,
               "gas_verify":3000,"ts_utc":"2024-01-01T00:00:00Z"}),
        json!({"scheme":"falcon","bench_name":"falcon_handleOps_userOp_e2e",
               "security_metric_type":"security_equiv_bits","security_metric_value":256,
               "gas_verify":1500000,"ts_utc":"2024-01-01T00:00:00Z",
               "depends_on":["l1_envelope_assumption"]}),
        json!({"scheme":"falcon","bench_name":"falcon_handleOps_userOp_e2e",
               "security_metric_type":"security_equiv_bits","security_metric_value":256,
               "gas_verify":1400000,"ts_utc":"2024-06-01T00:00:00Z",
               "depends_on":["l1_envelope_assumption"]}),
        json!({"scheme":"randao","bench_name":"l1_randao_mix_surface",
               "security_metric_type":"H_min","security_metric_value":32,"gas_surface":800}),
        json!({"scheme":"newscheme","bench_name":"verify","security_equiv_bits":100,
               "depends_on":["randao::l1_randao_mix_surface","missing::thing"]}),
    ]
    .iter()
    .map(|row| Record::from_value(row).expect("valid row"))
    .collect()
}

#[test]
fn report_rows_carry_effective_bits_and_blockers() {
    let report = ReadinessReport::from_records(dataset(), &ReadinessConfig::default());
    assert_eq!(report.rows.len(), 4);

    let falcon = report.row("falcon::falcon_handleOps_userOp_e2e").expect("falcon row");
    assert_eq!(falcon.gas, Some(1_400_000));
    assert_eq!(falcon.own_bits, Some(256));
    assert_eq!(falcon.effective_bits, 128);
    assert_eq!(falcon.target_bits, 256);
    assert_eq!(
        falcon.capped_by,
        Some(CapReason::Dependency("ecdsa::l1_envelope_assumption".into()))
    );
    assert!(falcon.blocker.as_deref().unwrap().contains("L1 ECDSA envelope"));

    let newscheme = report.row("newscheme::verify").expect("newscheme row");
    assert_eq!(newscheme.effective_bits, 32);
    assert_eq!(newscheme.target_bits, 100);
    assert!(newscheme.blocker.as_deref().unwrap().contains("H_min denominator"));

    let ecdsa = report.row("ecdsa::l1_envelope_assumption").expect("ecdsa row");
    assert_eq!(ecdsa.capped_by, None);
    assert_eq!(ecdsa.blocker, None);
}

#[test]
fn rows_are_sorted_by_category_then_id() {
    let report = ReadinessReport::from_records(dataset(), &ReadinessConfig::default());
    let categories: Vec<&str> = report.rows.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(categories, vec!["ecdsa", "falcon", "newscheme", "randao"]);
}

#[test]
fn output_mappings_match_rows() {
    let report = ReadinessReport::from_records(dataset(), &ReadinessConfig::default());
    assert_eq!(report.effective_bits.len(), 4);
    assert_eq!(report.effective_bits["randao::l1_randao_mix_surface"], 32);
    assert_eq!(report.cap_reasons.len(), 2);
    assert!(report.cyclic.is_empty());

    let value = serde_json::to_value(&report).expect("serialize");
    assert_eq!(
        value["cap_reasons"]["falcon::falcon_handleOps_userOp_e2e"],
        json!("ecdsa::l1_envelope_assumption")
    );
}

#[test]
fn empty_prefix_registry_still_resolves_unique_suffixes() {
    let config = ReadinessConfig { known_prefixes: Vec::new(), ..ReadinessConfig::default() };
    let report = ReadinessReport::from_records(dataset(), &config);
    assert_eq!(report.effective_bits["falcon::falcon_handleOps_userOp_e2e"], 128);
}

#[test]
fn explain_record_lists_each_token_resolution() {
    let records = RecordSet::from_records(dataset());
    let config = ReadinessConfig::default();
    let explanation = explain_record(&records, &config, "newscheme::verify").expect("known id");

    assert_eq!(explanation.own_bits, Some(100));
    assert_eq!(explanation.effective_bits, 32);
    assert!(!explanation.cyclic);
    assert_eq!(explanation.dependencies.len(), 2);
    assert_eq!(explanation.dependencies[0].effective_bits, Some(32));
    assert!(matches!(explanation.dependencies[1].resolution, TokenResolution::External { .. }));
    assert_eq!(explanation.dependencies[1].effective_bits, None);

    assert!(explain_record(&records, &config, "nope::nothing").is_none());
}

#[test]
fn gas_per_secure_bit_uses_effective_bits() {
    let mut rows = dataset();
    rows.push(
        Record::from_value(&json!({"scheme":"das","bench_name":"sampling","gas_verify":900,
                                   "security_equiv_bits":0}))
        .expect("valid row"),
    );
    let report = ReadinessReport::from_records(rows, &ReadinessConfig::default());

    let falcon = report.row("falcon::falcon_handleOps_userOp_e2e").expect("falcon row");
    assert_eq!(falcon.gas_per_secure_bit, Some(1_400_000.0 / 128.0));
    let randao = report.row("randao::l1_randao_mix_surface").expect("randao row");
    assert_eq!(randao.gas_per_secure_bit, Some(25.0));
    let newscheme = report.row("newscheme::verify").expect("newscheme row");
    assert_eq!(newscheme.gas_per_secure_bit, None);
    let das = report.row("das::sampling").expect("das row");
    assert_eq!(das.effective_bits, 0);
    assert_eq!(das.gas_per_secure_bit, None);
}
