//! End-to-end comparator → assembler scenarios on in-memory records.

mod common;

use common::{compare_section, rec, recs, schema, section, threshold_ratio};
use scrutiny_core::model::ChartStatus;
use scrutiny_core::report::RadarKind;
use scrutiny_core::{
    assemble_report, report_digest, AssembleRequest, Diff, DiffField, Report, SchemaConfig,
    Severity, Value,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn assemble(schema: &SchemaConfig, results: &[scrutiny_core::CompareResult]) -> Report {
    assemble_report(&AssembleRequest {
        schema,
        results,
        reference_name: "reference",
        profile_name: "profile",
        source_rows: None,
    })
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

// S1: identical container fields produce one group match and a MATCH section
#[test]
fn test_identical_groups_match() {
    let sec = section("AIDS", "basic");
    let rows = recs(json!([{"name": "pkg", "aids": ["A0", "A1"]}]));
    let result = compare_section(&sec, &rows, &rows);

    assert!(result.diffs.is_empty());
    let counts = result.counts.unwrap();
    assert_eq!((counts.matched, counts.compared), (1, 1));

    let report = assemble(&schema(vec![sec]), &[result]);
    assert_eq!(report.overall, Severity::Match);
}

// S2: one element swapped in a list gives removed + added group diffs
#[test]
fn test_group_swap_counts_two_changes() {
    let mut sec = section("AIDS", "basic");
    threshold_ratio(&mut sec, 0.5);
    let reference = recs(json!([{"name": "pkg", "v": [1, 2, 3]}]));
    let tested = recs(json!([{"name": "pkg", "v": [1, 2, 4]}]));
    let result = compare_section(&sec, &reference, &tested);

    assert_eq!(
        result.diffs,
        vec![
            Diff::group_removed("pkg", Value::int(3)),
            Diff::group_added("pkg", Value::int(4)),
        ]
    );
    assert_eq!(result.counts.unwrap().changed, 2);

    let report = assemble(&schema(vec![sec]), &[result]);
    assert_eq!(report.sections["AIDS"].result, Severity::Suspicious);
}

// S3: sub-2ms timings are skipped; significant slowdowns are mismatches
#[test]
fn test_performance_examples() {
    let sec = section("PERF", "algperf");
    let reference = recs(json!([
        {"name": "AES", "avg_ms": 1.0},
        {"name": "RSA", "avg_ms": 50, "min_ms": 40, "max_ms": 55},
    ]));
    let tested = recs(json!([
        {"name": "AES", "avg_ms": 1.5},
        {"name": "RSA", "avg_ms": 80},
    ]));
    let result = compare_section(&sec, &reference, &tested);

    let statuses: Vec<_> = result
        .artifacts
        .chart_rows
        .iter()
        .map(|r| (r.key.as_str(), r.status))
        .collect();
    assert_eq!(
        statuses,
        vec![("AES", ChartStatus::Skipped), ("RSA", ChartStatus::Mismatch)]
    );
    assert_eq!(result.diffs.len(), 1);
    assert_eq!(result.diffs[0].field, DiffField::named("avg_ms"));

    let report = assemble(&schema(vec![sec]), &[result]);
    let radar = &report.sections["PERF"].radar_rows;
    assert_eq!(radar.len(), 2);
    assert!(radar.iter().all(|r| r.kind == RadarKind::Numeric));
    assert_eq!(radar[1].test_score, 1.0);
    assert_eq!(radar[1].ref_score, 50.0 / 80.0);
}

// S4: radar normalization over synthesized numeric pairs
#[test]
fn test_radar_normalization_example() {
    let sec = section("NUM", "basic");
    let reference = recs(json!([{"name": "a", "v": 10}, {"name": "b", "v": 5}]));
    let tested = recs(json!([{"name": "a", "v": 20}, {"name": "b", "v": 0}]));
    let result = compare_section(&sec, &reference, &tested);
    let report = assemble(&schema(vec![sec]), &[result]);

    let scores: Vec<_> = report.sections["NUM"]
        .radar_rows
        .iter()
        .map(|r| (r.key.as_str(), r.ref_score, r.test_score))
        .collect();
    assert_eq!(scores, vec![("a", 0.5, 1.0), ("b", 0.25, 0.0)]);
}

// S5: unknown comparator names fall back to basic
#[test]
fn test_unknown_comparator_uses_basic() {
    let sec = section("X", "does-not-exist");
    let reference = recs(json!([{"name": "k", "v": 1}]));
    let tested = recs(json!([{"name": "k", "v": 2}]));
    let result = compare_section(&sec, &reference, &tested);
    assert_eq!(
        result.diffs,
        vec![Diff::changed("k", "v", Value::int(1), Value::int(2))]
    );
}

// S6: empty record lists → zero diffs, MATCH
#[test]
fn test_empty_lists_match() {
    let sec = section("EMPTY", "cplc");
    let result = compare_section(&sec, &[], &[]);
    assert!(result.diffs.is_empty());
    let report = assemble(&schema(vec![sec]), &[result]);
    assert_eq!(report.sections["EMPTY"].result, Severity::Match);
    assert_eq!(report.dashboard.overall_state_counts.matched, 1);
}

// S7: assembling twice gives byte-identical JSON and equal digests
#[test]
fn test_assembly_is_deterministic() {
    let basic = section("B", "basic");
    let perf = section("P", "performance");
    let reference = recs(json!([
        {"name": "x", "flag": true, "avg_ms": 30, "tags": {"k": 1}},
        {"name": "y", "flag": false, "avg_ms": 12},
    ]));
    let tested = recs(json!([
        {"name": "x", "flag": false, "avg_ms": 90, "tags": {"k": 2}},
        {"name": "z", "flag": true},
    ]));

    let build = || {
        let results = vec![
            compare_section(&basic, &reference, &tested),
            compare_section(&perf, &reference, &tested),
        ];
        assemble(&schema(vec![basic.clone(), perf.clone()]), &results)
    };

    let first = build();
    let second = build();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(report_digest(&first).unwrap(), report_digest(&second).unwrap());
    assert_eq!(report_digest(&first).unwrap().len(), 64);
}

// S8: presence-only differences leave the section at MATCH; the report
// round-trips through serde
#[test]
fn test_report_json_shape() {
    let sec = section("S", "basic");
    let result = compare_section(
        &sec,
        &[rec(json!({"name": "only-ref"}))],
        &[rec(json!({"name": "only-test"}))],
    );
    let report = assemble(&schema(vec![sec]), &[result]);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["overall"], "MATCH");
    assert_eq!(json["theme"], "light");
    assert_eq!(json["meta"]["generated_by"], "assemble_report");
    assert_eq!(json["meta"]["schema_title"], "test schema");
    assert_eq!(json["dashboard"]["overall_state_counts"]["TOTAL"], 1);
    assert_eq!(json["sections"]["S"]["diffs"][0]["field"], "__presence__");
    assert_eq!(json["sections"]["S"]["stats"]["only_ref"], 1);
    assert_eq!(json["sections"]["S"]["stats"]["only_test"], 1);

    let back: Report = serde_json::from_value(json).unwrap();
    assert_eq!(back, report);
}
