//! Directive resolution across defaults, base and test documents

use gideon_core::{Directive, ResolveError, Workload};
use gideon_test_utils::{test_from_parts, test_from_spec, BASE_DEFAULTS};
use pretty_assertions::assert_eq;

#[test]
fn workload_override_keeps_other_defaults() {
    let test = test_from_spec("[workloads.foo]\nttl = 15\n");
    let resolved = test.resolver().resolve_workload("workloads.foo").unwrap();

    let expected = Workload {
        ttl: 15,
        ..test.registry().seed_workload()
    };
    assert_eq!(resolved, expected);
}

#[test]
fn phase_rows_come_from_test_document() {
    let test = test_from_spec("[phases.0]\nworkloads = [[\"SetOnly\"]]\n");
    let phase = test.resolver().resolve_phase("phases.0").unwrap();

    assert_eq!(phase.workloads, vec![vec!["SetOnly".to_string()]]);
    assert_eq!(phase.runtime, 30);
}

#[test]
fn base_document_sits_between_defaults_and_test() {
    let base = "[workloads]\nopRate = 500\nttl = 1\n";
    let test = test_from_parts(BASE_DEFAULTS, base, "[workloads.foo]\nttl = 15\n");
    let w = test.resolver().resolve_workload("workloads.foo").unwrap();

    assert_eq!((w.op_rate, w.ttl, w.templates.len()), (500, 15, 1));
}

#[test]
fn missing_directive_reports_path_and_partial() {
    let test = test_from_spec("[workloads.other]\nset = 1\n");
    let err = test.resolver().resolve("workloads.SetOnly").unwrap_err();

    assert_eq!(err.path(), "workloads.SetOnly");
    assert_eq!(err.to_string(), "missing directive workloads.SetOnly");
    match err.partial() {
        Some(Directive::Workload(w)) => assert_eq!(w, &test.registry().seed_workload()),
        other => panic!("expected partial workload, got {other:?}"),
    }
}

#[test]
fn malformed_paths() {
    let test = test_from_spec("");
    let resolver = test.resolver();

    assert!(matches!(
        resolver.resolve("templates.a").unwrap_err(),
        ResolveError::UnknownRoot { .. }
    ));
    assert!(matches!(
        resolver.resolve("phases").unwrap_err(),
        ResolveError::InvalidPath { .. }
    ));
    assert!(matches!(
        resolver.resolve("").unwrap_err(),
        ResolveError::UnknownRoot { .. }
    ));
}

#[test]
fn resolved_directive_serializes_with_kind_tag() {
    let test = test_from_spec("[workloads.SetOnly]\nset = 9\n");
    let directive = test.resolver().resolve("workloads.SetOnly").unwrap();
    let json = serde_json::to_value(&directive).unwrap();

    assert_eq!(json["kind"], "workload");
    assert_eq!(json["set"], 9);
    assert_eq!(json["opRate"], 100);
}
