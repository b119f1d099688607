use std::fs;

use uuid::Uuid;

use kaia::governor::{
    AuditEventKind, AuditOutcome, GovernorEngine, GovernorErrorKind, GovernorRules,
};

const RULES: &str = r#"{
  governor: { version: "test" },
  permissions: {
    cognition: { reason: true },
    tools: { execute_code_in_sandbox: true, delete_files: true },
  },
  approval_required_for: ["delete_files"],
  learning_bounds: { personality_clamp: { happiness: [0.2, 0.8] } },
}"#;

fn engine() -> GovernorEngine {
    let rules: GovernorRules = json5::from_str(RULES).expect("rules should parse");
    GovernorEngine::from_rules(rules)
}

#[test]
fn absent_paths_fail_closed() {
    let mut engine = engine();
    let decision = engine.allows("models.create_neural_networks");
    assert!(!decision.allowed);
    assert_eq!(decision.reason, "forbidden");
}

#[test]
fn full_leaf_chain_is_allowed() {
    let mut engine = engine();
    let decision = engine.allows("cognition.reason");
    assert!(decision.allowed);
    assert_eq!(decision.reason, "allowed");
}

#[test]
fn traversal_past_a_leaf_fails_closed() {
    let mut engine = engine();
    assert!(!engine.allows("cognition.reason.deeply").allowed);
}

#[test]
fn branch_prefix_counts_as_present() {
    let mut engine = engine();
    assert!(engine.allows("cognition").allowed);
}

#[test]
fn approval_matches_suffix_and_substring() {
    let mut engine = engine();
    assert!(engine.allows("tools.delete_files").requires_approval);
    // The dual match is deliberately permissive: a gated identifier embedded
    // in an unrelated path still trips it.
    assert!(engine.allows("tools.delete_files_archive").requires_approval);
    assert!(!engine.allows("cognition.reason").requires_approval);
}

#[test]
fn requires_approval_is_exact_membership_only() {
    let engine = engine();
    assert!(engine.requires_approval("delete_files"));
    assert!(!engine.requires_approval("tools.delete_files"));
}

#[test]
fn clamp_without_bounds_passes_value_through() {
    let mut engine = engine();
    assert_eq!(engine.clamp("personality", "curiosity", 4.2), 4.2);
}

#[test]
fn clamp_with_bounds_is_inclusive() {
    let mut engine = engine();
    assert_eq!(engine.clamp("personality", "happiness", 0.05), 0.2);
    assert_eq!(engine.clamp("personality", "happiness", 0.95), 0.8);
    assert_eq!(engine.clamp("personality", "happiness", 0.5), 0.5);
    assert_eq!(engine.clamp("personality", "happiness", 0.8), 0.8);
}

#[test]
fn every_query_appends_exactly_one_record_with_increasing_sequence() {
    let mut engine = engine();
    assert!(engine.audit().is_empty());

    engine.allows("cognition.reason");
    assert_eq!(engine.audit().len(), 1);
    engine.clamp("personality", "happiness", 0.9);
    assert_eq!(engine.audit().len(), 2);
    // No-op clamps are audited too.
    engine.clamp("personality", "unbounded_key", 0.9);
    assert_eq!(engine.audit().len(), 3);

    let records = engine.audit().records();
    let sequences: Vec<u64> = records.iter().map(|record| record.sequence).collect();
    assert_eq!(sequences, vec![1, 2, 3]);

    assert_eq!(records[0].event, AuditEventKind::PermissionCheck);
    assert_eq!(records[0].subject, "cognition.reason");
    match &records[0].outcome {
        AuditOutcome::Decision(decision) => assert!(decision.allowed),
        other => panic!("unexpected outcome: {other:?}"),
    }
    match &records[1].outcome {
        AuditOutcome::Clamp { input, output } => {
            assert_eq!(*input, 0.9);
            assert_eq!(*output, 0.8);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn appended_records_never_change() {
    let mut engine = engine();
    engine.allows("cognition.reason");
    let first = engine.audit().records()[0].clone();

    for _ in 0..10 {
        engine.allows("models.create_neural_networks");
        engine.clamp("personality", "happiness", 1.5);
    }

    assert_eq!(engine.audit().records()[0], first);
}

#[test]
fn enforce_distinguishes_forbidden_from_approval_required() {
    let mut engine = engine();

    let err = engine
        .enforce("models.create_neural_networks")
        .expect_err("forbidden path must fail");
    assert_eq!(err.kind, GovernorErrorKind::Forbidden);

    let err = engine
        .enforce("tools.delete_files")
        .expect_err("approval-gated path must fail");
    assert_eq!(err.kind, GovernorErrorKind::ApprovalRequired);

    engine
        .enforce("cognition.reason")
        .expect("ungated allowed path must pass");
}

#[test]
fn missing_rules_file_is_fatal() {
    let path = std::env::temp_dir().join(format!("kaia-governor-missing-{}.jsonc", Uuid::now_v7()));
    let err = GovernorEngine::load(&path).expect_err("missing rules must fail");
    assert_eq!(err.kind, GovernorErrorKind::RulesUnavailable);
}

#[test]
fn malformed_rules_file_is_fatal() {
    let path = std::env::temp_dir().join(format!("kaia-governor-bad-{}.jsonc", Uuid::now_v7()));
    fs::write(&path, "{ this is not a rules document").expect("file should be written");

    let err = GovernorEngine::load(&path).expect_err("malformed rules must fail");
    assert_eq!(err.kind, GovernorErrorKind::MalformedRules);

    let _ = fs::remove_file(&path);
}
