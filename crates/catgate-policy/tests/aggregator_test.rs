//! Tests for decision aggregation.

use catgate_core::errors::GateError;
use catgate_policy::{Decision, EvaluationReport, EvaluationResult, ResultAggregator, ResultStatus};

fn result(id: &str, status: ResultStatus) -> EvaluationResult {
    EvaluationResult {
        assertion_id: id.to_string(),
        description: id.to_string(),
        origin: "global: base.toml".to_string(),
        status,
        detail: (status != ResultStatus::Passed).then(|| format!("{id}: went wrong")),
    }
}

#[test]
fn test_empty_report_allows() {
    let decision = ResultAggregator::aggregate(&EvaluationReport::default());
    assert_eq!(decision, Decision::Allow);
    assert!(decision.rejection_message().is_none());
    assert!(decision.into_error().is_none());
}

#[test]
fn test_all_passed_allows() {
    let report = EvaluationReport::new(vec![
        result("a", ResultStatus::Passed),
        result("b", ResultStatus::Passed),
    ]);
    assert!(ResultAggregator::aggregate(&report).is_allowed());
}

/// Failed and errored results both deny, in report order.
#[test]
fn test_failures_in_order() {
    let report = EvaluationReport::new(vec![
        result("a", ResultStatus::Errored),
        result("b", ResultStatus::Passed),
        result("c", ResultStatus::Failed),
    ]);
    let decision = ResultAggregator::aggregate(&report);

    assert_eq!(
        decision.failures(),
        [
            "-- Failed policy: a: went wrong".to_string(),
            "-- Failed policy: c: went wrong".to_string(),
        ]
    );
    assert_eq!(
        decision.rejection_message().unwrap(),
        "Catalog failed to pass security policies:\n-- Failed policy: a: went wrong\n-- Failed policy: c: went wrong"
    );
}

#[test]
fn test_deny_converts_to_policy_violation() {
    let report = EvaluationReport::new(vec![result("a", ResultStatus::Failed)]);
    let err = ResultAggregator::aggregate(&report).into_error().unwrap();
    assert!(matches!(err, GateError::PolicyViolation { ref failures } if failures.len() == 1));
}
